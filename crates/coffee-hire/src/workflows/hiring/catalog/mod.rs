mod normalizer;
mod parser;

use normalizer::normalize_city;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// One row of the vacancy sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub shop: String,
    pub address: String,
    pub city: String,
    pub day_slots: u32,
    pub night_slots: u32,
    pub accepts_partial: bool,
}

impl VacancyRecord {
    pub fn has_opening(&self, period: ShiftPeriod) -> bool {
        match period {
            ShiftPeriod::Day => self.day_slots > 0,
            ShiftPeriod::Night => self.night_slots > 0,
        }
    }

    /// Label shown to candidates when they pick a cafe.
    pub fn display_label(&self) -> String {
        format!("{} — {}", self.shop, self.address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPeriod {
    Day,
    Night,
}

impl ShiftPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            ShiftPeriod::Day => "day",
            ShiftPeriod::Night => "night",
        }
    }
}

impl fmt::Display for ShiftPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read vacancy sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid vacancy CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: '{value}' is not a valid {column} count")]
    InvalidCount {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Vacancy list shared by every intake session.
///
/// Readers take a cheap clone of the current snapshot; reloads build a complete replacement
/// before swapping it in, so a query never observes a half-loaded sheet.
#[derive(Debug, Default)]
pub struct VacancyCatalog {
    snapshot: RwLock<Arc<Vec<VacancyRecord>>>,
}

impl VacancyCatalog {
    pub fn new(records: Vec<VacancyRecord>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(records)),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        Ok(Self::new(parser::parse_records(reader)?))
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Startup load. A missing or broken sheet leaves the bot running with no vacancies.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(catalog) => {
                info!(path = %path.display(), records = catalog.len(), "vacancy catalog loaded");
                catalog
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "vacancy catalog unavailable; starting empty"
                );
                Self::default()
            }
        }
    }

    /// Replace the catalog from `path`. On failure the current snapshot stays in place.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<usize, CatalogLoadError> {
        let file = std::fs::File::open(path)?;
        self.reload_from_reader(file)
    }

    pub fn reload_from_reader<R: Read>(&self, reader: R) -> Result<usize, CatalogLoadError> {
        let records = parser::parse_records(reader)?;
        Ok(self.replace(records))
    }

    pub fn replace(&self, records: Vec<VacancyRecord>) -> usize {
        let count = records.len();
        let fresh = Arc::new(records);
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = fresh;
        count
    }

    pub fn snapshot(&self) -> Arc<Vec<VacancyRecord>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in `city` with an opening for `period`, in sheet order.
    pub fn query(&self, city: &str, period: ShiftPeriod, partial_only: bool) -> Vec<VacancyRecord> {
        let wanted = normalize_city(city);
        self.snapshot()
            .iter()
            .filter(|record| normalize_city(&record.city) == wanted)
            .filter(|record| record.has_opening(period))
            .filter(|record| !partial_only || record.accepts_partial)
            .cloned()
            .collect()
    }
}
