use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::domain::{ApplicationStatus, CandidateProfile, Completion};

pub const LOG_HEADER: [&str; 10] = [
    "recorded_at",
    "full_name",
    "age",
    "phone",
    "city",
    "shift",
    "shift_time",
    "cafe",
    "status",
    "note",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One audit row per finished questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationLogEntry {
    pub recorded_at: NaiveDateTime,
    pub profile: CandidateProfile,
    pub status: ApplicationStatus,
    pub note: Option<String>,
}

impl ApplicationLogEntry {
    pub fn from_completion(recorded_at: NaiveDateTime, completion: &Completion) -> Self {
        Self {
            recorded_at,
            profile: completion.profile.clone(),
            status: completion.outcome.status(),
            note: completion.outcome.note().map(str::to_string),
        }
    }

    pub fn csv_row(&self) -> [String; 10] {
        let profile = &self.profile;
        [
            self.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            profile.name_or_missing().to_string(),
            profile.age_or_missing(),
            profile.phone_or_missing().to_string(),
            profile.city_or_missing().to_string(),
            profile.shift_or_missing().to_string(),
            profile.shift_window_or_missing(),
            profile.cafe_or_missing().to_string(),
            self.status.label().to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

/// Durable, append-only sink for application outcomes.
pub trait ApplicationLog: Send + Sync {
    fn append(&self, entry: &ApplicationLogEntry) -> Result<(), LogWriteError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LogWriteError {
    #[error("application log unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("application log write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV file log. The header row is written only when the file is new or empty.
#[derive(Debug)]
pub struct CsvApplicationLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvApplicationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ApplicationLog for CsvApplicationLog {
    fn append(&self, entry: &ApplicationLogEntry) -> Result<(), LogWriteError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => true,
            Err(err) => return Err(err.into()),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(LOG_HEADER)?;
        }
        writer.write_record(entry.csv_row())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hiring::catalog::ShiftPeriod;
    use crate::workflows::hiring::intake::domain::{
        CandidateId, IntakeOutcome, RejectionReason, ShiftPreference,
    };
    use crate::workflows::hiring::intake::shift_window::ShiftWindow;
    use chrono::NaiveDate;

    fn recorded_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp")
    }

    fn rejected() -> ApplicationLogEntry {
        ApplicationLogEntry::from_completion(
            recorded_at(),
            &Completion {
                candidate: CandidateId::new("1"),
                outcome: IntakeOutcome::Rejected(RejectionReason::Underage),
                profile: CandidateProfile {
                    full_name: Some("Anna Smirnova".to_string()),
                    age: Some(16),
                    ..CandidateProfile::default()
                },
            },
        )
    }

    #[test]
    fn row_renders_missing_fields_as_dash() {
        let row = rejected().csv_row();
        assert_eq!(
            row,
            [
                "2025-10-01 09:30",
                "Anna Smirnova",
                "16",
                "-",
                "-",
                "-",
                "-",
                "-",
                "REJECTED",
                "underage"
            ]
            .map(str::to_string)
        );
    }

    #[test]
    fn row_renders_partial_shift_window() {
        let entry = ApplicationLogEntry::from_completion(
            recorded_at(),
            &Completion {
                candidate: CandidateId::new("2"),
                outcome: IntakeOutcome::NoMatchPartial,
                profile: CandidateProfile {
                    full_name: Some("Oleg".to_string()),
                    age: Some(22),
                    phone: Some("+79001234567".to_string()),
                    city: Some("Artem".to_string()),
                    shift: Some(ShiftPreference {
                        period: ShiftPeriod::Day,
                        partial: true,
                    }),
                    shift_window: Some(ShiftWindow {
                        start_minute: 9 * 60,
                        end_minute: 16 * 60,
                    }),
                    cafe: None,
                },
            },
        );
        let row = entry.csv_row();
        assert_eq!(row[5], "partial day");
        assert_eq!(row[6], "09:00-16:00");
        assert_eq!(row[8], "NO_MATCH_PARTIAL");
        assert_eq!(row[9], "no vacancies accept partial shifts");
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = CsvApplicationLog::new(dir.path().join("applications_log.csv"));

        log.append(&rejected()).expect("first append");
        log.append(&rejected()).expect("second append");

        let contents = std::fs::read_to_string(log.path()).expect("log readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("recorded_at,full_name,age"));
        assert_eq!(
            contents.matches("recorded_at").count(),
            1,
            "header must appear exactly once"
        );
    }

    #[test]
    fn existing_file_gets_no_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("applications_log.csv");
        std::fs::write(&path, "legacy,row\n").expect("seed file");

        CsvApplicationLog::new(&path)
            .append(&rejected())
            .expect("append");

        let contents = std::fs::read_to_string(&path).expect("log readable");
        assert!(!contents.contains("recorded_at"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn unavailable_sink_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = CsvApplicationLog::new(dir.path().join("missing-dir").join("log.csv"));
        assert!(matches!(log.append(&rejected()), Err(LogWriteError::Io(_))));
    }
}
