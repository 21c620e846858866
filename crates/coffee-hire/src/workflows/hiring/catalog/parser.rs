use super::{CatalogLoadError, VacancyRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Header row occupies line 1 of the file.
const FIRST_DATA_LINE: usize = 2;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<VacancyRecord>, CatalogLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<VacancyRow>().enumerate() {
        let row = row?;
        let line = index + FIRST_DATA_LINE;

        records.push(VacancyRecord {
            day_slots: parse_count(row.day.as_deref(), "day", line)?,
            night_slots: parse_count(row.night.as_deref(), "night", line)?,
            accepts_partial: row.partial.as_deref().map(is_truthy).unwrap_or(false),
            shop: row.shop,
            address: row.address,
            city: row.city,
        });
    }

    Ok(records)
}

/// Spreadsheet export row. The chain's sheets use Russian headers; English ones are accepted too.
#[derive(Debug, Deserialize)]
struct VacancyRow {
    #[serde(rename = "city", alias = "City", alias = "Город")]
    city: String,
    #[serde(
        rename = "day",
        alias = "Day",
        alias = "День",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    day: Option<String>,
    #[serde(
        rename = "night",
        alias = "Night",
        alias = "Ночь",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    night: Option<String>,
    #[serde(rename = "shop", alias = "Shop", alias = "Кофейня", default)]
    shop: String,
    #[serde(rename = "address", alias = "Address", alias = "Адрес", default)]
    address: String,
    #[serde(
        rename = "partial",
        alias = "Partial",
        alias = "Неполный",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    partial: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_count(
    raw: Option<&str>,
    column: &'static str,
    line: usize,
) -> Result<u32, CatalogLoadError> {
    match raw {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| CatalogLoadError::InvalidCount {
                line,
                column,
                value: value.to_string(),
            }),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "yes" | "y" | "true" | "+" | "да"
    )
}
