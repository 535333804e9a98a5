use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::Birthdate;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Lenient birthdate parsing. ISO dates first, then common written forms and timestamps.
pub fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|timestamp| timestamp.date())
        })
}

/// Whole years elapsed between `birthdate` and `reference`. Future birthdates yield zero.
pub fn age_on(birthdate: NaiveDate, reference: NaiveDate) -> u32 {
    if birthdate >= reference {
        return 0;
    }

    let mut years = reference.year() - birthdate.year();
    if (reference.month(), reference.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }

    u32::try_from(years).unwrap_or(0)
}

/// Birthdate was supplied but could not be read as a date; the record is kept without an age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationSoftFailure {
    pub field: &'static str,
    pub raw: String,
}

impl fmt::Display for DerivationSoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' is not a recognizable date; age left unset",
            self.field, self.raw
        )
    }
}

/// Resolve the stored birthdate and its derived age against `reference`.
pub fn derive_age(
    raw: &str,
    reference: NaiveDate,
) -> (Birthdate, Option<u32>, Option<DerivationSoftFailure>) {
    match parse_birthdate(raw) {
        Some(date) => (Birthdate::Date(date), Some(age_on(date, reference)), None),
        None => {
            let raw = raw.trim().to_string();
            let failure = DerivationSoftFailure {
                field: "birthdate",
                raw: raw.clone(),
            };
            (Birthdate::Unparsed(raw), None, Some(failure))
        }
    }
}
