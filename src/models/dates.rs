//! Calendar date handling shared by every pipeline.
//!
//! Spreadsheet exports mark a missing date in several ways (an empty cell,
//! `NaT`, `nan`, `None`). All of them collapse into the single absent state of
//! [`OptionalDate`]; anything else that fails to parse is a format error.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EngineError, EngineResult};

/// Textual markers that spreadsheet tools emit for "no date".
const ABSENT_MARKERS: [&str; 5] = ["", "nat", "nan", "none", "null"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Timestamp layouts of spreadsheet exports. `%.f` also matches no fraction.
const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Parses a calendar date.
///
/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`, optionally followed by a time
/// component which is discarded.
///
/// # Examples
///
/// ```
/// use allowance_engine::models::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_date("2024-03-01").unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
/// );
/// assert_eq!(
///     parse_date("2024/03/01 00:00:00").unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
/// );
/// assert!(parse_date("03/01/2024").is_err());
/// ```
pub fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|timestamp| timestamp.date())
            })
        })
        .ok_or_else(|| EngineError::InvalidDate {
            value: value.to_string(),
            message: "expected YYYY-MM-DD".to_string(),
        })
}

/// A date that may be absent.
///
/// There is exactly one absent representation; serialized as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionalDate(Option<NaiveDate>);

impl OptionalDate {
    /// The absent date.
    pub const ABSENT: OptionalDate = OptionalDate(None);

    /// Wraps a present date.
    pub fn present(date: NaiveDate) -> Self {
        Self(Some(date))
    }

    /// Parses a cell value, mapping every spreadsheet "blank" marker to absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use allowance_engine::models::OptionalDate;
    ///
    /// assert!(OptionalDate::parse("NaT").unwrap().is_absent());
    /// assert!(OptionalDate::parse("  ").unwrap().is_absent());
    /// assert!(OptionalDate::parse("2025-06-30").unwrap().is_present());
    /// assert!(OptionalDate::parse("30.06.2025").is_err());
    /// ```
    pub fn parse(value: &str) -> EngineResult<Self> {
        let trimmed = value.trim();
        if ABSENT_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
        {
            return Ok(Self::ABSENT);
        }
        parse_date(trimmed).map(Self::present)
    }

    /// Returns true if a date is present.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Returns true if no date is present.
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the date, if present.
    pub fn get(&self) -> Option<NaiveDate> {
        self.0
    }

    /// Returns the year of the date, if present.
    pub fn year(&self) -> Option<i32> {
        self.0.map(|d| d.year())
    }

    /// Returns `self` if present, otherwise `other`.
    pub fn or(self, other: OptionalDate) -> OptionalDate {
        if self.is_present() { self } else { other }
    }
}

impl From<NaiveDate> for OptionalDate {
    fn from(date: NaiveDate) -> Self {
        Self::present(date)
    }
}

impl From<Option<NaiveDate>> for OptionalDate {
    fn from(date: Option<NaiveDate>) -> Self {
        Self(date)
    }
}

/// Formats as `YYYY-MM-DD`, or as the empty string when absent.
impl fmt::Display for OptionalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for OptionalDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Self::ABSENT),
            Some(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}
