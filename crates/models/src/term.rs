use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

/// Errors produced while resolving a term's calendar window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("Unknown term: {0}")]
    UnknownTerm(String),
    #[error("Year {0} is out of range")]
    YearOutOfRange(i32),
}

/// An academic term within a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Term {
    Spring,
    Summer,
    Fall,
}

/// The `[start, end)` window in which a term takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermDates {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Term {
    pub const ALL: [Self; 3] = [Self::Spring, Self::Summer, Self::Fall];

    /// Month/day boundaries of each term, independent of the year
    const fn boundaries(self) -> ((u32, u32), (u32, u32)) {
        match self {
            Self::Spring => ((1, 15), (5, 15)),
            Self::Summer => ((6, 1), (8, 1)),
            Self::Fall => ((8, 15), (12, 15)),
        }
    }

    /// Computes the fixed calendar window of this term in `year`.
    ///
    /// Boundaries fall on midnight UTC.
    pub fn dates(self, year: i32) -> Result<TermDates, TermError> {
        let ((start_month, start_day), (end_month, end_day)) = self.boundaries();

        let midnight = |month: u32, day: u32| {
            NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|datetime| datetime.and_utc())
                .ok_or(TermError::YearOutOfRange(year))
        };

        Ok(TermDates {
            start: midnight(start_month, start_day)?,
            end: midnight(end_month, end_day)?,
        })
    }

    /// Parses a term name, reporting the raw input when it is not a known term
    pub fn parse(term: &str) -> Result<Self, TermError> {
        Self::from_str(term).map_err(|_| TermError::UnknownTerm(term.to_owned()))
    }
}

/// Resolves the calendar window for a term given by name
pub fn term_dates(term: &str, year: i32) -> Result<TermDates, TermError> {
    Term::parse(term)?.dates(year)
}

impl TermDates {
    /// Whether the term is already underway (or over) at `now`
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start
    }

    /// Whether the term's window has closed at `now`
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end <= now
    }
}

#[cfg(feature = "database")]
crate::value::impl_text_value!(Term);
