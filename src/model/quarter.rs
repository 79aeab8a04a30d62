use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A calendar quarter: Q1 = Jan–Mar, Q2 = Apr–Jun, Q3 = Jul–Sep, Q4 = Oct–Dec.
///
/// Ordering is lexicographic on `(year, quarter)`, so `Q1-2026 > Q4-2025`.
/// The label form `Q<1-4>-<year>` exists only at the Display/FromStr
/// boundary; everything else works with the structured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u8,
}

/// Error type for quarter label parsing
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuarterParseError {
    #[error("invalid quarter label \"{0}\" — expected Q<1-4>-<year> (e.g. Q3-2025)")]
    Malformed(String),
    #[error("quarter out of range in \"{0}\" — must be 1 through 4")]
    QuarterOutOfRange(String),
}

impl Quarter {
    /// Construct a quarter, returning None unless `quarter` is in 1..=4.
    pub fn new(quarter: u8, year: i32) -> Option<Quarter> {
        if (1..=4).contains(&quarter) {
            Some(Quarter { year, quarter })
        } else {
            None
        }
    }

    /// First calendar day of the quarter (e.g. Q2-2025 → 2025-04-01).
    pub fn first_day(self) -> NaiveDate {
        let month = (self.quarter as u32 - 1) * 3 + 1;
        // month is 1/4/7/10 and day 1 always exists
        NaiveDate::from_ymd_opt(self.year, month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the quarter (e.g. Q2-2025 → 2025-06-30).
    pub fn last_day(self) -> NaiveDate {
        let (next_month_year, next_month) = if self.quarter == 4 {
            (self.year + 1, 1)
        } else {
            (self.year, self.quarter as u32 * 3 + 1)
        };
        NaiveDate::from_ymd_opt(next_month_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{}", self.quarter, self.year)
    }
}

impl FromStr for Quarter {
    type Err = QuarterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('Q')
            .ok_or_else(|| QuarterParseError::Malformed(s.to_string()))?;
        let (q_str, year_str) = rest
            .split_once('-')
            .ok_or_else(|| QuarterParseError::Malformed(s.to_string()))?;
        let quarter: u8 = q_str
            .parse()
            .map_err(|_| QuarterParseError::Malformed(s.to_string()))?;
        let year: i32 = year_str
            .parse()
            .map_err(|_| QuarterParseError::Malformed(s.to_string()))?;
        Quarter::new(quarter, year).ok_or_else(|| QuarterParseError::QuarterOutOfRange(s.to_string()))
    }
}
