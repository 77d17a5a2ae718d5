use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};

/// A calendar year + month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Month {
    pub(crate) year: i32,
    /// 1-based (January = 1).
    pub(crate) month: u32,
}

const SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Month {
    /// Returns `None` for a month number outside `1..=12`.
    #[cfg(test)]
    pub(crate) fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub(crate) fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub(crate) fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub(crate) fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Storage-style key, e.g. `2024-01`.
    pub(crate) fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Column header label, e.g. `Jan 2024`.
    pub(crate) fn short_label(&self) -> String {
        let name = SHORT_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        format!("{name} {}", self.year)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid month '{0}'. Use YYYY-MM (e.g. 2024-01)")]
pub(crate) struct ParseMonthError(pub(crate) String);

impl FromStr for Month {
    type Err = ParseMonthError;

    /// Accepts `YYYY-MM` and `YYYY-M`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Validate by parsing as an actual date
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| ParseMonthError(trimmed.to_string()))
    }
}
