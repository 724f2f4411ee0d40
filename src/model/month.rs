use crate::model::Amount;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Short month labels used on chart axes, indexed by `month - 1`.
const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// A calendar month. `month` is 1-based (January is 1).
///
/// Month arithmetic is done on a linear month index (`year * 12 + month - 1`) so that stepping
/// backwards across a year boundary can never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Three letter label for chart axes, e.g. `Mar`.
    pub fn label(&self) -> &'static str {
        MONTH_LABELS[(self.month - 1) as usize]
    }

    /// Returns the month `n` months before this one.
    pub fn minus_months(&self, n: u32) -> Self {
        Self::from_index(self.index() - i64::from(n))
    }

    /// Returns the month `n` months after this one.
    pub fn plus_months(&self, n: u32) -> Self {
        Self::from_index(self.index() + i64::from(n))
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Expected a month formatted as YYYY-MM, got '{s}'"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid year in '{s}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid month in '{s}'"))?;
        YearMonth::new(year, month).ok_or_else(|| anyhow::anyhow!("Month out of range in '{s}'"))
    }
}

/// The ticket usage total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub total_tickets: Amount,
}

impl MonthBucket {
    /// An empty bucket for `month`.
    pub fn empty(month: YearMonth) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
            label: month.label().to_string(),
            total_tickets: Amount::ZERO,
        }
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_month_out_of_range() {
        assert!(YearMonth::new(2024, 0).is_none());
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 12).is_some());
    }

    #[test]
    fn test_minus_months_crosses_year() {
        let march = YearMonth::new(2024, 3).unwrap();
        assert_eq!(march.minus_months(5), YearMonth::new(2023, 10).unwrap());
        assert_eq!(march.minus_months(3), YearMonth::new(2023, 12).unwrap());
        assert_eq!(march.minus_months(0), march);
    }

    #[test]
    fn test_plus_months_crosses_year() {
        let nov = YearMonth::new(2023, 11).unwrap();
        assert_eq!(nov.plus_months(2), YearMonth::new(2024, 1).unwrap());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let dec = YearMonth::new(2023, 12).unwrap();
        let jan = YearMonth::new(2024, 1).unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_labels() {
        assert_eq!(YearMonth::new(2024, 1).unwrap().label(), "Ene");
        assert_eq!(YearMonth::new(2024, 8).unwrap().label(), "Ago");
        assert_eq!(YearMonth::new(2024, 12).unwrap().label(), "Dic");
    }

    #[test]
    fn test_parse_and_display() {
        let ym: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(ym, YearMonth::new(2024, 3).unwrap());
        assert_eq!(ym.to_string(), "2024-03");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }
}
