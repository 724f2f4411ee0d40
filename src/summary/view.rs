use crate::model::{CategoryPalette, CategorySummary, MonthBucket, TransactionRecord, YearMonth};
use crate::summary::{aggregate_by_category, bucket_monthly, SummaryError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Chooses which monthly bucket is highlighted in the summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthSelector {
    /// The most recent month in the window.
    #[default]
    Latest,
    /// Position in the window, `0` being the oldest month.
    Index(usize),
    /// A specific calendar month, which must fall inside the window.
    Month(YearMonth),
}

impl MonthSelector {
    fn select(&self, monthly: &[MonthBucket]) -> Result<Option<MonthBucket>, SummaryError> {
        match self {
            MonthSelector::Latest => Ok(monthly.last().cloned()),
            MonthSelector::Index(index) => monthly
                .get(*index)
                .cloned()
                .map(Some)
                .ok_or(SummaryError::IndexOutOfRange {
                    index: *index,
                    len: monthly.len(),
                }),
            MonthSelector::Month(month) => monthly
                .iter()
                .find(|bucket| bucket.year_month() == *month)
                .cloned()
                .map(Some)
                .ok_or_else(|| SummaryError::MonthOutsideWindow {
                    month: *month,
                    first: monthly.first().map(MonthBucket::year_month),
                    last: monthly.last().map(MonthBucket::year_month),
                }),
        }
    }
}

impl Display for MonthSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthSelector::Latest => write!(f, "latest"),
            MonthSelector::Index(index) => write!(f, "{index}"),
            MonthSelector::Month(month) => write!(f, "{month}"),
        }
    }
}

impl FromStr for MonthSelector {
    type Err = anyhow::Error;

    /// Accepts `latest`, a window index such as `2`, or a month such as `2024-03`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(MonthSelector::Latest);
        }
        if let Ok(index) = s.parse::<usize>() {
            return Ok(MonthSelector::Index(index));
        }
        Ok(MonthSelector::Month(s.parse()?))
    }
}

/// Everything the tickets screen renders: the monthly series, the category breakdown and the
/// highlighted month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub monthly: Vec<MonthBucket>,
    pub categories: Vec<CategorySummary>,
    pub selected_month: Option<MonthBucket>,
}

/// Builds the summary view from one snapshot of transactions.
///
/// Both the monthly series and the category breakdown are computed from the same `transactions`
/// slice. The selected month defaults to the most recent bucket.
///
/// # Errors
/// Returns a [`SummaryError`] if `selector` does not point at a bucket in the window.
pub fn build_summary(
    transactions: &[TransactionRecord],
    reference_date: NaiveDate,
    selector: MonthSelector,
    palette: &CategoryPalette,
) -> Result<SummaryView, SummaryError> {
    let monthly = bucket_monthly(transactions, reference_date);
    let categories = aggregate_by_category(transactions, palette);
    let selected_month = selector.select(&monthly)?;
    Ok(SummaryView {
        monthly,
        categories,
        selected_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn build(
        transactions: &[TransactionRecord],
        selector: MonthSelector,
    ) -> Result<SummaryView, SummaryError> {
        build_summary(
            transactions,
            date(2024, 3, 20),
            selector,
            &CategoryPalette::default(),
        )
    }

    #[test]
    fn test_single_event_in_reference_month() {
        let transactions = vec![TransactionRecord::new(100, "Eventos", "2024-03-15")];
        let view = build(&transactions, MonthSelector::Latest).unwrap();

        let months: Vec<(i32, u32)> = view.monthly.iter().map(|b| (b.year, b.month)).collect();
        assert_eq!(
            months,
            vec![
                (2023, 10),
                (2023, 11),
                (2023, 12),
                (2024, 1),
                (2024, 2),
                (2024, 3)
            ]
        );
        assert_eq!(view.monthly[5].total_tickets, Amount::from(100));
        assert!(view.monthly[..5].iter().all(|b| b.total_tickets.is_zero()));

        assert_eq!(view.categories.len(), 1);
        assert_eq!(view.categories[0].name, "Eventos");
        assert_eq!(view.categories[0].ticket_amount, Amount::from(100));
        assert_eq!(view.categories[0].transaction_count, 1);

        assert_eq!(view.selected_month.as_ref(), view.monthly.last());
    }

    #[test]
    fn test_transfer_pair() {
        let transactions = vec![
            TransactionRecord::new(30, "Transferencia", "2024-02-01").with_transfer_group("t1"),
            TransactionRecord::new(-30, "Transferencia", "2024-02-01").with_transfer_group("t1"),
        ];
        let view = build(&transactions, MonthSelector::Latest).unwrap();
        assert_eq!(view.categories.len(), 1);
        assert_eq!(view.categories[0].name, "Transferencia");
        assert_eq!(view.categories[0].ticket_amount, Amount::from(30));
        assert_eq!(view.categories[0].transaction_count, 1);
    }

    #[test]
    fn test_bad_date_only_affects_buckets() {
        let transactions = vec![TransactionRecord::new(40, "Eventos", "not-a-date")];
        let view = build(&transactions, MonthSelector::Latest).unwrap();
        assert!(view.monthly.iter().all(|b| b.total_tickets.is_zero()));
        assert_eq!(view.categories[0].name, "Eventos");
        assert_eq!(view.categories[0].ticket_amount, Amount::from(40));
    }

    #[test]
    fn test_repeat_builds_are_equal() {
        let transactions = vec![
            TransactionRecord::new(12, "Eventos", "2024-03-15"),
            TransactionRecord::new(8, "Transferencia", "2024-01-02").with_transfer_group("x"),
            TransactionRecord::new(-8, "Transferencia", "2024-01-02").with_transfer_group("x"),
        ];
        let first = build(&transactions, MonthSelector::Latest).unwrap();
        let second = build(&transactions, MonthSelector::Latest).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_by_index_and_month() {
        let transactions = vec![TransactionRecord::new(5, "Eventos", "2024-01-09")];
        let by_index = build(&transactions, MonthSelector::Index(3)).unwrap();
        let selected = by_index.selected_month.unwrap();
        assert_eq!((selected.year, selected.month), (2024, 1));
        assert_eq!(selected.total_tickets, Amount::from(5));

        let january = YearMonth::new(2024, 1).unwrap();
        let by_month = build(&transactions, MonthSelector::Month(january)).unwrap();
        assert_eq!(by_month.selected_month, Some(selected));
    }

    #[test]
    fn test_selector_outside_window_is_an_error() {
        let err = build(&[], MonthSelector::Index(6)).unwrap_err();
        assert_eq!(err, SummaryError::IndexOutOfRange { index: 6, len: 6 });

        let april = YearMonth::new(2024, 4).unwrap();
        let err = build(&[], MonthSelector::Month(april)).unwrap_err();
        assert!(matches!(err, SummaryError::MonthOutsideWindow { .. }));
        assert!(err.to_string().contains("2024-04"), "{err}");
    }

    #[test]
    fn test_empty_input() {
        let view = build(&[], MonthSelector::Latest).unwrap();
        assert_eq!(view.monthly.len(), 6);
        assert_eq!(view.categories.len(), 1);
        assert!(view.categories[0].is_placeholder());
        assert!(view.selected_month.is_some());
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!("latest".parse::<MonthSelector>().unwrap(), MonthSelector::Latest);
        assert_eq!("2".parse::<MonthSelector>().unwrap(), MonthSelector::Index(2));
        assert_eq!(
            "2024-02".parse::<MonthSelector>().unwrap(),
            MonthSelector::Month(YearMonth::new(2024, 2).unwrap())
        );
        assert!("feb".parse::<MonthSelector>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let transactions = vec![TransactionRecord::new(100, "Eventos", "2024-03-15")];
        let view = build(&transactions, MonthSelector::Latest).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["selectedMonth"]["totalTickets"], 100);
        assert_eq!(json["categories"][0]["ticketAmount"], 100);
        assert_eq!(json["categories"][0]["transactionCount"], 1);
        assert_eq!(json["monthly"].as_array().unwrap().len(), 6);
    }
}
