use crate::model::{TransactionRecord, YearMonth};
use crate::summary::category::{CategorySkip, CategoryTotals};
use crate::summary::monthly::{MonthlySkip, MonthlyTotals};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Why a record is left out of some part of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IssueKind {
    /// No usable amount; left out of buckets and categories.
    MissingAmount,
    /// Amount is zero; left out of categories.
    ZeroAmount,
    /// No date at all; left out of buckets.
    MissingDate,
    /// The date could not be parsed; left out of buckets.
    UnparseableDate { value: String },
    /// Dated outside the monthly window; left out of buckets.
    OutsideWindow { month: YearMonth },
    /// Second leg of a transfer that was already counted; left out of categories.
    DuplicateTransfer { group: String },
    /// Would overflow its month's total; left out of buckets.
    MonthOverflow { month: YearMonth },
    /// Would overflow its category's total; left out of categories.
    CategoryOverflow { category: String },
}

impl IssueKind {
    /// The snake_case name used as the `kind` tag when serialized.
    pub fn name(&self) -> &'static str {
        match self {
            IssueKind::MissingAmount => "missing_amount",
            IssueKind::ZeroAmount => "zero_amount",
            IssueKind::MissingDate => "missing_date",
            IssueKind::UnparseableDate { .. } => "unparseable_date",
            IssueKind::OutsideWindow { .. } => "outside_window",
            IssueKind::DuplicateTransfer { .. } => "duplicate_transfer",
            IssueKind::MonthOverflow { .. } => "month_overflow",
            IssueKind::CategoryOverflow { .. } => "category_overflow",
        }
    }
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::MissingAmount => write!(f, "missing or invalid amount"),
            IssueKind::ZeroAmount => write!(f, "zero amount"),
            IssueKind::MissingDate => write!(f, "missing date"),
            IssueKind::UnparseableDate { value } => write!(f, "unparseable date '{value}'"),
            IssueKind::OutsideWindow { month } => write!(f, "dated {month}, outside the window"),
            IssueKind::DuplicateTransfer { group } => {
                write!(f, "repeated leg of transfer '{group}'")
            }
            IssueKind::MonthOverflow { month } => write!(f, "overflows the {month} total"),
            IssueKind::CategoryOverflow { category } => {
                write!(f, "overflows the '{category}' total")
            }
        }
    }
}

/// One reason that the record at `index` is partly or wholly skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    pub index: usize,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl Display for RecordIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.index, self.kind)
    }
}

/// Reports every record that the aggregation functions would skip, and why.
///
/// This is a separate, read-only pass: it does not change what `bucket_monthly` or
/// `aggregate_by_category` produce. A record may have more than one issue.
pub fn validate_records(
    transactions: &[TransactionRecord],
    reference_date: NaiveDate,
) -> Vec<RecordIssue> {
    let mut monthly = MonthlyTotals::new(reference_date);
    let mut categories = CategoryTotals::default();
    let mut issues = Vec::new();

    for (index, record) in transactions.iter().enumerate() {
        let mut push = |kind| issues.push(RecordIssue { index, kind });

        match record.amount {
            None => push(IssueKind::MissingAmount),
            Some(amount) if amount.is_zero() => push(IssueKind::ZeroAmount),
            Some(_) => match categories.add(record) {
                Ok(()) | Err(CategorySkip::NoAmount) => {}
                Err(CategorySkip::RepeatedTransfer(group)) => push(IssueKind::DuplicateTransfer {
                    group: group.to_string(),
                }),
                Err(CategorySkip::Overflow(category)) => push(IssueKind::CategoryOverflow {
                    category: category.to_string(),
                }),
            },
        }

        match monthly.add(record) {
            Ok(()) | Err(MonthlySkip::NoAmount) => {}
            Err(MonthlySkip::NoDate) => match &record.transaction_date {
                None => push(IssueKind::MissingDate),
                Some(value) => push(IssueKind::UnparseableDate {
                    value: value.clone(),
                }),
            },
            Err(MonthlySkip::OutsideWindow(month)) => push(IssueKind::OutsideWindow { month }),
            Err(MonthlySkip::Overflow(month)) => push(IssueKind::MonthOverflow { month }),
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    #[test]
    fn test_clean_records_have_no_issues() {
        let transactions = vec![
            TransactionRecord::new(10, "Eventos", "2024-03-15"),
            TransactionRecord::new(5, "Transferencia", "2024-02-01").with_transfer_group("a"),
        ];
        assert!(validate_records(&transactions, reference()).is_empty());
    }

    #[test]
    fn test_reports_each_problem() {
        let transactions = vec![
            TransactionRecord {
                amount: None,
                ..TransactionRecord::new(0, "Eventos", "2024-03-01")
            },
            TransactionRecord::new(0, "Eventos", "2024-03-01"),
            TransactionRecord {
                transaction_date: None,
                ..TransactionRecord::new(1, "Eventos", "")
            },
            TransactionRecord::new(1, "Eventos", "not-a-date"),
            TransactionRecord::new(1, "Eventos", "2023-01-01"),
            TransactionRecord::new(2, "Transferencia", "2024-02-01").with_transfer_group("t"),
            TransactionRecord::new(-2, "Transferencia", "2024-02-01").with_transfer_group("t"),
        ];
        let issues = validate_records(&transactions, reference());
        let expected = vec![
            RecordIssue {
                index: 0,
                kind: IssueKind::MissingAmount,
            },
            RecordIssue {
                index: 1,
                kind: IssueKind::ZeroAmount,
            },
            RecordIssue {
                index: 2,
                kind: IssueKind::MissingDate,
            },
            RecordIssue {
                index: 3,
                kind: IssueKind::UnparseableDate {
                    value: "not-a-date".to_string(),
                },
            },
            RecordIssue {
                index: 4,
                kind: IssueKind::OutsideWindow {
                    month: YearMonth::new(2023, 1).unwrap(),
                },
            },
            RecordIssue {
                index: 6,
                kind: IssueKind::DuplicateTransfer {
                    group: "t".to_string(),
                },
            },
        ];
        assert_eq!(issues, expected);
    }

    #[test]
    fn test_reports_overflow_like_the_aggregators() {
        let huge: crate::model::Amount = "79228162514264337593543950335".parse().unwrap();
        let transactions = vec![
            TransactionRecord::new(huge, "Eventos", "2024-03-01"),
            TransactionRecord::new(1, "Eventos", "2024-03-01"),
            TransactionRecord::new(1, "Cupones", "2024-02-01"),
        ];
        let issues = validate_records(&transactions, reference());
        let expected = vec![
            RecordIssue {
                index: 1,
                kind: IssueKind::CategoryOverflow {
                    category: "Eventos".to_string(),
                },
            },
            RecordIssue {
                index: 1,
                kind: IssueKind::MonthOverflow {
                    month: YearMonth::new(2024, 3).unwrap(),
                },
            },
        ];
        assert_eq!(issues, expected);
        assert_eq!(issues[0].to_string(), "record 1: overflows the 'Eventos' total");
        assert_eq!(
            serde_json::to_value(&issues[1]).unwrap(),
            serde_json::json!({
                "index": 1,
                "kind": "month_overflow",
                "month": {"year": 2024, "month": 3}
            })
        );
    }

    #[test]
    fn test_display() {
        let issue = RecordIssue {
            index: 3,
            kind: IssueKind::UnparseableDate {
                value: "nope".to_string(),
            },
        };
        assert_eq!(issue.to_string(), "record 3: unparseable date 'nope'");
    }

    #[test]
    fn test_serialized_shape() {
        let issue = RecordIssue {
            index: 6,
            kind: IssueKind::DuplicateTransfer {
                group: "t".to_string(),
            },
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], issue.kind.name());
        assert_eq!(
            json,
            serde_json::json!({"index": 6, "kind": "duplicate_transfer", "group": "t"})
        );
    }
}
