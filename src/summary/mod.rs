//! Turns a fetched list of ticket transactions into the data behind the tickets screen: a rolling
//! six month usage series, a per-category breakdown and the highlighted month.
//!
//! Everything in this module is synchronous and pure. The reference date and the color palette are
//! always passed in, so the same input always produces the same output.

mod category;
mod monthly;
mod validate;
mod view;

pub use category::aggregate_by_category;
pub use monthly::{bucket_monthly, window_months, WINDOW_MONTHS};
pub use validate::{validate_records, IssueKind, RecordIssue};
pub use view::{build_summary, MonthSelector, SummaryView};

use crate::model::YearMonth;

/// Failures raised while building a summary view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("Month index {index} is out of range, the window has {len} months")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{month} is outside the summary window{}", window_text(.first, .last))]
    MonthOutsideWindow {
        month: YearMonth,
        first: Option<YearMonth>,
        last: Option<YearMonth>,
    },
}

fn window_text(first: &Option<YearMonth>, last: &Option<YearMonth>) -> String {
    match (first, last) {
        (Some(first), Some(last)) => format!(" ({first} to {last})"),
        _ => String::new(),
    }
}
