use crate::model::{MonthBucket, TransactionRecord, YearMonth};
use chrono::NaiveDate;
use tracing::{debug, trace};

/// Number of calendar months in the rolling usage window, including the reference month.
pub const WINDOW_MONTHS: u32 = 6;

/// The months of the rolling window that ends at `reference_date`'s month, oldest first.
pub fn window_months(reference_date: NaiveDate) -> Vec<YearMonth> {
    let start = YearMonth::of(reference_date).minus_months(WINDOW_MONTHS - 1);
    (0..WINDOW_MONTHS).map(|i| start.plus_months(i)).collect()
}

/// Why `MonthlyTotals::add` left a record out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonthlySkip {
    NoDate,
    NoAmount,
    OutsideWindow(YearMonth),
    /// Adding the amount would overflow the month's total.
    Overflow(YearMonth),
}

/// Zero-filled buckets for the window, filled one record at a time.
#[derive(Debug)]
pub(crate) struct MonthlyTotals {
    buckets: Vec<MonthBucket>,
}

impl MonthlyTotals {
    pub(crate) fn new(reference_date: NaiveDate) -> Self {
        let buckets = window_months(reference_date)
            .into_iter()
            .map(MonthBucket::empty)
            .collect();
        Self { buckets }
    }

    pub(crate) fn add(&mut self, record: &TransactionRecord) -> Result<(), MonthlySkip> {
        let date = record.date().ok_or(MonthlySkip::NoDate)?;
        let amount = record.amount.ok_or(MonthlySkip::NoAmount)?;
        let month = YearMonth::of(date);
        let bucket = self
            .buckets
            .iter_mut()
            .find(|b| b.year_month() == month)
            .ok_or(MonthlySkip::OutsideWindow(month))?;
        bucket.total_tickets = bucket
            .total_tickets
            .checked_add(amount.abs())
            .ok_or(MonthlySkip::Overflow(month))?;
        Ok(())
    }

    pub(crate) fn into_buckets(self) -> Vec<MonthBucket> {
        self.buckets
    }
}

/// Buckets ticket usage into the six calendar months ending at `reference_date`'s month.
///
/// Each transaction with a parseable date inside the window adds the absolute value of its amount
/// to its month. Records without a usable date or amount, or dated outside the window, are skipped.
/// So is a record that would push its month's total past the largest representable value.
/// The result always has exactly [`WINDOW_MONTHS`] entries in ascending order, including months
/// with no activity.
pub fn bucket_monthly(
    transactions: &[TransactionRecord],
    reference_date: NaiveDate,
) -> Vec<MonthBucket> {
    let mut totals = MonthlyTotals::new(reference_date);
    for (ix, record) in transactions.iter().enumerate() {
        match totals.add(record) {
            Ok(()) => {}
            Err(MonthlySkip::NoDate) => {
                trace!("Record {ix} has no parseable date, leaving it out of the monthly buckets")
            }
            Err(MonthlySkip::NoAmount) => {
                trace!("Record {ix} has no usable amount, leaving it out of the monthly buckets")
            }
            Err(MonthlySkip::OutsideWindow(month)) => {
                trace!("Record {ix} is dated {month}, outside the monthly window")
            }
            Err(MonthlySkip::Overflow(month)) => {
                debug!("Record {ix} would overflow the {month} total, skipping")
            }
        }
    }
    totals.into_buckets()
}
