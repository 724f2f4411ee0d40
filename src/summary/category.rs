use crate::model::{Amount, CategoryPalette, CategorySummary, TransactionRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Tracks which transfer groups have already been counted so that the sender and receiver rows of
/// one transfer only contribute once.
#[derive(Debug, Default)]
struct TransferDedup<'a> {
    seen: HashSet<&'a str>,
}

impl<'a> TransferDedup<'a> {
    fn is_repeat(&self, record: &TransactionRecord) -> bool {
        record
            .transfer_group()
            .is_some_and(|group| self.seen.contains(group))
    }

    fn claim(&mut self, record: &'a TransactionRecord) {
        if let Some(group) = record.transfer_group() {
            self.seen.insert(group);
        }
    }
}

/// Why `CategoryTotals::add` left a record out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategorySkip<'a> {
    /// Missing or zero amount.
    NoAmount,
    /// Another leg of this transfer group was already counted.
    RepeatedTransfer(&'a str),
    /// Adding the amount would overflow the category total.
    Overflow(&'a str),
}

/// Running per-category counts and totals, in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct CategoryTotals<'a> {
    dedup: TransferDedup<'a>,
    order: Vec<&'a str>,
    totals: HashMap<&'a str, (u64, Amount)>,
}

impl<'a> CategoryTotals<'a> {
    /// Counts `record` in its category, or says why it was left out. A skipped record never claims
    /// its transfer group.
    pub(crate) fn add(&mut self, record: &'a TransactionRecord) -> Result<(), CategorySkip<'a>> {
        let amount = record.countable_amount().ok_or(CategorySkip::NoAmount)?;
        if self.dedup.is_repeat(record) {
            return Err(CategorySkip::RepeatedTransfer(
                record.transfer_group().unwrap_or_default(),
            ));
        }

        let name = record.category();
        let (count, total) = self.totals.get(name).copied().unwrap_or_default();
        let total = total
            .checked_add(amount.abs())
            .ok_or(CategorySkip::Overflow(name))?;

        self.dedup.claim(record);
        if !self.totals.contains_key(name) {
            self.order.push(name);
        }
        self.totals.insert(name, (count + 1, total));
        Ok(())
    }

    fn into_summaries(self, palette: &CategoryPalette) -> Vec<CategorySummary> {
        if self.order.is_empty() {
            return vec![CategorySummary::placeholder(palette)];
        }
        self.order
            .into_iter()
            .map(|name| {
                let (transaction_count, ticket_amount) = self.totals[name];
                CategorySummary {
                    name: name.to_string(),
                    transaction_count,
                    ticket_amount,
                    color: palette.color_for(name).to_string(),
                }
            })
            .collect()
    }
}

/// Groups transactions by category, summing absolute ticket amounts and counting transactions.
///
/// Records with a missing or zero amount are skipped. For `Transferencia` records that carry a
/// transfer group id, only the first record seen for each group is counted. A record whose amount
/// would push its category total past the largest representable value is skipped too. Categories
/// appear in the order they are first seen. When nothing survives, a single `Sin movimientos`
/// placeholder is returned so the chart is never empty.
pub fn aggregate_by_category(
    transactions: &[TransactionRecord],
    palette: &CategoryPalette,
) -> Vec<CategorySummary> {
    let mut totals = CategoryTotals::default();
    for (ix, record) in transactions.iter().enumerate() {
        match totals.add(record) {
            Ok(()) => {}
            Err(CategorySkip::NoAmount) => {
                trace!("Record {ix} has a missing or zero amount, skipping")
            }
            Err(CategorySkip::RepeatedTransfer(group)) => {
                trace!("Record {ix} is another leg of transfer {group}, skipping")
            }
            Err(CategorySkip::Overflow(name)) => {
                debug!("Record {ix} would overflow the {name} total, skipping")
            }
        }
    }
    totals.into_summaries(palette)
}
