use crate::model::amount::{self, Amount};
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

/// The category assumed for records that arrive without one.
pub const TRANSFER_CATEGORY: &str = "Transferencia";

/// Represents a single ticket movement as delivered by the REST API. The aggregation code never
/// mutates these.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Signed ticket delta. `None` when the API sent nothing usable.
    #[serde(default, deserialize_with = "amount::lenient")]
    pub amount: Option<Amount>,

    /// Category label; `Transferencia` when absent or blank.
    #[serde(default)]
    pub category_name: Option<String>,

    /// ISO-8601 date or date-time string.
    #[serde(default)]
    pub transaction_date: Option<String>,

    /// Shared by the sender and receiver rows of one transfer.
    #[serde(default, alias = "transaccion_id")]
    pub transfer_group_id: Option<String>,
}

impl TransactionRecord {
    pub fn new(
        amount: impl Into<Amount>,
        category_name: impl Into<String>,
        transaction_date: impl Into<String>,
    ) -> Self {
        Self {
            amount: Some(amount.into()),
            category_name: Some(category_name.into()),
            transaction_date: Some(transaction_date.into()),
            transfer_group_id: None,
        }
    }

    /// Builder-style setter for `transfer_group_id`.
    pub fn with_transfer_group(mut self, group_id: impl Into<String>) -> Self {
        self.transfer_group_id = Some(group_id.into());
        self
    }

    /// The category label with the `Transferencia` default applied.
    pub fn category(&self) -> &str {
        self.category_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(TRANSFER_CATEGORY)
    }

    /// The amount if it is present and non-zero.
    pub fn countable_amount(&self) -> Option<Amount> {
        self.amount.filter(|a| !a.is_zero())
    }

    /// The transfer group this record belongs to, if it is one leg of a `Transferencia`. A blank
    /// id is no group at all.
    pub fn transfer_group(&self) -> Option<&str> {
        if self.category() == TRANSFER_CATEGORY {
            self.transfer_group_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
        } else {
            None
        }
    }

    /// The calendar date of the transaction, or `None` if `transaction_date` is missing or cannot
    /// be parsed. The date is taken as written; no timezone conversion is applied.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(self.transaction_date.as_deref()?)
    }
}

/// Parses RFC 3339 date-times, naive date-times and plain `YYYY-MM-DD` dates.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The ticket balance together with the transactions behind it, as returned by the
/// balance-and-transactions endpoint.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatement {
    #[serde(default, deserialize_with = "amount::lenient")]
    pub balance: Option<Amount>,
    pub transactions: Vec<TransactionRecord>,
}

impl TicketStatement {
    pub fn new(balance: impl Into<Amount>, transactions: Vec<TransactionRecord>) -> Self {
        Self {
            balance: Some(balance.into()),
            transactions,
        }
    }

    /// Parses a statement payload. A payload whose `transactions` is missing or is not an array is
    /// an error, never an empty statement.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let shape: StatementShape =
            serde_json::from_str(json).context("The statement payload is not valid JSON")?;
        match shape.transactions.as_deref().map(json_type_name) {
            Some("an array") => {}
            Some(other) => bail!("Expected 'transactions' to be an array, found {other}"),
            None => bail!("The statement payload has no 'transactions' field"),
        }
        serde_json::from_str(json).context("Unable to parse the statement payload")
    }
}

/// Only the outline of a statement. Values are kept as raw text, so a record with an unusual
/// number does not fail the shape check.
#[derive(Deserialize)]
struct StatementShape {
    #[serde(default, deserialize_with = "raw_present")]
    transactions: Option<Box<RawValue>>,
}

/// Keeps an explicit `null` as `Some` so it is reported as the wrong type, not as missing.
fn raw_present<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

fn json_type_name(raw: &RawValue) -> &'static str {
    match raw.get().trim_start().as_bytes().first() {
        Some(b'[') => "an array",
        Some(b'{') => "an object",
        Some(b'"') => "a string",
        Some(b't' | b'f') => "a boolean",
        Some(b'n') => "null",
        _ => "a number",
    }
}
