//! Implements the `Wallet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a tickets REST API.

use crate::api::Wallet;
use crate::model::{TicketStatement, TransactionRecord, YearMonth};
use crate::Result;
use chrono::{Datelike, NaiveDate};

/// An implementation of the `Wallet` trait that does not call the REST API. It returns whatever
/// statement it holds, by default one seeded around an anchor date.
#[derive(Debug, Clone)]
pub struct TestWallet {
    statement: TicketStatement,
}

impl TestWallet {
    /// Create a new `TestWallet` that will return `statement`.
    pub fn new(statement: TicketStatement) -> Self {
        Self { statement }
    }

    /// Create a `TestWallet` holding the seed statement, with every transaction dated within the
    /// six months ending at `anchor` except for one older purchase.
    pub fn seeded(anchor: NaiveDate) -> Self {
        Self::new(seed_statement(anchor))
    }
}

#[async_trait::async_trait]
impl Wallet for TestWallet {
    async fn get_statement(&mut self) -> Result<TicketStatement> {
        Ok(self.statement.clone())
    }
}

/// (months before the anchor, day of month, amount, category, transfer group)
type SeedRow = (u32, u32, i64, &'static str, Option<&'static str>);

const SEED: &[SeedRow] = &[
    (0, 3, -120, "Eventos", None),
    (0, 2, 40, "Transferencia", Some("tr-0007")),
    (0, 2, -40, "Transferencia", Some("tr-0007")),
    (0, 1, -35, "Compras", None),
    (1, 27, 50, "Cupones", None),
    (1, 14, -80, "Entretenimiento", None),
    (2, 20, -60, "Eventos", None),
    (2, 9, 25, "Transferencia", Some("tr-0005")),
    (2, 9, -25, "Transferencia", Some("tr-0005")),
    (3, 30, -15, "Compras", None),
    (4, 11, -200, "Eventos", None),
    (5, 6, 30, "Cupones", None),
    (7, 18, -90, "Compras", None),
];

const SEED_BALANCE: i64 = 1250;

fn seed_statement(anchor: NaiveDate) -> TicketStatement {
    let current = YearMonth::of(anchor);
    let transactions = SEED
        .iter()
        .map(|&(months_back, day, amount, category, group)| {
            let month = current.minus_months(months_back);
            // Clamp so the seed never lands after the anchor or on a day the month lacks.
            let day = if months_back == 0 {
                day.min(anchor.day())
            } else {
                day.min(28)
            };
            let record = TransactionRecord::new(
                amount,
                category,
                format!("{month}-{day:02}T12:00:00.000Z"),
            );
            match group {
                Some(group) => record.with_transfer_group(group),
                None => record,
            }
        })
        .collect();
    TicketStatement::new(SEED_BALANCE, transactions)
}
