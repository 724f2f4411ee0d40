//! Types that represent the data model, such as `TransactionRecord`, `MonthBucket` and
//! `CategorySummary`.
mod amount;
mod category;
mod month;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{
    is_hex_color, CategoryPalette, CategorySummary, BRAND_COLOR, EMPTY_CATEGORY,
    EMPTY_CATEGORY_AMOUNT,
};
pub use month::{MonthBucket, YearMonth};
pub use transaction::{parse_date, TicketStatement, TransactionRecord, TRANSFER_CATEGORY};
