//! Read-side views over the Marea consumption ledger.

mod daily;
mod statement;

pub use daily::{ClientSales, DailyReport, ProductSales};
pub use statement::ClientStatement;
