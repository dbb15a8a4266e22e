//! CSV-backed storage and settlement for the Marea consumption ledger.

mod catalog;
mod codec;
mod error;
mod settlement;
mod store;

pub use catalog::CatalogStore;
pub use error::{LedgerError, LedgerResult};
pub use settlement::{archive_file_name, ArchiveSnapshot, SettlementPreview};
pub use store::LedgerStore;
