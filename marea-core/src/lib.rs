//! Core domain types for the Marea consumption ledger.

mod catalog;
mod payment;
mod record;

pub use catalog::{MenuCatalog, MenuItem};
pub use payment::PaymentMethod;
pub use record::{ConsumptionRecord, NewConsumption, ValidationError};
