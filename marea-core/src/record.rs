use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{MenuCatalog, PaymentMethod};

/// Validation failures raised at the domain boundary, before any mutation.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("client name must not be empty")]
    EmptyClient,
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

/// One consumption event as persisted in the live ledger.
///
/// `unit_price` and `profit_total` are frozen copies taken from the menu at
/// creation time; `amount_total` always equals `quantity * unit_price`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub client: String,
    pub product: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub profit_total: Decimal,
    pub amount_total: Decimal,
    pub date: NaiveDate,
    pub payment: Option<PaymentMethod>,
}

impl ConsumptionRecord {
    pub fn is_paid(&self) -> bool {
        self.payment.is_some()
    }
}

/// A consumption draft supplied by the presentation layer.
///
/// Conversion into a [`ConsumptionRecord`] is the single place where
/// client name, product and quantity are validated.
#[derive(Clone, Debug)]
pub struct NewConsumption {
    pub client: String,
    pub product: String,
    pub quantity: u32,
}

impl NewConsumption {
    pub fn new(client: impl Into<String>, product: impl Into<String>, quantity: u32) -> Self {
        Self {
            client: client.into(),
            product: product.into(),
            quantity,
        }
    }

    /// Validate the draft against the catalog and snapshot price and margin.
    pub fn into_record(
        self,
        catalog: &MenuCatalog,
        date: NaiveDate,
    ) -> Result<ConsumptionRecord, ValidationError> {
        if self.client.trim().is_empty() {
            return Err(ValidationError::EmptyClient);
        }
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity);
        }
        let item = catalog
            .get(&self.product)
            .ok_or_else(|| ValidationError::UnknownProduct(self.product.clone()))?;
        let quantity = Decimal::from(self.quantity);
        Ok(ConsumptionRecord {
            client: self.client,
            product: self.product,
            quantity: self.quantity,
            unit_price: item.unit_price,
            profit_total: quantity * item.unit_profit,
            amount_total: quantity * item.unit_price,
            date,
            payment: None,
        })
    }
}
