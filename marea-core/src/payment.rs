use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::ValidationError;

/// Enumerates the payment methods accepted at the bar.
///
/// The serialized labels match the persisted table values, which are the
/// Spanish names the business has always used.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Efectivo")]
    Cash,
    #[serde(rename = "Tarjeta")]
    Card,
    #[serde(rename = "Transferencia")]
    Transfer,
    #[serde(rename = "Mixto")]
    Mixed,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
        PaymentMethod::Mixed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Mixed => "Mixto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Efectivo" => Ok(PaymentMethod::Cash),
            "Tarjeta" => Ok(PaymentMethod::Card),
            "Transferencia" => Ok(PaymentMethod::Transfer),
            "Mixto" => Ok(PaymentMethod::Mixed),
            other => Err(ValidationError::UnknownPaymentMethod(other.to_string())),
        }
    }
}
