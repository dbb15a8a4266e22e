use rust_decimal::Decimal;
use serde::Serialize;

use marea_core::ConsumptionRecord;

/// A client's open tab: their ledger rows and the running total.
///
/// Backs the printed invoice. Matching is exact, like payment assignment.
#[derive(Clone, Debug, Serialize)]
pub struct ClientStatement {
    pub client: String,
    pub rows: Vec<ConsumptionRecord>,
    pub total: Decimal,
}

impl ClientStatement {
    pub fn build(ledger: &[ConsumptionRecord], client: &str) -> Self {
        let rows: Vec<ConsumptionRecord> = ledger
            .iter()
            .filter(|row| row.client == client)
            .cloned()
            .collect();
        let total = rows.iter().map(|row| row.amount_total).sum();
        Self {
            client: client.to_string(),
            rows,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
