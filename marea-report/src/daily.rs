use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use marea_core::{ConsumptionRecord, PaymentMethod};

/// Units and revenue for one product on one day.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProductSales {
    pub units: u64,
    pub revenue: Decimal,
}

/// Revenue and profit for one client on one day.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClientSales {
    pub revenue: Decimal,
    pub profit: Decimal,
}

/// Aggregates over the ledger rows of a single calendar day.
///
/// Derived on demand and never persisted; an empty day simply yields
/// zero totals and empty rollups.
#[derive(Clone, Debug, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    /// The day's rows, in ledger order.
    pub rows: Vec<ConsumptionRecord>,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_units: u64,
    pub by_product: BTreeMap<String, ProductSales>,
    pub by_client: BTreeMap<String, ClientSales>,
    pub payment_distribution: BTreeMap<PaymentMethod, usize>,
    pub paid_rows: Vec<ConsumptionRecord>,
    pub unpaid_rows: Vec<ConsumptionRecord>,
    pub total_unpaid_amount: Decimal,
}

impl DailyReport {
    /// Compute the report for `date` from the full ledger. Pure read-side.
    pub fn build(ledger: &[ConsumptionRecord], date: NaiveDate) -> Self {
        let rows: Vec<ConsumptionRecord> = ledger
            .iter()
            .filter(|row| row.date == date)
            .cloned()
            .collect();

        let mut report = Self {
            date,
            rows: Vec::new(),
            total_revenue: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            total_units: 0,
            by_product: BTreeMap::new(),
            by_client: BTreeMap::new(),
            payment_distribution: BTreeMap::new(),
            paid_rows: Vec::new(),
            unpaid_rows: Vec::new(),
            total_unpaid_amount: Decimal::ZERO,
        };

        for row in &rows {
            report.total_revenue += row.amount_total;
            report.total_profit += row.profit_total;
            report.total_units += u64::from(row.quantity);

            let product = report.by_product.entry(row.product.clone()).or_default();
            product.units += u64::from(row.quantity);
            product.revenue += row.amount_total;

            let client = report.by_client.entry(row.client.clone()).or_default();
            client.revenue += row.amount_total;
            client.profit += row.profit_total;

            match row.payment {
                Some(method) => {
                    *report.payment_distribution.entry(method).or_default() += 1;
                    report.paid_rows.push(row.clone());
                }
                None => {
                    report.total_unpaid_amount += row.amount_total;
                    report.unpaid_rows.push(row.clone());
                }
            }
        }
        report.rows = rows;
        report
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
