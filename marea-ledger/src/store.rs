use std::path::{Path, PathBuf};

use tracing::{debug, info};

use marea_core::{ConsumptionRecord, PaymentMethod};

use crate::codec;
use crate::LedgerResult;

/// File-backed store for the live consumption table.
///
/// Single-writer by design: every mutation is a full load-modify-store
/// cycle over the one CSV file, with nothing persisted on failure.
#[derive(Clone, Debug)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the live table; a missing file is the empty table.
    pub fn load(&self) -> LedgerResult<Vec<ConsumptionRecord>> {
        codec::read_rows(&self.path)
    }

    /// Overwrite the persisted table wholesale.
    pub fn save(&self, rows: &[ConsumptionRecord]) -> LedgerResult<()> {
        codec::write_rows(&self.path, rows)
    }

    /// Append one record and persist. Sole entry path for new consumption.
    pub fn append(&self, record: ConsumptionRecord) -> LedgerResult<Vec<ConsumptionRecord>> {
        let mut rows = self.load()?;
        info!(
            client = %record.client,
            product = %record.product,
            quantity = record.quantity,
            amount = %record.amount_total,
            "recording consumption"
        );
        rows.push(record);
        self.save(&rows)?;
        Ok(rows)
    }

    /// Stamp `method` onto every row of `client`, across the whole ledger.
    ///
    /// Matching is exact (case-sensitive, no trimming) and deliberately not
    /// scoped to the current day: payment settles the client's full open
    /// tab, stale rows included. Zero matches is a no-op, not an error; the
    /// caller inspects the returned rows to tell the difference.
    pub fn assign_payment(
        &self,
        client: &str,
        method: PaymentMethod,
    ) -> LedgerResult<Vec<ConsumptionRecord>> {
        let mut rows = self.load()?;
        let mut matched = 0usize;
        for row in rows.iter_mut().filter(|row| row.client == client) {
            row.payment = Some(method);
            matched += 1;
        }
        if matched > 0 {
            self.save(&rows)?;
            info!(client, method = %method, rows = matched, "assigned payment");
        } else {
            debug!(client, "payment assignment matched no rows");
        }
        Ok(rows.into_iter().filter(|row| row.client == client).collect())
    }

    /// Distinct client names, in first-appearance order.
    pub fn clients(&self) -> LedgerResult<Vec<String>> {
        let rows = self.load()?;
        Ok(distinct_clients(rows.iter()))
    }

    /// Distinct client names that still have unpaid rows.
    pub fn unpaid_clients(&self) -> LedgerResult<Vec<String>> {
        let rows = self.load()?;
        Ok(distinct_clients(rows.iter().filter(|row| !row.is_paid())))
    }
}

fn distinct_clients<'a>(rows: impl Iterator<Item = &'a ConsumptionRecord>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        if !names.iter().any(|name| name == &row.client) {
            names.push(row.client.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use marea_core::{MenuCatalog, MenuItem, NewConsumption};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn catalog() -> MenuCatalog {
        MenuCatalog::new(vec![
            MenuItem {
                id: 1,
                name: "Mojito".into(),
                unit_price: dec!(150),
                unit_profit: dec!(50),
            },
            MenuItem {
                id: 2,
                name: "Cerveza".into(),
                unit_price: dec!(100),
                unit_profit: dec!(30),
            },
        ])
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn record(client: &str, product: &str, quantity: u32) -> ConsumptionRecord {
        NewConsumption::new(client, product, quantity)
            .into_record(&catalog(), day())
            .unwrap()
    }

    #[test]
    fn save_load_roundtrip_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        store.append(record("Ana", "Mojito", 2)).unwrap();
        store.append(record("Luis", "Cerveza", 1)).unwrap();

        let first = store.load().unwrap();
        store.save(&first).unwrap();
        let second = store.load().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn append_preserves_history() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        let before = store.append(record("Ana", "Mojito", 2)).unwrap();
        let after = store.append(record("Luis", "Cerveza", 1)).unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().unwrap().client, "Luis");
    }

    #[test]
    fn assign_payment_touches_only_matching_client() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        store.append(record("Ana", "Mojito", 2)).unwrap();
        store.append(record("Luis", "Cerveza", 1)).unwrap();
        store.append(record("Ana", "Cerveza", 3)).unwrap();
        let untouched_before = store.load().unwrap()[1].clone();

        let updated = store.assign_payment("Ana", PaymentMethod::Cash).unwrap();
        assert_eq!(updated.len(), 2);
        assert!(updated.iter().all(|row| row.payment == Some(PaymentMethod::Cash)));

        let rows = store.load().unwrap();
        assert_eq!(rows[1], untouched_before);
        assert_eq!(rows[0].payment, Some(PaymentMethod::Cash));
        assert_eq!(rows[2].payment, Some(PaymentMethod::Cash));
    }

    #[test]
    fn assign_payment_spans_prior_dates() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        let mut stale = record("Ana", "Mojito", 1);
        stale.date = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();
        store.append(stale).unwrap();
        store.append(record("Ana", "Cerveza", 1)).unwrap();

        let updated = store.assign_payment("Ana", PaymentMethod::Card).unwrap();
        assert_eq!(updated.len(), 2);
        assert!(updated.iter().all(|row| row.payment == Some(PaymentMethod::Card)));
    }

    #[test]
    fn assign_payment_unknown_client_is_noop() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        store.append(record("Ana", "Mojito", 2)).unwrap();
        let before = store.load().unwrap();

        let updated = store.assign_payment("ana", PaymentMethod::Cash).unwrap();
        assert!(updated.is_empty());
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn re_assignment_overwrites() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        store.append(record("Ana", "Mojito", 2)).unwrap();
        store.assign_payment("Ana", PaymentMethod::Cash).unwrap();
        let updated = store.assign_payment("Ana", PaymentMethod::Mixed).unwrap();
        assert_eq!(updated[0].payment, Some(PaymentMethod::Mixed));
    }

    #[test]
    fn unpaid_clients_tracks_assignment() {
        let dir = tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("consumos.csv"));
        store.append(record("Ana", "Mojito", 2)).unwrap();
        store.append(record("Luis", "Cerveza", 1)).unwrap();
        assert_eq!(store.unpaid_clients().unwrap(), vec!["Ana", "Luis"]);

        store.assign_payment("Ana", PaymentMethod::Cash).unwrap();
        assert_eq!(store.unpaid_clients().unwrap(), vec!["Luis"]);
        assert_eq!(store.clients().unwrap(), vec!["Ana", "Luis"]);
    }
}
