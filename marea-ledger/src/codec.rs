use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::debug;

use marea_core::{ConsumptionRecord, PaymentMethod};

use crate::{LedgerError, LedgerResult};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical ledger columns, in persisted order.
pub(crate) const LEDGER_COLUMNS: [&str; 8] = [
    "Cliente",
    "Producto",
    "Cantidad",
    "Precio Unitario",
    "Ganancia",
    "Total",
    "Fecha",
    "Pago",
];

/// Maps canonical columns onto whatever header the file actually carries.
///
/// Columns absent from the file resolve to `None` and are backfilled with
/// empty values on load; extra columns in the file are ignored.
struct ColumnMap {
    indices: [Option<usize>; LEDGER_COLUMNS.len()],
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Self {
        let mut indices = [None; LEDGER_COLUMNS.len()];
        for (slot, name) in LEDGER_COLUMNS.iter().enumerate() {
            indices[slot] = headers.iter().position(|header| header == *name);
        }
        Self { indices }
    }

    fn missing(&self) -> usize {
        self.indices.iter().filter(|idx| idx.is_none()).count()
    }

    /// Cell for the canonical column, with empty cells treated as null.
    fn field<'a>(&self, record: &'a StringRecord, slot: usize) -> Option<&'a str> {
        self.indices[slot]
            .and_then(|idx| record.get(idx))
            .filter(|cell| !cell.is_empty())
    }
}

/// Read the ledger table. A missing file is the empty table, not an error.
pub(crate) fn read_rows(path: &Path) -> LedgerResult<Vec<ConsumptionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(&headers);
    if columns.missing() > 0 {
        debug!(
            path = %path.display(),
            missing = columns.missing(),
            "ledger table missing canonical columns; backfilling"
        );
    }
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(decode_row(&columns, &record, idx + 1)?);
    }
    Ok(rows)
}

/// Rewrite the whole table with the canonical header and column order.
pub(crate) fn write_rows(path: &Path, rows: &[ConsumptionRecord]) -> LedgerResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(LEDGER_COLUMNS)?;
    for row in rows {
        let quantity = row.quantity.to_string();
        let unit_price = row.unit_price.to_string();
        let profit = row.profit_total.to_string();
        let total = row.amount_total.to_string();
        let date = row.date.format(DATE_FORMAT).to_string();
        writer.write_record([
            row.client.as_str(),
            row.product.as_str(),
            quantity.as_str(),
            unit_price.as_str(),
            profit.as_str(),
            total.as_str(),
            date.as_str(),
            row.payment.map(|method| method.as_str()).unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn decode_row(
    columns: &ColumnMap,
    record: &StringRecord,
    line: usize,
) -> LedgerResult<ConsumptionRecord> {
    let quantity = match columns.field(record, 2) {
        Some(cell) => cell
            .parse::<u32>()
            .map_err(|err| corrupt(line, "Cantidad", cell, err))?,
        None => 0,
    };
    let payment = match columns.field(record, 7) {
        Some(cell) => {
            Some(PaymentMethod::from_str(cell).map_err(|err| corrupt(line, "Pago", cell, err))?)
        }
        None => None,
    };
    Ok(ConsumptionRecord {
        client: columns.field(record, 0).unwrap_or_default().to_string(),
        product: columns.field(record, 1).unwrap_or_default().to_string(),
        quantity,
        unit_price: decode_decimal(columns, record, 3, "Precio Unitario", line)?,
        profit_total: decode_decimal(columns, record, 4, "Ganancia", line)?,
        amount_total: decode_decimal(columns, record, 5, "Total", line)?,
        date: decode_date(columns, record, line)?,
        payment,
    })
}

fn decode_decimal(
    columns: &ColumnMap,
    record: &StringRecord,
    slot: usize,
    name: &str,
    line: usize,
) -> LedgerResult<Decimal> {
    match columns.field(record, slot) {
        Some(cell) => Decimal::from_str(cell).map_err(|err| corrupt(line, name, cell, err)),
        None => Ok(Decimal::ZERO),
    }
}

fn decode_date(columns: &ColumnMap, record: &StringRecord, line: usize) -> LedgerResult<NaiveDate> {
    match columns.field(record, 6) {
        Some(cell) => NaiveDate::parse_from_str(cell, DATE_FORMAT)
            .map_err(|err| corrupt(line, "Fecha", cell, err)),
        // Backfilled dates fall on the epoch, which never matches a report
        // date and gets swept into the next day-close archive.
        None => Ok(NaiveDate::default()),
    }
}

fn corrupt(line: usize, column: &str, cell: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Corrupt(format!("row {line}, column {column}: invalid value '{cell}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_empty_table() {
        let dir = tempdir().unwrap();
        let rows = read_rows(&dir.path().join("consumos.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn backfills_missing_columns_with_nulls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumos.csv");
        // Legacy table written before the payment column existed.
        fs::write(
            &path,
            "Cliente,Producto,Cantidad,Precio Unitario,Ganancia,Total,Fecha\n\
             Ana,Mojito,2,150,100,300,2024-06-01\n",
        )
        .unwrap();
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client, "Ana");
        assert_eq!(rows[0].amount_total, dec!(300));
        assert_eq!(rows[0].payment, None);
    }

    #[test]
    fn resolves_columns_by_header_name_not_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumos.csv");
        // Same columns, shuffled order; decoding must follow the header.
        fs::write(
            &path,
            "Pago,Cliente,Total,Fecha,Producto,Ganancia,Cantidad,Precio Unitario\n\
             Efectivo,Ana,300,2024-06-01,Mojito,100,2,150\n",
        )
        .unwrap();
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client, "Ana");
        assert_eq!(rows[0].product, "Mojito");
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].unit_price, dec!(150));
        assert_eq!(rows[0].profit_total, dec!(100));
        assert_eq!(rows[0].amount_total, dec!(300));
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(rows[0].payment, Some(marea_core::PaymentMethod::Cash));
    }

    #[test]
    fn empty_payment_cell_is_unpaid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumos.csv");
        fs::write(
            &path,
            "Cliente,Producto,Cantidad,Precio Unitario,Ganancia,Total,Fecha,Pago\n\
             Ana,Mojito,2,150,100,300,2024-06-01,\n\
             Luis,Cerveza,1,100,30,100,2024-06-01,Efectivo\n",
        )
        .unwrap();
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].payment, None);
        assert_eq!(rows[1].payment, Some(marea_core::PaymentMethod::Cash));
    }

    #[test]
    fn rejects_malformed_quantity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumos.csv");
        fs::write(
            &path,
            "Cliente,Producto,Cantidad,Precio Unitario,Ganancia,Total,Fecha,Pago\n\
             Ana,Mojito,dos,150,100,300,2024-06-01,\n",
        )
        .unwrap();
        let err = read_rows(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt(_)));
    }

    #[test]
    fn rejects_unknown_payment_label() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumos.csv");
        fs::write(
            &path,
            "Cliente,Producto,Cantidad,Precio Unitario,Ganancia,Total,Fecha,Pago\n\
             Ana,Mojito,2,150,100,300,2024-06-01,Cheque\n",
        )
        .unwrap();
        let err = read_rows(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt(_)));
    }

    #[test]
    fn write_then_read_preserves_rows_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consumos.csv");
        let rows = vec![
            ConsumptionRecord {
                client: "Ana".into(),
                product: "Mojito".into(),
                quantity: 2,
                unit_price: dec!(150),
                profit_total: dec!(100),
                amount_total: dec!(300),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                payment: Some(marea_core::PaymentMethod::Card),
            },
            ConsumptionRecord {
                client: "Luis".into(),
                product: "Cerveza".into(),
                quantity: 1,
                unit_price: dec!(100),
                profit_total: dec!(30),
                amount_total: dec!(100),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                payment: None,
            },
        ];
        write_rows(&path, &rows).unwrap();
        let loaded = read_rows(&path).unwrap();
        assert_eq!(loaded, rows);
    }
}
