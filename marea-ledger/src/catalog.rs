use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::info;

use marea_core::{MenuCatalog, MenuItem};

use crate::{LedgerError, LedgerResult};

/// Menu columns, in persisted order.
const MENU_COLUMNS: [&str; 4] = ["ID", "Producto", "Precio", "Ganancias"];

/// File-backed source for the menu catalog.
///
/// The catalog is reference data: it is loaded once at startup and never
/// written by this crate. A missing file yields an empty catalog.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LedgerResult<MenuCatalog> {
        if !self.path.exists() {
            return Ok(MenuCatalog::empty());
        }
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let indices: Vec<Option<usize>> = MENU_COLUMNS
            .iter()
            .map(|name| headers.iter().position(|header| header == *name))
            .collect();
        let mut items = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            items.push(decode_item(&indices, &record, idx + 1)?);
        }
        info!(path = %self.path.display(), items = items.len(), "loaded menu catalog");
        Ok(MenuCatalog::new(items))
    }
}

fn decode_item(
    indices: &[Option<usize>],
    record: &StringRecord,
    line: usize,
) -> LedgerResult<MenuItem> {
    let field = |slot: usize| {
        indices[slot]
            .and_then(|idx| record.get(idx))
            .filter(|cell| !cell.is_empty())
    };
    let id = match field(0) {
        Some(cell) => cell
            .parse::<u32>()
            .map_err(|err| corrupt(line, "ID", cell, err))?,
        None => 0,
    };
    let price = match field(2) {
        Some(cell) => {
            Decimal::from_str(cell).map_err(|err| corrupt(line, "Precio", cell, err))?
        }
        None => Decimal::ZERO,
    };
    let profit = match field(3) {
        Some(cell) => {
            Decimal::from_str(cell).map_err(|err| corrupt(line, "Ganancias", cell, err))?
        }
        None => Decimal::ZERO,
    };
    Ok(MenuItem {
        id,
        name: field(1).unwrap_or_default().to_string(),
        unit_price: price,
        unit_profit: profit,
    })
}

fn corrupt(line: usize, column: &str, cell: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Corrupt(format!("row {line}, column {column}: invalid value '{cell}': {err}"))
}
