use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use marea_core::ConsumptionRecord;

use crate::codec::{self, DATE_FORMAT};
use crate::{LedgerResult, LedgerStore};

/// What a day-close would settle, computed over the ENTIRE live ledger.
///
/// The presentation layer shows this to the operator before committing;
/// aborting here is the only abort point in the close flow.
#[derive(Clone, Debug)]
pub struct SettlementPreview {
    pub unpaid: Vec<ConsumptionRecord>,
    pub unpaid_total: Decimal,
    pub total_rows: usize,
}

impl SettlementPreview {
    /// True when closing would archive rows that were never paid.
    pub fn requires_confirmation(&self) -> bool {
        !self.unpaid.is_empty()
    }
}

/// Immutable dated copy of the ledger taken at close time.
#[derive(Clone, Debug)]
pub struct ArchiveSnapshot {
    pub date: NaiveDate,
    pub path: PathBuf,
    pub rows: Vec<ConsumptionRecord>,
}

/// Archive file name for a close date, fixed for downstream tooling.
pub fn archive_file_name(date: NaiveDate) -> String {
    format!("consumos_{}.csv", date.format(DATE_FORMAT))
}

impl LedgerStore {
    /// Summarize what a close would settle, without mutating anything.
    pub fn preview_close(&self) -> LedgerResult<SettlementPreview> {
        let rows = self.load()?;
        let unpaid: Vec<ConsumptionRecord> =
            rows.iter().filter(|row| !row.is_paid()).cloned().collect();
        let unpaid_total = unpaid.iter().map(|row| row.amount_total).sum();
        Ok(SettlementPreview {
            unpaid,
            unpaid_total,
            total_rows: rows.len(),
        })
    }

    /// Close the day: archive the whole live ledger and reset it to empty.
    ///
    /// Every row is archived, paid or not. Unpaid rows keep their blank
    /// payment cell and are NOT carried forward into the fresh ledger; the
    /// archive is the only place they survive. Confirmation of that loss is
    /// the caller's job, via [`LedgerStore::preview_close`].
    pub fn close_day(&self, backup_dir: &Path, today: NaiveDate) -> LedgerResult<ArchiveSnapshot> {
        let rows = self.load()?;
        let unpaid = rows.iter().filter(|row| !row.is_paid()).count();
        if unpaid > 0 {
            warn!(unpaid, "closing day with unpaid rows; they will not carry forward");
        }
        fs::create_dir_all(backup_dir)?;
        let path = backup_dir.join(archive_file_name(today));
        codec::write_rows(&path, &rows)?;
        self.save(&[])?;
        info!(
            date = %today.format(DATE_FORMAT),
            rows = rows.len(),
            archive = %path.display(),
            "day closed"
        );
        Ok(ArchiveSnapshot {
            date: today,
            path,
            rows,
        })
    }
}
