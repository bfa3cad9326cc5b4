//! Table persistence.
//!
//! - `csv` - reading and writing register tables and import sheets as CSV
//! - `store` - source/sink traits over the dataset, staging and rejected collections

pub(crate) mod csv;
mod store;

pub use store::{CsvStore, MemStore, TableSink, TableSource};

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::ops::ImportRow;
use crate::register::Register;

/// Reads a bulk import sheet (CSV with the import columns).
pub fn read_import_sheet(path: &Path) -> Result<Vec<ImportRow>> {
    csv::read_import_rows(path)
}

/// Writes one CSV per district under `dir`; returns the files written.
pub fn export_by_district(register: &Register, dir: &Path) -> Result<Vec<PathBuf>> {
    csv::export_by_district(register, dir)
}

/// Writes a register (or a view of one) to a CSV file.
pub fn write_table(register: &Register, path: &Path) -> Result<()> {
    csv::write_register(register, path)
}
