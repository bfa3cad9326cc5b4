//! CSV reading operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, DataType, StringChunked}};

use crate::ops::{ImportRow, IMPORT_COLUMNS};
use crate::register::{normalize_header, AdminUnit, Column, Register, Status};

/// Reads a CSV file with every column kept as text, so codes keep their
/// leading zeros.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads CSV text with every column kept as text.
#[cfg(test)]
pub(crate) fn read_csv_string(csv: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(std::io::Cursor::new(csv.as_bytes()))
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")
}

/// Normalized header names and string views of every column.
fn string_columns(df: &DataFrame) -> Result<Vec<(String, StringChunked)>> {
    df.get_columns().iter()
        .map(|column| {
            let name = normalize_header(column.name().as_str());
            let values = column.cast(&DataType::String)
                .with_context(|| format!("[io::csv::read] Column '{name}' is not text"))?;
            let values = values.str()
                .with_context(|| format!("[io::csv::read] Column '{name}' is not text"))?
                .clone();
            Ok((name, values))
        })
        .collect()
}

/// Converts a loaded table into a register.
///
/// Headers are normalized, every cell is trimmed, coordinates are cleaned
/// leniently, and columns the register does not know are kept as extras.
/// Tables without a `status` column get the status inferred from remarks,
/// falling back to `legacy_status` when the remarks say nothing; the
/// `status` and `status_date` columns are then added so a save keeps them.
pub(crate) fn frame_to_register(df: &DataFrame, legacy_status: Status) -> Result<Register> {
    let columns = string_columns(df)?;

    let mut schema: Vec<String> = Vec::with_capacity(columns.len());
    for (name, _) in &columns {
        if !schema.contains(name) {
            schema.push(name.clone());
        }
    }
    let has_status = schema.iter().any(|name| name == Column::Status.as_str());

    let mut register = Register::with_columns(schema);
    for i in 0..df.height() {
        let mut unit = AdminUnit::default();
        for (name, values) in &columns {
            let value = values.get(i).unwrap_or_default();
            match Column::from_name(name) {
                Some(column) => unit.set(column, value),
                None => {
                    unit.extra.insert(name.clone(), value.trim().to_string());
                }
            }
        }
        if !has_status {
            unit.status = match Status::infer_from_remarks(&unit.remarks) {
                Status::Active => legacy_status,
                inferred => inferred,
            };
        }
        register.push(unit);
    }
    register.add_column(Column::Status.as_str());
    register.add_column(Column::StatusDate.as_str());

    tracing::debug!(rows = register.len(), columns = register.columns().len(), "loaded register table");
    Ok(register)
}

/// Reads a register from a CSV file.
pub(crate) fn read_register(path: &Path, legacy_status: Status) -> Result<Register> {
    let df = read_csv(path)?;
    frame_to_register(&df, legacy_status).with_context(|| format!("[io::csv::read] Failed to load register from {:?}", path))
}

/// Converts a bulk import sheet into import rows. Missing columns read as
/// blank cells.
pub(crate) fn frame_to_import_rows(df: &DataFrame) -> Result<Vec<ImportRow>> {
    let columns = string_columns(df)?;
    let lookup: Vec<Option<&StringChunked>> = IMPORT_COLUMNS.iter()
        .map(|wanted| columns.iter().find(|(name, _)| name == wanted).map(|(_, values)| values))
        .collect();

    Ok((0..df.height())
        .map(|i| {
            let cells: Vec<&str> = lookup.iter()
                .map(|values| values.and_then(|v| v.get(i)).unwrap_or_default())
                .collect();
            ImportRow::from_cells(&cells)
        })
        .collect())
}

/// Reads a bulk import sheet from a CSV file.
pub(crate) fn read_import_rows(path: &Path) -> Result<Vec<ImportRow>> {
    let df = read_csv(path)?;
    frame_to_import_rows(&df)
}
