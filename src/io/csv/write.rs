//! CSV writing operations.

use std::{fs::File, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::ops::{group_by_district, EXPORT_COLUMNS};
use crate::register::{Column, Register};

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write a DataFrame to a CSV string.
#[cfg(test)]
pub(crate) fn write_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(df)
        .context("[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .context("[io::csv::write] CSV output is not valid UTF-8")
}

/// Builds a string frame holding `columns` of the register, in that order.
/// Columns outside the register's schema are skipped.
pub(crate) fn register_to_frame<S: AsRef<str>>(register: &Register, columns: &[S]) -> Result<DataFrame> {
    let series = columns.iter()
        .map(|name| name.as_ref())
        .filter(|name| register.columns().iter().any(|c| c == name))
        .map(|name| {
            let known = Column::from_name(name);
            let values: Vec<String> = register.rows().iter()
                .map(|row| match known {
                    Some(column) => row.get(column).into_owned(),
                    None => row.extra.get(name).cloned().unwrap_or_default(),
                })
                .collect();
            Series::new(name.into(), values).into()
        })
        .collect::<Vec<polars::prelude::Column>>();

    DataFrame::new(series).context("[io::csv::write] Failed to build register frame")
}

/// Writes the whole register, columns in schema order.
pub(crate) fn write_register(register: &Register, path: &Path) -> Result<()> {
    let mut df = register_to_frame(register, register.columns())?;
    write_csv(&mut df, path)
}

/// Path component for a unit name: `/` would open a sub-directory.
fn file_component(name: &str) -> String {
    let name = name.trim().replace('/', "-");
    if name.is_empty() { "unknown".to_string() } else { name }
}

/// Writes one CSV per (province, district) at
/// `<dir>/<province>/<district>.csv` with the export columns.
pub(crate) fn export_by_district(register: &Register, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for ((province, district), rows) in group_by_district(register) {
        let folder = dir.join(file_component(&province));
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("[io::csv::write] Failed to create directory: {}", folder.display()))?;
        let path = folder.join(format!("{}.csv", file_component(&district)));

        let mut df = register_to_frame(&rows, &EXPORT_COLUMNS)?;
        write_csv(&mut df, &path)?;
        written.push(path);
    }
    tracing::info!(files = written.len(), dir = %dir.display(), "exported district files");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv::{frame_to_register, read_csv_string, read_register};
    use crate::register::{AdminUnit, Status};

    fn row(district: &str, code: &str) -> AdminUnit {
        let mut unit = AdminUnit {
            province: "Punjab".into(),
            district: district.into(),
            district_code: "01".into(),
            village_pcode_new: code.into(),
            latitude: Some(31.456789),
            longitude: Some(74.345678),
            ..Default::default()
        };
        unit.extra.insert("enumerator".into(), "Asma".into());
        unit
    }

    #[test]
    fn register_round_trips_through_csv() {
        let register = Register::from_rows([row("Lahore", "PK70101001001")]);
        let mut df = register_to_frame(&register, register.columns()).unwrap();
        let csv = write_csv_string(&mut df).unwrap();
        assert!(csv.starts_with("country_pcode,province,"));

        let loaded = frame_to_register(&read_csv_string(&csv).unwrap(), Status::Active).unwrap();
        assert_eq!(loaded, register);
    }

    #[test]
    fn exports_one_file_per_district() {
        let dir = tempfile::tempdir().unwrap();
        let register = Register::from_rows([
            row("Lahore", "PK70101001001"),
            row("Dera Ghazi Khan/DG Khan", "PK70201001001"),
        ]);
        let written = export_by_district(&register, dir.path()).unwrap();
        assert_eq!(written.len(), 2);

        let path = dir.path().join("Punjab").join("Dera Ghazi Khan-DG Khan.csv");
        assert!(path.exists());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("enumerator,province,district,tehsil,uc,village_name,village_pcode_new,latitude,longitude"));
        assert!(text.contains("Asma"));

        let loaded = read_register(&path, Status::Active).unwrap();
        assert_eq!(loaded.rows()[0].village_pcode_new, "PK70201001001");
        assert!(!loaded.has_column(Column::DistrictCode));
    }
}
