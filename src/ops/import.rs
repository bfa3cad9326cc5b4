use super::batch::Batch;
use crate::error::{RegisterError, Result};
use crate::geom::validate_optional;
use crate::register::{AdminLevel, AdminUnit};

/// Columns of a bulk import sheet, in template order.
pub const IMPORT_COLUMNS: [&str; 7] = ["province", "district", "tehsil", "uc", "village_name", "latitude", "longitude"];

/// One line of a bulk import sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    pub province: String,
    pub district: String,
    pub tehsil: String,
    pub uc: String,
    pub village_name: String,
    pub latitude: String,
    pub longitude: String,
}

impl ImportRow {
    /// Builds a row from cells in [`IMPORT_COLUMNS`] order; missing cells
    /// are blank.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |i: usize| cells.get(i).map(|c| c.as_ref().trim().to_string()).unwrap_or_default();
        Self {
            province: cell(0),
            district: cell(1),
            tehsil: cell(2),
            uc: cell(3),
            village_name: cell(4),
            latitude: cell(5),
            longitude: cell(6),
        }
    }

    fn missing_field(&self) -> Option<&'static str> {
        [
            ("province", &self.province),
            ("district", &self.district),
            ("tehsil", &self.tehsil),
            ("uc", &self.uc),
            ("village_name", &self.village_name),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// A sheet row left out of an import.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSkipped {
    /// Spreadsheet row number; the header is row 1.
    pub row: usize,
    pub village: String,
    pub reason: RegisterError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub rows: Vec<AdminUnit>,
    pub skipped: Vec<RowSkipped>,
}

impl Batch<'_> {
    /// Imports a sheet row by row. A bad row is skipped with its reason and
    /// does not stop the rest; units the sheet names but the register does
    /// not know are created once and shared by the following rows.
    pub fn import(&mut self, rows: &[ImportRow]) -> ImportReport {
        let mut report = ImportReport::default();
        for (i, row) in rows.iter().enumerate() {
            let number = i + 2;
            match self.import_row(row) {
                Ok(unit) => report.rows.push(unit),
                Err(reason) => {
                    tracing::warn!(row = number, village = %row.village_name, error = %reason, "skipped import row");
                    report.skipped.push(RowSkipped { row: number, village: row.village_name.clone(), reason });
                }
            }
        }
        tracing::info!(imported = report.rows.len(), skipped = report.skipped.len(), "bulk import finished");
        report
    }

    fn import_row(&mut self, row: &ImportRow) -> Result<AdminUnit> {
        if let Some(field) = row.missing_field() {
            return Err(RegisterError::InvalidInput(format!("missing {field}")));
        }
        let province = self.province(&row.province)?;
        let coordinates = validate_optional(&row.latitude, &row.longitude)?;

        let district = self.resolve_child(&province, AdminLevel::District, row.district.trim())?;
        let tehsil = self.resolve_child(&district, AdminLevel::Tehsil, row.tehsil.trim())?;
        let uc = self.resolve_child(&tehsil, AdminLevel::Uc, row.uc.trim())?;

        let code = self.village_codes(&uc, 1)?.remove(0);
        let mut unit = uc.village(row.village_name.trim(), &code);
        if let Some((lat, lon)) = coordinates {
            unit.latitude = Some(lat);
            unit.longitude = Some(lon);
        }
        self.stamp(&mut unit, format!("bulk imported on {}", self.date));
        Ok(unit)
    }
}
