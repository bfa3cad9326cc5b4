use super::{column::Column, level::AdminLevel, pcode::pad_code, unit::AdminUnit};
use crate::error::{RegisterError, Result};

/// An in-memory snapshot of the whole register table.
///
/// Every operation takes a snapshot in and hands an updated snapshot back;
/// nothing is shared between operations. `columns` records the table schema
/// in on-disk order so that unknown columns survive a load/save cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Register {
    columns: Vec<String>,
    rows: Vec<AdminUnit>,
}

impl Default for Register {
    fn default() -> Self { Self::new() }
}

impl Register {
    /// An empty register with the canonical schema.
    pub fn new() -> Self {
        Self::with_columns(Column::CANONICAL.iter().map(|c| c.as_str().to_string()).collect())
    }

    /// An empty register with an explicit (already normalized) schema.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// A register with the canonical schema holding `rows`.
    pub fn from_rows(rows: impl IntoIterator<Item = AdminUnit>) -> Self {
        let mut register = Self::new();
        register.extend(rows);
        register
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn rows(&self) -> &[AdminUnit] { &self.rows }

    pub fn rows_mut(&mut self) -> &mut [AdminUnit] { &mut self.rows }

    pub fn into_rows(self) -> Vec<AdminUnit> { self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Whether the table schema carries `column`. The UC P-code is satisfied
    /// by either of its two header spellings.
    pub fn has_column(&self, column: Column) -> bool {
        let has = |name: &str| self.columns.iter().any(|c| c == name);
        match column {
            Column::UcPcode | Column::UcPrefix => has(Column::UcPcode.as_str()) || has(Column::UcPrefix.as_str()),
            _ => has(column.as_str()),
        }
    }

    /// Fails with a schema error unless `column` is part of the table.
    pub fn require(&self, column: Column) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(RegisterError::Schema { column: column.as_str().to_string() })
        }
    }

    /// Adds `column` to the schema if it is not already present.
    pub fn add_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    /// Appends a row, widening the schema with any extra columns it carries.
    pub fn push(&mut self, row: AdminUnit) {
        for key in row.extra.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = AdminUnit>) {
        for row in rows {
            self.push(row);
        }
    }

    /// Removes and returns the rows matching `pred`, preserving order of both
    /// the removed and the remaining rows.
    pub fn drain_where(&mut self, mut pred: impl FnMut(&AdminUnit) -> bool) -> Vec<AdminUnit> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|row| pred(row));
        self.rows = kept;
        taken
    }

    /// Rows whose `column` equals `value` exactly.
    pub fn scope<'a>(&'a self, column: Column, value: &'a str) -> impl Iterator<Item = &'a AdminUnit> + 'a {
        self.rows.iter().filter(move |row| row.get(column) == value)
    }

    /// Index of the row carrying the village P-code `code`.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.village_pcode_new == code)
    }

    pub fn find(&self, code: &str) -> Option<&AdminUnit> {
        self.position(code).map(|i| &self.rows[i])
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Whether any row records a unit with this P-code at `level`.
    pub fn contains_unit(&self, level: AdminLevel, code: &str) -> bool {
        let column = level.pcode_column();
        self.rows.iter().any(|row| row.get(column) == code)
    }

    /// Re-applies fixed-width zero padding to every code column across the
    /// whole table. Running it on a normalized table is a no-op.
    pub fn normalize_codes(&mut self) {
        for row in &mut self.rows {
            for (column, width) in Column::PADDED {
                let padded = pad_code(&row.get(column), width);
                row.set(column, &padded);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(code: &str) -> AdminUnit {
        AdminUnit { village_pcode_new: code.into(), ..Default::default() }
    }

    #[test]
    fn schema_checks() {
        let register = Register::with_columns(vec!["uc_prefix".into(), "village_name".into()]);
        assert!(register.require(Column::UcPcode).is_ok());
        assert_eq!(
            register.require(Column::VillageSettlementCode),
            Err(RegisterError::Schema { column: "village/settlement_code".into() })
        );
        assert!(Register::new().require(Column::VillageSettlementCode).is_ok());
    }

    #[test]
    fn push_widens_schema_with_extras() {
        let mut register = Register::new();
        let mut row = unit("PK0101001001");
        row.extra.insert("enumerator".into(), "Ali".into());
        register.push(row);
        assert_eq!(register.columns().last().map(String::as_str), Some("enumerator"));
        assert!(register.contains_code("PK0101001001"));
        assert!(!register.contains_code("PK0101001002"));
    }

    #[test]
    fn drain_preserves_order() {
        let mut register = Register::from_rows(["a", "b", "c", "d"].map(unit));
        let taken = register.drain_where(|row| row.village_pcode_new == "b" || row.village_pcode_new == "d");
        let codes = |rows: &[AdminUnit]| rows.iter().map(|r| r.village_pcode_new.clone()).collect::<Vec<_>>();
        assert_eq!(codes(&taken), vec!["b", "d"]);
        assert_eq!(codes(register.rows()), vec!["a", "c"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut register = Register::from_rows([AdminUnit {
            district_code: "1".into(),
            tehsil_code: "2.0".into(),
            uc_id: "12".into(),
            village_settlement_code: "".into(),
            ..Default::default()
        }]);
        register.normalize_codes();
        let once = register.clone();
        register.normalize_codes();
        assert_eq!(register, once);

        let row = &register.rows()[0];
        assert_eq!((row.district_code.as_str(), row.tehsil_code.as_str(), row.uc_id.as_str()), ("01", "02", "012"));
        assert_eq!(row.village_settlement_code, "");
    }
}
