use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::geom::{contains, pakistan_bounds};
use crate::register::{AdminUnit, Register, Status};

/// Columns of a district-wise export file, in order. Columns the register
/// does not carry are left out.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "enumerator", "province", "district", "tehsil", "uc",
    "village_name", "village_pcode_new", "latitude", "longitude",
];

/// Row filter for register views. Unit names and status match exactly,
/// `village_name` and `code` are case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub enumerator: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub tehsil: Option<String>,
    pub uc: Option<String>,
    pub status: Option<Status>,
    pub village_name: Option<String>,
    pub code: Option<String>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

impl Filter {
    pub fn matches(&self, row: &AdminUnit) -> bool {
        let exact = |want: &Option<String>, have: &str| want.as_deref().is_none_or(|w| w.trim() == have);
        let enumerator = row.extra.get("enumerator").map_or("", String::as_str);
        exact(&self.enumerator, enumerator)
            && exact(&self.province, &row.province)
            && exact(&self.district, &row.district)
            && exact(&self.tehsil, &row.tehsil)
            && exact(&self.uc, &row.uc)
            && self.status.is_none_or(|status| status == row.status)
            && self.village_name.as_deref().is_none_or(|name| contains_ignore_case(&row.village_name, name))
            && self.code.as_deref().is_none_or(|code| contains_ignore_case(&row.village_pcode_new, code))
    }

    /// Matching rows, keeping the register's schema.
    pub fn apply(&self, register: &Register) -> Register {
        let mut view = Register::with_columns(register.columns().to_vec());
        view.extend(register.rows().iter().filter(|row| self.matches(row)).cloned());
        view
    }
}

/// Splits the register into one table per (province, district).
pub fn group_by_district(register: &Register) -> BTreeMap<(String, String), Register> {
    let mut groups: BTreeMap<(String, String), Register> = BTreeMap::new();
    for row in register.rows() {
        groups.entry((row.province.clone(), row.district.clone()))
            .or_insert_with(|| Register::with_columns(register.columns().to_vec()))
            .push(row.clone());
    }
    groups
}

/// Rows inside the bounding box whose exact (latitude, longitude) pair is
/// shared with at least one other row.
pub fn duplicate_coordinates(register: &Register) -> Register {
    let bounds = pakistan_bounds();
    let key = |row: &AdminUnit| {
        row.point()
            .filter(|point| contains(&bounds, *point))
            .map(|point| (point.y().to_bits(), point.x().to_bits()))
    };

    let mut counts: AHashMap<(u64, u64), usize> = AHashMap::new();
    for k in register.rows().iter().filter_map(|row| key(row)) {
        *counts.entry(k).or_default() += 1;
    }

    let mut duplicates = Register::with_columns(register.columns().to_vec());
    duplicates.extend(register.rows().iter()
        .filter(|row| key(*row).is_some_and(|k| counts.get(&k).copied().unwrap_or(0) > 1))
        .cloned());
    tracing::debug!(rows = duplicates.len(), "found duplicate coordinates");
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(district: &str, name: &str, code: &str, coords: Option<(f64, f64)>) -> AdminUnit {
        AdminUnit {
            province: "Punjab".into(),
            district: district.into(),
            village_name: name.into(),
            village_pcode_new: code.into(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            ..Default::default()
        }
    }

    fn register() -> Register {
        Register::from_rows([
            row("Lahore", "Green Town", "PK70101001001", Some((31.456789, 74.345678))),
            row("Lahore", "Model Town", "PK70101001002", Some((31.456789, 74.345678))),
            row("Kasur", "Greenfield", "PK70301001001", Some((31.111111, 74.444444))),
            row("Kasur", "Nowhere", "PK70301001002", Some((10.0, 10.0))),
            row("Kasur", "Elsewhere", "PK70301001003", Some((10.0, 10.0))),
            row("Kasur", "Unknown", "PK70301001004", None),
        ])
    }

    #[test]
    fn filters_by_unit_and_substring() {
        let register = register();
        let filter = Filter { district: Some("Lahore".into()), ..Default::default() };
        assert_eq!(filter.apply(&register).len(), 2);

        let filter = Filter { village_name: Some("GREEN".into()), ..Default::default() };
        let names: Vec<_> = filter.apply(&register).rows().iter().map(|r| r.village_name.clone()).collect();
        assert_eq!(names, vec!["Green Town", "Greenfield"]);

        let filter = Filter { code: Some("pk703".into()), status: Some(Status::Active), ..Default::default() };
        assert_eq!(filter.apply(&register).len(), 4);

        let filter = Filter { status: Some(Status::Pending), ..Default::default() };
        assert!(filter.apply(&register).is_empty());
    }

    #[test]
    fn filters_by_enumerator_column() {
        let mut register = register();
        register.rows_mut()[2].extra.insert("enumerator".into(), "Asma".into());
        let filter = Filter { enumerator: Some("Asma".into()), ..Default::default() };
        assert_eq!(filter.apply(&register).rows()[0].village_name, "Greenfield");
    }

    #[test]
    fn groups_per_district() {
        let groups = group_by_district(&register());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&("Punjab".to_string(), "Kasur".to_string())].len(), 4);
    }

    #[test]
    fn duplicates_inside_bounds_only() {
        let duplicates = duplicate_coordinates(&register());
        let codes: Vec<_> = duplicates.rows().iter().map(|r| r.village_pcode_new.as_str()).collect();
        assert_eq!(codes, vec!["PK70101001001", "PK70101001002"]);
    }
}
