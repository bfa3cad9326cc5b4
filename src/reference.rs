use std::{collections::BTreeMap, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::register::{AdminLevel, PCode, COUNTRY_PREFIX};

/// Static lookups used when composing province/district prefixes that no
/// existing row provides: province name -> P-code and district name -> P-code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default = "builtin_provinces")]
    pub provinces: BTreeMap<String, String>,
    #[serde(default)]
    pub districts: BTreeMap<String, String>,
}

/// OCHA province P-codes for Pakistan.
fn builtin_provinces() -> BTreeMap<String, String> {
    [
        ("Azad Kashmir", "PK1"),
        ("Balochistan", "PK2"),
        ("FATA", "PK3"),
        ("Gilgit Baltistan", "PK4"),
        ("Islamabad", "PK5"),
        ("Khyber Pakhtunkhwa", "PK6"),
        ("Punjab", "PK7"),
        ("Sindh", "PK8"),
    ]
    .into_iter()
    .map(|(name, pcode)| (name.to_string(), pcode.to_string()))
    .collect()
}

impl Default for ReferenceTables {
    fn default() -> Self { Self::builtin() }
}

impl ReferenceTables {
    /// Built-in provinces, no districts.
    pub fn builtin() -> Self {
        Self { provinces: builtin_provinces(), districts: BTreeMap::new() }
    }

    /// Reads tables from a JSON file of the form
    /// `{"provinces": {"Punjab": "PK7"}, "districts": {"Lahore": "PK701"}}`.
    /// A file without `provinces` keeps the built-in table.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read reference tables: {}", path.display()))?;
        let tables: ReferenceTables = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse reference tables: {}", path.display()))?;
        for (name, pcode) in &tables.provinces {
            ensure!(is_province_pcode(pcode), "Malformed province P-code '{pcode}' for '{name}' in {}", path.display());
        }
        for (name, pcode) in &tables.districts {
            ensure!(is_district_pcode(pcode), "Malformed district P-code '{pcode}' for '{name}' in {}", path.display());
        }
        Ok(tables)
    }

    pub fn with_district(mut self, name: &str, pcode: &str) -> Self {
        self.districts.insert(name.to_string(), pcode.to_string());
        self
    }

    pub fn province(&self, name: &str) -> Option<PCode> {
        self.provinces.get(name.trim()).map(|pcode| PCode::new(AdminLevel::Province, pcode.as_str()))
    }

    /// Name of the province with the given P-code.
    pub fn province_name(&self, pcode: &PCode) -> Option<&str> {
        self.provinces.iter()
            .find(|(_, code)| code.as_str() == pcode.as_str())
            .map(|(name, _)| name.as_str())
    }

    pub fn district(&self, name: &str) -> Option<PCode> {
        self.districts.get(name.trim()).map(|pcode| PCode::new(AdminLevel::District, pcode.as_str()))
    }

    /// Reference districts whose P-code belongs to `province`.
    pub fn districts_in<'a>(&'a self, province: &'a PCode) -> impl Iterator<Item = PCode> + 'a {
        self.districts.values()
            .map(|pcode| PCode::new(AdminLevel::District, pcode.as_str()))
            .filter(move |district| district.to_parent(AdminLevel::Province).as_ref() == Some(province))
    }

    /// Names of the reference districts in `province`, sorted.
    pub fn district_names_in(&self, province: &PCode) -> Vec<&str> {
        self.districts.iter()
            .filter(|(_, pcode)| {
                PCode::new(AdminLevel::District, pcode.as_str()).to_parent(AdminLevel::Province).as_ref() == Some(province)
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// True if `pcode` is a well-formed province P-code.
pub fn is_province_pcode(pcode: &str) -> bool {
    pcode.strip_prefix(COUNTRY_PREFIX)
        .is_some_and(|code| !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()))
}

/// A province P-code followed by a two-digit district code.
fn is_district_pcode(pcode: &str) -> bool {
    is_province_pcode(pcode) && pcode.get(..pcode.len().saturating_sub(2)).is_some_and(is_province_pcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_provinces() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.province("Punjab").unwrap().as_str(), "PK7");
        assert_eq!(tables.province(" Sindh ").unwrap().segment(), "8");
        assert_eq!(tables.province("Atlantis"), None);
        assert_eq!(tables.province_name(&PCode::province("6")), Some("Khyber Pakhtunkhwa"));
        assert!(tables.provinces.values().all(|p| is_province_pcode(p)));
    }

    #[test]
    fn districts_by_province() {
        let tables = ReferenceTables::builtin()
            .with_district("Lahore", "PK701")
            .with_district("Kasur", "PK703")
            .with_district("Karachi", "PK801");
        let punjab = PCode::province("7");
        let codes: Vec<_> = tables.districts_in(&punjab).map(|c| c.to_string()).collect();
        assert_eq!(codes, vec!["PK703", "PK701"]);
        assert_eq!(tables.district_names_in(&punjab), vec!["Kasur", "Lahore"]);
        assert_eq!(tables.district("Karachi").unwrap().as_str(), "PK801");
    }

    #[test]
    fn json_keeps_builtin_provinces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(&path, r#"{"districts": {"Quetta": "PK201"}}"#).unwrap();

        let tables = ReferenceTables::from_json_file(&path).unwrap();
        assert_eq!(tables.province("Balochistan").unwrap().as_str(), "PK2");
        assert_eq!(tables.district("Quetta").unwrap().as_str(), "PK201");

        std::fs::write(&path, r#"{"districts": {"Quetta": "Q-201"}}"#).unwrap();
        assert!(ReferenceTables::from_json_file(&path).is_err());
    }
}
