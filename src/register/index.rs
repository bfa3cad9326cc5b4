use ahash::AHashMap;

use super::{level::AdminLevel, pcode::{PCode, COUNTRY_PREFIX}, register::Register, unit::AdminUnit};
use crate::error::{RegisterError, Result};

/// Names and codes of a unit and all of its ancestors. Fields below the
/// unit's own level are left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    pub province: String,
    pub province_code: String,
    pub province_pcode: String,
    pub district: String,
    pub district_code: String,
    pub district_pcode: String,
    pub tehsil: String,
    pub tehsil_code: String,
    pub tehsil_pcode: String,
    pub uc: String,
    pub uc_id: String,
    pub uc_pcode: String,
}

impl Ancestry {
    /// Root of a new path: a province from the reference table.
    pub fn province(name: &str, pcode: &PCode) -> Self {
        Self {
            province: name.to_string(),
            province_code: pcode.segment().to_string(),
            province_pcode: pcode.to_string(),
            ..Default::default()
        }
    }

    /// Copies the ancestor fields of `unit` down to (and including) `level`.
    pub fn from_unit(unit: &AdminUnit, level: AdminLevel) -> Self {
        let mut ancestry = Self {
            province: unit.province.clone(),
            province_code: unit.province_code.clone(),
            province_pcode: unit.province_pcode.clone(),
            ..Default::default()
        };
        if level >= AdminLevel::District {
            ancestry.district = unit.district.clone();
            ancestry.district_code = unit.district_code.clone();
            ancestry.district_pcode = unit.district_pcode.clone();
        }
        if level >= AdminLevel::Tehsil {
            ancestry.tehsil = unit.tehsil.clone();
            ancestry.tehsil_code = unit.tehsil_code.clone();
            ancestry.tehsil_pcode = unit.tehsil_pcode.clone();
        }
        if level >= AdminLevel::Uc {
            ancestry.uc = unit.uc.clone();
            ancestry.uc_id = unit.uc_id.clone();
            ancestry.uc_pcode = unit.uc_pcode.clone();
        }
        ancestry
    }

    /// The deepest level this ancestry describes.
    pub fn level(&self) -> AdminLevel {
        if !self.uc_pcode.is_empty() {
            AdminLevel::Uc
        } else if !self.tehsil_pcode.is_empty() {
            AdminLevel::Tehsil
        } else if !self.district_pcode.is_empty() {
            AdminLevel::District
        } else {
            AdminLevel::Province
        }
    }

    /// Full P-code of the deepest unit.
    pub fn pcode(&self) -> PCode {
        let level = self.level();
        let id = match level {
            AdminLevel::Uc => &self.uc_pcode,
            AdminLevel::Tehsil => &self.tehsil_pcode,
            AdminLevel::District => &self.district_pcode,
            _ => &self.province_pcode,
        };
        PCode::new(level, id.as_str())
    }

    /// Extends this ancestry with a child unit named `name` and coded `code`.
    pub fn with_child(&self, name: &str, code: &PCode) -> Result<Ancestry> {
        let mut next = self.clone();
        let segment = code.segment().to_string();
        let pcode = code.to_string();
        match code.level {
            AdminLevel::District => {
                (next.district, next.district_code, next.district_pcode) = (name.to_string(), segment, pcode)
            }
            AdminLevel::Tehsil => {
                (next.tehsil, next.tehsil_code, next.tehsil_pcode) = (name.to_string(), segment, pcode)
            }
            AdminLevel::Uc => (next.uc, next.uc_id, next.uc_pcode) = (name.to_string(), segment, pcode),
            level => {
                return Err(RegisterError::InvalidInput(format!("cannot nest a {level} inside an ancestry")));
            }
        }
        Ok(next)
    }

    /// Builds a full village row under this (UC-level) ancestry.
    pub fn village(&self, village_name: &str, code: &PCode) -> AdminUnit {
        AdminUnit {
            country_pcode: COUNTRY_PREFIX.to_string(),
            province: self.province.clone(),
            province_code: self.province_code.clone(),
            province_pcode: self.province_pcode.clone(),
            district: self.district.clone(),
            district_code: self.district_code.clone(),
            district_pcode: self.district_pcode.clone(),
            tehsil: self.tehsil.clone(),
            tehsil_code: self.tehsil_code.clone(),
            tehsil_pcode: self.tehsil_pcode.clone(),
            uc: self.uc.clone(),
            uc_id: self.uc_id.clone(),
            uc_pcode: self.uc_pcode.clone(),
            village_name: village_name.to_string(),
            village_settlement_code: code.segment().to_string(),
            village_pcode_new: code.to_string(),
            ..Default::default()
        }
    }
}

/// Lookup of ancestor fields keyed by ancestor P-code, plus a name lookup
/// `(level, parent P-code, name) -> P-code`. Built once per batch; units
/// created during the batch are added with [`AncestorIndex::insert`].
#[derive(Debug, Clone, Default)]
pub struct AncestorIndex {
    by_code: AHashMap<PCode, Ancestry>,
    by_name: AHashMap<(AdminLevel, String, String), PCode>,
}

impl AncestorIndex {
    pub fn build(register: &Register) -> Self {
        let mut index = Self::default();
        index.extend(register);
        index
    }

    /// Adds every unit of `register` not yet known. The first row seen for
    /// a code wins.
    pub fn extend(&mut self, register: &Register) {
        for row in register.rows() {
            for level in [AdminLevel::Province, AdminLevel::District, AdminLevel::Tehsil, AdminLevel::Uc] {
                if let Some(code) = row.pcode(level) {
                    if !self.by_code.contains_key(&code) {
                        self.insert(Ancestry::from_unit(row, level));
                    }
                }
            }
        }
    }

    /// Registers a unit, typically one allocated earlier in the same batch.
    pub fn insert(&mut self, ancestry: Ancestry) {
        let code = ancestry.pcode();
        let name = match code.level {
            AdminLevel::Province => ancestry.province.clone(),
            AdminLevel::District => ancestry.district.clone(),
            AdminLevel::Tehsil => ancestry.tehsil.clone(),
            _ => ancestry.uc.clone(),
        };
        let parent = code.level.parent()
            .and_then(|parent| code.to_parent(parent))
            .map(|parent| parent.to_string())
            .unwrap_or_default();
        if !name.is_empty() {
            self.by_name.entry((code.level, parent, name)).or_insert_with(|| code.clone());
        }
        self.by_code.entry(code).or_insert(ancestry);
    }

    pub fn get(&self, code: &PCode) -> Option<&Ancestry> {
        self.by_code.get(code)
    }

    /// Ancestor fields for `code`, or a scope error if no row defines it.
    pub fn require(&self, code: &PCode) -> Result<&Ancestry> {
        self.get(code).ok_or_else(|| RegisterError::ScopeNotFound {
            level: code.level,
            code: code.to_string(),
        })
    }

    /// Finds a unit by name under `parent` (a province name for provinces is
    /// looked up with an empty parent).
    pub fn lookup(&self, level: AdminLevel, parent: &str, name: &str) -> Option<&PCode> {
        self.by_name.get(&(level, parent.to_string(), name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(uc: &str, uc_pcode: &str) -> AdminUnit {
        AdminUnit {
            province: "Punjab".into(),
            province_code: "7".into(),
            province_pcode: "PK7".into(),
            district: "Lahore".into(),
            district_code: "01".into(),
            district_pcode: "PK701".into(),
            tehsil: "City".into(),
            tehsil_code: "02".into(),
            tehsil_pcode: "PK70102".into(),
            uc: uc.into(),
            uc_id: uc_pcode[uc_pcode.len() - 3..].into(),
            uc_pcode: uc_pcode.into(),
            ..Default::default()
        }
    }

    #[test]
    fn index_by_code_and_name() {
        let register = Register::from_rows([row("Alpha", "PK70102001"), row("Beta", "PK70102002")]);
        let index = AncestorIndex::build(&register);

        let uc = PCode::new(AdminLevel::Uc, "PK70102002");
        assert_eq!(index.require(&uc).unwrap().uc, "Beta");
        assert_eq!(index.lookup(AdminLevel::Uc, "PK70102", "Alpha").unwrap().as_str(), "PK70102001");
        assert_eq!(index.lookup(AdminLevel::Tehsil, "PK701", "City").unwrap().as_str(), "PK70102");
        assert_eq!(index.lookup(AdminLevel::District, "PK7", "Lahore").unwrap().as_str(), "PK701");
        assert_eq!(index.lookup(AdminLevel::Province, "", "Punjab").unwrap().as_str(), "PK7");

        let missing = PCode::new(AdminLevel::Uc, "PK70102009");
        assert_eq!(
            index.require(&missing),
            Err(RegisterError::ScopeNotFound { level: AdminLevel::Uc, code: "PK70102009".into() })
        );
    }

    #[test]
    fn ancestry_builds_children_and_villages() {
        let province = PCode::province("7");
        let root = Ancestry::province("Punjab", &province);
        let district = province.child("03").unwrap();
        let tehsil = district.child("01").unwrap();
        let uc = tehsil.child("001").unwrap();

        let ancestry = root
            .with_child("Kasur", &district).unwrap()
            .with_child("Chunian", &tehsil).unwrap()
            .with_child("Ward 1", &uc).unwrap();
        assert_eq!(ancestry.level(), AdminLevel::Uc);
        assert_eq!(ancestry.pcode(), uc);

        let village = ancestry.village("Newtown", &uc.child("001").unwrap());
        assert_eq!(village.village_pcode_new, "PK70301001001");
        assert_eq!(village.village_settlement_code, "001");
        assert_eq!(village.district, "Kasur");
        assert_eq!(village.tehsil_code, "01");
        assert_eq!(village.country_pcode, "PK");
    }
}
