use super::{batch::Batch, village::validate_villages, VillageInput};
use crate::error::{RegisterError, Result};
use crate::register::{AdminLevel, AdminUnit, Ancestry};

/// Names of the units on the way from a province down to a UC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitPath {
    pub province: String,
    pub district: String,
    pub tehsil: String,
    pub uc: String,
}

impl UnitPath {
    pub fn new(province: &str, district: &str, tehsil: &str, uc: &str) -> Self {
        Self {
            province: province.trim().to_string(),
            district: district.trim().to_string(),
            tehsil: tehsil.trim().to_string(),
            uc: uc.trim().to_string(),
        }
    }

    fn name(&self, level: AdminLevel) -> &str {
        match level {
            AdminLevel::Province => &self.province,
            AdminLevel::District => &self.district,
            AdminLevel::Tehsil => &self.tehsil,
            _ => &self.uc,
        }
    }
}

/// A new district, tehsil or UC registered together with its first villages.
///
/// `level` is the highest new unit: every unit of `path` at or below it is
/// created, the ones above it must already exist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUnit {
    pub level: AdminLevel,
    pub path: UnitPath,
    pub villages: Vec<VillageInput>,
}

impl Batch<'_> {
    /// Creates the units of `unit` and its villages in one step. Nothing is
    /// allocated unless every name and village checks out.
    pub fn add_unit(&mut self, unit: &NewUnit) -> Result<Vec<AdminUnit>> {
        if !matches!(unit.level, AdminLevel::District | AdminLevel::Tehsil | AdminLevel::Uc) {
            return Err(RegisterError::InvalidInput(format!("cannot add a {} with villages", unit.level)));
        }
        for level in [AdminLevel::Province, AdminLevel::District, AdminLevel::Tehsil, AdminLevel::Uc] {
            if unit.path.name(level).is_empty() {
                return Err(RegisterError::InvalidInput(format!("{level} name must not be blank")));
            }
        }
        let coordinates = validate_villages(&unit.villages)?;

        let mut ancestry = self.province(&unit.path.province)?;
        for level in [AdminLevel::District, AdminLevel::Tehsil] {
            if level >= unit.level {
                break;
            }
            ancestry = self.existing_parent(&ancestry, level, unit.path.name(level))?;
        }
        if let Some(existing) = self.existing_child(&ancestry, unit.level, unit.path.name(unit.level)) {
            return Err(RegisterError::InvalidInput(format!(
                "{} '{}' already exists as {}", unit.level, unit.path.name(unit.level), existing.pcode()
            )));
        }
        // Units created below are forgotten again if any allocation fails.
        let allocator = self.allocator.clone();
        let index = self.synth.index().clone();
        let created = self.create_unit(unit, ancestry, &coordinates);
        if created.is_err() {
            self.allocator = allocator;
            *self.synth.index_mut() = index;
        }
        created
    }

    fn create_unit(
        &mut self,
        unit: &NewUnit,
        mut ancestry: Ancestry,
        coordinates: &[Option<(f64, f64)>],
    ) -> Result<Vec<AdminUnit>> {
        for level in [AdminLevel::District, AdminLevel::Tehsil, AdminLevel::Uc] {
            if level >= unit.level {
                ancestry = self.create_child(&ancestry, unit.path.name(level))?;
            }
        }

        let remark = format!("newly added with {} on {}", unit.level, self.date);
        self.villages_under(&ancestry, &unit.villages, coordinates, &remark)
    }

    fn existing_parent(&mut self, parent: &Ancestry, level: AdminLevel, name: &str) -> Result<Ancestry> {
        self.existing_child(parent, level, name).ok_or_else(|| match level {
            AdminLevel::District => RegisterError::UnknownDistrict(name.to_string()),
            _ => RegisterError::ScopeNotFound { level, code: format!("{}/{name}", parent.pcode()) },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceTables;
    use crate::register::{Register, Status};

    fn dataset() -> Register {
        Register::from_rows([AdminUnit {
            province: "Balochistan".into(),
            province_code: "2".into(),
            province_pcode: "PK2".into(),
            district: "Quetta".into(),
            district_code: "01".into(),
            district_pcode: "PK201".into(),
            tehsil: "Quetta City".into(),
            tehsil_code: "01".into(),
            tehsil_pcode: "PK20101".into(),
            uc: "Satellite Town".into(),
            uc_id: "004".into(),
            uc_pcode: "PK20101004".into(),
            village_name: "Block A".into(),
            village_settlement_code: "001".into(),
            village_pcode_new: "PK20101004001".into(),
            ..Default::default()
        }])
    }

    fn unit(level: AdminLevel, district: &str, tehsil: &str, uc: &str) -> NewUnit {
        NewUnit {
            level,
            path: UnitPath::new("Balochistan", district, tehsil, uc),
            villages: vec![VillageInput::new("First"), VillageInput::new("Second")],
        }
    }

    #[test]
    fn new_uc_under_existing_tehsil() {
        let dataset = dataset();
        let reference = ReferenceTables::builtin();
        let mut batch = Batch::new(&dataset, &reference, "2024-06-01");

        let rows = batch.add_unit(&unit(AdminLevel::Uc, "Quetta", "Quetta City", "Airport")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].uc_pcode, "PK20101005");
        assert_eq!(rows[0].uc_id, "005");
        assert_eq!(rows[0].village_pcode_new, "PK20101005001");
        assert_eq!(rows[1].village_pcode_new, "PK20101005002");
        assert_eq!(rows[0].tehsil, "Quetta City");
        assert_eq!(rows[0].remarks, "newly added with uc on 2024-06-01");
        assert_eq!(rows[0].status, Status::Active);
    }

    #[test]
    fn new_tehsil_and_district() {
        let dataset = dataset();
        let reference = ReferenceTables::builtin().with_district("Pishin", "PK206");
        let mut batch = Batch::new(&dataset, &reference, "2024-06-01");

        let rows = batch.add_unit(&unit(AdminLevel::Tehsil, "Pishin", "Karezat", "Bostan")).unwrap();
        assert_eq!(rows[0].tehsil_pcode, "PK20601");
        assert_eq!(rows[0].uc_pcode, "PK20601001");
        assert_eq!(rows[0].district_pcode, "PK206");

        let rows = batch.add_unit(&unit(AdminLevel::District, "Harnai", "Harnai", "Harnai")).unwrap();
        assert_eq!(rows[0].district_pcode, "PK207");
        assert_eq!(rows[0].district_code, "07");
        assert_eq!(rows[0].tehsil_pcode, "PK20701");
        assert_eq!(rows[1].village_pcode_new, "PK20701001002");
        assert_eq!(rows[0].remarks, "newly added with district on 2024-06-01");
    }

    #[test]
    fn rejects_bad_submissions_before_allocating() {
        let dataset = dataset();
        let reference = ReferenceTables::builtin();
        let mut batch = Batch::new(&dataset, &reference, "2024-06-01");

        let mut empty = unit(AdminLevel::Uc, "Quetta", "Quetta City", "Airport");
        empty.villages.clear();
        assert!(matches!(batch.add_unit(&empty), Err(RegisterError::InvalidInput(_))));

        assert_eq!(
            batch.add_unit(&unit(AdminLevel::Tehsil, "Nowhere", "X", "Y")),
            Err(RegisterError::UnknownDistrict("Nowhere".into()))
        );
        assert!(matches!(
            batch.add_unit(&unit(AdminLevel::Uc, "Quetta", "Missing", "Y")),
            Err(RegisterError::ScopeNotFound { level: AdminLevel::Tehsil, .. })
        ));
        assert!(batch.add_unit(&unit(AdminLevel::Uc, "Quetta", "Quetta City", "Satellite Town")).is_err());

        let rows = batch.add_unit(&unit(AdminLevel::Uc, "Quetta", "Quetta City", "Airport")).unwrap();
        assert_eq!(rows[0].uc_pcode, "PK20101005");
    }

    #[test]
    fn failed_allocation_leaves_batch_reusable() {
        let dataset = dataset();
        let reference = ReferenceTables::builtin();
        let mut batch = Batch::new(&dataset, &reference, "2024-06-01");

        let mut crowded = unit(AdminLevel::Uc, "Quetta", "Quetta City", "Airport");
        crowded.villages = (0..1000).map(|i| VillageInput::new(&format!("Village {i}"))).collect();
        assert!(matches!(
            batch.add_unit(&crowded),
            Err(RegisterError::CodeSpaceExhausted { level: AdminLevel::Village, .. })
        ));

        let rows = batch.add_unit(&unit(AdminLevel::Uc, "Quetta", "Quetta City", "Airport")).unwrap();
        assert_eq!(rows[0].uc_pcode, "PK20101005");
        assert_eq!(rows[0].village_pcode_new, "PK20101005001");
    }
}
