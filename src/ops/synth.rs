use crate::error::{RegisterError, Result};
use crate::register::{AdminLevel, AdminUnit, AncestorIndex, Ancestry, Column, PCode, Register};

/// Builds a full village row under an existing UC.
///
/// Ancestor fields are copied from the first row whose UC P-code equals
/// `uc_prefix`; the settlement code is the last three digits of
/// `generated_code`. Status and remarks are left for the caller.
pub fn build_row(register: &Register, uc_prefix: &str, village_name: &str, generated_code: &str) -> Result<AdminUnit> {
    let uc_row = register.scope(Column::UcPcode, uc_prefix).next()
        .ok_or_else(|| RegisterError::ScopeNotFound {
            level: AdminLevel::Uc,
            code: uc_prefix.to_string(),
        })?;
    let code = village_code(uc_prefix, generated_code)?;
    Ok(Ancestry::from_unit(uc_row, AdminLevel::Uc).village(village_name.trim(), &code))
}

fn village_code(uc_prefix: &str, generated_code: &str) -> Result<PCode> {
    let uc = PCode::new(AdminLevel::Uc, uc_prefix);
    let segment = generated_code.strip_prefix(uc_prefix).ok_or_else(|| {
        RegisterError::InvalidInput(format!("code '{generated_code}' is not under UC '{uc_prefix}'"))
    })?;
    uc.child(segment)
}

/// Row synthesizer for batches: ancestor fields come from an index built
/// once over the snapshot instead of a scan per row.
#[derive(Debug)]
pub struct Synthesizer {
    index: AncestorIndex,
}

impl Synthesizer {
    pub fn new(register: &Register) -> Self {
        Self { index: AncestorIndex::build(register) }
    }

    pub fn from_index(index: AncestorIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &AncestorIndex { &self.index }

    pub fn index_mut(&mut self) -> &mut AncestorIndex { &mut self.index }

    /// Builds the row for village `code` named `village_name`.
    pub fn village(&self, code: &PCode, village_name: &str) -> Result<AdminUnit> {
        let uc = code.to_parent(AdminLevel::Uc)
            .filter(|_| code.level == AdminLevel::Village)
            .ok_or_else(|| RegisterError::InvalidInput(format!("'{code}' is not a village code")))?;
        Ok(self.index.require(&uc)?.village(village_name.trim(), code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Register {
        Register::from_rows([AdminUnit {
            country_pcode: "PK".into(),
            province: "Khyber Pakhtunkhwa".into(),
            province_code: "01".into(),
            province_pcode: "PK01".into(),
            district: "Peshawar".into(),
            district_code: "01".into(),
            district_pcode: "PK0101".into(),
            tehsil: "Peshawar City".into(),
            tehsil_code: "".into(),
            tehsil_pcode: "PK0101".into(),
            uc: "Hazar Khwani".into(),
            uc_id: "001".into(),
            uc_pcode: "PK0101001".into(),
            village_name: "Old Village".into(),
            village_settlement_code: "001".into(),
            village_pcode_new: "PK0101001001".into(),
            remarks: "surveyed".into(),
            ..Default::default()
        }])
    }

    #[test]
    fn copies_ancestors_from_existing_uc() {
        let register = existing();
        let row = build_row(&register, "PK0101001", "Newtown", "PK0101001002").unwrap();

        assert_eq!(row.village_pcode_new, "PK0101001002");
        assert_eq!(row.village_settlement_code, "002");
        assert_eq!(row.village_name, "Newtown");
        assert_eq!(row.province, "Khyber Pakhtunkhwa");
        assert_eq!(row.district_pcode, "PK0101");
        assert_eq!(row.uc, "Hazar Khwani");
        assert_eq!(row.uc_pcode, "PK0101001");
        // Free-text fields are not inherited.
        assert_eq!(row.remarks, "");
        assert_eq!(row.village_pcode_old, "");
        assert!(row.latitude.is_none());
    }

    #[test]
    fn unknown_uc_is_a_scope_error() {
        assert_eq!(
            build_row(&existing(), "PK0101009", "Newtown", "PK0101009001"),
            Err(RegisterError::ScopeNotFound { level: AdminLevel::Uc, code: "PK0101009".into() })
        );
    }

    #[test]
    fn code_must_extend_the_uc() {
        assert!(build_row(&existing(), "PK0101001", "Newtown", "PK0101002002").is_err());
        assert!(build_row(&existing(), "PK0101001", "Newtown", "PK01010012").is_err());
    }

    #[test]
    fn batch_synthesizer_matches_single_rows() {
        let register = existing();
        let synth = Synthesizer::new(&register);
        let code = PCode::new(AdminLevel::Village, "PK0101001002");
        let batch = synth.village(&code, "Newtown").unwrap();
        assert_eq!(batch, build_row(&register, "PK0101001", "Newtown", "PK0101001002").unwrap());

        assert!(synth.village(&PCode::new(AdminLevel::Uc, "PK0101001"), "x").is_err());
    }
}
