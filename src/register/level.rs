use std::fmt;

use super::column::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdminLevel {
    Province,   // Highest-level entity, code supplied by the reference table
    District,   // District -> Province
    Tehsil,     // Tehsil -> District
    Uc,         // Union council -> Tehsil
    Village,    // Lowest-level entity
}

impl AdminLevel {
    pub const ALL: [AdminLevel; 5] = [
        AdminLevel::Province,
        AdminLevel::District,
        AdminLevel::Tehsil,
        AdminLevel::Uc,
        AdminLevel::Village,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            AdminLevel::Province => "province",
            AdminLevel::District => "district",
            AdminLevel::Tehsil => "tehsil",
            AdminLevel::Uc => "uc",
            AdminLevel::Village => "village",
        }
    }

    /// Fixed width of this level's numeric segment. Province codes are taken
    /// verbatim from the reference table and have no fixed width.
    pub fn width(&self) -> Option<usize> {
        match self {
            AdminLevel::Province => None,
            AdminLevel::District => Some(2),
            AdminLevel::Tehsil => Some(2),
            AdminLevel::Uc => Some(3),
            AdminLevel::Village => Some(3),
        }
    }

    pub fn parent(&self) -> Option<AdminLevel> {
        match self {
            AdminLevel::Province => None,
            AdminLevel::District => Some(AdminLevel::Province),
            AdminLevel::Tehsil => Some(AdminLevel::District),
            AdminLevel::Uc => Some(AdminLevel::Tehsil),
            AdminLevel::Village => Some(AdminLevel::Uc),
        }
    }

    pub fn child(&self) -> Option<AdminLevel> {
        match self {
            AdminLevel::Province => Some(AdminLevel::District),
            AdminLevel::District => Some(AdminLevel::Tehsil),
            AdminLevel::Tehsil => Some(AdminLevel::Uc),
            AdminLevel::Uc => Some(AdminLevel::Village),
            AdminLevel::Village => None,
        }
    }

    /// Column holding the unit's common name.
    pub fn name_column(&self) -> Column {
        match self {
            AdminLevel::Province => Column::Province,
            AdminLevel::District => Column::District,
            AdminLevel::Tehsil => Column::Tehsil,
            AdminLevel::Uc => Column::Uc,
            AdminLevel::Village => Column::VillageName,
        }
    }

    /// Column holding the unit's own numeric segment.
    pub fn code_column(&self) -> Column {
        match self {
            AdminLevel::Province => Column::ProvinceCode,
            AdminLevel::District => Column::DistrictCode,
            AdminLevel::Tehsil => Column::TehsilCode,
            AdminLevel::Uc => Column::UcId,
            AdminLevel::Village => Column::VillageSettlementCode,
        }
    }

    /// Column holding the unit's full P-code.
    pub fn pcode_column(&self) -> Column {
        match self {
            AdminLevel::Province => Column::ProvincePcode,
            AdminLevel::District => Column::DistrictPcode,
            AdminLevel::Tehsil => Column::TehsilPcode,
            AdminLevel::Uc => Column::UcPcode,
            AdminLevel::Village => Column::VillagePcodeNew,
        }
    }

    /// Column identifying the scope in which this level's codes are unique.
    /// Districts are scoped by the bare province code, everything below by
    /// the parent's full P-code.
    pub fn scope_column(&self) -> Option<Column> {
        match self {
            AdminLevel::Province => None,
            AdminLevel::District => Some(Column::ProvinceCode),
            AdminLevel::Tehsil => Some(Column::DistrictPcode),
            AdminLevel::Uc => Some(Column::TehsilPcode),
            AdminLevel::Village => Some(Column::UcPcode),
        }
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_child_are_inverse() {
        for level in AdminLevel::ALL {
            if let Some(child) = level.child() {
                assert_eq!(child.parent(), Some(level));
            }
        }
        assert_eq!(AdminLevel::Province.parent(), None);
        assert_eq!(AdminLevel::Village.child(), None);
    }

    #[test]
    fn widths_match_pcode_layout() {
        let widths: Vec<_> = AdminLevel::ALL.iter().filter_map(|l| l.width()).collect();
        assert_eq!(widths, vec![2, 2, 3, 3]);
    }
}
