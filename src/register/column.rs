use std::fmt;

/// Known columns of the register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CountryPcode,
    Province,
    ProvinceCode,
    ProvincePcode,
    District,
    DistrictCode,
    DistrictPcode,
    Tehsil,
    TehsilCode,
    TehsilPcode,
    Uc,
    UcId,
    UcPcode,
    UcPrefix,
    VillageName,
    VillageSettlementCode,
    VillagePcodeNew,
    VillagePcodeOld,
    Latitude,
    Longitude,
    Status,
    StatusDate,
    Remarks,
}

impl Column {
    /// Column order used when writing a register that was built in memory.
    pub const CANONICAL: [Column; 23] = [
        Column::CountryPcode,
        Column::Province,
        Column::ProvinceCode,
        Column::ProvincePcode,
        Column::District,
        Column::DistrictCode,
        Column::DistrictPcode,
        Column::Tehsil,
        Column::TehsilCode,
        Column::TehsilPcode,
        Column::Uc,
        Column::UcId,
        Column::UcPcode,
        Column::VillageName,
        Column::Latitude,
        Column::Longitude,
        Column::VillageSettlementCode,
        Column::VillagePcodeNew,
        Column::VillagePcodeOld,
        Column::Status,
        Column::StatusDate,
        Column::Remarks,
        Column::UcPrefix,
    ];

    /// Numeric code columns and their zero-padded widths.
    pub const PADDED: [(Column, usize); 4] = [
        (Column::DistrictCode, 2),
        (Column::TehsilCode, 2),
        (Column::UcId, 3),
        (Column::VillageSettlementCode, 3),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::CountryPcode => "country_pcode",
            Column::Province => "province",
            Column::ProvinceCode => "province_code",
            Column::ProvincePcode => "province_pcode",
            Column::District => "district",
            Column::DistrictCode => "district_code",
            Column::DistrictPcode => "district_pcode",
            Column::Tehsil => "tehsil",
            Column::TehsilCode => "tehsil_code",
            Column::TehsilPcode => "tehsil_pcode",
            Column::Uc => "uc",
            Column::UcId => "uc_id",
            Column::UcPcode => "uc/vc/nc_pcode",
            Column::UcPrefix => "uc_prefix",
            Column::VillageName => "village_name",
            Column::VillageSettlementCode => "village/settlement_code",
            Column::VillagePcodeNew => "village_pcode_new",
            Column::VillagePcodeOld => "village_pcode_old",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::Status => "status",
            Column::StatusDate => "status_date",
            Column::Remarks => "remarks",
        }
    }

    /// Resolve a (normalized) header name. `uc_prefix` is a mirror of the UC
    /// P-code and resolves to its own variant so both headers round-trip.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::CANONICAL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw spreadsheet header: trim, lower-case, spaces to
/// underscores, and rename the legacy long-form headers.
pub fn normalize_header(raw: &str) -> String {
    let name = raw.trim().to_lowercase().replace(' ', "_");
    match name.as_str() {
        "village/settlement_pcode_(new)" => "village_pcode_new".into(),
        "village/settlement_pcode_(old)" => "village_pcode_old".into(),
        "names_of_villages_/wards_under_this_uc/vc/nc:" => "village_name".into(),
        _ => name,
    }
}
