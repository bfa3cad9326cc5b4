use std::{borrow::Cow, collections::BTreeMap};

use super::{column::Column, level::AdminLevel, pcode::PCode, status::Status};
use crate::geom::clean_coordinate;

/// One row of the register: a single village or settlement together with
/// the names and codes of every ancestor unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminUnit {
    pub country_pcode: String,
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
    pub village_name: String,
    pub village_settlement_code: String,
    pub village_pcode_new: String,
    pub village_pcode_old: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Status,
    pub status_date: String,
    pub remarks: String,
    /// Columns the register does not interpret (enumerator, survey flags, ...).
    pub extra: BTreeMap<String, String>,
}

impl AdminUnit {
    /// Cell value for a known column, formatted as it is written to disk.
    pub fn get(&self, column: Column) -> Cow<'_, str> {
        let text: &str = match column {
            Column::CountryPcode => &self.country_pcode,
            Column::Province => &self.province,
            Column::ProvinceCode => &self.province_code,
            Column::ProvincePcode => &self.province_pcode,
            Column::District => &self.district,
            Column::DistrictCode => &self.district_code,
            Column::DistrictPcode => &self.district_pcode,
            Column::Tehsil => &self.tehsil,
            Column::TehsilCode => &self.tehsil_code,
            Column::TehsilPcode => &self.tehsil_pcode,
            Column::Uc => &self.uc,
            Column::UcId => &self.uc_id,
            Column::UcPcode | Column::UcPrefix => &self.uc_pcode,
            Column::VillageName => &self.village_name,
            Column::VillageSettlementCode => &self.village_settlement_code,
            Column::VillagePcodeNew => &self.village_pcode_new,
            Column::VillagePcodeOld => &self.village_pcode_old,
            Column::StatusDate => &self.status_date,
            Column::Remarks => &self.remarks,
            Column::Status => return Cow::Borrowed(self.status.as_str()),
            Column::Latitude => return format_coordinate(self.latitude),
            Column::Longitude => return format_coordinate(self.longitude),
        };
        Cow::Borrowed(text)
    }

    /// Sets a known column from its on-disk text form.
    pub fn set(&mut self, column: Column, value: &str) {
        let value = value.trim();
        let slot = match column {
            Column::CountryPcode => &mut self.country_pcode,
            Column::Province => &mut self.province,
            Column::ProvinceCode => &mut self.province_code,
            Column::ProvincePcode => &mut self.province_pcode,
            Column::District => &mut self.district,
            Column::DistrictCode => &mut self.district_code,
            Column::DistrictPcode => &mut self.district_pcode,
            Column::Tehsil => &mut self.tehsil,
            Column::TehsilCode => &mut self.tehsil_code,
            Column::TehsilPcode => &mut self.tehsil_pcode,
            Column::Uc => &mut self.uc,
            Column::UcId => &mut self.uc_id,
            Column::UcPcode => &mut self.uc_pcode,
            Column::VillageName => &mut self.village_name,
            Column::VillageSettlementCode => &mut self.village_settlement_code,
            Column::VillagePcodeNew => &mut self.village_pcode_new,
            Column::VillagePcodeOld => &mut self.village_pcode_old,
            Column::StatusDate => &mut self.status_date,
            Column::Remarks => &mut self.remarks,
            // Mirror of the UC P-code, only used when the canonical column is blank.
            Column::UcPrefix => {
                if self.uc_pcode.is_empty() {
                    self.uc_pcode = value.to_string();
                }
                return;
            }
            Column::Status => {
                self.status = value.parse().unwrap_or_else(|_| {
                    tracing::warn!(status = value, "unrecognized status, inferring from text");
                    Status::infer_from_remarks(value)
                });
                return;
            }
            Column::Latitude => {
                self.latitude = clean_coordinate(value);
                return;
            }
            Column::Longitude => {
                self.longitude = clean_coordinate(value);
                return;
            }
        };
        *slot = value.to_string();
    }

    /// The village point (x = longitude, y = latitude), when both are known.
    pub fn point(&self) -> Option<geo::Point<f64>> {
        Some(geo::Point::new(self.longitude?, self.latitude?))
    }

    /// Full P-code of this row's unit at `level`, if recorded.
    pub fn pcode(&self, level: AdminLevel) -> Option<PCode> {
        let code = self.get(level.pcode_column());
        (!code.is_empty()).then(|| PCode::new(level, code.as_ref()))
    }

    /// Overwrite the lifecycle fields of this row.
    pub fn set_status(&mut self, status: Status, date: &str, remarks: impl Into<String>) {
        self.status = status;
        self.status_date = date.to_string();
        self.remarks = remarks.into();
    }
}

fn format_coordinate(value: Option<f64>) -> Cow<'static, str> {
    match value {
        Some(v) => Cow::Owned(v.to_string()),
        None => Cow::Borrowed(""),
    }
}
