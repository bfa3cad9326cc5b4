use super::batch::Batch;
use crate::error::{RegisterError, Result};
use crate::geom::validate_optional;
use crate::register::{AdminLevel, AdminUnit, Ancestry, PCode};

/// A village as submitted by an operator, coordinates as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VillageInput {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

impl VillageInput {
    pub fn new(name: &str) -> Self {
        Self { name: name.trim().to_string(), ..Default::default() }
    }

    pub fn with_coordinates(mut self, latitude: &str, longitude: &str) -> Self {
        self.latitude = latitude.trim().to_string();
        self.longitude = longitude.trim().to_string();
        self
    }

    /// Pairs village names with optional coordinate lists. A non-empty list
    /// must have one entry per name.
    pub fn zip(names: &[String], latitudes: &[String], longitudes: &[String]) -> Result<Vec<VillageInput>> {
        for (label, list) in [("latitude", latitudes), ("longitude", longitudes)] {
            if !list.is_empty() && list.len() != names.len() {
                return Err(RegisterError::InvalidInput(format!(
                    "{} {label} values given for {} villages", list.len(), names.len()
                )));
            }
        }
        Ok(names.iter()
            .enumerate()
            .map(|(i, name)| {
                let lat = latitudes.get(i).map_or("", String::as_str);
                let lon = longitudes.get(i).map_or("", String::as_str);
                VillageInput::new(name).with_coordinates(lat, lon)
            })
            .collect())
    }
}

/// Splits a comma or newline separated list, dropping blank entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checks every village before anything is allocated.
pub(super) fn validate_villages(villages: &[VillageInput]) -> Result<Vec<Option<(f64, f64)>>> {
    if villages.is_empty() {
        return Err(RegisterError::InvalidInput("at least one village name is required".into()));
    }
    villages.iter()
        .map(|village| {
            if village.name.trim().is_empty() {
                return Err(RegisterError::InvalidInput("village name must not be blank".into()));
            }
            validate_optional(&village.latitude, &village.longitude).inspect_err(|err| {
                tracing::warn!(village = %village.name, error = %err, "rejected village coordinates");
            })
        })
        .collect()
}

impl Batch<'_> {
    /// Adds villages to an existing UC.
    ///
    /// The whole submission is validated first and fails as a unit; on
    /// success the villages get consecutive codes under the UC.
    pub fn add_villages(&mut self, uc: &PCode, villages: &[VillageInput]) -> Result<Vec<AdminUnit>> {
        if uc.level != AdminLevel::Uc {
            return Err(RegisterError::InvalidInput(format!("'{uc}' is not a UC code")));
        }
        let coordinates = validate_villages(villages)?;
        let ancestry = self.synth.index().require(uc)?.clone();
        let remark = format!("newly added on {}", self.date);
        self.villages_under(&ancestry, villages, &coordinates, &remark)
    }

    /// Builds the rows for already validated villages under a UC ancestry.
    pub(super) fn villages_under(
        &mut self,
        uc: &Ancestry,
        villages: &[VillageInput],
        coordinates: &[Option<(f64, f64)>],
        remark: &str,
    ) -> Result<Vec<AdminUnit>> {
        let codes = self.village_codes(uc, villages.len())?;
        let rows = villages.iter()
            .zip(coordinates)
            .zip(&codes)
            .map(|((village, coords), code)| {
                let mut row = uc.village(village.name.trim(), code);
                if let Some((lat, lon)) = coords {
                    row.latitude = Some(*lat);
                    row.longitude = Some(*lon);
                }
                self.stamp(&mut row, remark.to_string());
                row
            })
            .collect();
        tracing::info!(uc = %uc.pcode(), count = codes.len(), "allocated village codes");
        Ok(rows)
    }
}
