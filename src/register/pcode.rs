use std::{fmt, sync::Arc};

use super::level::AdminLevel;
use crate::error::{RegisterError, Result};

/// Country prefix shared by every P-code in the register.
pub const COUNTRY_PREFIX: &str = "PK";

/// Stable key for any administrative unit across levels.
/// Keeps the original P-code text (with leading zeros).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PCode {
    pub level: AdminLevel,
    pub id: Arc<str>, // e.g., "PK601" for a district, "PK60102012003" for a village
}

impl PCode {
    pub fn new(level: AdminLevel, id: impl Into<Arc<str>>) -> Self {
        Self { level, id: id.into() }
    }

    /// Province P-code for a bare reference-table code, e.g. `"6"` -> `"PK6"`.
    pub fn province(code: &str) -> Self {
        Self::new(AdminLevel::Province, format!("{COUNTRY_PREFIX}{}", code.trim()))
    }

    pub fn as_str(&self) -> &str { &self.id }

    /// Composes the P-code of a child unit by appending its numeric segment.
    pub fn child(&self, segment: &str) -> Result<PCode> {
        let level = self.level.child()
            .ok_or_else(|| RegisterError::InvalidInput(format!("'{}' has no child level", self.id)))?;
        let width = level.width().unwrap_or_default();
        if segment.len() != width || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RegisterError::InvalidInput(format!(
                "{level} code '{segment}' must be {width} digits"
            )));
        }
        Ok(PCode::new(level, format!("{}{}", self.id, segment)))
    }

    /// Returns a new `PCode` for an ancestor level by trimming the fixed-width
    /// segments of every level below it from the end of this code.
    pub fn to_parent(&self, parent: AdminLevel) -> Option<PCode> {
        if parent > self.level {
            return None;
        }
        let trim: usize = AdminLevel::ALL.iter()
            .filter(|l| **l > parent && **l <= self.level)
            .filter_map(|l| l.width())
            .sum();
        let len = self.id.len().checked_sub(trim)?;
        self.id.get(..len).map(|prefix| PCode::new(parent, prefix))
    }

    /// This unit's own numeric segment (the province code for provinces).
    pub fn segment(&self) -> &str {
        match self.level.width() {
            Some(width) => &self.id[self.id.len().saturating_sub(width)..],
            None => self.id.strip_prefix(COUNTRY_PREFIX).unwrap_or(&self.id),
        }
    }
}

impl fmt::Display for PCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Formats `value` as a zero-padded segment, or `None` if it does not fit.
pub fn format_segment(value: u32, width: usize) -> Option<String> {
    let text = format!("{value:0>width$}");
    (text.len() == width).then_some(text)
}

/// Normalizes one code cell to its fixed width.
///
/// Blank stays blank, numeric values (including spreadsheet floats such as
/// `"7.0"`) are rewritten as zero-padded integers, and anything else is
/// left-padded with zeros as-is.
pub fn pad_code(value: &str, width: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            let digits = (number.trunc() as i64).to_string();
            format!("{digits:0>width$}")
        }
        _ => format!("{value:0>width$}"),
    }
}
