use ahash::AHashSet;

use crate::error::{RegisterError, Result};
use crate::register::{AdminUnit, Register};

/// Appends `new_rows` to `existing` and re-normalizes code padding over the
/// whole resulting table.
///
/// The batch is rejected as a whole if any new village P-code collides with
/// another new row or with a row already in the table.
pub fn merge(existing: Register, new_rows: Vec<AdminUnit>) -> Result<Register> {
    check_collisions(&existing, &new_rows)?;

    let added = new_rows.len();
    let mut merged = existing;
    merged.extend(new_rows);
    merged.normalize_codes();

    tracing::info!(added, total = merged.len(), "merged rows into register");
    Ok(merged)
}

/// Fails on the first new village P-code that is already taken.
pub(crate) fn check_collisions(existing: &Register, new_rows: &[AdminUnit]) -> Result<()> {
    let mut seen: AHashSet<&str> = existing.rows().iter()
        .map(|row| row.village_pcode_new.as_str())
        .filter(|code| !code.is_empty())
        .collect();
    for row in new_rows {
        let code = row.village_pcode_new.as_str();
        if !code.is_empty() && !seen.insert(code) {
            return Err(RegisterError::DuplicateCode { code: code.to_string() });
        }
    }
    Ok(())
}
