use crate::error::{RegisterError, Result};
use crate::register::{format_segment, AdminLevel, Column, PCode, Register};

/// Parses an existing code cell. Only plain digit strings count; blanks and
/// anything malformed are treated as absent.
pub(crate) fn parse_segment(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Largest numeric `code_column` value among rows where
/// `scope_column == scope_value`, or 0 for an empty scope.
pub fn max_in_scope(
    register: &Register,
    scope_column: Column,
    scope_value: &str,
    code_column: Column,
) -> Result<u32> {
    register.require(code_column)?;
    register.require(scope_column)?;

    let mut max = 0;
    for row in register.scope(scope_column, scope_value) {
        let cell = row.get(code_column);
        match parse_segment(&cell) {
            Some(value) => max = max.max(value),
            None if cell.trim().is_empty() => {}
            None => tracing::warn!(
                column = %code_column, scope = scope_value, value = %cell,
                "ignoring malformed code"
            ),
        }
    }
    Ok(max)
}

/// Next unused code in a scope: `max + 1`, zero-padded to `width`.
///
/// Fails with a schema error if either column is missing from the table,
/// and with `CodeSpaceExhausted` if the result would not fit in `width`.
pub fn next_code(
    register: &Register,
    scope_column: Column,
    scope_value: &str,
    code_column: Column,
    width: usize,
) -> Result<String> {
    let next = max_in_scope(register, scope_column, scope_value, code_column)?.saturating_add(1);
    format_segment(next, width).ok_or_else(|| RegisterError::CodeSpaceExhausted {
        level: level_of(code_column),
        scope: scope_value.to_string(),
    })
}

/// Next unused child P-code under `parent`, for a single allocation.
/// Use [`crate::Allocator`] when several codes are handed out in one batch.
pub fn next_child(register: &Register, parent: &PCode) -> Result<PCode> {
    let level = child_level(parent)?;
    let (scope_column, width) = scope_of(level)?;
    let segment = next_code(register, scope_column, scope_value(parent), level.code_column(), width)?;
    parent.child(&segment)
}

pub(crate) fn child_level(parent: &PCode) -> Result<AdminLevel> {
    parent.level.child().ok_or_else(|| {
        RegisterError::InvalidInput(format!("{} '{}' has no child units", parent.level, parent))
    })
}

pub(crate) fn scope_of(level: AdminLevel) -> Result<(Column, usize)> {
    match (level.scope_column(), level.width()) {
        (Some(column), Some(width)) => Ok((column, width)),
        _ => Err(RegisterError::InvalidInput(format!("{level} codes are not allocated"))),
    }
}

/// Value of the scope column identifying `parent`'s children. Districts are
/// scoped by the bare province code, other levels by the parent P-code.
pub(crate) fn scope_value(parent: &PCode) -> &str {
    match parent.level {
        AdminLevel::Province => parent.segment(),
        _ => parent.as_str(),
    }
}

fn level_of(code_column: Column) -> AdminLevel {
    AdminLevel::ALL.into_iter()
        .find(|level| level.code_column() == code_column)
        .unwrap_or(AdminLevel::Village)
}
