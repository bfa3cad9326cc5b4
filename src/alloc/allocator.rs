use ahash::AHashMap;

use super::next_code::{child_level, max_in_scope, parse_segment, scope_of, scope_value};
use crate::error::{RegisterError, Result};
use crate::reference::ReferenceTables;
use crate::register::{format_segment, AdminLevel, PCode, Register};

/// Batch-aware code allocator.
///
/// The first request under a parent scans the snapshots once for the current
/// maximum; every further request under the same parent continues from the
/// last code handed out, so one batch never reuses a code even though the
/// snapshots are not updated mid-batch. Parents created during the batch
/// start at 1.
#[derive(Debug, Clone)]
pub struct Allocator<'a> {
    snapshots: Vec<&'a Register>,
    reference: Option<&'a ReferenceTables>,
    cursors: AHashMap<PCode, u32>,
}

impl<'a> Allocator<'a> {
    pub fn new(register: &'a Register) -> Self {
        Self { snapshots: vec![register], reference: None, cursors: AHashMap::new() }
    }

    /// Also reserve codes held by another snapshot, e.g. staged records.
    pub fn with_snapshot(mut self, register: &'a Register) -> Self {
        self.snapshots.push(register);
        self
    }

    /// Also reserve district codes listed in the reference table.
    pub fn with_reference(mut self, reference: &'a ReferenceTables) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Highest code already used under `parent`, across all sources.
    fn start(&self, parent: &PCode, level: AdminLevel) -> Result<u32> {
        let (scope_column, _) = scope_of(level)?;
        let mut max = 0;
        for snapshot in &self.snapshots {
            max = max.max(max_in_scope(snapshot, scope_column, scope_value(parent), level.code_column())?);
        }
        if let (AdminLevel::District, Some(reference)) = (level, self.reference) {
            let known = reference.districts_in(parent)
                .filter_map(|code| parse_segment(code.segment()))
                .max()
                .unwrap_or(0);
            max = max.max(known);
        }
        Ok(max)
    }

    /// Allocates the next child P-code under `parent`.
    pub fn next(&mut self, parent: &PCode) -> Result<PCode> {
        let level = child_level(parent)?;
        let (_, width) = scope_of(level)?;

        let last = match self.cursors.get(parent) {
            Some(last) => *last,
            None => self.start(parent, level)?,
        };
        let next = last.saturating_add(1);
        let segment = format_segment(next, width).ok_or_else(|| RegisterError::CodeSpaceExhausted {
            level,
            scope: parent.to_string(),
        })?;
        self.cursors.insert(parent.clone(), next);

        let code = parent.child(&segment)?;
        tracing::debug!(%parent, %code, "allocated code");
        Ok(code)
    }

    /// Allocates `count` consecutive child P-codes under `parent`.
    pub fn take(&mut self, parent: &PCode, count: usize) -> Result<Vec<PCode>> {
        (0..count).map(|_| self.next(parent)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::AdminUnit;

    fn village(uc_pcode: &str, code: &str) -> AdminUnit {
        AdminUnit {
            uc_pcode: uc_pcode.into(),
            village_settlement_code: code.into(),
            village_pcode_new: format!("{uc_pcode}{code}"),
            ..Default::default()
        }
    }

    fn assert_sequential(codes: &[PCode], uc: &str, first: u32) {
        for (i, code) in codes.iter().enumerate() {
            assert_eq!(code.as_str(), format!("{uc}{:03}", first + i as u32));
        }
        let unique: std::collections::BTreeSet<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn batches_are_sequential_without_gaps() {
        let register = Register::from_rows([village("PK0101001", "001"), village("PK0101001", "004")]);
        let uc = PCode::new(AdminLevel::Uc, "PK0101001");

        for n in [1, 5, 100] {
            let mut allocator = Allocator::new(&register);
            let codes = allocator.take(&uc, n).unwrap();
            assert_eq!(codes.len(), n);
            assert_sequential(&codes, "PK0101001", 5);
        }
    }

    #[test]
    fn scopes_are_independent() {
        let register = Register::from_rows([village("PK0101001", "003")]);
        let mut allocator = Allocator::new(&register);
        let a = PCode::new(AdminLevel::Uc, "PK0101001");
        let b = PCode::new(AdminLevel::Uc, "PK0101002");

        assert_eq!(allocator.next(&a).unwrap().as_str(), "PK0101001004");
        assert_eq!(allocator.next(&b).unwrap().as_str(), "PK0101002001");
        assert_eq!(allocator.next(&a).unwrap().as_str(), "PK0101001005");
    }

    #[test]
    fn staged_codes_are_reserved() {
        let register = Register::from_rows([village("PK0101001", "002")]);
        let staging = Register::from_rows([village("PK0101001", "003")]);
        let mut allocator = Allocator::new(&register).with_snapshot(&staging);
        let uc = PCode::new(AdminLevel::Uc, "PK0101001");
        assert_eq!(allocator.next(&uc).unwrap().as_str(), "PK0101001004");
    }

    #[test]
    fn reference_districts_are_reserved() {
        let reference = ReferenceTables::builtin().with_district("Lahore", "PK709");
        let register = Register::new();
        let mut allocator = Allocator::new(&register).with_reference(&reference);
        assert_eq!(allocator.next(&PCode::province("7")).unwrap().as_str(), "PK710");
    }

    #[test]
    fn new_parents_nest() {
        let register = Register::new();
        let mut allocator = Allocator::new(&register);
        let district = allocator.next(&PCode::province("2")).unwrap();
        let tehsil = allocator.next(&district).unwrap();
        let uc = allocator.next(&tehsil).unwrap();
        let villages = allocator.take(&uc, 2).unwrap();
        assert_eq!(villages[1].as_str(), "PK20101001002");
    }

    #[test]
    fn batch_overflow_is_an_error() {
        let register = Register::from_rows([village("PK0101001", "998")]);
        let mut allocator = Allocator::new(&register);
        let uc = PCode::new(AdminLevel::Uc, "PK0101001");
        assert!(allocator.next(&uc).is_ok());
        assert!(matches!(allocator.next(&uc), Err(RegisterError::CodeSpaceExhausted { .. })));
    }
}
