use crate::alloc::Allocator;
use crate::error::{RegisterError, Result};
use crate::reference::ReferenceTables;
use crate::register::{AdminLevel, AdminUnit, Ancestry, PCode, Register, Status};

use super::synth::Synthesizer;

/// Where the rows of a submission are headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// Straight into the dataset, as `active` rows.
    #[default]
    Dataset,
    /// Into the staging collection, as `pending` rows awaiting approval.
    Staging,
}

impl Destination {
    pub fn status(&self) -> Status {
        match self {
            Destination::Dataset => Status::Active,
            Destination::Staging => Status::Pending,
        }
    }
}

/// One submission against a dataset snapshot.
///
/// A batch owns the code allocator and the ancestor index for the snapshot,
/// so every code it hands out is distinct from the snapshot, from staged
/// rows registered with [`Batch::with_staging`], and from every other code
/// of the same batch. Units created by the batch are indexed as they are
/// allocated and can be reused by later items.
///
/// Batches only produce rows; the caller merges them into the destination.
#[derive(Debug)]
pub struct Batch<'a> {
    pub(super) allocator: Allocator<'a>,
    pub(super) synth: Synthesizer,
    pub(super) reference: &'a ReferenceTables,
    pub(super) destination: Destination,
    pub(super) date: String,
}

impl<'a> Batch<'a> {
    pub fn new(dataset: &'a Register, reference: &'a ReferenceTables, date: &str) -> Self {
        Self {
            allocator: Allocator::new(dataset).with_reference(reference),
            synth: Synthesizer::new(dataset),
            reference,
            destination: Destination::Dataset,
            date: date.to_string(),
        }
    }

    /// Reserve the codes of staged rows and make their units known.
    pub fn with_staging(mut self, staging: &'a Register) -> Self {
        self.allocator = self.allocator.with_snapshot(staging);
        self.synth.index_mut().extend(staging);
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn destination(&self) -> Destination { self.destination }

    pub fn date(&self) -> &str { &self.date }

    /// Applies the lifecycle fields of a new row.
    pub(super) fn stamp(&self, row: &mut AdminUnit, remarks: String) {
        row.set_status(self.destination.status(), &self.date, remarks);
    }

    /// Province ancestry from the reference table.
    pub(super) fn province(&self, name: &str) -> Result<Ancestry> {
        let name = name.trim();
        let pcode = self.reference.province(name)
            .ok_or_else(|| RegisterError::UnknownProvince(name.to_string()))?;
        Ok(self.synth.index().get(&pcode).cloned().unwrap_or_else(|| Ancestry::province(name, &pcode)))
    }

    /// An existing child of `parent` called `name`: first from the rows,
    /// then, for districts, from the reference table.
    pub(super) fn existing_child(&mut self, parent: &Ancestry, level: AdminLevel, name: &str) -> Option<Ancestry> {
        let parent_code = parent.pcode();
        if let Some(code) = self.synth.index().lookup(level, parent_code.as_str(), name) {
            return self.synth.index().get(code).cloned();
        }
        if level != AdminLevel::District {
            return None;
        }
        let code = self.reference.district(name)
            .filter(|code| code.to_parent(AdminLevel::Province).as_ref() == Some(&parent_code))?;
        let ancestry = parent.with_child(name, &code).ok()?;
        self.synth.index_mut().insert(ancestry.clone());
        Some(ancestry)
    }

    /// Allocates a fresh child unit of `parent` called `name` and indexes it.
    pub(super) fn create_child(&mut self, parent: &Ancestry, name: &str) -> Result<Ancestry> {
        let code = self.allocator.next(&parent.pcode())?;
        let ancestry = parent.with_child(name, &code)?;
        self.synth.index_mut().insert(ancestry.clone());
        tracing::info!(level = %code.level, %code, name, "created unit");
        Ok(ancestry)
    }

    /// Existing child of `parent` called `name`, or a new one.
    pub(super) fn resolve_child(&mut self, parent: &Ancestry, level: AdminLevel, name: &str) -> Result<Ancestry> {
        match self.existing_child(parent, level, name) {
            Some(ancestry) => Ok(ancestry),
            None => self.create_child(parent, name),
        }
    }

    /// Allocates `count` village codes under the UC `uc`.
    pub(super) fn village_codes(&mut self, uc: &Ancestry, count: usize) -> Result<Vec<PCode>> {
        self.allocator.take(&uc.pcode(), count)
    }
}
