mod admin;
mod batch;
mod import;
mod lifecycle;
mod merge;
mod synth;
mod view;
mod village;

pub use admin::{NewUnit, UnitPath};
pub use batch::{Batch, Destination};
pub use import::{ImportReport, ImportRow, RowSkipped, IMPORT_COLUMNS};
pub use lifecycle::{approve, deletion_remark, mark, reject, MarkReport, Transfer};
pub use merge::merge;
pub use synth::{build_row, Synthesizer};
pub use view::{duplicate_coordinates, group_by_district, Filter, EXPORT_COLUMNS};
pub use village::{split_list, VillageInput};

use crate::error::RegisterError;

/// An item a batch operation left out, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub item: String,
    pub reason: RegisterError,
}

impl Skipped {
    pub fn new(item: impl Into<String>, reason: RegisterError) -> Self {
        Self { item: item.into(), reason }
    }
}

impl std::fmt::Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item, self.reason)
    }
}
