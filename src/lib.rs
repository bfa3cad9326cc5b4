#![doc = "Hierarchical P-code register for Pakistan's administrative units"]
mod alloc;
mod config;
mod error;
mod geom;
mod io;
mod ops;
mod reference;
mod register;

#[doc(inline)]
pub use register::{
    normalize_header, pad_code, AdminLevel, AdminUnit, AncestorIndex, Ancestry, Column, PCode, Register, Status,
    COUNTRY_PREFIX,
};

#[doc(inline)]
pub use error::{CoordinateError, RegisterError, Result};

#[doc(inline)]
pub use alloc::{max_in_scope, next_child, next_code, Allocator};

#[doc(inline)]
pub use geom::{
    clean_coordinate, pakistan_bounds, strip_coordinate, validate, validate_optional, MAX_LATITUDE, MAX_LONGITUDE,
    MIN_DECIMALS, MIN_LATITUDE, MIN_LONGITUDE,
};

#[doc(inline)]
pub use ops::{
    approve, build_row, deletion_remark, duplicate_coordinates, group_by_district, mark, merge, reject, split_list,
    Batch, Destination, Filter, ImportReport, ImportRow, MarkReport, NewUnit, RowSkipped, Skipped, Synthesizer,
    Transfer, UnitPath, VillageInput, EXPORT_COLUMNS, IMPORT_COLUMNS,
};

#[doc(inline)]
pub use io::{export_by_district, read_import_sheet, write_table, CsvStore, MemStore, TableSink, TableSource};

#[doc(inline)]
pub use reference::ReferenceTables;

#[doc(inline)]
pub use config::{AdminIdentity, RegisterConfig, ADMIN_PASSWORD_VAR, ADMIN_USERNAME_VAR};
