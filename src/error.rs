use thiserror::Error;

use crate::register::{AdminLevel, Status};

/// Errors raised by the allocation engine and the register workflows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// A column needed by the operation is not part of the table.
    #[error("column '{column}' not found in dataset")]
    Schema { column: String },

    /// A referenced parent unit has no row in the dataset.
    #[error("{level} '{code}' not found in dataset")]
    ScopeNotFound { level: AdminLevel, code: String },

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    /// Only one of latitude/longitude was supplied.
    #[error("latitude and longitude must be supplied together")]
    IncompleteCoordinates,

    /// A deletion or approval target is not in the collection.
    #[error("code '{code}' not found")]
    NotFound { code: String },

    /// A code is already taken by another row.
    #[error("code '{code}' already exists")]
    DuplicateCode { code: String },

    /// The next code would no longer fit the level's fixed width.
    #[error("no {level} codes left under '{scope}'")]
    CodeSpaceExhausted { level: AdminLevel, scope: String },

    #[error("cannot move '{code}' from {from} to {to}")]
    InvalidTransition { code: String, from: Status, to: Status },

    #[error("province '{0}' not found in reference table")]
    UnknownProvince(String),

    #[error("district '{0}' not found")]
    UnknownDistrict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Coordinate validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("'{0}' is not a valid coordinate")]
    Parse(String),

    #[error("coordinates ({latitude}, {longitude}) outside bounds: latitude must be 23-37 and longitude 60-77")]
    OutOfBounds { latitude: f64, longitude: f64 },

    #[error("coordinates must have at least {required} digits after the decimal point")]
    Precision { required: usize },
}

pub type Result<T, E = RegisterError> = std::result::Result<T, E>;
