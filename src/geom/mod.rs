mod bbox;
mod coords;

pub use bbox::{contains, pakistan_bounds, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
pub use coords::{clean_coordinate, strip_coordinate, validate, validate_optional, MIN_DECIMALS};
