use std::sync::OnceLock;

use geo::Point;
use regex::Regex;

use super::bbox::{contains, pakistan_bounds};
use crate::error::{CoordinateError, RegisterError};

/// Minimum number of digits after the decimal point for new coordinates.
pub const MIN_DECIMALS: usize = 6;

fn stray_characters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d.\-]+").expect("static pattern"))
}

/// Drops everything except digits, `.` and `-` (spreadsheet quotes, degree
/// signs, thousands separators, ...).
pub fn strip_coordinate(raw: &str) -> String {
    stray_characters().replace_all(raw.trim(), "").into_owned()
}

/// Lenient parse used when loading existing tables: unparseable -> `None`.
pub fn clean_coordinate(raw: &str) -> Option<f64> {
    strip_coordinate(raw).parse::<f64>().ok().filter(|v| v.is_finite())
}

fn decimals(cleaned: &str) -> usize {
    cleaned.split_once('.').map_or(0, |(_, frac)| frac.len())
}

/// Validates a (latitude, longitude) pair for a new village.
///
/// Both values must parse, fall inside the Pakistan bounding box and carry
/// at least [`MIN_DECIMALS`] digits after the decimal point.
pub fn validate(lat: &str, lon: &str) -> Result<(f64, f64), CoordinateError> {
    let (lat_clean, lon_clean) = (strip_coordinate(lat), strip_coordinate(lon));

    let parse = |cleaned: &str, raw: &str| {
        cleaned.parse::<f64>().ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CoordinateError::Parse(raw.trim().to_string()))
    };
    let latitude = parse(&lat_clean, lat)?;
    let longitude = parse(&lon_clean, lon)?;

    if !contains(&pakistan_bounds(), Point::new(longitude, latitude)) {
        return Err(CoordinateError::OutOfBounds { latitude, longitude });
    }
    if decimals(&lat_clean) < MIN_DECIMALS || decimals(&lon_clean) < MIN_DECIMALS {
        return Err(CoordinateError::Precision { required: MIN_DECIMALS });
    }
    Ok((latitude, longitude))
}

/// Caller-side handling of optional coordinates: both blank means "not yet
/// known", exactly one blank is an incomplete submission.
pub fn validate_optional(lat: &str, lon: &str) -> Result<Option<(f64, f64)>, RegisterError> {
    match (lat.trim().is_empty(), lon.trim().is_empty()) {
        (true, true) => Ok(None),
        (false, false) => Ok(Some(validate(lat, lon)?)),
        _ => Err(RegisterError::IncompleteCoordinates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_precise_coordinates() {
        assert_eq!(validate("30.123456", "70.123456"), Ok((30.123456, 70.123456)));
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(matches!(
            validate("22.9", "70.123456"),
            Err(CoordinateError::OutOfBounds { .. })
        ));
        assert!(matches!(
            validate("30.123456", "77.500000"),
            Err(CoordinateError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_imprecise() {
        assert_eq!(validate("30.12", "70.123456"), Err(CoordinateError::Precision { required: 6 }));
        assert_eq!(validate("30", "70.123456"), Err(CoordinateError::Precision { required: 6 }));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(validate("abc", "70.123456"), Err(CoordinateError::Parse("abc".into())));
        assert!(matches!(validate("30.123456", "1.2.3"), Err(CoordinateError::Parse(_))));
    }

    #[test]
    fn strips_spreadsheet_artifacts() {
        assert_eq!(validate("'30.123456", "70.123456°"), Ok((30.123456, 70.123456)));
        assert_eq!(clean_coordinate(" 30.5\u{a0}"), Some(30.5));
        assert_eq!(clean_coordinate(""), None);
    }

    #[test]
    fn optional_pairs() {
        assert_eq!(validate_optional("", " "), Ok(None));
        assert_eq!(validate_optional("30.123456", ""), Err(RegisterError::IncompleteCoordinates));
        assert_eq!(validate_optional("30.123456", "70.123456"), Ok(Some((30.123456, 70.123456))));
        assert!(matches!(validate_optional("30.1", "70.1"), Err(RegisterError::Coordinate(_))));
    }
}
