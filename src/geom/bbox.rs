use geo::{coord, Point, Rect};

/// Latitude range accepted for new villages.
pub const MIN_LATITUDE: f64 = 23.0;
pub const MAX_LATITUDE: f64 = 37.0;

/// Longitude range accepted for new villages.
pub const MIN_LONGITUDE: f64 = 60.0;
pub const MAX_LONGITUDE: f64 = 77.0;

/// Approximate bounding box of Pakistan (x = longitude, y = latitude).
pub fn pakistan_bounds() -> Rect<f64> {
    Rect::new(
        coord! { x: MIN_LONGITUDE, y: MIN_LATITUDE },
        coord! { x: MAX_LONGITUDE, y: MAX_LATITUDE },
    )
}

/// Inclusive containment test; points on the boundary are inside.
pub fn contains(bbox: &Rect<f64>, point: Point<f64>) -> bool {
    let (min, max) = (bbox.min(), bbox.max());
    (min.x..=max.x).contains(&point.x()) && (min.y..=max.y).contains(&point.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_inclusive() {
        let bbox = pakistan_bounds();
        assert!(contains(&bbox, Point::new(60.0, 23.0)));
        assert!(contains(&bbox, Point::new(77.0, 37.0)));
        assert!(contains(&bbox, Point::new(70.1, 30.1)));
        assert!(!contains(&bbox, Point::new(70.1, 22.9)));
        assert!(!contains(&bbox, Point::new(77.01, 30.0)));
    }
}
