//! Geographic primitives shared by quests and note snapshots.
//!
//! # Responsibility
//! - Define the coordinate pair carried by quest markers and notes.
//! - Provide bounding-box containment for spatial quest queries.
//!
//! # Invariants
//! - A valid latitude lies in [-90, 90], a valid longitude in [-180, 180].
//! - A box with `min.longitude > max.longitude` crosses the antimeridian
//!   and matches the longitude ranges on either side of it.
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    /// Creates a coordinate pair. Ranges are checked by `is_valid`, not here.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns whether both components lie in their legal ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Closed geographic rectangle, possibly crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: LatLon,
    pub max: LatLon,
}

impl BoundingBox {
    pub fn new(min: LatLon, max: LatLon) -> Self {
        Self { min, max }
    }

    /// Returns whether this box wraps around the 180th meridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min.longitude > self.max.longitude
    }

    /// Returns whether `pos` lies inside this box, borders included.
    pub fn contains(&self, pos: &LatLon) -> bool {
        if pos.latitude < self.min.latitude || pos.latitude > self.max.latitude {
            return false;
        }
        if self.crosses_antimeridian() {
            pos.longitude >= self.min.longitude || pos.longitude <= self.max.longitude
        } else {
            pos.longitude >= self.min.longitude && pos.longitude <= self.max.longitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, LatLon};

    #[test]
    fn latlon_validity_covers_legal_ranges() {
        assert!(LatLon::new(0.0, 0.0).is_valid());
        assert!(LatLon::new(-90.0, 180.0).is_valid());
        assert!(!LatLon::new(90.5, 0.0).is_valid());
        assert!(!LatLon::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn bounding_box_contains_checks_both_axes() {
        let bounds = BoundingBox::new(LatLon::new(45.0, -5.0), LatLon::new(55.0, 5.0));

        assert!(bounds.contains(&LatLon::new(51.5, -0.1)));
        assert!(bounds.contains(&LatLon::new(45.0, 5.0)));
        assert!(!bounds.contains(&LatLon::new(44.9, 0.0)));
        assert!(!bounds.contains(&LatLon::new(50.0, 5.1)));
    }

    #[test]
    fn bounding_box_crossing_antimeridian_matches_both_sides() {
        let bounds = BoundingBox::new(LatLon::new(-10.0, 170.0), LatLon::new(10.0, -170.0));

        assert!(bounds.crosses_antimeridian());
        assert!(bounds.contains(&LatLon::new(0.0, 179.5)));
        assert!(bounds.contains(&LatLon::new(0.0, -179.5)));
        assert!(!bounds.contains(&LatLon::new(0.0, 0.0)));
    }
}
