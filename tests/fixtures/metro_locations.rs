//! Real Denver-metro locations for realistic test fixtures.
//!
//! Coordinates approximate well-known sites across Denver, Aurora,
//! Lakewood, and the south suburbs; spread out enough that travel time
//! matters to the plan.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Central Denver (good depot / start locations)
// ============================================================================

pub const CENTRAL: &[Location] = &[
    Location::new("Union Station", 39.7529, -105.0000),
    Location::new("Capitol Hill", 39.7312, -104.9826),
    Location::new("Denver Tech Center", 39.6478, -104.8949),
    Location::new("City Park", 39.7470, -104.9503),
    Location::new("Cherry Creek Mall", 39.7175, -104.9535),
];

// ============================================================================
// Aurora / East Metro
// ============================================================================

pub const EAST: &[Location] = &[
    Location::new("Aurora Town Center", 39.7090, -104.8253),
    Location::new("Anschutz Medical Campus", 39.7450, -104.8389),
    Location::new("Stanley Marketplace", 39.7547, -104.8655),
    Location::new("Buckley Area", 39.7017, -104.7518),
    Location::new("Southlands", 39.5954, -104.7130),
];

// ============================================================================
// Lakewood / West Metro
// ============================================================================

pub const WEST: &[Location] = &[
    Location::new("Belmar", 39.7085, -105.0772),
    Location::new("Colorado Mills", 39.7324, -105.1598),
    Location::new("Green Mountain", 39.6986, -105.1383),
    Location::new("Edgewater", 39.7531, -105.0652),
    Location::new("Federal Center", 39.7131, -105.1167),
];

// ============================================================================
// South Suburbs
// ============================================================================

pub const SOUTH: &[Location] = &[
    Location::new("Littleton Downtown", 39.6133, -105.0166),
    Location::new("Highlands Ranch Town Center", 39.5542, -104.9689),
    Location::new("Park Meadows", 39.5635, -104.8745),
    Location::new("Englewood CityCenter", 39.6537, -104.9991),
    Location::new("Centennial Airport Area", 39.5701, -104.8493),
];

// ============================================================================
// North Metro
// ============================================================================

pub const NORTH: &[Location] = &[
    Location::new("Westminster Promenade", 39.8822, -105.0637),
    Location::new("Northglenn Marketplace", 39.9025, -104.9811),
    Location::new("Thornton Town Center", 39.8680, -104.9719),
    Location::new("Commerce City", 39.8083, -104.9339),
];

/// Returns all locations as a single list.
pub fn all_locations() -> Vec<Location> {
    let mut all = Vec::with_capacity(24);
    all.extend_from_slice(CENTRAL);
    all.extend_from_slice(EAST);
    all.extend_from_slice(WEST);
    all.extend_from_slice(SOUTH);
    all.extend_from_slice(NORTH);
    all
}

/// Locations spread across the metro area (good for multi-route tests).
pub fn geographically_diverse_locations() -> Vec<Location> {
    vec![
        Location::new("Union Station", 39.7529, -105.0000),
        Location::new("Denver Tech Center", 39.6478, -104.8949),
        Location::new("Aurora Town Center", 39.7090, -104.8253),
        Location::new("Southlands", 39.5954, -104.7130),
        Location::new("Belmar", 39.7085, -105.0772),
        Location::new("Colorado Mills", 39.7324, -105.1598),
        Location::new("Littleton Downtown", 39.6133, -105.0166),
        Location::new("Highlands Ranch Town Center", 39.5542, -104.9689),
        Location::new("Westminster Promenade", 39.8822, -105.0637),
        Location::new("Thornton Town Center", 39.8680, -104.9719),
        Location::new("Stanley Marketplace", 39.7547, -104.8655),
        Location::new("Park Meadows", 39.5635, -104.8745),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_denver_area() {
        for loc in all_locations() {
            assert!(loc.lat > 39.4 && loc.lat < 40.0, "{} lat out of range: {}", loc.name, loc.lat);
            assert!(loc.lng > -105.3 && loc.lng < -104.6, "{} lng out of range: {}", loc.name, loc.lng);
        }
    }
}
