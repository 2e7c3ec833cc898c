use rand::Rng;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const BASE_SPEED_KMH: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Location, b: Location) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Mocked door-to-door travel time in seconds. Weather slows traffic by up to
/// 1.5x and congestion by up to 2x, both drawn fresh on every call.
pub fn travel_time_secs<R: Rng + ?Sized>(from: Location, to: Location, rng: &mut R) -> f64 {
    let weather_multiplier: f64 = rng.gen_range(1.0..=1.5);
    let traffic_multiplier: f64 = rng.gen_range(1.0..=2.0);
    let speed_kmh = BASE_SPEED_KMH / (weather_multiplier * traffic_multiplier);
    haversine_km(from, to) / speed_kmh * 3_600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(Location::new(0.0, 0.0), Location::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn travel_time_stays_within_multiplier_band() {
        let from = Location::new(37.70, -122.50);
        let to = Location::new(37.80, -122.38);
        let free_flow = haversine_km(from, to) / BASE_SPEED_KMH * 3_600.0;
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        for _ in 0..200 {
            let t = travel_time_secs(from, to, &mut rng);
            assert!(t >= free_flow - 1e-9 && t <= free_flow * 3.0 + 1e-9);
        }
    }
}
