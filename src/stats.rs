use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::weather::Weather;

pub const MIN_AVG_RESPONSE_MINUTES: f64 = 3.0;
pub const ACTIVE_UNITS_RANGE: (u32, u32) = (8, 15);
pub const WEATHER_IMPACT_RANGE: (u32, u32) = (0, 30);

/// Drifting counters shown on the emergency dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveStats {
    pub total_calls: u64,
    pub avg_response_time: f64,
    pub active_units: u32,
    pub weather_impact: u32,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            total_calls: 247,
            avg_response_time: 4.2,
            active_units: 12,
            weather_impact: 15,
        }
    }
}

impl LiveStats {
    /// Bounded random walk applied once per tick.
    pub fn next<R: Rng + ?Sized>(&self, rng: &mut R) -> LiveStats {
        let calls_delta: u64 = rng.gen_range(0..=2);
        let response_delta: f64 = rng.gen_range(-0.2..0.2);
        let units_delta: i64 = rng.gen_range(-1..=1);
        let impact_delta: i64 = rng.gen_range(-3..=2);

        LiveStats {
            total_calls: self.total_calls.saturating_add(calls_delta),
            avg_response_time: (self.avg_response_time + response_delta)
                .max(MIN_AVG_RESPONSE_MINUTES),
            active_units: step_clamped(self.active_units, units_delta, ACTIVE_UNITS_RANGE),
            weather_impact: step_clamped(self.weather_impact, impact_delta, WEATHER_IMPACT_RANGE),
        }
    }

    /// Pulls every field back into its valid range.
    pub fn clamped(self) -> LiveStats {
        LiveStats {
            avg_response_time: self.avg_response_time.max(MIN_AVG_RESPONSE_MINUTES),
            active_units: step_clamped(self.active_units, 0, ACTIVE_UNITS_RANGE),
            weather_impact: step_clamped(self.weather_impact, 0, WEATHER_IMPACT_RANGE),
            ..self
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        self.avg_response_time >= MIN_AVG_RESPONSE_MINUTES
            && (ACTIVE_UNITS_RANGE.0..=ACTIVE_UNITS_RANGE.1).contains(&self.active_units)
            && (WEATHER_IMPACT_RANGE.0..=WEATHER_IMPACT_RANGE.1).contains(&self.weather_impact)
    }
}

fn step_clamped(value: u32, delta: i64, (min, max): (u32, u32)) -> u32 {
    (i64::from(value) + delta).clamp(i64::from(min), i64::from(max)) as u32
}

/// Owns the live counters and weather for one view session and advances them
/// with an injected random source.
pub struct MetricsSimulator<R> {
    stats: LiveStats,
    weather: Weather,
    ticks: u64,
    rng: R,
}

impl<R: Rng> MetricsSimulator<R> {
    pub fn new(initial: LiveStats, weather: Weather, rng: R) -> Self {
        Self {
            stats: initial.clamped(),
            weather,
            ticks: 0,
            rng,
        }
    }

    pub fn advance(&mut self) -> (LiveStats, Weather) {
        self.stats = self.stats.next(&mut self.rng);
        self.weather = self.weather.drift(&mut self.rng);
        self.ticks += 1;
        (self.stats, self.weather)
    }

    pub fn stats(&self) -> LiveStats {
        self.stats
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn out_of_range_start_is_clamped() {
        let sim = MetricsSimulator::new(
            LiveStats {
                total_calls: 0,
                avg_response_time: 1.0,
                active_units: 40,
                weather_impact: 99,
            },
            Weather::Fog,
            ChaCha8Rng::seed_from_u64(1),
        );
        let stats = sim.stats();
        assert_eq!(stats.active_units, 15);
        assert_eq!(stats.weather_impact, 30);
        assert_eq!(stats.avg_response_time, MIN_AVG_RESPONSE_MINUTES);
    }

    #[test]
    fn active_units_move_by_at_most_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut stats = LiveStats::default();
        for _ in 0..500 {
            let next = stats.next(&mut rng);
            assert!(next.active_units.abs_diff(stats.active_units) <= 1);
            assert!(next.total_calls - stats.total_calls <= 2);
            stats = next;
        }
    }

    #[test]
    fn simulator_counts_ticks() {
        let mut sim = MetricsSimulator::new(
            LiveStats::default(),
            Weather::Clear,
            ChaCha8Rng::seed_from_u64(11),
        );
        sim.advance();
        sim.advance();
        assert_eq!(sim.ticks(), 2);
    }
}
