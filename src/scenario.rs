use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::feed::FeedSettings;
use crate::stats::LiveStats;
use crate::weather::Weather;
use crate::world::CityBounds;

fn default_name() -> String {
    "chennai".to_string()
}

fn default_title() -> String {
    "Fleetiq - AI-driven Fleet Optimization".to_string()
}

fn default_description() -> String {
    "AI-powered platform that transforms fleet management with real-time optimization".to_string()
}

fn default_seed() -> u64 {
    2024
}

fn default_tick_interval_ms() -> u64 {
    5_000
}

fn default_vehicles() -> usize {
    10
}

fn default_dispatch_ticks() -> u64 {
    100
}

fn default_time_step_secs() -> f64 {
    30.0
}

fn default_demand_chance() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub initial: LiveStats,
    #[serde(default)]
    pub initial_weather: Weather,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            initial: LiveStats::default(),
            initial_weather: Weather::default(),
        }
    }
}

impl FeedConfig {
    pub fn settings(&self) -> FeedSettings {
        FeedSettings {
            period: Duration::from_millis(self.tick_interval_ms.max(1)),
            initial: self.initial,
            initial_weather: self.initial_weather,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_vehicles")]
    pub vehicles: usize,
    #[serde(default = "default_dispatch_ticks")]
    pub ticks: u64,
    #[serde(default = "default_time_step_secs")]
    pub time_step_secs: f64,
    #[serde(default = "default_demand_chance")]
    pub demand_chance: f64,
    #[serde(default)]
    pub city_bounds: CityBounds,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            vehicles: default_vehicles(),
            ticks: default_dispatch_ticks(),
            time_step_secs: default_time_step_secs(),
            demand_chance: default_demand_chance(),
            city_bounds: CityBounds::default(),
            snapshot_interval_ticks: 0,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            title: default_title(),
            description: default_description(),
            seed: default_seed(),
            feed: FeedConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.dispatch.demand_chance),
            "dispatch.demand_chance must be within [0, 1], got {}",
            self.dispatch.demand_chance
        );
        anyhow::ensure!(
            self.dispatch.time_step_secs > 0.0,
            "dispatch.time_step_secs must be positive"
        );
        self.dispatch.city_bounds.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let scenario: Scenario = serde_yaml::from_str("{}").unwrap();
        assert_eq!(scenario.name, "chennai");
        assert_eq!(scenario.feed.tick_interval_ms, 5_000);
        assert_eq!(scenario.feed.initial.total_calls, 247);
        assert_eq!(scenario.dispatch.vehicles, 10);
        scenario.validate().unwrap();
    }

    #[test]
    fn partial_initial_stats_fill_from_defaults() {
        let scenario: Scenario =
            serde_yaml::from_str("feed:\n  initial:\n    active_units: 9\n").unwrap();
        assert_eq!(scenario.feed.initial.active_units, 9);
        assert_eq!(scenario.feed.initial.weather_impact, 15);
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let scenario: Scenario =
            serde_yaml::from_str("dispatch:\n  demand_chance: 1.5\n").unwrap();
        assert!(scenario.validate().is_err());
    }
}
