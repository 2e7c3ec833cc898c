use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::{
    engine::{Engine, EngineBuilder, EngineSettings},
    rng::RngManager,
    scenario::Scenario,
    systems::{AssignmentSystem, DemandSystem, TripCompletionSystem},
    world::{FleetVehicle, LogEntry, RequestStatus, World},
};

/// Knobs a caller may override on top of the scenario's dispatch section.
#[derive(Debug, Clone, Default)]
pub struct DispatchOverrides {
    pub ticks: Option<u64>,
    pub snapshot_interval_ticks: Option<u64>,
    pub snapshot_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub scenario: String,
    pub ticks: u64,
    pub sim_time_secs: f64,
    pub requests_opened: usize,
    pub requests_completed: usize,
    pub simulation_log: Vec<String>,
    pub events: Vec<LogEntry>,
    pub final_vehicle_states: Vec<FleetVehicle>,
}

impl DispatchReport {
    fn from_world(scenario: &str, world: &World) -> Self {
        Self {
            scenario: scenario.to_string(),
            ticks: world.tick(),
            sim_time_secs: world.sim_time_secs(),
            requests_opened: world.requests().len(),
            requests_completed: world
                .requests()
                .iter()
                .filter(|r| r.status == RequestStatus::Completed)
                .count(),
            simulation_log: world.log().iter().map(ToString::to_string).collect(),
            events: world.log().to_vec(),
            final_vehicle_states: world.vehicles().to_vec(),
        }
    }
}

/// Fleet placed at random inside the scenario's city bounds.
pub fn build_world(scenario: &Scenario) -> World {
    let mut rng = RngManager::new(scenario.seed);
    let mut placement = rng.stream("fleet-placement");
    World::new(
        scenario.dispatch.time_step_secs,
        scenario.dispatch.city_bounds,
    )
    .with_random_fleet(scenario.dispatch.vehicles, &mut placement)
}

pub fn build_engine(scenario: &Scenario, overrides: &DispatchOverrides) -> Engine {
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        demand_chance: scenario.dispatch.demand_chance,
        snapshot_interval_ticks: overrides
            .snapshot_interval_ticks
            .unwrap_or(scenario.dispatch.snapshot_interval_ticks),
        snapshot_dir: overrides
            .snapshot_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("snapshots")),
    };
    EngineBuilder::new(settings)
        .with_system(TripCompletionSystem::new())
        .with_system(DemandSystem::new())
        .with_system(AssignmentSystem::new())
        .build()
}

pub fn run(scenario: &Scenario, overrides: &DispatchOverrides) -> Result<DispatchReport> {
    let ticks = overrides.ticks.unwrap_or(scenario.dispatch.ticks);
    let mut world = build_world(scenario);
    let mut engine = build_engine(scenario, overrides);
    engine.run(&mut world, ticks)?;
    let report = DispatchReport::from_world(engine.scenario_name(), &world);
    log::info!(
        "dispatch '{}' finished: {} ticks, {} requests opened, {} completed",
        report.scenario,
        report.ticks,
        report.requests_opened,
        report.requests_completed
    );
    Ok(report)
}
