use std::path::PathBuf;

use anyhow::Result;

use crate::{
    rng::{RngManager, StreamRng},
    snapshot::SnapshotWriter,
    world::{FleetSnapshot, World},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub demand_chance: f64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Run `ticks` steps, handing a fleet snapshot to `hook` after each one.
    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(FleetSnapshot),
    {
        for _ in 0..ticks {
            world.advance_time();
            let current_tick = world.tick();
            for system in &mut self.systems {
                let mut rng_stream = self.rng.stream(system.name());
                let ctx = SystemContext {
                    tick: current_tick,
                    now_secs: world.sim_time_secs(),
                    demand_chance: self.settings.demand_chance,
                };
                system.run(&ctx, world, &mut rng_stream)?;
            }
            self.snapshot_writer
                .maybe_write(world, &self.settings.scenario_name)?;
            hook(world.snapshot(&self.settings.scenario_name));
        }
        Ok(())
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }
}

pub struct SystemContext {
    pub tick: u64,
    pub now_secs: f64,
    pub demand_chance: f64,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut StreamRng<'_>,
    ) -> Result<()>;
}
