use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, SystemContext},
    rng::StreamRng,
    world::World,
};

/// Opens at most one ride request per step, with the scenario's probability.
pub struct DemandSystem;

impl DemandSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemandSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DemandSystem {
    fn name(&self) -> &str {
        "demand"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut StreamRng<'_>,
    ) -> Result<()> {
        if rng.gen::<f64>() < ctx.demand_chance {
            let bounds = *world.bounds();
            let pickup = bounds.random_location(rng);
            let dropoff = bounds.random_location(rng);
            world.open_request(pickup, dropoff);
        }
        Ok(())
    }
}
