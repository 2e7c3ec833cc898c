use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::StreamRng,
    world::{DispatchEvent, RequestStatus, VehicleStatus, World},
};

/// Frees vehicles whose trip has finished and moves them to the drop-off.
pub struct TripCompletionSystem;

impl TripCompletionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TripCompletionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TripCompletionSystem {
    fn name(&self) -> &str {
        "trips"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut StreamRng<'_>,
    ) -> Result<()> {
        let mut finished = Vec::new();
        for vehicle in world.vehicles.iter_mut() {
            if vehicle.status == VehicleStatus::Idle || ctx.now_secs < vehicle.trip_ends_at {
                continue;
            }
            let request_id = vehicle.assigned_request.take();
            vehicle.status = VehicleStatus::Idle;
            if let Some(request) =
                request_id.and_then(|id| world.requests.iter_mut().find(|r| r.id == id))
            {
                vehicle.location = request.dropoff;
                request.status = RequestStatus::Completed;
                finished.push(DispatchEvent::Completed {
                    vehicle: vehicle.id,
                    request: request.id,
                    at: vehicle.location,
                });
            }
        }
        for event in finished {
            world.record(event);
        }
        Ok(())
    }
}
