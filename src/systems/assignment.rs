use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    geo,
    rng::StreamRng,
    world::{DispatchEvent, RequestStatus, VehicleStatus, World},
};

/// Greedy allocation: each unassigned request, oldest first, takes the idle
/// vehicle with the shortest mocked pickup time.
pub struct AssignmentSystem;

impl AssignmentSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssignmentSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AssignmentSystem {
    fn name(&self) -> &str {
        "assignment"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut StreamRng<'_>,
    ) -> Result<()> {
        let mut idle: Vec<usize> = world
            .vehicles
            .iter()
            .enumerate()
            .filter(|(_, v)| v.status == VehicleStatus::Idle)
            .map(|(index, _)| index)
            .collect();

        let mut events = Vec::new();
        for request in world
            .requests
            .iter_mut()
            .filter(|r| r.status == RequestStatus::Unassigned)
        {
            if idle.is_empty() {
                log::warn!(
                    "tick={} dispatch: request {} has no available vehicles",
                    ctx.tick,
                    request.id
                );
                events.push(DispatchEvent::NoVehicle {
                    request: request.id,
                });
                break;
            }

            let mut best: Option<(usize, f64)> = None;
            for (slot, &index) in idle.iter().enumerate() {
                let pickup_secs =
                    geo::travel_time_secs(world.vehicles[index].location, request.pickup, rng);
                if best.map_or(true, |(_, fastest)| pickup_secs < fastest) {
                    best = Some((slot, pickup_secs));
                }
            }

            if let Some((slot, pickup_secs)) = best {
                let index = idle.remove(slot);
                let ride_secs = geo::travel_time_secs(request.pickup, request.dropoff, rng);
                let trip_secs = pickup_secs + ride_secs;
                let vehicle = &mut world.vehicles[index];
                vehicle.status = VehicleStatus::EnRouteToPickup;
                vehicle.assigned_request = Some(request.id);
                vehicle.trip_ends_at = ctx.now_secs + trip_secs;
                request.status = RequestStatus::Assigned;
                events.push(DispatchEvent::Assigned {
                    vehicle: vehicle.id,
                    request: request.id,
                    pickup_secs,
                    trip_secs,
                });
            }
        }

        for event in events {
            world.record(event);
        }
        Ok(())
    }
}
