use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::Location;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for CityBounds {
    fn default() -> Self {
        Self {
            min_lat: 37.70,
            max_lat: 37.80,
            min_lon: -122.50,
            max_lon: -122.38,
        }
    }
}

impl CityBounds {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.min_lat < self.max_lat && self.min_lon < self.max_lon,
            "city bounds must have min < max on both axes"
        );
        Ok(())
    }

    pub fn random_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Location {
        Location::new(
            rng.gen_range(self.min_lat..=self.max_lat),
            rng.gen_range(self.min_lon..=self.max_lon),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Idle,
    EnRouteToPickup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetVehicle {
    pub id: u32,
    pub location: Location,
    pub status: VehicleStatus,
    pub assigned_request: Option<u64>,
    /// Simulation time, in seconds, at which the current trip finishes.
    pub trip_ends_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Unassigned,
    Assigned,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: u64,
    pub pickup: Location,
    pub dropoff: Location,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchEvent {
    Demand {
        request: u64,
        pickup: Location,
        dropoff: Location,
    },
    Assigned {
        vehicle: u32,
        request: u64,
        pickup_secs: f64,
        trip_secs: f64,
    },
    Completed {
        vehicle: u32,
        request: u64,
        at: Location,
    },
    NoVehicle {
        request: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub at_secs: f64,
    pub event: DispatchEvent,
}

fn fmt_loc(loc: &Location) -> String {
    format!("({:.4}, {:.4})", loc.lat, loc.lon)
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[T={}s] ", self.at_secs as u64)?;
        match &self.event {
            DispatchEvent::Demand {
                request,
                pickup,
                dropoff,
            } => write!(
                f,
                "New Demand (ID {request}) from {} to {}",
                fmt_loc(pickup),
                fmt_loc(dropoff)
            ),
            DispatchEvent::Assigned {
                vehicle,
                request,
                pickup_secs,
                trip_secs,
            } => write!(
                f,
                "Vehicle {vehicle} ASSIGNED to Request {request}. ETA to pickup: {}s. Total trip: {}s.",
                *pickup_secs as u64, *trip_secs as u64
            ),
            DispatchEvent::Completed {
                vehicle,
                request,
                at,
            } => write!(
                f,
                "Vehicle {vehicle} COMPLETED trip for Request {request}. Now idle at {}.",
                fmt_loc(at)
            ),
            DispatchEvent::NoVehicle { request } => {
                write!(f, "Request {request} has no available vehicles.")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub sim_time_secs: f64,
    pub idle_vehicles: usize,
    pub open_requests: usize,
    pub completed_requests: usize,
    pub vehicles: Vec<FleetVehicle>,
}

pub struct World {
    tick: u64,
    sim_time_secs: f64,
    time_step_secs: f64,
    bounds: CityBounds,
    next_request: u64,
    pub(crate) vehicles: Vec<FleetVehicle>,
    pub(crate) requests: Vec<RideRequest>,
    pub(crate) log: Vec<LogEntry>,
}

impl World {
    pub fn new(time_step_secs: f64, bounds: CityBounds) -> Self {
        Self {
            tick: 0,
            sim_time_secs: 0.0,
            time_step_secs,
            bounds,
            next_request: 0,
            vehicles: Vec::new(),
            requests: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Place `count` idle vehicles at random points inside the city.
    pub fn with_random_fleet<R: Rng + ?Sized>(mut self, count: usize, rng: &mut R) -> Self {
        for id in 0..count {
            let location = self.bounds.random_location(rng);
            self.spawn_vehicle(id as u32, location);
        }
        self
    }

    pub fn spawn_vehicle(&mut self, id: u32, location: Location) {
        self.vehicles.push(FleetVehicle {
            id,
            location,
            status: VehicleStatus::Idle,
            assigned_request: None,
            trip_ends_at: 0.0,
        });
    }

    pub fn open_request(&mut self, pickup: Location, dropoff: Location) -> u64 {
        self.next_request += 1;
        let id = self.next_request;
        self.requests.push(RideRequest {
            id,
            pickup,
            dropoff,
            status: RequestStatus::Unassigned,
        });
        self.record(DispatchEvent::Demand {
            request: id,
            pickup,
            dropoff,
        });
        id
    }

    pub fn record(&mut self, event: DispatchEvent) {
        let entry = LogEntry {
            at_secs: self.sim_time_secs,
            event,
        };
        log::debug!("{entry}");
        self.log.push(entry);
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn sim_time_secs(&self) -> f64 {
        self.sim_time_secs
    }

    pub fn bounds(&self) -> &CityBounds {
        &self.bounds
    }

    /// Start a new step: the clock moves before any system runs.
    pub fn advance_time(&mut self) {
        self.tick += 1;
        self.sim_time_secs += self.time_step_secs;
    }

    pub fn vehicles(&self) -> &[FleetVehicle] {
        &self.vehicles
    }

    pub fn requests(&self) -> &[RideRequest] {
        &self.requests
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn request(&self, id: u64) -> Option<&RideRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn snapshot(&self, scenario: &str) -> FleetSnapshot {
        let count = |status: RequestStatus| self.requests.iter().filter(|r| r.status == status).count();
        FleetSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            sim_time_secs: self.sim_time_secs,
            idle_vehicles: self
                .vehicles
                .iter()
                .filter(|v| v.status == VehicleStatus::Idle)
                .count(),
            open_requests: count(RequestStatus::Unassigned) + count(RequestStatus::Assigned),
            completed_requests: count(RequestStatus::Completed),
            vehicles: self.vehicles.clone(),
        }
    }
}
