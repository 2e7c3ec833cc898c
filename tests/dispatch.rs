use std::collections::HashSet;

use fleetiq::{
    dispatch::{self, DispatchOverrides},
    world::{DispatchEvent, RequestStatus, VehicleStatus},
    Scenario,
};
use tempfile::tempdir;

fn overrides(ticks: u64) -> DispatchOverrides {
    DispatchOverrides {
        ticks: Some(ticks),
        ..DispatchOverrides::default()
    }
}

#[test]
fn same_seed_gives_the_same_log() {
    let scenario = Scenario::default();
    let first = dispatch::run(&scenario, &overrides(60)).unwrap();
    let second = dispatch::run(&scenario, &overrides(60)).unwrap();
    assert_eq!(first.simulation_log, second.simulation_log);
    assert_eq!(first.final_vehicle_states, second.final_vehicle_states);
}

#[test]
fn different_seeds_diverge() {
    let scenario = Scenario::default();
    let other = Scenario {
        seed: 7,
        ..Scenario::default()
    };
    let a = dispatch::run(&scenario, &overrides(60)).unwrap();
    let b = dispatch::run(&other, &overrides(60)).unwrap();
    assert_ne!(a.simulation_log, b.simulation_log);
}

#[test]
fn busy_vehicles_each_hold_a_distinct_request() {
    let report = dispatch::run(&Scenario::default(), &overrides(100)).unwrap();
    let mut held = HashSet::new();
    for vehicle in &report.final_vehicle_states {
        match vehicle.status {
            VehicleStatus::Idle => assert!(vehicle.assigned_request.is_none()),
            VehicleStatus::EnRouteToPickup => {
                let request = vehicle.assigned_request.expect("busy vehicle has a request");
                assert!(held.insert(request), "request {request} held twice");
            }
        }
    }
}

#[test]
fn completions_follow_their_assignment() {
    let report = dispatch::run(&Scenario::default(), &overrides(100)).unwrap();
    let mut assigned = HashSet::new();
    let mut completed = 0;
    for entry in &report.events {
        match &entry.event {
            DispatchEvent::Assigned {
                vehicle, request, ..
            } => {
                assert!(assigned.insert((*vehicle, *request)));
            }
            DispatchEvent::Completed {
                vehicle, request, ..
            } => {
                assert!(assigned.contains(&(*vehicle, *request)));
                completed += 1;
            }
            _ => {}
        }
    }
    assert_eq!(completed, report.requests_completed);
    assert!(report.requests_completed <= report.requests_opened);
    assert_eq!(report.ticks, 100);
    assert_eq!(report.sim_time_secs, 3_000.0);
}

#[test]
fn engine_hook_sees_every_tick() {
    let scenario = Scenario::default();
    let mut world = dispatch::build_world(&scenario);
    let mut engine = dispatch::build_engine(&scenario, &DispatchOverrides::default());

    let mut ticks = Vec::new();
    engine
        .run_with_hook(&mut world, 6, |snapshot| ticks.push(snapshot.tick))
        .expect("run succeeds");

    assert_eq!(ticks, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn snapshots_land_under_the_scenario_name() {
    let temp = tempdir().expect("tempdir");
    let scenario = Scenario::default();
    let overrides = DispatchOverrides {
        ticks: Some(10),
        snapshot_interval_ticks: Some(5),
        snapshot_dir: Some(temp.path().to_path_buf()),
    };
    dispatch::run(&scenario, &overrides).unwrap();

    let dir = temp.path().join(&scenario.name);
    assert!(dir.join("tick_000005.json").exists());
    assert!(dir.join("tick_000010.json").exists());
    assert!(!dir.join("tick_000003.json").exists());
}

#[test]
fn completed_trips_end_at_the_dropoff() {
    let scenario = Scenario::default();
    let mut world = dispatch::build_world(&scenario);
    let mut engine = dispatch::build_engine(&scenario, &DispatchOverrides::default());
    engine.run(&mut world, 100).unwrap();

    let mut seen = 0;
    for entry in world.log() {
        if let DispatchEvent::Completed { request, at, .. } = &entry.event {
            let request = world.request(*request).expect("completed request exists");
            assert_eq!(request.status, RequestStatus::Completed);
            assert_eq!(*at, request.dropoff);
            seen += 1;
        }
    }
    assert!(seen > 0);
}
