use fleetiq::{
    catalog::{self, VehicleKind},
    derivation::{self, Confidence, RouteStrategy, RECOMMENDED_ROUTE},
    derive, Weather,
};

#[test]
fn bike_in_high_demand_rain_concatenates_in_order() {
    let area = catalog::area("1").unwrap();
    let rec = derive(VehicleKind::Bike.vehicle_type(), area, Weather::Rain);

    assert_eq!(
        rec.pros,
        vec![
            "Quick navigation through traffic",
            "Low fuel consumption",
            "Easy parking",
            "High demand area",
            "Multiple route options",
            "Higher demand for transport",
        ]
    );
    assert_eq!(
        rec.cons,
        vec![
            "Weather dependent",
            "Limited passenger capacity",
            "Heavy traffic",
            "Parking limitations",
            "Reduced visibility",
            "Slower speeds",
            "Traffic delays",
        ]
    );
    assert_eq!(rec.route, RECOMMENDED_ROUTE);
    assert_eq!(rec.confidence, Confidence::High);
    assert_eq!(rec.area, "T. Nagar");
}

#[test]
fn fog_adds_nothing_beyond_vehicle_and_area() {
    let area = catalog::area("2").unwrap();
    let rec = derive(VehicleKind::Bus.vehicle_type(), area, Weather::Fog);
    assert_eq!(rec.pros.len(), 5);
    assert_eq!(rec.cons.len(), 4);
    assert!(rec.pros.contains(&"Less congested routes"));
}

#[test]
fn derivation_is_pure() {
    for kind in [VehicleKind::Bike, VehicleKind::Car, VehicleKind::Bus] {
        for area in catalog::DENSITY_AREAS.iter() {
            for weather in Weather::ALL {
                let first = derive(kind.vehicle_type(), area, weather);
                let second = derive(kind.vehicle_type(), area, weather);
                assert_eq!(first, second);
            }
        }
    }
}

#[test]
fn strategy_plans_cover_every_strategy_once() {
    let plans = derivation::strategy_plans();
    let strategies: Vec<_> = plans.iter().map(|p| p.strategy).collect();
    assert_eq!(
        strategies,
        vec![
            RouteStrategy::Fastest,
            RouteStrategy::FuelEfficient,
            RouteStrategy::HighDemand
        ]
    );
}

#[test]
fn dispatch_plan_carries_live_weather_impact() {
    let unit = catalog::unit("AMB-001").unwrap();
    let zone = catalog::zone("1").unwrap();
    let plan = derivation::plan_dispatch(unit, zone, 22);
    assert_eq!(plan.weather_delay_pct, 22);
    assert!(plan.recommended.eta_minutes < plan.alternative.eta_minutes);
}
