use fleetiq::{
    catalog::VehicleKind,
    selection::{Action, Phase, Service, View},
    Weather,
};

fn fleet() -> View {
    View::default().apply(Action::Open(Service::Fleet)).unwrap()
}

#[test]
fn recommendation_needs_both_vehicle_and_area() {
    let vehicle_only = fleet()
        .apply(Action::SelectVehicle(VehicleKind::Car))
        .unwrap();
    assert_eq!(vehicle_only.phase(), Phase::VehicleChosen);
    let View::Fleet(selection) = &vehicle_only else {
        panic!("fleet view expected");
    };
    assert!(selection.recommendation().is_none());

    let area_only = fleet().apply(Action::SelectArea("3".into())).unwrap();
    assert_eq!(area_only.phase(), Phase::AreaChosen);

    let ready = vehicle_only
        .apply(Action::SelectArea("3".into()))
        .and_then(|v| v.apply(Action::SetWeather(Weather::Rain)))
        .unwrap();
    assert_eq!(ready.phase(), Phase::Ready);
    let View::Fleet(selection) = ready else {
        panic!("fleet view expected");
    };
    let rec = selection.recommendation().unwrap();
    assert_eq!(rec.weather, Weather::Rain);
}

#[test]
fn emergency_plan_needs_zone_and_unit() {
    let view = View::default()
        .apply(Action::Open(Service::Emergency))
        .and_then(|v| v.apply(Action::SelectZone("2".into())))
        .unwrap();
    let View::Emergency(selection) = &view else {
        panic!("emergency view expected");
    };
    assert!(selection.plan(15).is_none());

    let view = view.apply(Action::SelectUnit("amb-002".into())).unwrap();
    let View::Emergency(selection) = view else {
        panic!("emergency view expected");
    };
    assert!(selection.plan(15).is_some());
}

#[test]
fn leaving_a_view_discards_its_selection() {
    let view = fleet()
        .apply(Action::SelectVehicle(VehicleKind::Bike))
        .and_then(|v| v.apply(Action::Home))
        .and_then(|v| v.apply(Action::Open(Service::Fleet)))
        .unwrap();
    assert_eq!(view.phase(), Phase::Unselected);
}

#[test]
fn unknown_area_is_an_error() {
    assert!(fleet().apply(Action::SelectArea("nowhere".into())).is_err());
}
