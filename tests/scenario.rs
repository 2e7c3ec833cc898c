use std::io::Write;

use fleetiq::{ScenarioLoader, Weather};
use tempfile::NamedTempFile;

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn bundled_scenario_loads() {
    let scenario = scenario_loader().load("scenarios/chennai.yaml").unwrap();
    assert_eq!(scenario.name, "chennai");
    assert_eq!(scenario.seed, 2024);
    assert_eq!(scenario.feed.initial_weather, Weather::Clear);
    assert_eq!(scenario.feed.settings().period.as_secs(), 5);
    assert_eq!(scenario.dispatch.vehicles, 10);
}

#[test]
fn invalid_demand_chance_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "dispatch:\n  demand_chance: 1.5").unwrap();
    let err = ScenarioLoader::new("/").load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("demand_chance"));
}

#[test]
fn missing_file_reports_the_path() {
    let err = scenario_loader().load("scenarios/missing.yaml").unwrap_err();
    assert!(err.to_string().contains("missing.yaml"));
}
