//! Immutable reference data shown on the dashboards, plus the small display
//! formulas (palette by threshold, percentage bars) derived from it.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CatalogError;
use crate::weather::Weather;

/// Position on the schematic city map, in percent of width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub x: f32,
    pub y: f32,
}

const fn at(x: f32, y: f32) -> MapPoint {
    MapPoint { x, y }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn color(self) -> &'static str {
        match self {
            Severity::High => "red",
            Severity::Medium => "orange",
            Severity::Low => "yellow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Available,
    Busy,
    Maintenance,
}

impl UnitStatus {
    pub fn color(self) -> &'static str {
        match self {
            UnitStatus::Available => "green",
            UnitStatus::Busy => "red",
            UnitStatus::Maintenance => "gray",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    High,
    Low,
}

impl DemandLevel {
    pub fn color(self) -> &'static str {
        match self {
            DemandLevel::High => "purple",
            DemandLevel::Low => "pink",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Car,
    Bike,
    Bus,
}

impl VehicleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::Car => "car",
            VehicleKind::Bike => "bike",
            VehicleKind::Bus => "bus",
        }
    }

    pub fn vehicle_type(self) -> &'static VehicleType {
        match self {
            VehicleKind::Car => &VEHICLE_TYPES[0],
            VehicleKind::Bike => &VEHICLE_TYPES[1],
            VehicleKind::Bus => &VEHICLE_TYPES[2],
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleKind::Car),
            "bike" => Ok(VehicleKind::Bike),
            "bus" => Ok(VehicleKind::Bus),
            other => Err(CatalogError::UnknownVehicle(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    #[serde(rename = "CNG")]
    Cng,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrafficCondition {
    Clear,
    #[serde(rename = "Free Flow")]
    FreeFlow,
    Moderate,
    #[serde(rename = "Heavy Traffic")]
    Heavy,
}

impl TrafficCondition {
    pub fn label(self) -> &'static str {
        match self {
            TrafficCondition::Clear => "Clear",
            TrafficCondition::FreeFlow => "Free Flow",
            TrafficCondition::Moderate => "Moderate",
            TrafficCondition::Heavy => "Heavy Traffic",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TrafficCondition::Clear | TrafficCondition::FreeFlow => "green",
            TrafficCondition::Moderate => "orange",
            TrafficCondition::Heavy => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargerSpeed {
    Fast,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccidentZone {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub incidents: u32,
    pub distance: &'static str,
    pub position: MapPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbulanceUnit {
    pub id: &'static str,
    pub location: &'static str,
    pub status: UnitStatus,
    pub eta: &'static str,
    pub position: MapPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleType {
    pub kind: VehicleKind,
    pub name: &'static str,
    pub variants: &'static [&'static str],
    pub capacity: &'static str,
    pub fuel_types: &'static [FuelType],
    pub description: &'static str,
}

impl VehicleType {
    pub fn supports_electric(&self) -> bool {
        self.fuel_types.contains(&FuelType::Electric)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityArea {
    pub id: &'static str,
    pub name: &'static str,
    pub level: DemandLevel,
    pub distance: &'static str,
    pub demand: u8,
    pub position: MapPoint,
    pub weather: Weather,
    pub temperature_c: i8,
    pub demand_label: &'static str,
    pub tip: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingStation {
    pub id: &'static str,
    pub name: &'static str,
    pub speed: ChargerSpeed,
    pub distance: &'static str,
    pub free_slots: u32,
    pub position: MapPoint,
}

impl ChargingStation {
    pub fn badge(&self) -> &'static str {
        if self.free_slots > 5 {
            "primary"
        } else {
            "secondary"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandSample {
    pub hour: &'static str,
    pub calls: u32,
    pub weather: Weather,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub road: &'static str,
    pub condition: TrafficCondition,
}

pub const CITY: &str = "Chennai, Tamil Nadu";

pub static ACCIDENT_ZONES: [AccidentZone; 5] = [
    AccidentZone {
        id: "1",
        name: "Mount Road Junction",
        severity: Severity::High,
        incidents: 45,
        distance: "2.3 km",
        position: at(45.0, 35.0),
    },
    AccidentZone {
        id: "2",
        name: "Anna Salai",
        severity: Severity::High,
        incidents: 38,
        distance: "1.8 km",
        position: at(60.0, 50.0),
    },
    AccidentZone {
        id: "3",
        name: "T. Nagar Signal",
        severity: Severity::Medium,
        incidents: 28,
        distance: "3.1 km",
        position: at(35.0, 60.0),
    },
    AccidentZone {
        id: "4",
        name: "Vadapalani",
        severity: Severity::Medium,
        incidents: 22,
        distance: "4.2 km",
        position: at(25.0, 40.0),
    },
    AccidentZone {
        id: "5",
        name: "Porur Toll",
        severity: Severity::Low,
        incidents: 15,
        distance: "6.8 km",
        position: at(15.0, 25.0),
    },
];

pub static AMBULANCE_UNITS: [AmbulanceUnit; 4] = [
    AmbulanceUnit {
        id: "AMB-001",
        location: "General Hospital",
        status: UnitStatus::Available,
        eta: "3 min",
        position: at(50.0, 45.0),
    },
    AmbulanceUnit {
        id: "AMB-002",
        location: "Apollo Hospital",
        status: UnitStatus::Available,
        eta: "5 min",
        position: at(40.0, 55.0),
    },
    AmbulanceUnit {
        id: "AMB-003",
        location: "MIOT Hospital",
        status: UnitStatus::Busy,
        eta: "12 min",
        position: at(30.0, 35.0),
    },
    AmbulanceUnit {
        id: "AMB-004",
        location: "Fortis Hospital",
        status: UnitStatus::Available,
        eta: "7 min",
        position: at(65.0, 30.0),
    },
];

pub static EMERGENCY_DEMAND: [DemandSample; 9] = [
    DemandSample { hour: "6AM", calls: 12, weather: Weather::Clear },
    DemandSample { hour: "8AM", calls: 28, weather: Weather::Clear },
    DemandSample { hour: "10AM", calls: 35, weather: Weather::Clear },
    DemandSample { hour: "12PM", calls: 42, weather: Weather::Rain },
    DemandSample { hour: "2PM", calls: 38, weather: Weather::Rain },
    DemandSample { hour: "4PM", calls: 55, weather: Weather::Clear },
    DemandSample { hour: "6PM", calls: 68, weather: Weather::Clear },
    DemandSample { hour: "8PM", calls: 45, weather: Weather::Fog },
    DemandSample { hour: "10PM", calls: 32, weather: Weather::Clear },
];

pub static VEHICLE_TYPES: [VehicleType; 3] = [
    VehicleType {
        kind: VehicleKind::Car,
        name: "Car",
        variants: &["4-seater", "6-seater", "10-seater mini-van"],
        capacity: "4-10 passengers",
        fuel_types: &[FuelType::Petrol, FuelType::Diesel, FuelType::Electric],
        description: "Versatile passenger transport for urban and suburban routes",
    },
    VehicleType {
        kind: VehicleKind::Bike,
        name: "Bike",
        variants: &["Single seat", "Pillion"],
        capacity: "1-2 passengers",
        fuel_types: &[FuelType::Petrol, FuelType::Electric],
        description: "Efficient for narrow roads and quick deliveries",
    },
    VehicleType {
        kind: VehicleKind::Bus,
        name: "Bus",
        variants: &["Mini Bus", "Standard Bus", "Luxury Coach"],
        capacity: "20-50 passengers",
        fuel_types: &[FuelType::Diesel, FuelType::Cng, FuelType::Electric],
        description: "High capacity transport for mass transit",
    },
];

pub static DENSITY_AREAS: [DensityArea; 5] = [
    DensityArea {
        id: "1",
        name: "T. Nagar",
        level: DemandLevel::High,
        distance: "2.3 km",
        demand: 85,
        position: at(45.0, 35.0),
        weather: Weather::Clear,
        temperature_c: 28,
        demand_label: "High demand zone",
        tip: "Take inner ring road to save 10% fuel",
    },
    DensityArea {
        id: "2",
        name: "Anna Nagar",
        level: DemandLevel::Low,
        distance: "4.1 km",
        demand: 35,
        position: at(30.0, 50.0),
        weather: Weather::Rain,
        temperature_c: 24,
        demand_label: "Moderate demand zone",
        tip: "Shift allocation of 6-seaters here to balance demand",
    },
    DensityArea {
        id: "3",
        name: "Velachery",
        level: DemandLevel::High,
        distance: "6.8 km",
        demand: 78,
        position: at(60.0, 65.0),
        weather: Weather::Clear,
        temperature_c: 29,
        demand_label: "High demand zone",
        tip: "Avoid this area for bikes due to high congestion",
    },
    DensityArea {
        id: "4",
        name: "Adyar",
        level: DemandLevel::Low,
        distance: "3.5 km",
        demand: 42,
        position: at(55.0, 45.0),
        weather: Weather::Fog,
        temperature_c: 22,
        demand_label: "Low demand zone",
        tip: "Optimal for electric vehicles - charging stations nearby",
    },
    DensityArea {
        id: "5",
        name: "Mylapore",
        level: DemandLevel::High,
        distance: "1.9 km",
        demand: 92,
        position: at(50.0, 55.0),
        weather: Weather::Clear,
        temperature_c: 27,
        demand_label: "Very high demand zone",
        tip: "Peak hours: Deploy more vehicles between 8-10 AM",
    },
];

pub static CHARGING_STATIONS: [ChargingStation; 2] = [
    ChargingStation {
        id: "cs1",
        name: "Charging Station 1",
        speed: ChargerSpeed::Fast,
        distance: "1.5 km",
        free_slots: 10,
        position: at(40.0, 40.0),
    },
    ChargingStation {
        id: "cs2",
        name: "Charging Station 2",
        speed: ChargerSpeed::Standard,
        distance: "3.0 km",
        free_slots: 5,
        position: at(60.0, 60.0),
    },
];

/// Current city-wide traffic density, in percent.
pub const LIVE_TRAFFIC_DENSITY: u8 = 65;
/// Current share of service demand being met, in percent.
pub const LIVE_SERVICE_DEMAND: u8 = 78;

/// Hourly samples starting at 6AM.
pub const TRAFFIC_BY_HOUR: [u8; 10] = [65, 45, 78, 92, 56, 73, 88, 34, 67, 81];
pub const SERVICE_DEMAND_BY_HOUR: [u8; 10] = [78, 56, 89, 67, 92, 45, 73, 88, 54, 76];
pub const FIRST_SAMPLE_HOUR: u8 = 6;

pub const EFFICIENCY_BEFORE: u8 = 67;
pub const EFFICIENCY_AFTER: u8 = 89;

pub fn zone(id: &str) -> Result<&'static AccidentZone, CatalogError> {
    ACCIDENT_ZONES
        .iter()
        .find(|zone| zone.id == id)
        .ok_or_else(|| CatalogError::UnknownZone(id.to_string()))
}

pub fn unit(id: &str) -> Result<&'static AmbulanceUnit, CatalogError> {
    AMBULANCE_UNITS
        .iter()
        .find(|unit| unit.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| CatalogError::UnknownUnit(id.to_string()))
}

pub fn area(id: &str) -> Result<&'static DensityArea, CatalogError> {
    DENSITY_AREAS
        .iter()
        .find(|area| area.id == id)
        .ok_or_else(|| CatalogError::UnknownArea(id.to_string()))
}

/// Charging stations relevant to the chosen vehicle type; empty unless it can
/// run on electricity.
pub fn charging_stations_for(vehicle: &VehicleType) -> &'static [ChargingStation] {
    if vehicle.supports_electric() {
        &CHARGING_STATIONS
    } else {
        &[]
    }
}

/// Width of a percentage bar.
pub fn bar_width(percent: i32) -> u8 {
    percent.clamp(0, 100) as u8
}

pub fn efficiency_improvement() -> i32 {
    i32::from(EFFICIENCY_AFTER) - i32::from(EFFICIENCY_BEFORE)
}

/// Hour label for an index into the hourly series.
pub fn sample_hour_label(index: usize) -> String {
    format!("{}AM", usize::from(FIRST_SAMPLE_HOUR) + index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_resolve_known_ids() {
        assert_eq!(zone("3").unwrap().name, "T. Nagar Signal");
        assert_eq!(unit("amb-004").unwrap().location, "Fortis Hospital");
        assert_eq!(area("5").unwrap().demand, 92);
        assert_eq!(zone("9"), Err(CatalogError::UnknownZone("9".into())));
    }

    #[test]
    fn vehicle_kind_maps_to_its_type() {
        for kind in [VehicleKind::Car, VehicleKind::Bike, VehicleKind::Bus] {
            assert_eq!(kind.vehicle_type().kind, kind);
        }
    }

    #[test]
    fn every_vehicle_type_offers_electric() {
        for vehicle in &VEHICLE_TYPES {
            assert_eq!(charging_stations_for(vehicle).len(), 2);
        }
    }

    #[test]
    fn station_badge_follows_slot_threshold() {
        assert_eq!(CHARGING_STATIONS[0].badge(), "primary");
        assert_eq!(CHARGING_STATIONS[1].badge(), "secondary");
    }

    #[test]
    fn bars_and_improvement() {
        assert_eq!(bar_width(130), 100);
        assert_eq!(bar_width(-4), 0);
        assert_eq!(bar_width(i32::from(LIVE_TRAFFIC_DENSITY)), 65);
        assert_eq!(efficiency_improvement(), 22);
        assert_eq!(sample_hour_label(0), "6AM");
    }
}
