//! Per-view selection state. Each view owns its selection and updates it
//! through `apply`, which consumes the old state and returns the new one.

use serde::Serialize;

use crate::catalog::{self, AccidentZone, AmbulanceUnit, DensityArea, VehicleKind, VehicleType};
use crate::derivation::{self, DispatchPlan, Recommendation};
use crate::error::SelectionError;
use crate::weather::Weather;

/// How far along a view is towards a derivable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Unselected,
    /// Vehicle type (or ambulance unit) chosen, no destination yet.
    VehicleChosen,
    /// Destination chosen, no vehicle yet.
    AreaChosen,
    Ready,
}

fn phase_of(has_vehicle: bool, has_area: bool) -> Phase {
    match (has_vehicle, has_area) {
        (false, false) => Phase::Unselected,
        (true, false) => Phase::VehicleChosen,
        (false, true) => Phase::AreaChosen,
        (true, true) => Phase::Ready,
    }
}

/// Emergency view: one accident zone and one ambulance unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmergencySelection {
    pub zone: Option<&'static AccidentZone>,
    pub unit: Option<&'static AmbulanceUnit>,
}

impl EmergencySelection {
    pub fn select_zone(self, id: &str) -> Result<Self, SelectionError> {
        Ok(Self {
            zone: Some(catalog::zone(id)?),
            ..self
        })
    }

    pub fn select_unit(self, id: &str) -> Result<Self, SelectionError> {
        Ok(Self {
            unit: Some(catalog::unit(id)?),
            ..self
        })
    }

    pub fn phase(&self) -> Phase {
        phase_of(self.unit.is_some(), self.zone.is_some())
    }

    pub fn plan(&self, weather_impact: u32) -> Option<DispatchPlan> {
        match (self.unit, self.zone) {
            (Some(unit), Some(zone)) => Some(derivation::plan_dispatch(unit, zone, weather_impact)),
            _ => None,
        }
    }
}

/// Fleet view: one vehicle type, one density area and the weather filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSelection {
    pub vehicle: Option<&'static VehicleType>,
    pub area: Option<&'static DensityArea>,
    pub weather: Weather,
}

impl FleetSelection {
    pub fn select_vehicle(self, kind: VehicleKind) -> Self {
        Self {
            vehicle: Some(kind.vehicle_type()),
            ..self
        }
    }

    pub fn select_area(self, id: &str) -> Result<Self, SelectionError> {
        Ok(Self {
            area: Some(catalog::area(id)?),
            ..self
        })
    }

    pub fn set_weather(self, weather: Weather) -> Self {
        Self { weather, ..self }
    }

    pub fn phase(&self) -> Phase {
        phase_of(self.vehicle.is_some(), self.area.is_some())
    }

    pub fn recommendation(&self) -> Option<Recommendation> {
        match (self.vehicle, self.area) {
            (Some(vehicle), Some(area)) => Some(derivation::derive(vehicle, area, self.weather)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Emergency,
    Fleet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Open(Service),
    Home,
    Reset,
    SelectZone(String),
    SelectUnit(String),
    SelectVehicle(VehicleKind),
    SelectArea(String),
    SetWeather(Weather),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Open(_) => "open",
            Action::Home => "home",
            Action::Reset => "reset",
            Action::SelectZone(_) => "select-zone",
            Action::SelectUnit(_) => "select-unit",
            Action::SelectVehicle(_) => "select-vehicle",
            Action::SelectArea(_) => "select-area",
            Action::SetWeather(_) => "set-weather",
        }
    }
}

/// The currently shown dashboard view and its selection. Moving to another
/// view drops the old selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum View {
    #[default]
    Landing,
    Emergency(EmergencySelection),
    Fleet(FleetSelection),
}

impl View {
    fn label(&self) -> &'static str {
        match self {
            View::Landing => "landing",
            View::Emergency(_) => "emergency",
            View::Fleet(_) => "fleet",
        }
    }

    pub fn apply(self, action: Action) -> Result<View, SelectionError> {
        let wrong_view = |view: &View, action: &Action| SelectionError::WrongView {
            action: action.name(),
            view: view.label(),
        };

        match (self, action) {
            (_, Action::Open(Service::Emergency)) => {
                Ok(View::Emergency(EmergencySelection::default()))
            }
            (_, Action::Open(Service::Fleet)) => Ok(View::Fleet(FleetSelection::default())),
            (_, Action::Home) => Ok(View::Landing),
            (View::Landing, Action::Reset) => Ok(View::Landing),
            (View::Emergency(_), Action::Reset) => {
                Ok(View::Emergency(EmergencySelection::default()))
            }
            (View::Fleet(_), Action::Reset) => Ok(View::Fleet(FleetSelection::default())),
            (View::Emergency(sel), Action::SelectZone(id)) => {
                sel.select_zone(&id).map(View::Emergency)
            }
            (View::Emergency(sel), Action::SelectUnit(id)) => {
                sel.select_unit(&id).map(View::Emergency)
            }
            (View::Fleet(sel), Action::SelectVehicle(kind)) => {
                Ok(View::Fleet(sel.select_vehicle(kind)))
            }
            (View::Fleet(sel), Action::SelectArea(id)) => sel.select_area(&id).map(View::Fleet),
            (View::Fleet(sel), Action::SetWeather(weather)) => {
                Ok(View::Fleet(sel.set_weather(weather)))
            }
            (view, action) => Err(wrong_view(&view, &action)),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            View::Landing => Phase::Unselected,
            View::Emergency(sel) => sel.phase(),
            View::Fleet(sel) => sel.phase(),
        }
    }
}
