use thiserror::Error;

/// Lookup failures against the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown vehicle kind '{0}' (expected car, bike or bus)")]
    UnknownVehicle(String),
    #[error("unknown weather '{0}' (expected clear, rain or fog)")]
    UnknownWeather(String),
    #[error("unknown accident zone '{0}'")]
    UnknownZone(String),
    #[error("unknown ambulance unit '{0}'")]
    UnknownUnit(String),
    #[error("unknown density area '{0}'")]
    UnknownArea(String),
}

/// Errors raised while applying a selection action to a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("action '{action}' does not apply to the {view} view")]
    WrongView {
        action: &'static str,
        view: &'static str,
    },
}
