mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    task::{Context as TaskContext, Poll},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    catalog::{self, ChargingStation, VehicleKind},
    derivation::{self, DispatchPlan, Recommendation, StrategyPlan},
    dispatch::{self, DispatchOverrides, DispatchReport},
    error::{CatalogError, SelectionError},
    feed::{FeedHandle, FeedSettings},
    report::{HtmlSurface, OptimizationReport, Surface},
    rng::RngManager,
    scenario::Scenario,
    selection::{Action, FleetSelection, Phase, Service, View},
    weather::Weather,
};

struct AppState {
    scenario: Scenario,
    feed_settings: FeedSettings,
    rng: Mutex<RngManager>,
    sessions: AtomicU64,
    live_sessions: AtomicUsize,
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub host: String,
    pub port: u16,
}

pub fn router(scenario: Scenario) -> Router {
    let state = Arc::new(AppState {
        feed_settings: scenario.feed.settings(),
        rng: Mutex::new(RngManager::new(scenario.seed)),
        sessions: AtomicU64::new(0),
        live_sessions: AtomicUsize::new(0),
        scenario,
    });

    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/meta", get(meta))
        .route("/api/catalog", get(catalog_view))
        .route("/api/events", get(stream_events))
        .route("/api/emergency/plan", get(emergency_plan))
        .route("/api/fleet/recommendation", get(fleet_recommendation))
        .route("/api/dispatch/run", get(run_dispatch))
        .route("/report/:area", get(optimization_report))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        host,
        port,
    } = config;

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let title = scenario.title.clone();
    let router = router(scenario);

    let listener = TcpListener::bind(addr).await?;
    log::info!("{title} live at http://{addr} (Ctrl+C to stop)");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("Shutting down dashboard...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        assets::APP_JS,
    )
}

struct ApiError(SelectionError);

impl From<SelectionError> for ApiError {
    fn from(value: SelectionError) -> Self {
        ApiError(value)
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        ApiError(value.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct MetaResponse {
    title: String,
    description: String,
    city: &'static str,
    tick_interval_ms: u64,
    live_sessions: usize,
}

async fn meta(State(state): State<Arc<AppState>>) -> Json<MetaResponse> {
    Json(MetaResponse {
        title: state.scenario.title.clone(),
        description: state.scenario.description.clone(),
        city: catalog::CITY,
        tick_interval_ms: state.scenario.feed.tick_interval_ms,
        live_sessions: state.live_sessions.load(Ordering::Relaxed),
    })
}

#[derive(Serialize)]
struct Colored<T: Serialize> {
    #[serde(flatten)]
    item: T,
    color: &'static str,
}

#[derive(Serialize)]
struct HourlyPoint {
    hour: String,
    percent: u8,
}

#[derive(Serialize)]
struct CatalogResponse {
    zones: Vec<Colored<&'static catalog::AccidentZone>>,
    units: Vec<Colored<&'static catalog::AmbulanceUnit>>,
    emergency_demand: &'static [catalog::DemandSample],
    vehicle_types: &'static [catalog::VehicleType],
    areas: Vec<Colored<&'static catalog::DensityArea>>,
    traffic_density: u8,
    service_demand: u8,
    traffic_by_hour: Vec<HourlyPoint>,
    demand_by_hour: Vec<HourlyPoint>,
    efficiency_before: u8,
    efficiency_after: u8,
    efficiency_improvement: i32,
}

fn hourly(series: &[u8]) -> Vec<HourlyPoint> {
    series
        .iter()
        .enumerate()
        .map(|(index, &value)| HourlyPoint {
            hour: catalog::sample_hour_label(index),
            percent: catalog::bar_width(i32::from(value)),
        })
        .collect()
}

async fn catalog_view() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        zones: catalog::ACCIDENT_ZONES
            .iter()
            .map(|item| Colored {
                color: item.severity.color(),
                item,
            })
            .collect(),
        units: catalog::AMBULANCE_UNITS
            .iter()
            .map(|item| Colored {
                color: item.status.color(),
                item,
            })
            .collect(),
        emergency_demand: &catalog::EMERGENCY_DEMAND,
        vehicle_types: &catalog::VEHICLE_TYPES,
        areas: catalog::DENSITY_AREAS
            .iter()
            .map(|item| Colored {
                color: item.level.color(),
                item,
            })
            .collect(),
        traffic_density: catalog::bar_width(i32::from(catalog::LIVE_TRAFFIC_DENSITY)),
        service_demand: catalog::bar_width(i32::from(catalog::LIVE_SERVICE_DEMAND)),
        traffic_by_hour: hourly(&catalog::TRAFFIC_BY_HOUR),
        demand_by_hour: hourly(&catalog::SERVICE_DEMAND_BY_HOUR),
        efficiency_before: catalog::EFFICIENCY_BEFORE,
        efficiency_after: catalog::EFFICIENCY_AFTER,
        efficiency_improvement: catalog::efficiency_improvement(),
    })
}

/// Counts a view session as live until dropped.
struct SessionGuard {
    id: u64,
    state: Arc<AppState>,
}

impl SessionGuard {
    fn open(state: Arc<AppState>) -> Self {
        let id = state.sessions.fetch_add(1, Ordering::Relaxed) + 1;
        state.live_sessions.fetch_add(1, Ordering::Relaxed);
        log::debug!("view session {id} opened");
        Self { id, state }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.live_sessions.fetch_sub(1, Ordering::Relaxed);
        log::debug!("view session {} closed", self.id);
    }
}

/// An SSE stream that owns its view session's feed; dropping the stream when
/// the client goes away cancels the feed.
struct SessionStream<S> {
    _feed: FeedHandle,
    _session: SessionGuard,
    inner: Pin<Box<S>>,
}

impl<S: Stream> Stream for SessionStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rng = state
        .rng
        .lock()
        .expect("rng lock poisoned")
        .detach("feed");
    let feed = FeedHandle::spawn(state.feed_settings.clone(), rng);
    let session = SessionGuard::open(state);

    let first = feed.latest();
    let updates = BroadcastStream::new(feed.subscribe()).filter_map(|msg| msg.ok());
    let frames = tokio_stream::once(first)
        .chain(updates)
        .filter_map(|frame| serde_json::to_string(&frame).ok())
        .map(|payload| Ok(Event::default().data(payload)));

    let stream = SessionStream {
        _feed: feed,
        _session: session,
        inner: Box::pin(frames),
    };
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

#[derive(Deserialize)]
struct PlanQuery {
    zone: Option<String>,
    unit: Option<String>,
    #[serde(default)]
    weather_impact: Option<u32>,
}

#[derive(Serialize)]
struct PlanResponse {
    phase: Phase,
    plan: Option<DispatchPlan>,
}

async fn emergency_plan(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlanResponse>, ApiError> {
    let mut view = View::default().apply(Action::Open(Service::Emergency))?;
    if let Some(zone) = query.zone {
        view = view.apply(Action::SelectZone(zone))?;
    }
    if let Some(unit) = query.unit {
        view = view.apply(Action::SelectUnit(unit))?;
    }
    let impact = query
        .weather_impact
        .unwrap_or(state.feed_settings.initial.clamped().weather_impact);
    let plan = match &view {
        View::Emergency(selection) => selection.plan(impact),
        _ => None,
    };
    Ok(Json(PlanResponse {
        phase: view.phase(),
        plan,
    }))
}

#[derive(Deserialize)]
struct FleetQuery {
    vehicle: Option<String>,
    area: Option<String>,
    weather: Option<String>,
}

impl FleetQuery {
    fn selection(&self) -> Result<FleetSelection, ApiError> {
        let mut view = View::default().apply(Action::Open(Service::Fleet))?;
        if let Some(vehicle) = &self.vehicle {
            view = view.apply(Action::SelectVehicle(vehicle.parse::<VehicleKind>()?))?;
        }
        if let Some(area) = &self.area {
            view = view.apply(Action::SelectArea(area.clone()))?;
        }
        if let Some(weather) = &self.weather {
            view = view.apply(Action::SetWeather(weather.parse::<Weather>()?))?;
        }
        match view {
            View::Fleet(selection) => Ok(selection),
            _ => Ok(FleetSelection::default()),
        }
    }
}

#[derive(Serialize)]
struct FleetResponse {
    phase: Phase,
    recommendation: Option<Recommendation>,
    strategies: Vec<StrategyPlan>,
    charging_stations: &'static [ChargingStation],
}

async fn fleet_recommendation(
    Query(query): Query<FleetQuery>,
) -> Result<Json<FleetResponse>, ApiError> {
    let selection = query.selection()?;
    let recommendation = selection.recommendation();
    let strategies = if recommendation.is_some() {
        derivation::strategy_plans()
    } else {
        Vec::new()
    };
    Ok(Json(FleetResponse {
        phase: selection.phase(),
        recommendation,
        strategies,
        charging_stations: selection
            .vehicle
            .map(catalog::charging_stations_for)
            .unwrap_or(&[]),
    }))
}

async fn optimization_report(
    Path(area_id): Path<String>,
    Query(query): Query<FleetQuery>,
) -> Result<Html<String>, ApiError> {
    let area = catalog::area(&area_id)?;
    let selection = FleetQuery {
        area: None,
        ..query
    }
    .selection()?;
    let report = OptimizationReport::new(area, selection.vehicle, selection.weather);
    Ok(Html(HtmlSurface.render(&report)))
}

async fn run_dispatch(State(state): State<Arc<AppState>>) -> Response {
    let scenario = state.scenario.clone();
    let result = tokio::task::spawn_blocking(move || {
        dispatch::run(&scenario, &DispatchOverrides::default())
    })
    .await;
    match result {
        Ok(Ok(report)) => Json::<DispatchReport>(report).into_response(),
        Ok(Err(err)) => {
            log::error!("dispatch simulation failed: {err:?}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(err) => {
            log::error!("dispatch task failed: {err:?}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
