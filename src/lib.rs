pub mod catalog;
pub mod derivation;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod feed;
pub mod geo;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod selection;
pub mod snapshot;
pub mod stats;
pub mod systems;
pub mod weather;
pub mod web;
pub mod world;

pub use derivation::{derive, Recommendation};
pub use feed::{FeedHandle, FeedSettings, LiveFrame};
pub use scenario::{Scenario, ScenarioLoader};
pub use stats::{LiveStats, MetricsSimulator};
pub use weather::Weather;
