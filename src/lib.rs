//! Data-cleaning rules for the St. John's Metrobus Transit GTFS feed.
//!
//! A host GTFS conversion pipeline loads the feed and calls into a
//! [`RuleSet`] once per route, trip and stop record. Every rule is a pure
//! function; a record no rule anticipates yields a [`RuleError`], on which
//! the host should abort the run.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rule_set;
pub mod rules;

pub use config::RuleConfig;
pub use error::{ConfigError, RuleError};
pub use models::{
    is_service_id_useful, Direction, RouteRecord, ServiceIdFilter, StopRecord, TripRecord,
};
pub use rule_set::RuleSet;
pub use rules::colors::derive_route_color;
pub use rules::headsigns::{assign_trip_headsign, merge_trip_headsigns, HeadsignPolicy};
pub use rules::routes::{derive_route_id, derive_route_long_name, derive_route_short_name};
pub use rules::stops::{derive_stop_id, normalize_stop_name};
