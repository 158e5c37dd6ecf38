use tracing::{debug, info};

use crate::config::RuleConfig;
use crate::error::{ConfigError, RuleError};
use crate::models::{self, Direction, RouteRecord, ServiceIdFilter, StopRecord, TripRecord};
use crate::rules::clean::Acronyms;
use crate::rules::headsigns::HeadsignPolicy;
use crate::rules::{colors, headsigns, routes, stops};

/// GTFS `route_type` for bus.
pub const ROUTE_TYPE_BUS: u16 = 3;

/// The agency rule set the host pipeline calls once per record.
///
/// Immutable once built; every method is a pure function of its input
/// and the configuration captured here.
#[derive(Debug, Clone)]
pub struct RuleSet {
    config: RuleConfig,
    acronyms: Acronyms,
}

impl RuleSet {
    pub fn new(config: RuleConfig) -> Result<Self, ConfigError> {
        let acronyms = Acronyms::new(config.stops.protected_acronyms.as_slice())
            .map_err(|e| ConfigError::Validation(format!("protected acronyms: {}", e)))?;
        match &config.service_filter {
            Some(filter) => info!(
                "[CONFIG] Rule set ready: {} useful service ids, headsign policy {:?}",
                filter.len(),
                config.headsigns.policy
            ),
            None => info!(
                "[CONFIG] Rule set ready: no service filter, headsign policy {:?}",
                config.headsigns.policy
            ),
        }
        Ok(RuleSet { config, acronyms })
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn agency_color(&self) -> &str {
        &self.config.agency.color
    }

    pub fn agency_route_type(&self) -> u16 {
        ROUTE_TYPE_BUS
    }

    pub fn derive_route_id(&self, short_name: &str) -> Result<u64, RuleError> {
        routes::derive_route_id(short_name)
    }

    pub fn derive_route_color(&self, route: &RouteRecord) -> Result<Option<String>, RuleError> {
        colors::derive_route_color(route, &self.config.routes.placeholder_color)
    }

    pub fn derive_route_short_name(&self, route: &RouteRecord) -> String {
        routes::derive_route_short_name(route)
    }

    pub fn derive_route_long_name(&self, route: &RouteRecord) -> String {
        routes::derive_route_long_name(route)
    }

    pub fn assign_trip_headsign(
        &self,
        route_id: u64,
        direction: Direction,
        raw_headsign: Option<&str>,
    ) -> Result<String, RuleError> {
        headsigns::assign_trip_headsign(
            route_id,
            direction,
            raw_headsign,
            self.config.headsigns.policy,
            &self.acronyms,
        )
    }

    /// Headsign for a whole trip record.
    pub fn trip_headsign(&self, trip: &TripRecord) -> Result<String, RuleError> {
        self.assign_trip_headsign(trip.route_id, trip.direction, trip.headsign.as_deref())
    }

    pub fn merge_trip_headsigns(
        &self,
        route_id: u64,
        first: &str,
        second: &str,
    ) -> Result<String, RuleError> {
        headsigns::merge_trip_headsigns(route_id, first, second)
    }

    pub fn normalize_stop_name(&self, name: &str) -> String {
        stops::normalize_stop_name(name, &self.acronyms)
    }

    pub fn derive_stop_id(&self, stop_id: &str) -> Result<u32, RuleError> {
        stops::derive_stop_id(stop_id)
    }

    /// Id and display name of a stop record.
    pub fn stop(&self, stop: &StopRecord) -> Result<(u32, String), RuleError> {
        Ok((self.derive_stop_id(&stop.id)?, self.normalize_stop_name(&stop.name)))
    }

    /// Whether a service id is kept. Without a filter every id is kept.
    pub fn is_service_id_useful(&self, service_id: i64) -> bool {
        match &self.config.service_filter {
            Some(filter) => models::is_service_id_useful(service_id, filter),
            None => true,
        }
    }

    /// The filter exists and kept nothing: the whole feed is excluded.
    pub fn excluding_all(&self) -> bool {
        self.config
            .service_filter
            .as_ref()
            .is_some_and(ServiceIdFilter::is_empty)
    }

    /// Exclude a calendar or calendar-date row by its service id.
    pub fn exclude_service(&self, service_id: i64) -> bool {
        !self.is_service_id_useful(service_id)
    }

    pub fn exclude_trip(&self, trip: &TripRecord) -> bool {
        let excluded = self.exclude_service(trip.service_id);
        if excluded {
            debug!(
                "[CONFIG] Excluding trip on route {} (service {})",
                trip.route_id, trip.service_id
            );
        }
        excluded
    }

    pub fn headsign_policy(&self) -> HeadsignPolicy {
        self.config.headsigns.policy
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            config: RuleConfig::default(),
            acronyms: Acronyms::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(
        route_id: u64,
        service_id: i64,
        direction: Direction,
        headsign: Option<&str>,
    ) -> TripRecord {
        TripRecord {
            route_id,
            service_id,
            direction,
            headsign: headsign.map(str::to_string),
        }
    }

    #[test]
    fn test_default_rule_set() {
        let rules = RuleSet::default();
        assert_eq!(rules.agency_color(), "A19153");
        assert_eq!(rules.agency_route_type(), ROUTE_TYPE_BUS);
        assert_eq!(rules.headsign_policy(), HeadsignPolicy::Cleanup);
    }

    #[test]
    fn test_route_operations() {
        let rules = RuleSet::default();
        let route = RouteRecord::new(" 3A ").with_long_name("churchill sq/village").with_color("");
        let short_name = rules.derive_route_short_name(&route);
        assert_eq!(short_name, "3A");
        assert_eq!(rules.derive_route_id(&short_name), Ok(10_003));
        assert_eq!(rules.derive_route_color(&route), Ok(Some("8FC74A".to_string())));
        assert_eq!(rules.derive_route_long_name(&route), "Churchill Sq / Village");
    }

    #[test]
    fn test_custom_placeholder_color() {
        let config = RuleConfig::from_json(r#"{ "routes": { "placeholder_color": "000000" } }"#)
            .unwrap();
        let rules = RuleSet::new(config).unwrap();
        let route = RouteRecord::new("2").with_color("000000");
        assert_eq!(rules.derive_route_color(&route), Ok(Some("26A450".to_string())));
        // FF0000 is a real color under this config.
        let route = RouteRecord::new("2").with_color("FF0000");
        assert_eq!(rules.derive_route_color(&route), Ok(Some("FF0000".to_string())));
    }

    #[test]
    fn test_trip_headsign_policies() {
        let rules = RuleSet::default();
        let t = trip(27, 1, Direction::Outbound, Some("SHERATON/QUIDI VIDI/DELTA"));
        assert_eq!(rules.trip_headsign(&t), Ok("Sheraton / Quidi Vidi / Delta".to_string()));

        let config = RuleConfig::from_json(r#"{ "headsigns": { "policy": "table" } }"#).unwrap();
        let table_rules = RuleSet::new(config).unwrap();
        assert_eq!(table_rules.trip_headsign(&t), Ok("Quidi Vidi / Delta".to_string()));
    }

    #[test]
    fn test_headsigns_then_merge() {
        let rules = RuleSet::default();
        let a = rules
            .assign_trip_headsign(1, Direction::Outbound, Some("MUN/CONA/MI"))
            .unwrap();
        let b = rules
            .assign_trip_headsign(1, Direction::Outbound, None)
            .unwrap();
        assert_eq!(rules.merge_trip_headsigns(1, &a, &b), Ok("Institutes".to_string()));
    }

    #[test]
    fn test_stop_record() {
        let rules = RuleSet::default();
        let stop = StopRecord::new("St.1234B", "MUN - UNIVERSITY AVE");
        assert_eq!(rules.stop(&stop), Ok((1234, "MUN / University Ave".to_string())));
        assert!(rules.stop(&StopRecord::new("X", "Anything")).is_err());
    }

    #[test]
    fn test_configured_acronyms_reach_stop_names() {
        let config =
            RuleConfig::from_json(r#"{ "stops": { "protected_acronyms": ["HQ"] } }"#).unwrap();
        let rules = RuleSet::new(config).unwrap();
        assert_eq!(rules.normalize_stop_name("RCMP HQ"), "Rcmp HQ");
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let rules = RuleSet::default();
        assert!(rules.is_service_id_useful(42));
        assert!(!rules.excluding_all());
        assert!(!rules.exclude_trip(&trip(1, 42, Direction::Inbound, None)));
    }

    #[test]
    fn test_filter_excludes_useless_services() {
        let config = RuleConfig::default().with_service_filter(ServiceIdFilter::new([10, 11]));
        let rules = RuleSet::new(config).unwrap();
        assert!(rules.is_service_id_useful(10));
        assert!(!rules.is_service_id_useful(12));
        assert!(rules.exclude_service(12));
        assert!(!rules.exclude_trip(&trip(1, 11, Direction::Outbound, None)));
        assert!(rules.exclude_trip(&trip(1, 12, Direction::Outbound, None)));
        assert!(!rules.excluding_all());
    }

    #[test]
    fn test_empty_filter_excludes_all() {
        crate::logging::init();
        let config = RuleConfig::from_json(r#"{ "service_ids": [] }"#).unwrap();
        let rules = RuleSet::new(config).unwrap();
        assert!(rules.excluding_all());
        assert!(rules.exclude_service(1));
    }
}
