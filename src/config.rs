use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::ServiceIdFilter;
use crate::rules::clean::DEFAULT_ACRONYMS;
use crate::rules::colors::{normalize_hex, AGENCY_COLOR_BROWN, PLACEHOLDER_COLOR};
use crate::rules::headsigns::HeadsignPolicy;

/// Top-level configuration file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    agency: AgencyConfig,
    #[serde(default)]
    routes: RouteConfig,
    #[serde(default)]
    headsigns: HeadsignConfig,
    #[serde(default)]
    stops: StopConfig,
    service_ids: Option<Vec<i64>>,
}

/// Agency settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AgencyConfig {
    #[serde(default = "default_agency_color")]
    pub color: String,
}

/// Route settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// Declared color treated as "no color".
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: String,
}

/// Headsign settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadsignConfig {
    #[serde(default)]
    pub policy: HeadsignPolicy,
}

/// Stop name settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StopConfig {
    #[serde(default = "default_protected_acronyms")]
    pub protected_acronyms: Vec<String>,
}

fn default_agency_color() -> String {
    AGENCY_COLOR_BROWN.to_string()
}
fn default_placeholder_color() -> String {
    PLACEHOLDER_COLOR.to_string()
}
fn default_protected_acronyms() -> Vec<String> {
    DEFAULT_ACRONYMS.iter().map(|s| s.to_string()).collect()
}

impl Default for AgencyConfig {
    fn default() -> Self {
        AgencyConfig {
            color: default_agency_color(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            placeholder_color: default_placeholder_color(),
        }
    }
}

impl Default for StopConfig {
    fn default() -> Self {
        StopConfig {
            protected_acronyms: default_protected_acronyms(),
        }
    }
}

/// Resolved rule set configuration.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub agency: AgencyConfig,
    pub routes: RouteConfig,
    pub headsigns: HeadsignConfig,
    pub stops: StopConfig,
    /// `None` means no service-id filtering at all.
    pub service_filter: Option<ServiceIdFilter>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig::from_raw(RawConfig::default())
    }
}

impl RuleConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse config from a JSON string. Missing sections take the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let mut config = Self::from_raw(raw);
        config.validate()?;
        config.normalize();
        Ok(config)
    }

    fn from_raw(raw: RawConfig) -> Self {
        RuleConfig {
            agency: raw.agency,
            routes: raw.routes,
            headsigns: raw.headsigns,
            stops: raw.stops,
            service_filter: raw.service_ids.map(ServiceIdFilter::new),
        }
    }

    /// Replace the service-id filter (computed by the host from the feed).
    pub fn with_service_filter(mut self, filter: ServiceIdFilter) -> Self {
        self.service_filter = Some(filter);
        self
    }

    /// Validate config values are well-formed.
    fn validate(&self) -> Result<(), ConfigError> {
        if normalize_hex(&self.agency.color).is_none() {
            return Err(ConfigError::Validation(format!(
                "agency.color must be a 6-digit hex color, got {:?}",
                self.agency.color
            )));
        }
        if normalize_hex(&self.routes.placeholder_color).is_none() {
            return Err(ConfigError::Validation(format!(
                "routes.placeholder_color must be a 6-digit hex color, got {:?}",
                self.routes.placeholder_color
            )));
        }
        for acronym in &self.stops.protected_acronyms {
            let valid = !acronym.is_empty()
                && acronym
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "stops.protected_acronyms must be upper-case alphanumeric, got {:?}",
                    acronym
                )));
            }
        }
        Ok(())
    }

    /// Canonical color spelling once validated.
    fn normalize(&mut self) {
        if let Some(hex) = normalize_hex(&self.agency.color) {
            self.agency.color = hex;
        }
        if let Some(hex) = normalize_hex(&self.routes.placeholder_color) {
            self.routes.placeholder_color = hex;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RuleConfig::from_json("{}").expect("should parse empty config");
        assert_eq!(config.agency.color, "A19153");
        assert_eq!(config.routes.placeholder_color, "FF0000");
        assert_eq!(config.headsigns.policy, HeadsignPolicy::Cleanup);
        assert!(config.stops.protected_acronyms.contains(&"MUN".to_string()));
        assert!(config.service_filter.is_none());
    }

    #[test]
    fn test_default_matches_empty_json() {
        let default = RuleConfig::default();
        let parsed = RuleConfig::from_json("{}").unwrap();
        assert_eq!(default.agency.color, parsed.agency.color);
        assert_eq!(default.stops.protected_acronyms, parsed.stops.protected_acronyms);
    }

    #[test]
    fn test_full_config() {
        let json = r##"{
            "agency": { "color": "#a19153" },
            "routes": { "placeholder_color": "ff0000" },
            "headsigns": { "policy": "table" },
            "stops": { "protected_acronyms": ["MUN", "HSC"] },
            "service_ids": [101, 102]
        }"##;
        let config = RuleConfig::from_json(json).expect("should parse full config");
        assert_eq!(config.agency.color, "A19153");
        assert_eq!(config.routes.placeholder_color, "FF0000");
        assert_eq!(config.headsigns.policy, HeadsignPolicy::Table);
        assert_eq!(config.stops.protected_acronyms, vec!["MUN", "HSC"]);
        let filter = config.service_filter.expect("filter present");
        assert!(filter.contains(101));
        assert!(!filter.contains(103));
    }

    #[test]
    fn test_empty_service_ids_kept_as_empty_filter() {
        let config = RuleConfig::from_json(r#"{ "service_ids": [] }"#).unwrap();
        assert_eq!(config.service_filter, Some(ServiceIdFilter::default()));
    }

    #[test]
    fn test_validation_bad_agency_color() {
        let err = RuleConfig::from_json(r#"{ "agency": { "color": "brown" } }"#).unwrap_err();
        assert!(err.to_string().contains("agency.color"));
    }

    #[test]
    fn test_validation_bad_placeholder_color() {
        let err =
            RuleConfig::from_json(r#"{ "routes": { "placeholder_color": "F00" } }"#).unwrap_err();
        assert!(err.to_string().contains("placeholder_color"));
    }

    #[test]
    fn test_validation_lower_case_acronym() {
        let err = RuleConfig::from_json(r#"{ "stops": { "protected_acronyms": ["mun"] } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("protected_acronyms"));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = RuleConfig::from_json(r#"{ "headsigns": { "policy": "guess" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_section_is_parse_error() {
        let err = RuleConfig::from_json(r#"{ "display": {} }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RuleConfig::load(Path::new("/nonexistent/metrobus-rules.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_with_service_filter() {
        let config = RuleConfig::default().with_service_filter(ServiceIdFilter::new([7]));
        assert!(config.service_filter.unwrap().contains(7));
    }
}
