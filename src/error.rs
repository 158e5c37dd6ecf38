use crate::models::Direction;

/// A record whose shape none of the agency rules anticipate.
///
/// Every variant means the rule tables are stale relative to the live
/// feed; the host is expected to abort the whole run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Unexpected route ID for route short name '{0}'")]
    UnexpectedRouteId(String),
    #[error("Unexpected route color for route short name '{0}'")]
    UnexpectedRouteColor(String),
    #[error("No headsign mapped for route {route_id} direction {direction}")]
    UnmappedHeadsign { route_id: u64, direction: Direction },
    #[error("Unexpected trips to merge on route {route_id}: '{first}' & '{second}'")]
    UnexpectedMerge {
        route_id: u64,
        first: String,
        second: String,
    },
    #[error("Unexpected stop ID '{0}'")]
    UnexpectedStopId(String),
}

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_messages() {
        let err = RuleError::UnmappedHeadsign {
            route_id: 42,
            direction: Direction::Inbound,
        };
        assert_eq!(err.to_string(), "No headsign mapped for route 42 direction 1");

        let err = RuleError::UnexpectedMerge {
            route_id: 1,
            first: "A".into(),
            second: "B".into(),
        };
        assert!(err.to_string().contains("'A' & 'B'"));
    }

    #[test]
    fn test_config_error_from_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(err.to_string().starts_with("Config parse error"));
    }
}
