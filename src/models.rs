use std::collections::HashSet;

/// GTFS `direction_id` of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Outbound, // 0
    Inbound,  // 1
}

impl Direction {
    /// Parse a GTFS `direction_id`. Anything other than 0 or 1 is rejected.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Direction::Outbound),
            1 => Some(Direction::Inbound),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Direction::Outbound => 0,
            Direction::Inbound => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A route as read from `routes.txt` by the host pipeline.
#[derive(Debug, Clone, Default)]
pub struct RouteRecord {
    pub short_name: String,
    pub long_name: Option<String>,
    /// Declared `route_color`, if any (hex, with or without `#`).
    pub color: Option<String>,
}

impl RouteRecord {
    pub fn new(short_name: &str) -> Self {
        RouteRecord {
            short_name: short_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_long_name(mut self, long_name: &str) -> Self {
        self.long_name = Some(long_name.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

/// A trip as read from `trips.txt`, already resolved to its numeric route id.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub route_id: u64,
    pub service_id: i64,
    pub direction: Direction,
    pub headsign: Option<String>,
}

/// A stop as read from `stops.txt`.
#[derive(Debug, Clone)]
pub struct StopRecord {
    pub id: String,
    pub name: String,
}

impl StopRecord {
    pub fn new(id: &str, name: &str) -> Self {
        StopRecord {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Service ids kept after date-range filtering.
///
/// Computed once by the host before any rule runs and never mutated
/// afterwards. An empty filter excludes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceIdFilter {
    ids: HashSet<i64>,
}

impl ServiceIdFilter {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        ServiceIdFilter {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, service_id: i64) -> bool {
        self.ids.contains(&service_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl FromIterator<i64> for ServiceIdFilter {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        ServiceIdFilter::new(iter)
    }
}

/// Whether a service id survived the host's date-range filtering.
pub fn is_service_id_useful(service_id: i64, filter: &ServiceIdFilter) -> bool {
    filter.contains(service_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_id() {
        assert_eq!(Direction::from_id(0), Some(Direction::Outbound));
        assert_eq!(Direction::from_id(1), Some(Direction::Inbound));
        assert_eq!(Direction::from_id(2), None);
    }

    #[test]
    fn test_direction_round_trip_id() {
        for d in [Direction::Outbound, Direction::Inbound] {
            assert_eq!(Direction::from_id(d.id()), Some(d));
        }
        assert_eq!(Direction::Inbound.to_string(), "1");
    }

    #[test]
    fn test_route_record_builder() {
        let route = RouteRecord::new("3A").with_long_name("Churchill Sq").with_color("");
        assert_eq!(route.short_name, "3A");
        assert_eq!(route.long_name.as_deref(), Some("Churchill Sq"));
        assert_eq!(route.color.as_deref(), Some(""));
    }

    #[test]
    fn test_service_id_useful() {
        let filter: ServiceIdFilter = [1, 5, 9].into_iter().collect();
        assert!(is_service_id_useful(5, &filter));
        assert!(!is_service_id_useful(2, &filter));
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_empty_filter_excludes_everything() {
        let filter = ServiceIdFilter::default();
        assert!(filter.is_empty());
        assert!(!is_service_id_useful(1, &filter));
        assert!(!is_service_id_useful(0, &filter));
    }
}
