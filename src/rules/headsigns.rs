use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, error};

use crate::error::RuleError;
use crate::models::Direction;
use crate::rules::clean::{self, Acronyms};

/// How trip headsigns are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadsignPolicy {
    /// Clean the GTFS headsign text; use the table when there is none.
    #[default]
    Cleanup,
    /// Always use the `(route, direction)` table.
    Table,
}

/// Raw headsign entry from the JSON table.
#[derive(Debug, Deserialize)]
struct RawHeadsign {
    route_id: u64,
    direction: u8,
    headsign: String,
}

/// Accepted pair of direction variants collapsing into one headsign.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRule {
    pub route_id: u64,
    pub headsigns: [String; 2],
    pub merged: String,
}

impl MergeRule {
    /// Both candidates belong to this rule's pair (in any order).
    fn accepts(&self, first: &str, second: &str) -> bool {
        let known = |s: &str| self.headsigns.iter().any(|h| h == s);
        known(first) && known(second)
    }
}

#[derive(Debug, Deserialize)]
struct RawHeadsignTables {
    headsigns: Vec<RawHeadsign>,
    merges: Vec<MergeRule>,
}

/// Embedded headsign tables (compiled into the binary).
const HEADSIGN_TABLES_JSON: &str = include_str!("../../assets/headsigns.json");

struct HeadsignTables {
    by_route_direction: HashMap<(u64, Direction), String>,
    merges: Vec<MergeRule>,
}

static HEADSIGN_TABLES: OnceLock<HeadsignTables> = OnceLock::new();

fn get_tables() -> &'static HeadsignTables {
    HEADSIGN_TABLES.get_or_init(|| {
        let raw: RawHeadsignTables = serde_json::from_str(HEADSIGN_TABLES_JSON)
            .expect("embedded headsign table is valid JSON");

        let mut by_route_direction = HashMap::new();
        for entry in raw.headsigns {
            let direction = Direction::from_id(entry.direction)
                .expect("embedded headsign table uses direction 0 or 1");
            by_route_direction.insert((entry.route_id, direction), entry.headsign);
        }

        HeadsignTables {
            by_route_direction,
            merges: raw.merges,
        }
    })
}

/// Headsign for `(route, direction)` from the fixed vocabulary.
pub fn table_headsign(route_id: u64, direction: Direction) -> Result<&'static str, RuleError> {
    match get_tables().by_route_direction.get(&(route_id, direction)) {
        Some(headsign) => Ok(headsign.as_str()),
        None => {
            error!(
                "[HEADSIGNS] No headsign for route {} direction {}",
                route_id, direction
            );
            Err(RuleError::UnmappedHeadsign {
                route_id,
                direction,
            })
        }
    }
}

/// Clean a GTFS trip headsign into its rider-facing form.
///
/// - title-case every word, keeping protected acronyms upper-case
/// - drop a trailing "via ..." clause
/// - strip a leading "Area - " prefix, then a leading "to "
/// - keep only what follows the first " - " separator
/// - space slashes, abbreviate street types, tidy bounds and capitals
pub fn clean_trip_headsign(headsign: &str, acronyms: &Acronyms) -> String {
    static RE_VIA: OnceLock<Regex> = OnceLock::new();
    static RE_STARTS_WITH_AREA: OnceLock<Regex> = OnceLock::new();
    static RE_STARTS_WITH_TO: OnceLock<Regex> = OnceLock::new();
    static RE_FIRST_SEPARATOR: OnceLock<Regex> = OnceLock::new();

    let re_via = RE_VIA.get_or_init(|| Regex::new(r"(?i)\s+via\b.*$").unwrap());
    let re_area =
        RE_STARTS_WITH_AREA.get_or_init(|| Regex::new(r"^(?:(?:\w+\.? )+- )+").unwrap());
    let re_to = RE_STARTS_WITH_TO.get_or_init(|| Regex::new(r"(?i)^to\s+").unwrap());
    let re_separator = RE_FIRST_SEPARATOR.get_or_init(|| Regex::new(r"^.*? - ").unwrap());

    let mut s = clean::title_case_words(headsign.trim(), acronyms);
    s = re_via.replace(&s, "").into_owned();
    s = clean::clean_dashes(&s);
    s = re_area.replace(&s, "").into_owned();
    s = re_to.replace(&s, "").into_owned();
    s = re_separator.replace(&s, "").into_owned();
    s = clean::clean_slashes(&s);
    s = clean::clean_bounds(&s);
    s = clean::clean_street_types(&s);
    s = clean::clean_bay_road(&s);
    clean::clean_label(&s)
}

/// Rider-facing headsign for a trip.
///
/// With [`HeadsignPolicy::Cleanup`] the raw GTFS text is cleaned; the table
/// is used when there is no text or it cleans down to nothing.
pub fn assign_trip_headsign(
    route_id: u64,
    direction: Direction,
    raw_headsign: Option<&str>,
    policy: HeadsignPolicy,
    acronyms: &Acronyms,
) -> Result<String, RuleError> {
    if policy == HeadsignPolicy::Cleanup {
        if let Some(raw) = raw_headsign {
            let cleaned = clean_trip_headsign(raw, acronyms);
            if !cleaned.is_empty() {
                return Ok(cleaned);
            }
            debug!(
                "[HEADSIGNS] Headsign {:?} on route {} cleaned to nothing, using table",
                raw, route_id
            );
        }
    }
    table_headsign(route_id, direction).map(str::to_string)
}

/// Canonical headsign when two direction variants of a route collapse.
///
/// Only pairs listed in the merge table are accepted.
pub fn merge_trip_headsigns(route_id: u64, first: &str, second: &str) -> Result<String, RuleError> {
    let rule = get_tables()
        .merges
        .iter()
        .find(|rule| rule.route_id == route_id && rule.accepts(first, second));
    match rule {
        Some(rule) => {
            debug!(
                "[HEADSIGNS] Merged {:?} & {:?} on route {} into {:?}",
                first, second, route_id, rule.merged
            );
            Ok(rule.merged.clone())
        }
        None => {
            error!(
                "[HEADSIGNS] Unexpected trips to merge on route {}: {:?} & {:?}",
                route_id, first, second
            );
            Err(RuleError::UnexpectedMerge {
                route_id,
                first: first.to_string(),
                second: second.to_string(),
            })
        }
    }
}

/// All merge rules, for hosts that want to audit the table.
pub fn merge_rules() -> &'static [MergeRule] {
    &get_tables().merges
}
