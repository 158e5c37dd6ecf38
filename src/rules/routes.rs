use regex::Regex;
use std::sync::OnceLock;
use tracing::error;

use crate::error::RuleError;
use crate::models::RouteRecord;
use crate::rules::clean;

/// Route id band for short names ending with "A" (e.g. 3A → 10003).
pub const RID_ENDS_WITH_A: u64 = 10_000;
/// Route id band for short names ending with "B" (e.g. 3B → 20003).
pub const RID_ENDS_WITH_B: u64 = 20_000;

/// Stable numeric route id from a route short name.
///
/// - `"12"` → 12
/// - `"3A"` → 10003, `"3B"` → 20003
/// - anything else is fatal
pub fn derive_route_id(short_name: &str) -> Result<u64, RuleError> {
    static RE_LETTERED: OnceLock<Regex> = OnceLock::new();
    let re_lettered = RE_LETTERED.get_or_init(|| Regex::new(r"^(\d+)([AB])$").unwrap());

    let rsn = short_name.trim();
    let unexpected = || {
        error!("[ROUTES] Unexpected route ID for {:?}", short_name);
        RuleError::UnexpectedRouteId(rsn.to_string())
    };

    if !rsn.is_empty() && rsn.chars().all(|c| c.is_ascii_digit()) {
        return rsn.parse::<u64>().map_err(|_| unexpected());
    }

    let caps = re_lettered.captures(rsn).ok_or_else(unexpected)?;
    let digits: u64 = caps[1].parse().map_err(|_| unexpected())?;
    let band = match &caps[2] {
        "A" => RID_ENDS_WITH_A,
        _ => RID_ENDS_WITH_B,
    };
    digits.checked_add(band).ok_or_else(unexpected)
}

/// Route short name as displayed: the GTFS value, trimmed.
pub fn derive_route_short_name(route: &RouteRecord) -> String {
    route.short_name.trim().to_string()
}

/// Route long name with slash-separated lists and label spacing cleaned.
pub fn derive_route_long_name(route: &RouteRecord) -> String {
    let long_name = route.long_name.as_deref().unwrap_or_default();
    clean::clean_label(&clean::clean_slashes(long_name))
}
