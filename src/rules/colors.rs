use tracing::{debug, error, warn};

use crate::error::RuleError;
use crate::models::RouteRecord;

/// Agency brand color (brown, from the old logo).
pub const AGENCY_COLOR_BROWN: &str = "A19153";

/// Declared color the feed uses when it has no real color for a route.
pub const PLACEHOLDER_COLOR: &str = "FF0000";

const COLOR_ROUTE_3: &str = "8FC74A";

/// Route short name → display color.
///
/// Route 27 has no agreed color yet and maps to `None` (host default).
const ROUTE_COLORS: &[(&str, Option<&str>)] = &[
    ("1", Some("F6863C")),
    ("2", Some("26A450")),
    ("3", Some(COLOR_ROUTE_3)),
    ("3A", Some(COLOR_ROUTE_3)),
    ("3B", Some(COLOR_ROUTE_3)),
    ("5", Some("F7ACB0")),
    ("6", Some("933D40")),
    ("9", Some("691A5C")),
    ("10", Some("8F44AD")),
    ("11", Some("3E4095")),
    ("12", Some("00BEF2")),
    ("13", Some("068C83")),
    ("14", Some("1A5B33")),
    ("15", Some("C4393C")),
    ("16", Some("691A5C")),
    ("17", Some("9D6743")),
    ("18", Some("467C96")),
    ("19", Some("ED258F")),
    ("20", Some("FFCC2C")),
    ("21", Some("ADA425")),
    ("22", Some("D6400E")),
    ("23", Some("A6787A")),
    ("24", Some("363435")),
    ("25", Some("3E4095")),
    ("26", Some("363435")),
    ("27", None),
    ("30", Some("EECE20")),
];

/// Canonical table key: digits lose leading zeros, letters are upper-cased.
fn table_key(short_name: &str) -> String {
    let trimmed = short_name.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let digits = trimmed.trim_start_matches('0');
        if digits.is_empty() {
            "0".to_string()
        } else {
            digits.to_string()
        }
    } else {
        trimmed.to_uppercase()
    }
}

/// Look up the table color for a route short name.
pub fn route_color(short_name: &str) -> Result<Option<&'static str>, RuleError> {
    let key = table_key(short_name);
    match ROUTE_COLORS.iter().find(|(name, _)| *name == key) {
        Some((_, color)) => Ok(*color),
        None => {
            error!("[COLORS] Unexpected route color for {:?}", short_name);
            Err(RuleError::UnexpectedRouteColor(short_name.trim().to_string()))
        }
    }
}

/// Normalize a hex color (e.g., "#ff6644") to "FF6644". `None` if malformed.
pub fn normalize_hex(color: &str) -> Option<String> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(hex.to_ascii_uppercase())
}

/// Display color for a route.
///
/// A real declared color wins. An absent, empty, placeholder or malformed
/// one falls back to the fixed table, which is fatal for unknown routes.
pub fn derive_route_color(
    route: &RouteRecord,
    placeholder_color: &str,
) -> Result<Option<String>, RuleError> {
    if let Some(declared) = route.color.as_deref().map(str::trim) {
        if declared.is_empty() {
            // No declared color.
        } else if declared
            .trim_start_matches('#')
            .eq_ignore_ascii_case(placeholder_color.trim_start_matches('#'))
        {
            debug!("[COLORS] Ignoring placeholder color for route {:?}", route.short_name);
        } else if let Some(hex) = normalize_hex(declared) {
            return Ok(Some(hex));
        } else {
            warn!(
                "[COLORS] Ignoring malformed color {:?} for route {:?}",
                declared, route.short_name
            );
        }
    }

    let color = route_color(&route.short_name)?;
    if color.is_none() {
        debug!("[COLORS] Route {:?} has no color, using default", route.short_name);
    }
    Ok(color.map(str::to_string))
}
