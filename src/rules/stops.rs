use regex::Regex;
use std::sync::OnceLock;
use tracing::error;

use crate::error::RuleError;
use crate::rules::clean::{self, Acronyms};

/// Normalize a raw stop name for display.
///
/// Steps run in a fixed order; later ones rely on earlier ones:
/// 1. all-caps names are lower-cased, protected acronyms excepted
/// 2. civic addresses: "Topsail Rd #1234" → "1234, Topsail Rd"
/// 3. dashes: "-(" → " (", dangling "- opp" dropped, connectors → " / "
/// 4. and/apartment/building/centre/plaza shorthands
/// 5. street types and ordinals
/// 6. slashes, whitespace, parentheses, bounds and capitals
///
/// The result is a fixed point: normalizing it again changes nothing.
pub fn normalize_stop_name(name: &str, acronyms: &Acronyms) -> String {
    static RE_CIVIC_ADDRESS: OnceLock<Regex> = OnceLock::new();
    static RE_DASH_PAREN: OnceLock<Regex> = OnceLock::new();
    static RE_ENDS_WITH_DASH: OnceLock<Regex> = OnceLock::new();
    static RE_CONNECTOR: OnceLock<Regex> = OnceLock::new();
    static RE_SHORTHANDS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

    let re_civic = RE_CIVIC_ADDRESS
        .get_or_init(|| Regex::new(r"^([^#]*)#\s*([0-9]{1,5})(.*)$").unwrap());
    let re_dash_paren = RE_DASH_PAREN.get_or_init(|| Regex::new(r"\s*-\s*\(").unwrap());
    let re_ends_with_dash = RE_ENDS_WITH_DASH
        .get_or_init(|| Regex::new(r"(?i)\s*-\s*(?:opposite|opp)?\s*$").unwrap());
    let re_connector = RE_CONNECTOR.get_or_init(|| {
        Regex::new(
            r"(?i)\s*(?:-\s*(?:at|by|east of|west of|near|opposite|opp)\b(?:\s+near\b)?|-|\b(?:at|by|east of|west of|opposite|opp|near)\b)\s*",
        )
        .unwrap()
    });
    let shorthands = RE_SHORTHANDS.get_or_init(|| {
        [
            (r"(?i)\band\b", "&"),
            (r"(?i)\bapartment\b", "Apt"),
            (r"(?i)\bbuilding\b", "Bldg"),
            (r"(?i)\bcent(?:er|re)\b", "Ctr"),
            (r"(?i)\bplaza\b", "Plz"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect()
    });

    // 1. Case folding
    let mut s = clean::fold_upper_case(name.trim(), acronyms);

    // 2. Civic address
    s = re_civic.replace(&s, "${2}, ${1}${3}").into_owned();

    // 3. Dashes and connectors
    s = re_dash_paren.replace_all(&s, " (").into_owned();
    s = re_ends_with_dash.replace(&s, "").into_owned();
    s = re_connector.replace_all(&s, " / ").into_owned();

    // 4. Shorthands
    for (re, replacement) in shorthands {
        s = re.replace_all(&s, *replacement).into_owned();
    }

    // 5. Street types, ordinals
    s = clean::clean_street_types(&s);
    s = clean::clean_bay_road(&s);
    s = clean::clean_ordinals(&s);

    // 6. Label
    s = clean::clean_slashes(&s);
    clean::clean_label(&s)
}

/// Integer stop id: the id itself when numeric, else its first digit run.
pub fn derive_stop_id(stop_id: &str) -> Result<u32, RuleError> {
    static RE_DIGITS: OnceLock<Regex> = OnceLock::new();
    let re_digits = RE_DIGITS.get_or_init(|| Regex::new(r"[0-9]+").unwrap());

    let unexpected = || {
        error!("[STOPS] Unexpected stop ID {:?}", stop_id);
        RuleError::UnexpectedStopId(stop_id.to_string())
    };

    let digits = if !stop_id.is_empty() && stop_id.chars().all(|c| c.is_ascii_digit()) {
        stop_id
    } else {
        re_digits.find(stop_id).ok_or_else(unexpected)?.as_str()
    };
    digits.parse::<u32>().map_err(|_| unexpected())
}
