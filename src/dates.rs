use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Rewrites `DD/MM/YYYY` into `YYYY-MM-DD`. Anything else is returned as-is,
/// so an already canonical date passes through untouched.
pub fn normalize(raw: &str) -> String {
    if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').collect();
        if let [day, month, year] = parts.as_slice() {
            return format!("{year}-{month:0>2}-{day:0>2}");
        }
    }
    raw.to_string()
}

/// Same as [`normalize`] for untyped input; non-strings become an empty string.
pub fn normalize_value(raw: &Value) -> String {
    match raw {
        Value::String(text) => normalize(text),
        _ => String::new(),
    }
}

/// Strict `DDDD-DD-DD` shape check that also rejects impossible calendar dates.
pub fn is_valid(date: &str) -> bool {
    parse_canonical(date).is_some()
}

pub fn parse_canonical(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != 4 && *idx != 7)
        .all(|(_, byte)| byte.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(date, CANONICAL_FORMAT).ok()
}

pub fn to_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// `DD/MM/YYYY`, the form shown to users.
pub fn format_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Normalizes, validates and de-duplicates a list of stored dates. Entries
/// that do not survive are dropped and logged.
pub fn sanitize<'a, I>(raw: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut dates = BTreeSet::new();
    for value in raw {
        let normalized = normalize_value(value);
        match parse_canonical(&normalized) {
            Some(date) => {
                dates.insert(date);
            }
            None => warn!("dropping invalid completion date {value}"),
        }
    }
    dates
}
