//! Custom serde module for parsing duration strings like "2500ms", "2s",
//! "1m".

use serde::{self, Deserialize, Deserializer};
use std::time::Duration;

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => parse_duration(&s).map_err(serde::de::Error::custom),
        None => Ok(Duration::ZERO),
    }
}

pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Duration::ZERO);
    }

    let (value, unit) = match s.find(|c: char| c.is_ascii_alphabetic()) {
        Some(pos) => s.split_at(pos),
        None => (s, "s"),
    };

    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration number: {}", value))?;

    let seconds = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => return Err(format!("unknown duration unit: {}", unit)),
    };

    Ok(Duration::from_secs_f64(seconds))
}
