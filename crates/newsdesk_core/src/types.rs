use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic value the upstream sheet uses to flag a duplicate row.
pub const DUPLICATE_TOPIC: &str = "Duplicitni";
/// Headline value the upstream sheet uses to flag a duplicate row.
pub const DUPLICATE_HEADLINE: &str = "Duplicitní zpráva";

/// One row of the published sheet.
///
/// Every column is kept as text exactly as published; columns missing from a
/// row deserialize to the empty string. Typed views (`importance`,
/// `published_at`) are derived on demand and never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub id_hash: String,
    pub timestamp: String,
    pub region: String,
    pub dulezitost: String,
    pub tema: String,
    pub shrnuti: String,
    pub doporuceny_nadpis: String,
    pub tagy: String,
    pub score: String,
    pub jazyk: String,
    pub url: String,
    pub source_name: String,
}

impl Article {
    /// Editorial importance, 0 when `dulezitost` does not start with a
    /// number. The sign is kept, so a negative value ranks below rows with no
    /// number at all.
    pub fn importance(&self) -> i64 {
        leading_integer(&self.dulezitost).unwrap_or(0)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    pub fn is_duplicate(&self) -> bool {
        self.tema == DUPLICATE_TOPIC || self.doporuceny_nadpis == DUPLICATE_HEADLINE
    }
}

/// Reads an optionally signed run of digits after leading whitespace,
/// ignoring whatever follows ("4 - vysoká" is 4). Values out of range
/// saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let digits = &rest[..end];
    let value = match digits.parse::<i64>() {
        Ok(value) => value,
        Err(_) => i64::MAX,
    };
    Some(if negative { value.saturating_neg() } else { value })
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses the sheet's timestamp column. Offsets are honoured when present,
/// naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
