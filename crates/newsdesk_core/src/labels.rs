//! Display labels shared by the CLI cards and the web API.
//!
//! Each helper degrades to a fixed Czech placeholder instead of failing, so a
//! malformed row still renders.

use chrono::{DateTime, Utc};
use url::Url;

use crate::types::Article;

pub const UNKNOWN_TIME: &str = "Neznámý čas";
pub const UNKNOWN_SOURCE: &str = "Neznámý zdroj";
pub const MISSING_HEADLINE: &str = "Bez nadpisu";
const MAX_TAGS: usize = 3;
const MAX_STARS: i64 = 5;

impl Article {
    pub fn headline(&self) -> &str {
        if self.doporuceny_nadpis.is_empty() {
            MISSING_HEADLINE
        } else {
            &self.doporuceny_nadpis
        }
    }

    /// Host of the article URL without a leading `www.`, falling back to the
    /// sheet's `source_name`.
    pub fn source_label(&self) -> String {
        let host = Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.trim_start_matches("www.").to_string()));
        match host {
            Some(host) if !host.is_empty() => host,
            _ if !self.source_name.is_empty() => self.source_name.clone(),
            _ => UNKNOWN_SOURCE.to_string(),
        }
    }

    pub fn display_tags(&self) -> Vec<&str> {
        if self.tagy.is_empty() {
            return Vec::new();
        }
        self.tagy.split(',').take(MAX_TAGS).map(str::trim).collect()
    }

    pub fn importance_stars(&self) -> String {
        "★".repeat(self.importance().clamp(0, MAX_STARS) as usize)
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        match self.published_at() {
            Some(published) => czech_distance(now.signed_duration_since(published)),
            None => UNKNOWN_TIME.to_string(),
        }
    }
}

fn czech_distance(elapsed: chrono::Duration) -> String {
    let seconds = elapsed.num_seconds();
    if seconds < 0 {
        return "právě teď".to_string();
    }
    if seconds < 45 {
        return "před méně než minutou".to_string();
    }
    let minutes = (seconds + 30) / 60;
    if minutes < 45 {
        return ago(minutes, "minutou", "minutami");
    }
    let hours = (minutes + 30) / 60;
    if hours < 24 {
        return ago(hours, "hodinou", "hodinami");
    }
    let days = (hours + 12) / 24;
    if days < 30 {
        return ago(days, "dnem", "dny");
    }
    let months = (days + 15) / 30;
    if months < 12 {
        return ago(months, "měsícem", "měsíci");
    }
    ago(days / 365, "rokem", "lety")
}

fn ago(count: i64, singular: &str, plural: &str) -> String {
    let count = count.max(1);
    let unit = if count == 1 { singular } else { plural };
    format!("před {} {}", count, unit)
}

/// The "X z Y článků" badge.
pub fn summary_line(shown: usize, total: usize) -> String {
    format!("{} z {} článků", shown, total)
}
