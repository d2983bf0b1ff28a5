//! Plain-text article cards for the terminal.

use chrono::{DateTime, Utc};
use newsdesk_core::{Article, FilterOptions};

const RULE: &str = "────────────────────────────────────────";

pub fn render_card(article: &Article, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let stars = article.importance_stars();
    let importance = if article.dulezitost.is_empty() { "-" } else { article.dulezitost.as_str() };
    out.push_str(&format!("{} [{}] {}\n", stars, importance, article.headline()));

    let mut meta = vec![article.time_ago(now)];
    if !article.region.is_empty() {
        meta.push(article.region.clone());
    }
    if !article.tema.is_empty() {
        meta.push(article.tema.clone());
    }
    meta.push(article.source_label());
    out.push_str(&format!("  {}\n", meta.join(" · ")));

    if !article.shrnuti.is_empty() {
        out.push_str(&format!("  {}\n", article.shrnuti));
    }
    let tags = article.display_tags();
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
        out.push_str(&format!("  {}\n", tags.join(" ")));
    }
    if !article.url.is_empty() {
        out.push_str(&format!("  {}\n", article.url));
    }
    out
}

pub fn render_list(articles: &[Article], now: DateTime<Utc>) -> String {
    articles
        .iter()
        .map(|a| render_card(a, now))
        .collect::<Vec<_>>()
        .join(&format!("{}\n", RULE))
}

/// One ticker frame: position dots, headline and the short meta line.
pub fn render_ticker(article: &Article, index: usize, len: usize, now: DateTime<Utc>) -> String {
    let dots: String = (0..len).map(|i| if i == index { '●' } else { '○' }).collect();
    format!(
        "🔴 {} {}\n   {} · {} · {}",
        dots,
        article.headline(),
        article.time_ago(now),
        article.region,
        article.source_label()
    )
}

pub fn render_options(options: &FilterOptions) -> String {
    let importances: Vec<String> = options
        .importances
        .iter()
        .map(|value| {
            let stars = value
                .trim()
                .parse::<usize>()
                .map(|n| "★".repeat(n.min(5)))
                .unwrap_or_default();
            format!("{} {}", value, stars).trim_end().to_string()
        })
        .collect();
    format!(
        "Region: {}\nTéma: {}\nDůležitost: {}\n",
        options.regions.join(", "),
        options.topics.join(", "),
        importances.join(", ")
    )
}
