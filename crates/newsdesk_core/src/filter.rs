use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Article;

/// A conjunction of optional equality constraints. An absent constraint (or
/// an empty topic set) does not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub region: Option<String>,
    pub topics: BTreeSet<String>,
    pub importance: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.insert(topic.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<String>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.region.is_some() || !self.topics.is_empty() || self.importance.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Predicate stage only; duplicates are handled by [`select`].
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(region) = &self.region {
            if article.region != *region {
                return false;
            }
        }
        if !self.topics.is_empty() && !self.topics.contains(&article.tema) {
            return false;
        }
        if let Some(importance) = &self.importance {
            if article.dulezitost != *importance {
                return false;
            }
        }
        true
    }
}

/// Drops rows the upstream sheet marked as duplicates.
pub fn dedupe(articles: &[Article]) -> Vec<Article> {
    articles.iter().filter(|a| !a.is_duplicate()).cloned().collect()
}

/// Deduplication followed by the filter predicates, preserving order.
pub fn select(articles: &[Article], filters: &FilterSet) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| !a.is_duplicate() && filters.matches(a))
        .cloned()
        .collect()
}

/// Distinct non-empty values offered as filter choices, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub topics: Vec<String>,
    pub importances: Vec<String>,
}

impl FilterOptions {
    pub fn from_articles(articles: &[Article]) -> Self {
        Self {
            regions: distinct(articles, |a| a.region.as_str()),
            topics: distinct(articles, |a| a.tema.as_str()),
            importances: distinct(articles, |a| a.dulezitost.as_str()),
        }
    }
}

fn distinct(articles: &[Article], field: fn(&Article) -> &str) -> Vec<String> {
    articles
        .iter()
        .filter(|a| !a.is_duplicate())
        .map(field)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
