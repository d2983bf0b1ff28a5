use std::cmp::Reverse;

use crate::types::Article;

/// Orders articles by importance, most important first, then by timestamp,
/// newest first. Rows whose timestamp cannot be parsed sort after every dated
/// row of the same importance. Equal keys keep their input order.
pub fn rank(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by_cached_key(|article| {
        (Reverse(article.importance()), Reverse(article.published_at()))
    });
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, importance: &str, timestamp: &str) -> Article {
        Article {
            id_hash: id.to_string(),
            dulezitost: importance.to_string(),
            timestamp: timestamp.to_string(),
            ..Default::default()
        }
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id_hash.as_str()).collect()
    }

    #[test]
    fn test_importance_then_recency() {
        let ranked = rank(vec![
            article("1", "5", "2024-01-02T00:00:00Z"),
            article("2", "3", "2024-01-03T00:00:00Z"),
            article("3", "5", "2024-01-01T00:00:00Z"),
        ]);
        assert_eq!(ids(&ranked), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_unparseable_values_sort_last() {
        let ranked = rank(vec![
            article("no-date", "4", "nevím"),
            article("no-rank", "?", "2024-05-01T00:00:00Z"),
            article("dated", "4", "2020-01-01T00:00:00Z"),
        ]);
        assert_eq!(ids(&ranked), vec!["dated", "no-date", "no-rank"]);
    }

    #[test]
    fn test_negative_importance_ranks_below_missing() {
        let ranked = rank(vec![
            article("negative", "-1", "2024-05-01T00:00:00Z"),
            article("blank", "", "2020-01-01T00:00:00Z"),
            article("low", "1", "2020-01-01T00:00:00Z"),
        ]);
        assert_eq!(ids(&ranked), vec!["low", "blank", "negative"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let ranked = rank(vec![
            article("a", "2", "2024-01-01T00:00:00Z"),
            article("b", "2", "2024-01-01T00:00:00Z"),
            article("c", "", ""),
            article("d", "x", "y"),
            article("e", "2", "2024-01-01T00:00:00Z"),
        ]);
        assert_eq!(ids(&ranked), vec!["a", "b", "e", "c", "d"]);
    }

    #[test]
    fn test_ranked_output_is_ordered() {
        let ranked = rank(vec![
            article("1", "1", "2024-03-01T08:00:00Z"),
            article("2", "5", "2024-03-01 09:00:00"),
            article("3", "3", ""),
            article("4", "5", "2024-03-02"),
            article("5", "3", "2024-02-28T23:59:59+01:00"),
            article("6", "abc", "2024-03-05T00:00:00Z"),
        ]);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.importance() >= b.importance());
            if a.importance() == b.importance() {
                assert!(a.published_at() >= b.published_at());
            }
        }
    }
}
