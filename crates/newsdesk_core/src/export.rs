use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::types::Article;
use crate::{Error, Result};

pub const EXPORT_HEADER: [&str; 9] = [
    "Nadpis",
    "Shrnutí",
    "Region",
    "Téma",
    "Důležitost",
    "Tagy",
    "Zdroj",
    "URL",
    "Čas",
];

/// Renders the filtered view as CSV: a bare header line followed by one row
/// per article with every field quoted.
pub fn export_csv(articles: &[Article]) -> Result<String> {
    let mut out = EXPORT_HEADER.join(",").into_bytes();
    out.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for article in articles {
        writer
            .write_record([
                &article.doporuceny_nadpis,
                &article.shrnuti,
                &article.region,
                &article.tema,
                &article.dulezitost,
                &article.tagy,
                &article.source_name,
                &article.url,
                &article.timestamp,
            ])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::External(e.into()))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("clanky_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_quoting() {
        let article = Article {
            doporuceny_nadpis: "Vláda schválila \"rozpočet\"".to_string(),
            shrnuti: "Shrnutí, s čárkou".to_string(),
            region: "CZ".to_string(),
            tema: "Politika".to_string(),
            dulezitost: "5".to_string(),
            tagy: "vláda,rozpočet".to_string(),
            source_name: "ČTK".to_string(),
            url: "https://www.ceskenoviny.cz/a/1".to_string(),
            timestamp: "2024-01-02T00:00:00Z".to_string(),
            ..Default::default()
        };

        let csv = export_csv(&[article]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Nadpis,Shrnutí,Region,Téma,Důležitost,Tagy,Zdroj,URL,Čas")
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"Vláda schválila \"\"rozpočet\"\"\",\"Shrnutí, s čárkou\",\"CZ\",\"Politika\",\"5\",\
                 \"vláda,rozpočet\",\"ČTK\",\"https://www.ceskenoviny.cz/a/1\",\"2024-01-02T00:00:00Z\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_fields_are_quoted() {
        let csv = export_csv(&[Article::default()]).unwrap();
        assert_eq!(csv.lines().nth(1), Some("\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\""));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv, "Nadpis,Shrnutí,Region,Téma,Důležitost,Tagy,Zdroj,URL,Čas\n");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "clanky_2024-03-07.csv");
    }
}
