use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use newsdesk_core::{Article, Error, Result};

/// Parses the sheet export. The first row names the columns; each later row
/// becomes one [`Article`], with missing trailing cells read as empty and
/// cells beyond the header ignored. Blank lines are skipped.
pub fn parse_articles(text: &str) -> Result<Vec<Article>> {
    parse_reader(text.as_bytes())
}

/// Like [`parse_articles`], but reads the body from `reader`.
///
/// A quoted field that is never closed fails with [`Error::Malformed`]
/// instead of swallowing the rest of the sheet. A repeated column name keeps
/// its first occurrence; later ones become `name_1`, `name_2` and so on.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Vec<Article>> {
    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    if let Some(line) = unterminated_quote(&body) {
        return Err(Error::Malformed(format!(
            "quoted field opened on line {} is never closed",
            line
        )));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(body.as_slice());

    let headers = unique_headers(reader.headers()?);
    let width = headers.len();

    let mut articles = Vec::new();
    for record in reader.records() {
        let mut record = record?;
        if record.len() > width {
            record.truncate(width);
        }
        while record.len() < width {
            record.push_field("");
        }
        articles.push(record.deserialize::<Article>(Some(&headers))?);
    }
    Ok(articles)
}

/// Line on which a quoted field opens without ever closing. A quote only
/// opens a field at the field's first byte and `""` inside one is an escape,
/// the same rules the reader applies.
fn unterminated_quote(body: &[u8]) -> Option<usize> {
    let mut line = 1;
    let mut opened_at = None;
    let mut field_start = true;
    let mut bytes = body.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        if b == b'\n' {
            line += 1;
        }
        if opened_at.is_some() {
            if b == b'"' {
                if bytes.peek() == Some(&b'"') {
                    bytes.next();
                } else {
                    opened_at = None;
                    field_start = false;
                }
            }
            continue;
        }
        match b {
            b'"' if field_start => opened_at = Some(line),
            b',' | b'\n' | b'\r' => field_start = true,
            _ => field_start = false,
        }
    }
    opened_at
}

fn unique_headers(headers: &StringRecord) -> StringRecord {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut unique = StringRecord::with_capacity(headers.as_slice().len(), headers.len());
    for name in headers.iter() {
        let count = seen.entry(name).or_insert(0);
        if *count == 0 {
            unique.push_field(name);
        } else {
            unique.push_field(&format!("{}_{}", name, count));
        }
        *count += 1;
    }
    unique
}
