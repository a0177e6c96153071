//! Raw record normalization
//!
//! Coerces opaque feed records into the canonical [`Event`] schema and
//! builds the document text the embedding is computed from.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::domain::entities::event::UNKNOWN;
use crate::domain::Event;
use crate::ports::RawEventRecord;

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid regex"))
}

/// Clean free text for embedding: strip HTML tags and URLs, collapse
/// whitespace runs, trim.
pub fn clean_text(text: &str) -> String {
    let text = html_tag_re().replace_all(text, " ");
    let text = url_re().replace_all(&text, " ");
    whitespace_re().replace_all(&text, " ").trim().to_string()
}

/// Feed categories come as paths ("/contenido/actividades/Musica");
/// only the last segment is meaningful.
fn tail_segment(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

fn categorical(value: Option<String>) -> String {
    match value {
        Some(v) => {
            let cleaned = clean_text(&v);
            if cleaned.is_empty() {
                UNKNOWN.to_string()
            } else {
                cleaned
            }
        }
        None => UNKNOWN.to_string(),
    }
}

fn is_free(raw: &RawEventRecord) -> bool {
    match raw.fields.get("free") {
        Some(Value::Bool(b)) => *b,
        _ => matches!(raw.number("free"), Some(n) if n == 1.0),
    }
}

/// Price in euros: the free flag wins, then a numeric price field, then
/// the first amount found in a textual price ("Entrada: 5,50 euros").
fn parse_price(raw: &RawEventRecord) -> Option<f64> {
    if is_free(raw) {
        return Some(0.0);
    }
    if let Some(n) = raw.number("price") {
        return Some(n);
    }
    let text = raw.text("price")?;
    let amount = amount_re().find(&text)?;
    amount.as_str().replace(',', ".").parse().ok()
}

/// Parse the handful of timestamp shapes the feed is known to emit.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

/// Document text the embedding is computed from: title and description,
/// with category and district appended so those terms influence
/// similarity.
pub fn build_document(event: &Event) -> String {
    let mut document = event.title.clone();
    if !event.description.is_empty() {
        if !document.is_empty() {
            document.push_str(". ");
        }
        document.push_str(&event.description);
    }
    if event.event_type != UNKNOWN {
        document.push_str(". Categoría: ");
        document.push_str(&event.event_type);
    }
    if event.district != UNKNOWN {
        document.push_str(". Distrito: ");
        document.push_str(&event.district);
    }
    document
}

/// Coerce one raw feed record into an [`Event`].
///
/// Returns the skip reason instead of an event when the record cannot
/// be ingested; a malformed record never aborts the batch.
pub fn normalize_record(raw: &RawEventRecord) -> Result<Event, String> {
    let id = raw.text("id").ok_or("missing id")?;

    let title = clean_text(&raw.text("title").unwrap_or_default());
    let description = clean_text(&raw.text("description").unwrap_or_default());
    if title.is_empty() && description.is_empty() {
        return Err(format!("record {id} has no embeddable text"));
    }

    let start_date = raw
        .text("start_date")
        .and_then(|v| parse_timestamp(&v))
        .ok_or_else(|| format!("record {id} has no parseable start date"))?;

    // An end before the start is feed noise; treat the event as open-ended.
    let end_date = raw
        .text("end_date")
        .and_then(|v| parse_timestamp(&v))
        .filter(|end| *end >= start_date);

    let source_updated_at = raw
        .text("updated")
        .and_then(|v| parse_timestamp(&v))
        .unwrap_or(start_date);

    Ok(Event {
        id,
        title,
        description,
        district: categorical(raw.text("district")),
        venue: categorical(raw.text("venue")),
        event_type: categorical(raw.text("type").map(|t| tail_segment(&t).to_string())),
        price: parse_price(raw),
        start_date,
        end_date,
        source_updated_at,
    })
}
