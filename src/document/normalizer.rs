use super::types::{ID_FIELDS, PUBLISHED_FIELDS, Paper, RawRecord};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Normalizes one raw record.
///
/// Returns `None` when none of the recognized id fields holds a non-empty value.
pub fn normalize(record: &RawRecord) -> Option<Paper> {
    let arxiv_id = record_id(record)?;

    let published_raw = PUBLISHED_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(scalar_text))
        .unwrap_or_default();

    Some(Paper {
        arxiv_id,
        title: record
            .get("title")
            .and_then(scalar_text)
            .map(|title| title.trim().to_string())
            .unwrap_or_default(),
        authors: text_list(record.get("authors")),
        abstract_text: record
            .get("abstract")
            .and_then(scalar_text)
            .unwrap_or_default(),
        categories: text_list(record.get("categories")),
        published: normalize_date(&published_raw),
    })
}

/// Resolves the document id from the first recognized field with a non-empty value.
pub fn record_id(record: &RawRecord) -> Option<String> {
    ID_FIELDS.iter().find_map(|field| {
        record
            .get(*field)
            .and_then(scalar_text)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    })
}

/// Reduces a free-form timestamp to a date-only string.
///
/// Strict date-time parsing is tried first; anything unparseable falls back to the first
/// ten characters of the trimmed input.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    match parse_date(trimmed) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => trimmed.chars().take(10).collect(),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(date_time.date());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    let entries: Vec<String> = match value {
        Some(Value::Array(values)) => values.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}
