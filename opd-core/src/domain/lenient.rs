//! Field-level deserializers that never fail on a well-shaped document.
//!
//! The adjudication backend returns AI-extracted values: nulls, numbers sent
//! as strings, stray non-object list entries. Every helper here maps a bad
//! leaf to its default so a single odd field can't reject a whole claim.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::claim::{ClaimStatus, ExtractedData, LineItem, NecessityCheck};

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

fn value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Option::<Value>::deserialize(d)
}

pub(crate) fn text_from_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn amount_from_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

pub(crate) fn count_from_value(v: &Value) -> u64 {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|x| x.is_finite() && *x > 0.0).map(|x| x.round() as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn timestamp_from_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value(d)?.as_ref().and_then(text_from_value).unwrap_or_default())
}

pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(value(d)?.as_ref().and_then(text_from_value))
}

pub fn opt_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(value(d)?.as_ref().and_then(amount_from_value))
}

pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(opt_amount(d)?.unwrap_or(0.0))
}

pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(value(d)?.as_ref().map(count_from_value).unwrap_or(0))
}

pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match value(d)? {
        Some(Value::Array(items)) => items.iter().filter_map(text_from_value).collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single],
        _ => Vec::new(),
    })
}

pub fn opt_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    Ok(match value(d)? {
        Some(Value::String(s)) => timestamp_from_str(&s),
        _ => None,
    })
}

pub fn status<'de, D: Deserializer<'de>>(d: D) -> Result<ClaimStatus, D::Error> {
    Ok(value(d)?
        .as_ref()
        .and_then(text_from_value)
        .map(ClaimStatus::from)
        .unwrap_or_default())
}

pub fn necessity<'de, D: Deserializer<'de>>(d: D) -> Result<NecessityCheck, D::Error> {
    Ok(value(d)?
        .as_ref()
        .and_then(text_from_value)
        .map(NecessityCheck::from)
        .unwrap_or_default())
}

pub fn extracted_data<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<ExtractedData>, D::Error> {
    Ok(match value(d)? {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

/// Non-object entries are dropped; objects always survive with lenient fields.
pub fn line_items<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<LineItem>, D::Error> {
    Ok(match value(d)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}
