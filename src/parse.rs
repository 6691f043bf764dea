//! Generic JSON → tagged value tree.
//!
//! `serde_json::Value` collapses repeated keys (the last one wins), which hides exactly
//! the cases inference has to resolve first-come-first-served. This tree keeps every
//! entry of an object in document order instead.
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::error::ParseError;

/// Characters of the input quoted when its top-level shape is rejected.
const EXCERPT_CHARS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),  // duplicates preserved
}

/// Trim, check the document is an object or array, then parse.
pub fn parse_document(src: &str) -> Result<JsonValue, ParseError> {
    let trimmed = src.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Err(ParseError::UnsupportedShape { excerpt: excerpt(trimmed) });
    }
    from_str_with_path(trimmed)
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path(src: &str) -> Result<JsonValue, ParseError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, JsonValue>(&mut de).map_err(|err| {
        let path = err.path().to_string();
        syntax_error(path, err.into_inner())
    })?;
    // trailing characters after the document
    de.end().map_err(|err| syntax_error(".".to_string(), err))?;
    Ok(value)
}

fn syntax_error(path: String, err: serde_json::Error) -> ParseError {
    ParseError::Syntax {
        path,
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
    }
}

fn excerpt(src: &str) -> String {
    let mut out = src.chars().take(EXCERPT_CHARS).collect::<String>();
    if src.chars().nth(EXCERPT_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

// ————————————————————————————————————————————————————————————————————————————
// SERDE
// ————————————————————————————————————————————————————————————————————————————

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::Integer(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::Integer(v.into()))
    }

    // also integers past u64::MAX, which serde_json only reports as floats
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonValue, E> {
        Ok(JsonValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(v) = seq.next_element::<JsonValue>()? {
            out.push(v);
        }
        Ok(JsonValue::Array(out))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonValue, A::Error> {
        let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, JsonValue>()? {
            out.push((k, v));
        }
        Ok(JsonValue::Object(out))
    }
}
