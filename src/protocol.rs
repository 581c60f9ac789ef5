//! Record parser for the positional state vectors returned by the states endpoint.
//!
//! Each aircraft arrives as an ordered list of at least 17 fields. Records are
//! normally JSON arrays, but the loosely-typed bracketed text form
//! (`["abc123", "DLH4  ", ...]`) is accepted too. Both forms are reduced to a
//! sequence of [`Field`]s before being mapped onto an [`AircraftState`].

use crate::types::{AircraftState, Coordinate};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Record too short: need {need} fields, got {got}")]
    TooFewFields { need: usize, got: usize },
    #[error("Invalid value for field {index} ({name}): {value:?}")]
    InvalidField {
        index: usize,
        name: &'static str,
        value: String,
    },
    #[error("Unsupported record representation: {0}")]
    UnsupportedRecord(String),
}

/// Number of positional fields every state vector carries.
pub const FIELD_COUNT: usize = 17;

/// Field names by position, used in error reports.
const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "icao24",
    "callsign",
    "origin_country",
    "time_position",
    "last_contact",
    "longitude",
    "latitude",
    "baro_altitude",
    "on_ground",
    "velocity",
    "true_track",
    "vertical_rate",
    "sensors",
    "geo_altitude",
    "squawk",
    "spi",
    "position_source",
];

/// Literal marker for an absent value.
const NULL_TOKEN: &str = "null";

/// One positional field, before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Present in the record but marked null
    Null,
    /// A scalar, normalized to text
    Token(String),
    /// A nested list of scalars
    List(Vec<String>),
}

impl Field {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::List(items.iter().map(scalar_text).collect()),
            other => Self::Token(scalar_text(other)),
        }
    }

    fn from_text(raw: &str) -> Self {
        let token = normalize(raw);
        if token == NULL_TOKEN {
            Self::Null
        } else if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            Self::List(split_list(inner))
        } else {
            Self::Token(token)
        }
    }

    /// Render as free text. Null renders as the literal marker.
    fn text(&self) -> String {
        match self {
            Self::Null => NULL_TOKEN.to_string(),
            Self::Token(t) => t.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

/// Scalars that can be read out of a normalized token.
trait FieldValue: Sized {
    fn parse_token(token: &str) -> Option<Self>;
}

impl FieldValue for i64 {
    fn parse_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }
}

impl FieldValue for f64 {
    fn parse_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }
}

impl FieldValue for bool {
    fn parse_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("true") {
            Some(true)
        } else if token.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

/// Parse one element of the `states` array.
pub fn parse_record(record: &Value) -> Result<AircraftState, ParseError> {
    match record {
        Value::Array(items) => {
            let fields: Vec<Field> = items.iter().map(Field::from_json).collect();
            map_fields(&fields)
        }
        Value::String(text) => parse_record_text(text),
        other => Err(ParseError::UnsupportedRecord(truncate(&other.to_string()))),
    }
}

/// Parse a record given as a bracketed list literal.
pub fn parse_record_text(text: &str) -> Result<AircraftState, ParseError> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let body = body.strip_suffix(']').unwrap_or(body);

    let fields: Vec<Field> = split_top_level(body)
        .iter()
        .map(|raw| Field::from_text(raw))
        .collect();
    map_fields(&fields)
}

/// Map positional fields onto an aircraft state.
pub fn map_fields(fields: &[Field]) -> Result<AircraftState, ParseError> {
    if fields.len() < FIELD_COUNT {
        return Err(ParseError::TooFewFields {
            need: FIELD_COUNT,
            got: fields.len(),
        });
    }

    let icao24 = fields[0].text();
    if matches!(fields[0], Field::Null) || icao24.is_empty() {
        return Err(invalid(0, icao24));
    }

    Ok(AircraftState {
        icao24,
        call_sign: fields[1].text(),
        origin_country: fields[2].text(),
        time_position: optional(fields, 3)?,
        last_contact: or_default(fields, 4)?,
        coordinate: Coordinate {
            longitude: optional(fields, 5)?,
            latitude: optional(fields, 6)?,
        },
        baro_altitude: optional(fields, 7)?,
        on_ground: or_default(fields, 8)?,
        velocity: optional(fields, 9)?,
        true_track: optional(fields, 10)?,
        vertical_rate: optional(fields, 11)?,
        sensors: sensors(fields, 12)?,
        geo_altitude: optional(fields, 13)?,
        squawk: fields[14].text(),
        spi: or_default(fields, 15)?,
        position_source: or_default(fields, 16)?,
    })
}

fn optional<T: FieldValue>(fields: &[Field], index: usize) -> Result<Option<T>, ParseError> {
    match &fields[index] {
        Field::Null => Ok(None),
        Field::Token(token) => T::parse_token(token)
            .map(Some)
            .ok_or_else(|| invalid(index, token.clone())),
        list @ Field::List(_) => Err(invalid(index, list.text())),
    }
}

/// Null falls back to the type's zero value.
fn or_default<T: FieldValue + Default>(fields: &[Field], index: usize) -> Result<T, ParseError> {
    Ok(optional(fields, index)?.unwrap_or_default())
}

fn sensors(fields: &[Field], index: usize) -> Result<Option<Vec<i64>>, ParseError> {
    let items = match &fields[index] {
        Field::Null => return Ok(None),
        Field::List(items) => items.clone(),
        Field::Token(token) => split_list(token),
    };

    items
        .iter()
        .map(|item| i64::parse_token(item).ok_or_else(|| invalid(index, item.clone())))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn invalid(index: usize, value: String) -> ParseError {
    ParseError::InvalidField {
        index,
        name: FIELD_NAMES[index],
        value,
    }
}

/// Strip line breaks and quotes, then surrounding whitespace.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => normalize(s),
        other => other.to_string(),
    }
}

fn split_list(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(normalize).collect()
}

/// Split on commas that are neither nested in brackets nor quoted.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);

    parts
}

fn truncate(text: &str) -> String {
    text.chars().take(120).collect()
}
