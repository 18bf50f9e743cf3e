//! Field adapter: maps raw upstream tokens onto the closed domain enumerations.
//!
//! Every conversion is a case-insensitive lookup in a fixed table. The result is an
//! [`Adapted`] value that keeps "no token at all" apart from "a token we do not know",
//! because the two have different consequences depending on the field.

use serde::{Deserialize, Serialize};

use crate::contract::WarnError;

/// Outcome of adapting one raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adapted<T> {
    /// The token matched an entry of the table.
    Known(T),
    /// No token was present upstream.
    Missing,
    /// A token was present but is not in the table.
    Unknown(String),
}

impl<T> Adapted<T> {
    /// Treats both `Missing` and `Unknown` as fatal for a required field.
    pub fn required(self, field: &'static str) -> Result<T, WarnError> {
        match self {
            Adapted::Known(value) => Ok(value),
            Adapted::Missing => Err(WarnError::MalformedResponse(format!(
                "required field '{field}' has no value"
            ))),
            Adapted::Unknown(value) => Err(WarnError::UnrecognizedToken { field, value }),
        }
    }

    /// Falls back to `default` when the token is absent; unknown tokens stay fatal.
    pub fn or_default_when_missing(self, field: &'static str, default: T) -> Result<T, WarnError> {
        match self {
            Adapted::Known(value) => Ok(value),
            Adapted::Missing => Ok(default),
            Adapted::Unknown(value) => Err(WarnError::UnrecognizedToken { field, value }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Alert,
    Update,
    Cancel,
}

impl ContentType {
    pub fn description(&self) -> &'static str {
        match self {
            ContentType::Alert => "Alarm",
            ContentType::Update => "Aktualisierung",
            ContentType::Cancel => "Abbruch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Update,
}

impl StatusType {
    pub fn description(&self) -> &'static str {
        match self {
            StatusType::Update => "Aktualisierung",
        }
    }
}

/// Severity of a warning, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    Minor,
    Moderate,
    Severe,
    Extreme,
}

impl SeverityLevel {
    pub fn description(&self) -> &'static str {
        match self {
            SeverityLevel::Minor => "geringfügig",
            SeverityLevel::Moderate => "mittelschwer",
            SeverityLevel::Severe => "schwerwiegend",
            SeverityLevel::Extreme => "extrem",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    Undefined,
    Urgent,
}

impl Urgency {
    pub fn description(&self) -> &'static str {
        match self {
            Urgency::Undefined => "",
            Urgency::Urgent => "dringend",
        }
    }
}

fn lookup<T: Copy>(token: Option<&str>, table: &[(&str, T)]) -> Adapted<T> {
    let Some(raw) = token else {
        return Adapted::Missing;
    };
    let upper = raw.to_uppercase();
    table
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, value)| Adapted::Known(*value))
        .unwrap_or_else(|| Adapted::Unknown(raw.to_string()))
}

const CONTENT_TYPES: &[(&str, ContentType)] = &[
    ("ALERT", ContentType::Alert),
    ("UPDATE", ContentType::Update),
    ("CANCEL", ContentType::Cancel),
];

const STATUS_TYPES: &[(&str, StatusType)] = &[("UPDATE", StatusType::Update)];

const SEVERITIES: &[(&str, SeverityLevel)] = &[
    ("MINOR", SeverityLevel::Minor),
    ("MODERATE", SeverityLevel::Moderate),
    ("SEVERE", SeverityLevel::Severe),
    ("EXTREME", SeverityLevel::Extreme),
];

const URGENCIES: &[(&str, Urgency)] = &[("URGENT", Urgency::Urgent)];

pub fn convert_content_type(token: Option<&str>) -> Adapted<ContentType> {
    lookup(token, CONTENT_TYPES)
}

pub fn convert_status_type(token: Option<&str>) -> Adapted<StatusType> {
    lookup(token, STATUS_TYPES)
}

pub fn convert_severity(token: Option<&str>) -> Adapted<SeverityLevel> {
    lookup(token, SEVERITIES)
}

/// Urgency is the one field with a default: callers map `Missing` to
/// [`Urgency::Undefined`] via [`Adapted::or_default_when_missing`].
pub fn convert_urgency(token: Option<&str>) -> Adapted<Urgency> {
    lookup(token, URGENCIES)
}
