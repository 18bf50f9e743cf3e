//! Unified message model shared by every upstream source.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::adapter::{ContentType, SeverityLevel, StatusType, Urgency};

/// One independent upstream system publishing warning messages.
///
/// Declaration order is the canonical order used when no explicit list is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    KatWarn,
    BiwApp,
    MoWas,
    Dwd,
    Lhp,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::KatWarn,
        Source::BiwApp,
        Source::MoWas,
        Source::Dwd,
        Source::Lhp,
    ];

    /// Lower-cased identifier used as the endpoint path segment.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Source::KatWarn => "katwarn",
            Source::BiwApp => "biwapp",
            Source::MoWas => "mowas",
            Source::Dwd => "dwd",
            Source::Lhp => "lhp",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Source::KatWarn => "KatWarn-Meldungen",
            Source::BiwApp => "BiwApp-Meldungen",
            Source::MoWas => "MoWas-Meldungen",
            Source::Dwd => "Deutscher Wetterdienst",
            Source::Lhp => "Länderübergreifendes Hochwasserportal",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Source::ALL
            .into_iter()
            .find(|source| source.path_segment() == lower)
            .ok_or_else(|| {
                let known: Vec<&str> = Source::ALL.iter().map(Source::path_segment).collect();
                format!("unknown source '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// Case-insensitive message identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for MessageId {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl Eq for MessageId {}

impl Hash for MessageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_lowercase().hash(state);
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detailed content fetched separately for a single message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningMessageDetails {
    pub title: String,
    pub area_description: String,
    pub description: String,
    pub instruction: String,
    pub severity_level: SeverityLevel,
    pub urgency: Urgency,
    /// Envelope message type, when it is one we track.
    pub status: Option<StatusType>,
}

/// A normalised warning message.
///
/// Equality and hashing only look at [`MessageId`]; two payloads with the same id
/// are the same message.
#[derive(Debug, Clone, Serialize)]
pub struct WarningMessage {
    id: MessageId,
    version: i32,
    start_date: DateTime<Local>,
    severity: SeverityLevel,
    content_type: ContentType,
    content: String,
    details: Option<WarningMessageDetails>,
}

impl WarningMessage {
    pub fn new(
        id: MessageId,
        version: i32,
        start_date: DateTime<Local>,
        severity: SeverityLevel,
        content_type: ContentType,
        content: String,
    ) -> Self {
        Self {
            id,
            version,
            start_date,
            severity,
            content_type,
            content,
            details: None,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Start of validity in local time.
    pub fn start_date(&self) -> DateTime<Local> {
        self.start_date
    }

    pub fn severity(&self) -> SeverityLevel {
        self.severity
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Bulk-feed title of the message.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn details(&self) -> Option<&WarningMessageDetails> {
        self.details.as_ref()
    }

    /// The only place details are attached.
    pub fn with_details(mut self, details: Option<WarningMessageDetails>) -> Self {
        self.details = details;
        self
    }
}

impl PartialEq for WarningMessage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WarningMessage {}

impl Hash for WarningMessage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
