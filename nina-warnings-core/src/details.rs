//! Detail enrichment: fetches the CAP-like detail document of one message.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::adapter::{convert_severity, convert_status_type, convert_urgency, Adapted, Urgency};
use crate::contract::{Transport, WarnError};
use crate::model::{MessageId, WarningMessageDetails};

// Characters that would end or split a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WarningDetailDto {
    msg_type: Option<String>,
    /// `null` and a missing key both count as zero blocks.
    #[serde(default)]
    info: Option<Vec<InfoDto>>,
}

#[derive(Debug, Deserialize)]
struct InfoDto {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    instruction: String,
    severity: Option<String>,
    urgency: Option<String>,
    #[serde(default)]
    area: Option<Vec<AreaDto>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AreaDto {
    #[serde(default)]
    area_desc: String,
}

/// Request path of the detail document; the id is encoded as one path segment.
pub fn details_path(id: &MessageId) -> String {
    let segment = utf8_percent_encode(id.as_str(), PATH_SEGMENT);
    format!("warnings/{segment}.json")
}

/// Loads the details of one message.
///
/// Returns `Ok(None)` when the document does not hold exactly one info block with
/// exactly one area. Unknown severity or urgency tokens are errors.
pub async fn fetch_details<T>(
    transport: &T,
    id: &MessageId,
) -> Result<Option<WarningMessageDetails>, WarnError>
where
    T: Transport + ?Sized,
{
    debug!(id = %id, "Loading warning details");
    let body = transport.get(&details_path(id)).await?;

    let document: Option<WarningDetailDto> = serde_json::from_str(&body).map_err(|e| {
        error!(error = ?e, id = %id, "Failed to parse warning details JSON");
        WarnError::MalformedResponse(format!("could not parse details of {id}: {e}"))
    })?;

    let (msg_type, mut info) = match document {
        Some(WarningDetailDto { msg_type, info }) => (msg_type, info.unwrap_or_default()),
        None => (None, Vec::new()),
    };
    let area_count = info
        .first()
        .map(|i| i.area.as_ref().map_or(0, Vec::len))
        .unwrap_or(0);
    if info.len() != 1 || area_count != 1 {
        warn!(
            id = %id,
            info_count = info.len(),
            area_count,
            "Expected exactly one info and one area block in warning details, ignoring details"
        );
        return Ok(None);
    }

    let InfoDto {
        headline,
        description,
        instruction,
        severity,
        urgency,
        area,
    } = info.remove(0);
    let Some(area) = area.unwrap_or_default().into_iter().next() else {
        return Ok(None);
    };

    Ok(Some(WarningMessageDetails {
        title: headline,
        area_description: area.area_desc,
        description,
        instruction,
        severity_level: convert_severity(severity.as_deref()).required("severity")?,
        urgency: convert_urgency(urgency.as_deref())
            .or_default_when_missing("urgency", Urgency::Undefined)?,
        status: match convert_status_type(msg_type.as_deref()) {
            Adapted::Known(status) => Some(status),
            _ => None,
        },
    }))
}
