use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::adapter::{convert_content_type, convert_severity};
use crate::config::WarnClientConfig;
use crate::contract::{Transport, WarnError};
use crate::model::{MessageId, Source, WarningMessage};

/// HTTP implementation of [`Transport`] bound to one base endpoint.
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &WarnClientConfig) -> Result<Self, WarnError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                error!("No base address configured for the warning service");
                WarnError::Configuration(
                    "there is no base address known for the warning service".to_string(),
                )
            })?;

        Url::parse(base_url).map_err(|e| {
            error!(error = ?e, base_url, "Base address is not a valid URL");
            WarnError::Configuration(format!("invalid base address \"{base_url}\": {e}"))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WarnError::Configuration(format!("failed to build HTTP client: {e}")))?;

        info!(base_url, "Initialised HttpTransport");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Joins `path` onto the base address with exactly one separating slash.
    pub fn endpoint(&self, path: &str) -> Result<String, WarnError> {
        let relative = path.trim_start_matches('/');
        if relative.trim().is_empty() {
            return Err(WarnError::Configuration(
                "could not determine endpoint for an empty path".to_string(),
            ));
        }
        let url = format!("{}/{}", self.base_url, relative);
        Url::parse(&url).map_err(|e| {
            WarnError::Configuration(format!("could not determine endpoint \"{url}\": {e}"))
        })?;
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<String, WarnError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "Requesting warning service");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to reach warning service");
            WarnError::Transport {
                url: url.clone(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Warning service returned error status");
            return Err(WarnError::Transport {
                url,
                message: format!("unexpected status {status}"),
            });
        }

        response.text().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to read response body");
            WarnError::Transport {
                url: url.clone(),
                message: e.to_string(),
            }
        })
    }
}

/// Decodes a unix timestamp that may be given in seconds or milliseconds.
///
/// More than ten decimal digits means milliseconds.
pub fn decode_unix_timestamp(raw: i64) -> Result<DateTime<Local>, WarnError> {
    let utc = if raw.unsigned_abs().to_string().len() > 10 {
        DateTime::<Utc>::from_timestamp_millis(raw)
    } else {
        DateTime::<Utc>::from_timestamp(raw, 0)
    };
    utc.map(|instant| instant.with_timezone(&Local))
        .ok_or_else(|| WarnError::MalformedResponse(format!("timestamp {raw} is out of range")))
}

// Wire format of `{source}/mapData.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapWarningDto {
    id: Option<String>,
    version: Option<i32>,
    start_date: Option<i64>,
    severity: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "i18nTitle")]
    i18n_title: Option<I18nTitleDto>,
}

#[derive(Debug, Deserialize)]
struct I18nTitleDto {
    de: Option<String>,
}

fn map_warning(dto: MapWarningDto) -> Result<WarningMessage, WarnError> {
    let id = dto
        .id
        .ok_or_else(|| WarnError::MalformedResponse("map warning id has no value".to_string()))?;
    let start_date = match dto.start_date {
        Some(raw) => decode_unix_timestamp(raw)?,
        None => DateTime::<Utc>::default().with_timezone(&Local),
    };
    let severity = convert_severity(dto.severity.as_deref()).required("severity")?;
    let content_type = convert_content_type(dto.kind.as_deref()).required("type")?;
    let content = dto
        .i18n_title
        .and_then(|title| title.de)
        .ok_or_else(|| WarnError::MalformedResponse(format!("map warning {id} has no text")))?;

    Ok(WarningMessage::new(
        MessageId::new(id),
        dto.version.unwrap_or_default(),
        start_date,
        severity,
        content_type,
        content,
    ))
}

/// Request path for the bulk feed of one source.
pub fn source_path(source: Source) -> String {
    format!("{}/mapData.json", source.path_segment())
}

/// Fetches and normalises every message of one source.
///
/// All or nothing: a single malformed record fails the whole source. Duplicate ids
/// within the payload collapse onto the first occurrence; order is otherwise kept.
pub async fn fetch_source<T>(
    transport: &T,
    source: Source,
) -> Result<Vec<WarningMessage>, WarnError>
where
    T: Transport + ?Sized,
{
    info!(source = %source, "Fetching warning messages for source");
    let body = transport.get(&source_path(source)).await?;

    let records: Vec<MapWarningDto> = serde_json::from_str(&body).map_err(|e| {
        error!(error = ?e, source = %source, "Failed to parse map data JSON");
        WarnError::MalformedResponse(format!("could not parse map data for {source}: {e}"))
    })?;

    let mut seen = HashSet::new();
    let mut messages = Vec::with_capacity(records.len());
    for record in records {
        let message = map_warning(record).map_err(|e| {
            error!(error = %e, source = %source, "Rejecting map data for source");
            e
        })?;
        if seen.insert(message.id().clone()) {
            messages.push(message);
        } else {
            debug!(id = %message.id(), source = %source, "Duplicate id within source payload");
        }
    }

    info!(source = %source, count = messages.len(), "Fetched warning messages for source");
    Ok(messages)
}
