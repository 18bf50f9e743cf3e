use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://warnung.bund.de/api31";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> Option<String> {
    Some(DEFAULT_BASE_URL.to_string())
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Where and how to reach the upstream warning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarnClientConfig {
    /// `None` (or an explicit `null`) leaves the transport without an endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WarnClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WarnClientConfig {
    pub fn trace_loaded(&self) {
        info!(
            base_url = self.base_url.as_deref().unwrap_or("<none>"),
            timeout_secs = self.timeout_secs,
            "Loaded WarnClientConfig"
        );
        debug!(?self, "WarnClientConfig loaded (full debug)");
    }
}
