/// Configuration schema and defaults for socialflow.
///
/// Defines the TOML-serializable configuration structure with sections
/// `[flow]`, `[pacing]`, `[server]` and `[logging]`.
///
/// Every field has a built-in default except the Langflow secrets, which
/// must come from a config file or the environment.
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level socialflow configuration.
///
/// Maps directly to `~/.socialflow/config.toml` and `.socialflow.toml`.
/// Missing sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialFlowConfig {
    pub flow: FlowConfig,
    pub pacing: PacingConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [flow]
// ---------------------------------------------------------------------------

/// Hosted Langflow endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Langflow API base URL.
    pub base_url: String,
    /// Langflow deployment identifier (`LANGFLOW_ID`).
    pub deployment_id: String,
    /// Flow identifier (`FLOW_ID`). Used as the endpoint when `endpoint`
    /// is empty.
    pub flow_id: String,
    /// Application bearer token (`APP_TOKEN`).
    pub app_token: String,
    /// Endpoint name appended to `/api/v1/run/`.
    pub endpoint: String,
    /// Request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.langflow.astra.datastax.com".to_string(),
            deployment_id: String::new(),
            flow_id: String::new(),
            app_token: String::new(),
            endpoint: "socialmedia-1".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl FlowConfig {
    /// Endpoint segment of the run URL: `endpoint`, else `flow_id`.
    pub fn endpoint_name(&self) -> &str {
        if self.endpoint.trim().is_empty() {
            self.flow_id.trim()
        } else {
            self.endpoint.trim()
        }
    }

    /// Full run URL: `{base}/lf/{deployment_id}/api/v1/run/{endpoint}`.
    pub fn run_url(&self) -> String {
        format!(
            "{}/lf/{}/api/v1/run/{}",
            self.base_url.trim_end_matches('/'),
            self.deployment_id.trim(),
            self.endpoint_name()
        )
    }

    /// Name of the first required value that is missing, if any.
    pub fn missing_value(&self) -> Option<&'static str> {
        if self.base_url.trim().is_empty() {
            Some("flow.base_url")
        } else if self.deployment_id.trim().is_empty() {
            Some("flow.deployment_id")
        } else if self.app_token.trim().is_empty() {
            Some("flow.app_token")
        } else if self.endpoint_name().is_empty() {
            Some("flow.endpoint")
        } else {
            None
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The token with all but its last four characters hidden. Tokens of
    /// four characters or fewer are hidden entirely.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.app_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible = 4;
        let tail: String = chars[chars.len() - visible..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - visible), tail)
    }
}

// ---------------------------------------------------------------------------
// [pacing]
// ---------------------------------------------------------------------------

/// Presentation pacing. Zero disables a pause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay between reveal frames (milliseconds per character).
    pub reveal_delay_ms: u64,
    /// Pause before the first metric and the first chart.
    pub lead_pause_ms: u64,
    /// Pause between subsequent metrics and charts.
    pub section_pause_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 4,
            lead_pause_ms: 500,
            section_pause_ms: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Web dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Analysis run log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether analysis runs are logged.
    pub enabled: bool,
    /// JSONL log path. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.socialflow/analysis-log.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default TOML
// ---------------------------------------------------------------------------

impl SocialFlowConfig {
    /// Annotated default config written by `socialflow config init`.
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }
}

const DEFAULT_TOML: &str = r#"# socialflow configuration
#
# Precedence: built-in defaults < ~/.socialflow/config.toml
#             < ./.socialflow.toml < environment variables

[flow]
# Langflow API base URL
base_url = "https://api.langflow.astra.datastax.com"
# Deployment id (env: SOCIALFLOW_LANGFLOW_ID or LANGFLOW_ID)
deployment_id = ""
# Flow id, used when endpoint is empty (env: SOCIALFLOW_FLOW_ID or FLOW_ID)
flow_id = ""
# Bearer token (env: SOCIALFLOW_APP_TOKEN or APP_TOKEN)
app_token = ""
# Endpoint name in /api/v1/run/<endpoint>
endpoint = "socialmedia-1"
# Request timeout in milliseconds
timeout_ms = 30000

[pacing]
# Delay per revealed character (ms)
reveal_delay_ms = 4
# Pause before the first metric and first chart (ms)
lead_pause_ms = 500
# Pause between metrics and between charts (ms)
section_pause_ms = 300

[server]
addr = "127.0.0.1:8501"
open_browser = true

[logging]
enabled = true
path = "~/.socialflow/analysis-log.jsonl"
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
