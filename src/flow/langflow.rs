/// Langflow HTTP client for the analysis endpoint.
///
/// Sends one synchronous `ureq` POST per question to
/// `{base}/lf/{deployment_id}/api/v1/run/{endpoint}` and hands back the
/// parsed JSON body untouched. There is no retry and no caching; each call
/// is one network round trip.
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::AnalysisClient;
use super::error::FlowError;
use crate::config::FlowConfig;

/// Longest body excerpt carried in a status error.
const ERROR_BODY_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/run/{endpoint}`.
#[derive(Debug, Serialize)]
pub struct RunRequest<'a> {
    pub input_value: &'a str,
    pub output_type: &'static str,
    pub input_type: &'static str,
}

impl<'a> RunRequest<'a> {
    /// Chat-in, chat-out request for `message`.
    pub fn chat(message: &'a str) -> Self {
        Self {
            input_value: message,
            output_type: "chat",
            input_type: "chat",
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous Langflow client built from a [`FlowConfig`].
#[derive(Debug)]
pub struct LangflowClient {
    url: String,
    token: String,
    timeout: Duration,
    agent: ureq::Agent,
}

impl LangflowClient {
    /// Build a client, failing if a required setting is missing.
    pub fn from_config(config: &FlowConfig) -> Result<Self, FlowError> {
        if let Some(missing) = config.missing_value() {
            return Err(FlowError::MissingConfig(missing));
        }

        let timeout = config.timeout();
        Ok(Self {
            url: config.run_url(),
            token: config.app_token.trim().to_string(),
            timeout,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        })
    }

    /// The endpoint every request goes to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl AnalysisClient for LangflowClient {
    fn run_flow(&self, message: &str) -> Result<Value, FlowError> {
        let result = self
            .agent
            .post(&self.url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Content-Type", "application/json")
            .send_json(RunRequest::chat(message));

        let response = match result {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                return Err(FlowError::Status {
                    status,
                    body: excerpt(&body),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FlowError::Transport(transport.to_string()));
            }
        };

        response
            .into_json::<Value>()
            .map_err(|e| FlowError::InvalidJson(e.to_string()))
    }
}

/// First [`ERROR_BODY_LIMIT`] characters of a response body, trimmed.
fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let cut: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    format!("{cut}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> FlowConfig {
        FlowConfig {
            deployment_id: "dep".to_string(),
            app_token: " tok ".to_string(),
            ..FlowConfig::default()
        }
    }

    #[test]
    fn from_config_builds_run_url() {
        let client = LangflowClient::from_config(&configured()).unwrap();
        assert_eq!(
            client.url(),
            "https://api.langflow.astra.datastax.com/lf/dep/api/v1/run/socialmedia-1"
        );
        assert_eq!(client.token, "tok");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn from_config_rejects_missing_secrets() {
        let err = LangflowClient::from_config(&FlowConfig::default()).unwrap_err();
        assert!(matches!(err, FlowError::MissingConfig("flow.deployment_id")));
    }

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(RunRequest::chat("How are reels doing?")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "input_value": "How are reels doing?",
                "output_type": "chat",
                "input_type": "chat",
            })
        );
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        assert_eq!(excerpt("  short  "), "short");
        let long = "x".repeat(ERROR_BODY_LIMIT + 50);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), ERROR_BODY_LIMIT + 3);
    }
}
