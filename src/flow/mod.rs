//! Analysis client: forwards a question to the hosted Langflow chat flow.
//!
//! The controller only depends on the [`AnalysisClient`] trait, so tests and
//! offline runs can swap in a stub while the binary uses
//! [`langflow::LangflowClient`].
//!
//! The client returns the response JSON verbatim; [`extract_answer`] is the
//! only place that knows where the answer text lives.

pub mod error;
pub mod langflow;

use serde_json::Value;

use crate::config::FlowConfig;

pub use error::{FaultKind, FlowError};
pub use langflow::LangflowClient;

/// Something that can turn a question into a raw analysis response.
pub trait AnalysisClient {
    /// Send `message` to the analysis endpoint and return its JSON body.
    fn run_flow(&self, message: &str) -> Result<Value, FlowError>;
}

impl<C: AnalysisClient + ?Sized> AnalysisClient for &C {
    fn run_flow(&self, message: &str) -> Result<Value, FlowError> {
        (**self).run_flow(message)
    }
}

/// Client for the configured endpoint.
///
/// When required settings are missing, every call fails with
/// [`FlowError::MissingConfig`] instead of touching the network, so an
/// unconfigured dashboard still validates input and reports the gap.
#[derive(Debug)]
pub enum ConfiguredClient {
    Ready(LangflowClient),
    Missing(&'static str),
}

impl ConfiguredClient {
    pub fn from_config(config: &FlowConfig) -> Self {
        match LangflowClient::from_config(config) {
            Ok(client) => Self::Ready(client),
            Err(FlowError::MissingConfig(key)) => Self::Missing(key),
            Err(_) => Self::Missing("flow"),
        }
    }
}

impl AnalysisClient for ConfiguredClient {
    fn run_flow(&self, message: &str) -> Result<Value, FlowError> {
        match self {
            Self::Ready(client) => client.run_flow(message),
            Self::Missing(key) => Err(FlowError::MissingConfig(*key)),
        }
    }
}

/// One step of the answer path: an object key or an array index.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Key(&'static str),
    Index(usize),
}

/// `outputs[0].outputs[0].results.message.text`
const ANSWER_PATH: [Segment; 7] = [
    Segment::Key("outputs"),
    Segment::Index(0),
    Segment::Key("outputs"),
    Segment::Index(0),
    Segment::Key("results"),
    Segment::Key("message"),
    Segment::Key("text"),
];

/// Pull the answer text out of a Langflow run response.
///
/// Errors name the path up to and including the first segment that could
/// not be followed.
pub fn extract_answer(response: &Value) -> Result<String, FlowError> {
    let mut current = response;
    let mut path = String::new();

    for segment in ANSWER_PATH {
        let next = match segment {
            Segment::Key(key) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key);
                current.get(key)
            }
            Segment::Index(i) => {
                path.push_str(&format!("[{i}]"));
                current.get(i)
            }
        };
        current = next.ok_or_else(|| FlowError::MissingField { path: path.clone() })?;
    }

    current
        .as_str()
        .map(str::to_string)
        .ok_or(FlowError::NotText { path })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(text: Value) -> Value {
        json!({
            "session_id": "abc",
            "outputs": [{
                "inputs": { "input_value": "q" },
                "outputs": [{ "results": { "message": { "text": text, "sender": "Machine" } } }]
            }]
        })
    }

    #[test]
    fn extracts_answer_text() {
        let answer = extract_answer(&response(json!("Reels perform best."))).unwrap();
        assert_eq!(answer, "Reels perform best.");
    }

    #[test]
    fn empty_outputs_is_contract_violation() {
        let err = extract_answer(&json!({ "outputs": [] })).unwrap_err();
        assert_eq!(err.kind(), FaultKind::ContractViolation);
        assert_eq!(err.to_string(), "analysis response has no 'outputs[0]'");
    }

    #[test]
    fn missing_nested_key_names_full_path() {
        let body = json!({ "outputs": [{ "outputs": [{ "results": {} }] }] });
        match extract_answer(&body).unwrap_err() {
            FlowError::MissingField { path } => {
                assert_eq!(path, "outputs[0].outputs[0].results.message")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_string_text_is_rejected() {
        let err = extract_answer(&response(json!(42))).unwrap_err();
        assert!(matches!(err, FlowError::NotText { .. }));
    }

    #[test]
    fn unconfigured_client_reports_missing_key() {
        let client = ConfiguredClient::from_config(&FlowConfig::default());
        let err = client.run_flow("hello").unwrap_err();
        assert_eq!(err.kind(), FaultKind::Configuration);
        assert_eq!(
            err.to_string(),
            "missing configuration value 'flow.deployment_id'"
        );
    }

    #[test]
    fn detail_error_body_is_contract_violation() {
        let err = extract_answer(&json!({ "detail": "Flow not found" })).unwrap_err();
        assert_eq!(err.kind(), FaultKind::ContractViolation);
    }
}
