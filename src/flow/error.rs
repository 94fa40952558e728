//! Analysis client fault types.

use std::fmt;

use thiserror::Error;

/// Broad class of an analysis fault, used for logging and HTTP status
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Required flow settings are absent; no request was sent.
    Configuration,
    /// Network failure, timeout, non-2xx status or unparseable body.
    Transport,
    /// The response JSON does not hold the answer at the expected path.
    ContractViolation,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
            Self::ContractViolation => write!(f, "contract"),
        }
    }
}

/// Error raised while calling the hosted flow or reading its answer.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("missing configuration value '{0}'")]
    MissingConfig(&'static str),

    #[error("request to analysis endpoint failed: {0}")]
    Transport(String),

    #[error("analysis endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("analysis response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("analysis response has no '{path}'")]
    MissingField { path: String },

    #[error("analysis response field '{path}' is not text")]
    NotText { path: String },
}

impl FlowError {
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::MissingConfig(_) => FaultKind::Configuration,
            Self::Transport(_) | Self::Status { .. } | Self::InvalidJson(_) => FaultKind::Transport,
            Self::MissingField { .. } | Self::NotText { .. } => FaultKind::ContractViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_variants() {
        assert_eq!(FlowError::MissingConfig("flow.app_token").kind(), FaultKind::Configuration);
        assert_eq!(
            FlowError::Status { status: 503, body: String::new() }.kind(),
            FaultKind::Transport
        );
        assert_eq!(
            FlowError::MissingField { path: "outputs[0]".into() }.kind(),
            FaultKind::ContractViolation
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let err = FlowError::Status {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "analysis endpoint returned HTTP 401: unauthorized");
        assert_eq!(FaultKind::ContractViolation.to_string(), "contract");
    }
}
