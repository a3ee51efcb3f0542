//! Pipeline error taxonomy
//!
//! [`PipelineError`] carries the diagnostic detail for logs. What a client
//! sees is the fixed message of its [`ErrorKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::events::Phase;

/// Failure of one pipeline phase.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to create research plan for '{topic}': {reason}")]
    Planning { topic: String, reason: String },

    #[error("All {attempted} search attempts failed. Cannot proceed with synthesis.")]
    Gathering { attempted: usize, failed: usize },

    #[error("Failed to synthesize research report: {reason}")]
    Synthesis { reason: String },

    #[error("Failed to verify research: {reason}")]
    Verification { reason: String },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Planning { .. } => ErrorKind::PlanningError,
            PipelineError::Gathering { .. } => ErrorKind::GatheringError,
            PipelineError::Synthesis { .. } => ErrorKind::SynthesisError,
            PipelineError::Verification { .. } => ErrorKind::VerificationError,
        }
    }

    /// The phase this failure belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            PipelineError::Planning { .. } => Phase::Planning,
            PipelineError::Gathering { .. } => Phase::Gathering,
            PipelineError::Synthesis { .. } => Phase::Synthesis,
            PipelineError::Verification { .. } => Phase::Verification,
        }
    }

    pub fn safe_message(&self) -> &'static str {
        self.kind().safe_message()
    }
}

/// Stable error tag exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorKind {
    PlanningError,
    GatheringError,
    SynthesisError,
    VerificationError,
    ValidationError,
    InternalServerError,
    TimeoutError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PlanningError => "PlanningError",
            ErrorKind::GatheringError => "GatheringError",
            ErrorKind::SynthesisError => "SynthesisError",
            ErrorKind::VerificationError => "VerificationError",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::InternalServerError => "InternalServerError",
            ErrorKind::TimeoutError => "TimeoutError",
        }
    }

    /// Client-facing message. Never includes request data or internal detail.
    ///
    /// `ValidationError` responses carry their own detail instead; this
    /// generic text is only a fallback.
    pub fn safe_message(&self) -> &'static str {
        match self {
            ErrorKind::PlanningError => {
                "Unable to create research plan. Please try a different query."
            }
            ErrorKind::GatheringError => "Unable to gather sufficient information. Please try again.",
            ErrorKind::SynthesisError => "Unable to generate research report. Please try again.",
            ErrorKind::VerificationError => "Unable to verify research quality. Please try again.",
            ErrorKind::ValidationError => "An error occurred processing your request.",
            ErrorKind::InternalServerError => "An unexpected error occurred.",
            ErrorKind::TimeoutError => "Research timeout - workflow exceeded the maximum duration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_messages() {
        let err = PipelineError::Planning {
            topic: "quantum".to_string(),
            reason: "model offline".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create research plan for 'quantum': model offline"
        );

        let err = PipelineError::Gathering {
            attempted: 3,
            failed: 3,
        };
        assert_eq!(
            err.to_string(),
            "All 3 search attempts failed. Cannot proceed with synthesis."
        );
    }

    #[test]
    fn test_safe_message_hides_reason() {
        let err = PipelineError::Synthesis {
            reason: "api key sk-secret rejected".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::SynthesisError);
        assert_eq!(err.phase(), Phase::Synthesis);
        assert!(!err.safe_message().contains("sk-secret"));
        assert_eq!(
            err.safe_message(),
            "Unable to generate research report. Please try again."
        );
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&ErrorKind::VerificationError).unwrap();
        assert_eq!(json, "\"VerificationError\"");
        assert_eq!(ErrorKind::TimeoutError.to_string(), "TimeoutError");
    }

    #[test]
    fn test_kind_and_phase_mapping() {
        let cases = [
            (
                PipelineError::Planning {
                    topic: String::new(),
                    reason: String::new(),
                },
                ErrorKind::PlanningError,
                Phase::Planning,
            ),
            (
                PipelineError::Gathering {
                    attempted: 1,
                    failed: 1,
                },
                ErrorKind::GatheringError,
                Phase::Gathering,
            ),
            (
                PipelineError::Verification {
                    reason: String::new(),
                },
                ErrorKind::VerificationError,
                Phase::Verification,
            ),
        ];
        for (err, kind, phase) in cases {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.phase(), phase);
        }
    }
}
