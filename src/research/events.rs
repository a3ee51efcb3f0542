//! Progress events emitted while a research workflow runs
//!
//! Events are rendered as Server-Sent Events frames:
//!
//! ```text
//! event: phase_start
//! data: {"phase":"planning"}
//!
//! ```
//!
//! Heartbeats are SSE comments (`: keepalive`) that clients ignore.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use utoipa::ToSchema;

use super::error::ErrorKind;
use super::models::ResearchResult;

/// Pipeline phase label.
///
/// `Unknown` and `Timeout` only appear as the phase of an error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Planning,
    Gathering,
    Synthesis,
    Verification,
    Unknown,
    Timeout,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Gathering => "gathering",
            Phase::Synthesis => "synthesis",
            Phase::Verification => "verification",
            Phase::Unknown => "unknown",
            Phase::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a terminal `error` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorPayload {
    /// User-safe message
    pub error: String,
    pub error_type: ErrorKind,
    pub phase: Phase,
}

impl ErrorPayload {
    pub fn new(kind: ErrorKind, phase: Phase) -> Self {
        Self {
            error: kind.safe_message().to_string(),
            error_type: kind,
            phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResearchEvent {
    PhaseStart {
        phase: Phase,
    },
    PhaseComplete {
        phase: Phase,
        duration_ms: u64,
        output_summary: Value,
    },
    GatheringProgress {
        completed: usize,
        total: usize,
        current_query: String,
    },
    PhaseWarning {
        phase: Phase,
        warning: String,
    },
    Complete(Box<ResearchResult>),
    Error(ErrorPayload),
}

impl ResearchEvent {
    pub fn error(kind: ErrorKind, phase: Phase) -> Self {
        ResearchEvent::Error(ErrorPayload::new(kind, phase))
    }

    /// SSE event name.
    pub fn event_type(&self) -> &'static str {
        match self {
            ResearchEvent::PhaseStart { .. } => "phase_start",
            ResearchEvent::PhaseComplete { .. } => "phase_complete",
            ResearchEvent::GatheringProgress { .. } => "gathering_progress",
            ResearchEvent::PhaseWarning { .. } => "phase_warning",
            ResearchEvent::Complete(_) => "complete",
            ResearchEvent::Error(_) => "error",
        }
    }

    /// JSON payload carried in the `data:` line.
    pub fn data(&self) -> Value {
        match self {
            ResearchEvent::PhaseStart { phase } => json!({ "phase": phase }),
            ResearchEvent::PhaseComplete {
                phase,
                duration_ms,
                output_summary,
            } => json!({
                "phase": phase,
                "duration_ms": duration_ms,
                "output_summary": output_summary,
            }),
            ResearchEvent::GatheringProgress {
                completed,
                total,
                current_query,
            } => json!({
                "completed": completed,
                "total": total,
                "current_query": current_query,
            }),
            ResearchEvent::PhaseWarning { phase, warning } => {
                json!({ "phase": phase, "warning": warning })
            }
            ResearchEvent::Complete(result) => {
                serde_json::to_value(result.as_ref()).unwrap_or(Value::Null)
            }
            ResearchEvent::Error(payload) => serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }

    /// Terminal events end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResearchEvent::Complete(_) | ResearchEvent::Error(_))
    }

    /// Wire representation: `event: <type>\ndata: <json>\n\n`.
    pub fn format(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event_type(), self.data())
    }
}

/// A frame written to a stream consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    Event(ResearchEvent),
    Heartbeat,
}

impl StreamFrame {
    pub const KEEPALIVE: &'static str = ": keepalive\n\n";

    pub fn format(&self) -> String {
        match self {
            StreamFrame::Event(event) => event.format(),
            StreamFrame::Heartbeat => Self::KEEPALIVE.to_string(),
        }
    }

    pub fn event(&self) -> Option<&ResearchEvent> {
        match self {
            StreamFrame::Event(event) => Some(event),
            StreamFrame::Heartbeat => None,
        }
    }
}

/// Receives progress events from a running workflow.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn emit(&self, event: ResearchEvent);
}

/// Discards every event. Used by the non-streaming endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl ProgressSink for NoopSink {
    async fn emit(&self, _event: ResearchEvent) {}
}
