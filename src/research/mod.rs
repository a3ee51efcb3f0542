//! Deep research pipeline
//!
//! A research query runs through four fixed phases:
//!
//! 1. **Planning** - the planner turns the query into 1-5 web search steps
//! 2. **Gathering** - every step is searched concurrently; partial failure is tolerated
//! 3. **Synthesis** - findings are combined into a single report
//! 4. **Verification** - the report is scored for quality and consistency
//!
//! # Usage
//!
//! ```ignore
//! use deepr::research::ResearchWorkflow;
//!
//! let workflow = ResearchWorkflow::from_registry(&registry);
//! let result = workflow
//!     .run("What are the latest developments in quantum computing?")
//!     .await?;
//!
//! println!("{}", result.report.title);
//! ```
//!
//! For progress updates, attach a [`events::ProgressSink`] or run the
//! workflow through [`stream::ResearchStream`], which multiplexes events,
//! heartbeats and timeouts onto a single channel.

pub mod demo;
pub mod error;
pub mod events;
/// Concurrent execution of the plan's search steps.
pub mod gathering;
pub mod models;
pub mod stream;
pub mod timing;
pub mod workflow;

pub use error::{ErrorKind, PipelineError};
pub use events::{NoopSink, Phase, ProgressSink, ResearchEvent, StreamFrame};
pub use models::{
    PhaseTimings, ResearchPlan, ResearchReport, ResearchResult, SearchResult, SearchStep,
    ValidationResult,
};
pub use stream::{EventPublisher, ResearchStream, StreamConfig, StreamExit};
pub use workflow::{ResearchAgents, ResearchWorkflow, ResearchWorkflowBuilder};
