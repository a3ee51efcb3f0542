//! Mock implementations for testing.
//!
//! Mock agents and progress sinks shared by the integration tests, so no
//! test needs a running model or network access.

use async_trait::async_trait;
use deepr::research::{ProgressSink, ResearchEvent};
use deepr::{AgentError, StructuredAgent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Respond<T> = Box<dyn Fn(&str) -> Result<T, AgentError> + Send + Sync>;

/// Mock agent with a scripted response.
///
/// # Examples
///
/// ```ignore
/// // Always returns the same plan
/// let planner = MockAgent::returning("planner", plan);
///
/// // Always fails
/// let synthesizer = MockAgent::<ResearchReport>::failing("synthesizer", AgentError::Llm("down".into()));
///
/// // Sleeps before answering
/// let slow = MockAgent::returning("verifier", validation).with_delay(Duration::from_secs(5));
/// ```
pub struct MockAgent<T> {
    name: &'static str,
    respond: Respond<T>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl<T: Clone + Send + Sync + 'static> MockAgent<T> {
    /// Create a mock agent that always returns `value`.
    pub fn returning(name: &'static str, value: T) -> Self {
        Self::from_fn(name, move |_| Ok(value.clone()))
    }
}

impl<T: 'static> MockAgent<T> {
    /// Create a mock agent that always fails with `error`.
    pub fn failing(name: &'static str, error: AgentError) -> Self {
        Self::from_fn(name, move |_| Err(error.clone()))
    }

    /// Create a mock agent computing its response from the input.
    pub fn from_fn<F>(name: &'static str, respond: F) -> Self
    where
        F: Fn(&str) -> Result<T, AgentError> + Send + Sync + 'static,
    {
        Self {
            name,
            respond: Box::new(respond),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep for `delay` before responding.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared counter of `run` invocations; stays valid after the agent is moved.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Shared log of every input received.
    pub fn input_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.inputs)
    }
}

#[async_trait]
impl<T: Send + 'static> StructuredAgent<T> for MockAgent<T> {
    async fn run(&self, input: &str) -> Result<T, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.respond)(input)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Progress sink that records every event in order.
#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ResearchEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResearchEvent> {
        self.events.lock().unwrap().clone()
    }

    /// `event_type` of every recorded event.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.event_type()).collect()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn emit(&self, event: ResearchEvent) {
        self.events.lock().unwrap().push(event);
    }
}
