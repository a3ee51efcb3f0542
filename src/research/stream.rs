//! Streaming event multiplexer
//!
//! A research run executes as a background task publishing into a bounded
//! queue. The foreground loop forwards queued events to the consumer, sends
//! keepalive heartbeats, watches for consumer disconnect and enforces the
//! maximum run duration.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};

use super::error::{ErrorKind, PipelineError};
use super::events::{Phase, ProgressSink, ResearchEvent, StreamFrame};
use super::models::ResearchResult;

/// Multiplexer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Bound of the event queue between workflow and stream
    pub queue_capacity: usize,
    /// How long a publisher waits on a full queue before dropping the event
    pub publish_timeout: Duration,
    pub heartbeat_interval: Duration,
    /// Hard limit on a single streamed run
    pub max_duration: Duration,
    pub poll_interval: Duration,
    /// Upper bound on waiting for the background task during cleanup
    pub cleanup_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            publish_timeout: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(30),
            max_duration: Duration::from_secs(600),
            poll_interval: Duration::from_millis(100),
            cleanup_timeout: Duration::from_secs(10),
        }
    }
}

/// Progress sink writing into the bounded event queue.
///
/// A full queue applies backpressure for up to `publish_timeout`; after that
/// the event is dropped.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<ResearchEvent>,
    publish_timeout: Duration,
}

impl EventPublisher {
    pub fn new(tx: mpsc::Sender<ResearchEvent>, publish_timeout: Duration) -> Self {
        Self {
            tx,
            publish_timeout,
        }
    }
}

#[async_trait]
impl ProgressSink for EventPublisher {
    async fn emit(&self, event: ResearchEvent) {
        match self.tx.send_timeout(event, self.publish_timeout).await {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(event)) => {
                tracing::warn!(event = event.event_type(), "event_queue_full");
            }
            // Stream already gone; nothing left to notify
            Err(SendTimeoutError::Closed(_)) => {}
        }
    }
}

/// How a stream ended. Exactly one per stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamExit {
    Completed,
    Errored,
    TimedOut,
    Disconnected,
}

/// Runs a workflow in the background and multiplexes its events onto an
/// output channel.
pub struct ResearchStream {
    config: StreamConfig,
}

impl ResearchStream {
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }

    /// Start streaming on a new task.
    pub fn spawn<F, Fut>(
        workflow: F,
        config: StreamConfig,
        output: mpsc::Sender<StreamFrame>,
    ) -> JoinHandle<StreamExit>
    where
        F: FnOnce(EventPublisher) -> Fut + Send + 'static,
        Fut: Future<Output = Result<ResearchResult, PipelineError>> + Send + 'static,
    {
        tokio::spawn(async move { ResearchStream::new(config).run(workflow, output).await })
    }

    /// Drive one stream to its terminal state.
    ///
    /// The consumer is the receiving half of `output`; dropping it is
    /// observed as a disconnect.
    pub async fn run<F, Fut>(&self, workflow: F, output: mpsc::Sender<StreamFrame>) -> StreamExit
    where
        F: FnOnce(EventPublisher) -> Fut + Send + 'static,
        Fut: Future<Output = Result<ResearchResult, PipelineError>> + Send + 'static,
    {
        let config = self.config;
        let (tx, mut rx) = mpsc::channel(config.queue_capacity.max(1));
        let publisher = EventPublisher::new(tx.clone(), config.publish_timeout);

        let mut background = tokio::spawn(async move {
            let terminal = match workflow(publisher).await {
                Ok(result) => ResearchEvent::Complete(Box::new(result)),
                Err(e) => {
                    tracing::error!(error = %e, error_type = %e.kind(), "workflow_error");
                    ResearchEvent::error(e.kind(), e.phase())
                }
            };
            // Terminal events wait for room instead of being dropped
            if tx.send(terminal).await.is_err() {
                tracing::debug!("stream closed before terminal event");
            }
        });

        let exit = self.forward(&mut rx, &output, &background).await;
        // Anything still queued after a terminal frame is discarded
        drop(rx);

        cleanup(&mut background, config.cleanup_timeout).await;
        exit
    }

    async fn forward(
        &self,
        rx: &mut mpsc::Receiver<ResearchEvent>,
        output: &mpsc::Sender<StreamFrame>,
        background: &JoinHandle<()>,
    ) -> StreamExit {
        let config = self.config;
        let started = Instant::now();
        let deadline = started + config.max_duration;
        let mut next_heartbeat = started + config.heartbeat_interval;

        loop {
            let now = Instant::now();
            let elapsed = now.duration_since(started);

            if elapsed > config.max_duration {
                return timed_out(output, background, elapsed, config.max_duration).await;
            }

            if output.is_closed() {
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "client_disconnected");
                background.abort();
                return StreamExit::Disconnected;
            }

            if now >= next_heartbeat {
                match deliver(output, StreamFrame::Heartbeat, deadline).await {
                    Delivery::Sent => {}
                    Delivery::Closed => {
                        background.abort();
                        return StreamExit::Disconnected;
                    }
                    Delivery::Deadline => {
                        let elapsed = started.elapsed();
                        return timed_out(output, background, elapsed, config.max_duration).await;
                    }
                }
                next_heartbeat += config.heartbeat_interval;
            }

            match timeout(config.poll_interval, rx.recv()).await {
                Ok(Some(event)) => {
                    let exit = match &event {
                        ResearchEvent::Complete(_) => Some(StreamExit::Completed),
                        ResearchEvent::Error(_) => Some(StreamExit::Errored),
                        _ => None,
                    };
                    match deliver(output, StreamFrame::Event(event), deadline).await {
                        Delivery::Sent => {}
                        Delivery::Closed => {
                            tracing::info!("client_disconnected");
                            background.abort();
                            return StreamExit::Disconnected;
                        }
                        Delivery::Deadline => {
                            let elapsed = started.elapsed();
                            return timed_out(output, background, elapsed, config.max_duration)
                                .await;
                        }
                    }
                    if let Some(exit) = exit {
                        return exit;
                    }
                }
                Ok(None) => {
                    // Queue closed without a terminal event: the task died
                    tracing::error!("workflow task ended without a terminal event");
                    let event = ResearchEvent::error(ErrorKind::InternalServerError, Phase::Unknown);
                    let _ = output
                        .send_timeout(StreamFrame::Event(event), FINAL_FRAME_TIMEOUT)
                        .await;
                    return StreamExit::Errored;
                }
                Err(_) => continue,
            }
        }
    }
}

/// How long the last frame of a failed or timed-out stream may wait for
/// room in the output channel.
const FINAL_FRAME_TIMEOUT: Duration = Duration::from_secs(1);

enum Delivery {
    Sent,
    Closed,
    Deadline,
}

/// Send one frame, giving up at `deadline` if the consumer stops reading.
async fn deliver(
    output: &mpsc::Sender<StreamFrame>,
    frame: StreamFrame,
    deadline: Instant,
) -> Delivery {
    match timeout_at(deadline, output.send(frame)).await {
        Ok(Ok(())) => Delivery::Sent,
        Ok(Err(_)) => Delivery::Closed,
        Err(_) => Delivery::Deadline,
    }
}

async fn timed_out(
    output: &mpsc::Sender<StreamFrame>,
    background: &JoinHandle<()>,
    elapsed: Duration,
    max_duration: Duration,
) -> StreamExit {
    tracing::warn!(
        elapsed_ms = elapsed.as_millis() as u64,
        max_ms = max_duration.as_millis() as u64,
        "stream_timeout"
    );
    background.abort();
    let event = ResearchEvent::error(ErrorKind::TimeoutError, Phase::Timeout);
    if output
        .send_timeout(StreamFrame::Event(event), FINAL_FRAME_TIMEOUT)
        .await
        .is_err()
    {
        tracing::debug!("timeout event not delivered");
    }
    StreamExit::TimedOut
}

async fn cleanup(background: &mut JoinHandle<()>, cleanup_timeout: Duration) {
    background.abort();
    match timeout(cleanup_timeout, background).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) if e.is_cancelled() => tracing::info!("workflow_cancelled"),
        Ok(Err(e)) => tracing::error!(error = %e, "workflow_failed_during_cleanup"),
        Err(_) => tracing::error!("workflow_cancellation_timeout"),
    }
}
