use crate::{
    research::{
        demo::{demo_events, demo_research_result, is_demo_mode_allowed},
        models::ModelError,
        ResearchResult, ResearchStream, ResearchWorkflow, StreamFrame,
    },
    types::{AppError, ErrorResponse, ResearchRequest, Result},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderValue},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use utoipa::IntoParams;

/// Query parameters shared by both research endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DemoParams {
    /// Return fixture data without calling any model
    #[serde(default)]
    pub demo: bool,
}

/// Run the four-phase research pipeline
#[utoipa::path(
    post,
    path = "/research",
    request_body = ResearchRequest,
    params(DemoParams),
    responses(
        (status = 200, description = "Research completed", body = ResearchResult),
        (status = 403, description = "Demo mode not available", body = ErrorResponse),
        (status = 422, description = "Invalid request or pipeline failure", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn research(
    State(state): State<AppState>,
    Query(params): Query<DemoParams>,
    payload: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchResult>> {
    let request = parse_request(payload)?;

    if params.demo {
        ensure_demo_allowed(&state)?;
        let result = demo_research_result(&request.query).map_err(demo_fixture_error)?;
        return Ok(Json(result));
    }

    let result = ResearchWorkflow::new(state.agents.clone())
        .run(&request.query)
        .await?;
    Ok(Json(result))
}

/// Run the pipeline and stream progress as server-sent events
///
/// Events: `phase_start`, `phase_complete`, `gathering_progress`,
/// `phase_warning`, then exactly one of `complete` or `error`.
#[utoipa::path(
    post,
    path = "/research/stream",
    request_body = ResearchRequest,
    params(DemoParams),
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream", body = String),
        (status = 403, description = "Demo mode not available", body = ErrorResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn research_stream(
    State(state): State<AppState>,
    Query(params): Query<DemoParams>,
    payload: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Response> {
    let request = parse_request(payload)?;
    let (tx, rx) = mpsc::channel::<StreamFrame>(state.stream_config.queue_capacity.max(1));

    if params.demo {
        ensure_demo_allowed(&state)?;
        let events = demo_events(&request.query).map_err(demo_fixture_error)?;
        tokio::spawn(async move {
            for event in events {
                if tx.send(StreamFrame::Event(event)).await.is_err() {
                    break;
                }
            }
        });
    } else {
        let agents = state.agents.clone();
        let query = request.query;
        ResearchStream::spawn(
            move |publisher| async move {
                ResearchWorkflow::new(agents)
                    .with_sink(Arc::new(publisher))
                    .run(&query)
                    .await
            },
            state.stream_config,
            tx,
        );
    }

    Ok(sse_response(rx))
}

fn parse_request(
    payload: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<ResearchRequest> {
    let Json(request) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    request.validate()?;
    Ok(request)
}

fn demo_fixture_error(err: ModelError) -> AppError {
    AppError::Internal(format!("demo fixture rejected: {err}"))
}

fn ensure_demo_allowed(state: &AppState) -> Result<()> {
    let environment = &state.config.server.environment;
    if !is_demo_mode_allowed(environment) {
        return Err(AppError::Forbidden(
            "Demo mode not available in this environment".to_string(),
        ));
    }
    tracing::warn!(environment = %environment, "demo_mode_active");
    Ok(())
}

/// Convert a frame into its SSE wire form.
pub fn to_sse_event(frame: &StreamFrame) -> Event {
    match frame {
        StreamFrame::Event(event) => Event::default()
            .event(event.event_type())
            .data(event.data().to_string()),
        StreamFrame::Heartbeat => Event::default().comment("keepalive"),
    }
}

/// The response ends when the sending half of `frames` is dropped. Dropping
/// the response drops the receiver, which the stream sees as a disconnect.
fn sse_response(mut frames: mpsc::Receiver<StreamFrame>) -> Response {
    let body = async_stream::stream! {
        while let Some(frame) = frames.recv().await {
            yield Ok::<Event, Infallible>(to_sse_event(&frame));
        }
    };

    let mut response = Sse::new(body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    response
}
