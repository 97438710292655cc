use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer},
};
use tracing::{error, field, info, info_span, warn, Span};
use uuid::Uuid;

/// Request tracing for the API. Each request gets its own span, which the
/// identity extractor fills with `user_id` once a token is accepted.
pub type ApiTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, DefaultOnRequest, RequestOutcome>;

pub fn api_trace_layer() -> ApiTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(RequestOutcome)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        // Query strings carry filter values only, the path is enough to group by.
        info_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            path = request.uri().path(),
            user_id = field::Empty,
            status = field::Empty,
        )
    }
}

/// Logs one line per response, with the level following the status class.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestOutcome;

impl<B> OnResponse<B> for RequestOutcome {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        span.record("status", status.as_u16());
        let latency_ms = latency.as_millis() as u64;

        if status.is_server_error() {
            error!(latency_ms, "request failed with {}", status);
        } else if status.is_client_error() {
            warn!(latency_ms, "request rejected with {}", status);
        } else {
            info!(latency_ms, "request completed");
        }
    }
}
