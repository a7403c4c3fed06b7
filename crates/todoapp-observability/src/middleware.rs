//! Request observability middleware.
//!
//! [`observe_request`] wraps every request in an `http_request` span, keeps
//! `app_requests_in_progress` up to date and classifies the outcome into
//! exactly one of two paths:
//!
//! - success: the handler produced a response without an [`UnhandledError`]
//!   marker. `app_request_count`, `app_request_latency_seconds` and the body
//!   size histograms are recorded, whatever the status code.
//! - failure: the handler panicked, or answered with a marked 5xx.
//!   `app_error_count` is recorded and nothing else. A panic is re-raised
//!   after bookkeeping so the outer panic layer can turn it into a response.
//!
//! Metrics are keyed by route template; requests no route matched share the
//! [`UNMATCHED_ENDPOINT`] label.
//!
//! The in-progress gauge and the span are released by [`RequestScope`]'s
//! `Drop`, so a cancelled request does not leak either.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use metrics::Gauge;
use tracing::{Instrument, Span, debug, error, field::Empty, info, info_span, warn};
use uuid::Uuid;

use todoapp_core::UnhandledError;

use crate::metrics::HttpMetrics;

/// Bodies above this size are forwarded untouched and never attached to spans.
const MAX_CAPTURED_BODY: usize = 64 * 1024;

/// Endpoint label for requests no route matched, so stray URLs share one
/// series instead of growing the registry.
pub const UNMATCHED_ENDPOINT: &str = "<unmatched>";

/// Paths whose bodies carry credentials.
const REDACTED_PATHS: &[&str] = &["/auth", "/users/password"];

pub async fn observe_request(
    State(metrics): State<HttpMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let url = req.uri().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_owned());
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned());
    let request_id = Uuid::new_v4();
    let request_size = body_size(req.body());

    let span = info_span!(
        "http_request",
        otel.kind = "server",
        request_id = %request_id,
        http.method = %method,
        http.url = %url,
        http.route = %endpoint,
        http.client_ip = %client_ip,
        http.request_body = Empty,
        http.status_code = Empty,
        http.duration = Empty,
        otel.status_code = Empty,
        error.kind = Empty,
        error.message = Empty,
    );

    let scope = RequestScope::open(
        metrics,
        method.as_str(),
        &endpoint,
        request_size,
        span.clone(),
    );

    async move {
        debug!("Request started");
        let req = capture_body(req).await;

        match AssertUnwindSafe(next.run(req)).catch_unwind().await {
            Ok(response) => {
                match response.extensions().get::<UnhandledError>() {
                    Some(failure) => scope.fail(failure.kind, &failure.message),
                    None => scope.complete(response.status(), body_size(response.body())),
                }
                response
            }
            Err(panic) => {
                scope.fail("panic", &panic_message(panic.as_ref()));
                std::panic::resume_unwind(panic)
            }
        }
    }
    .instrument(span)
    .await
}

/// Per-request bookkeeping, released on drop.
struct RequestScope {
    metrics: HttpMetrics,
    method: String,
    endpoint: String,
    started: Instant,
    request_size: Option<u64>,
    in_progress: Gauge,
    span: Span,
    finished: bool,
}

impl RequestScope {
    fn open(
        metrics: HttpMetrics,
        method: &str,
        endpoint: &str,
        request_size: Option<u64>,
        span: Span,
    ) -> Self {
        let in_progress = metrics.in_progress(method, endpoint);
        in_progress.increment(1.0);

        Self {
            metrics,
            method: method.to_owned(),
            endpoint: endpoint.to_owned(),
            started: Instant::now(),
            request_size,
            in_progress,
            span,
            finished: false,
        }
    }

    fn complete(mut self, status: StatusCode, response_size: Option<u64>) {
        let latency = self.started.elapsed();
        self.metrics
            .record_request(&self.method, &self.endpoint, status.as_u16(), latency);
        if let Some(size) = self.request_size {
            self.metrics
                .record_request_size(&self.method, &self.endpoint, status.as_u16(), size);
        }
        if let Some(size) = response_size {
            self.metrics
                .record_response_size(&self.method, &self.endpoint, status.as_u16(), size);
        }

        self.span.record("http.status_code", status.as_u16());
        self.span.record("http.duration", latency.as_secs_f64());
        self.span.record("otel.status_code", "OK");

        let latency_ms = latency.as_millis() as u64;
        match status.as_u16() {
            500..=599 => error!(status = status.as_u16(), latency_ms, "Server error"),
            400..=499 => warn!(status = status.as_u16(), latency_ms, "Client error"),
            _ => info!(status = status.as_u16(), latency_ms, "Request completed"),
        }

        self.finished = true;
    }

    fn fail(mut self, kind: &str, message: &str) {
        self.metrics.record_error(&self.method, &self.endpoint, kind);

        self.span
            .record("http.duration", self.started.elapsed().as_secs_f64());
        self.span.record("otel.status_code", "ERROR");
        self.span.record("error.kind", kind);
        self.span.record("error.message", message);

        error!(error.kind = kind, error.message = message, "Request failed");

        self.finished = true;
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.in_progress.decrement(1.0);

        if !self.finished {
            self.span.record("otel.status_code", "ERROR");
            self.span
                .record("error.message", "request cancelled before completion");
            warn!(parent: &self.span, "Request cancelled");
        }
    }
}

/// Exact body length when the body knows it up front (streams do not).
fn body_size(body: &Body) -> Option<u64> {
    body.size_hint().exact()
}

/// Buffers small textual bodies of writes so they can be attached to the
/// current span, then hands an equivalent request back.
async fn capture_body(req: Request) -> Request {
    if !matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH) {
        return req;
    }

    let path = req.uri().path();
    if REDACTED_PATHS.iter().any(|prefix| path.starts_with(prefix)) {
        return req;
    }

    match req.body().size_hint().upper() {
        Some(size) if size <= MAX_CAPTURED_BODY as u64 => {}
        _ => return req,
    }

    let (parts, body) = req.into_parts();
    match axum::body::to_bytes(body, MAX_CAPTURED_BODY).await {
        Ok(bytes) => {
            if let Ok(text) = std::str::from_utf8(&bytes) {
                if !text.is_empty() {
                    Span::current().record("http.request_body", text);
                }
            }
            Request::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            debug!(error = %e, "Could not read request body");
            Request::from_parts(parts, Body::empty())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_owned()
    }
}
