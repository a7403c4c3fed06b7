//! Request metrics.
//!
//! [`HttpMetrics`] owns a Prometheus recorder that is *not* installed as the
//! process-wide `metrics` recorder. Handles are registered against it
//! directly, which keeps every instance isolated. Clones share the same
//! registry; all updates are atomic.
//!
//! | Metric | Type | Labels |
//! |---|---|---|
//! | `app_request_count` | counter | method, endpoint, status_code |
//! | `app_request_latency_seconds` | histogram | method, endpoint |
//! | `app_error_count` | counter | method, endpoint, error_type |
//! | `app_requests_in_progress` | gauge | method, endpoint |
//! | `app_request_size_bytes` | histogram | method, endpoint, status_code |
//! | `app_response_size_bytes` | histogram | method, endpoint, status_code |
//! | `app_login_attempts` | counter | outcome |
//! | `app_tokens_issued` | counter | |

use std::sync::Arc;
use std::time::Duration;

use metrics::{Counter, Gauge, Histogram, Key, Label, Level, Metadata, Recorder, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub const REQUEST_COUNT: &str = "app_request_count";
pub const REQUEST_LATENCY: &str = "app_request_latency_seconds";
pub const ERROR_COUNT: &str = "app_error_count";
pub const REQUESTS_IN_PROGRESS: &str = "app_requests_in_progress";
pub const REQUEST_SIZE: &str = "app_request_size_bytes";
pub const RESPONSE_SIZE: &str = "app_response_size_bytes";
pub const LOGIN_ATTEMPTS: &str = "app_login_attempts";
pub const TOKENS_ISSUED: &str = "app_tokens_issued";

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

const SIZE_BUCKETS: &[f64] = &[
    64.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0, 262144.0, 1048576.0,
];

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

#[derive(Clone)]
pub struct HttpMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl std::fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetrics").finish_non_exhaustive()
    }
}

impl HttpMetrics {
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_LATENCY.to_string()), LATENCY_BUCKETS)?
            .set_buckets_for_metric(Matcher::Full(REQUEST_SIZE.to_string()), SIZE_BUCKETS)?
            .set_buckets_for_metric(Matcher::Full(RESPONSE_SIZE.to_string()), SIZE_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        let metrics = Self {
            recorder: Arc::new(recorder),
            handle,
        };
        metrics.describe();
        Ok(metrics)
    }

    fn describe(&self) {
        let recorder = &self.recorder;
        recorder.describe_counter(REQUEST_COUNT.into(), None, "Application Request Count".into());
        recorder.describe_histogram(
            REQUEST_LATENCY.into(),
            Some(Unit::Seconds),
            "Application Request Latency".into(),
        );
        recorder.describe_counter(ERROR_COUNT.into(), None, "Application Error Count".into());
        recorder.describe_gauge(
            REQUESTS_IN_PROGRESS.into(),
            None,
            "Requests currently being served".into(),
        );
        recorder.describe_histogram(
            REQUEST_SIZE.into(),
            Some(Unit::Bytes),
            "Request body size".into(),
        );
        recorder.describe_histogram(
            RESPONSE_SIZE.into(),
            Some(Unit::Bytes),
            "Response body size".into(),
        );
        recorder.describe_counter(
            LOGIN_ATTEMPTS.into(),
            None,
            "Password logins by outcome".into(),
        );
        recorder.describe_counter(TOKENS_ISSUED.into(), None, "Access tokens issued".into());
    }

    fn counter(&self, name: &'static str, labels: Vec<Label>) -> Counter {
        self.recorder
            .register_counter(&Key::from_parts(name, labels), &METADATA)
    }

    fn histogram(&self, name: &'static str, labels: Vec<Label>) -> Histogram {
        self.recorder
            .register_histogram(&Key::from_parts(name, labels), &METADATA)
    }

    fn gauge(&self, name: &'static str, labels: Vec<Label>) -> Gauge {
        self.recorder
            .register_gauge(&Key::from_parts(name, labels), &METADATA)
    }

    /// Counts a request that produced a response and records its latency.
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, latency: Duration) {
        self.counter(
            REQUEST_COUNT,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
                Label::new("status_code", status.to_string()),
            ],
        )
        .increment(1);

        self.histogram(
            REQUEST_LATENCY,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
            ],
        )
        .record(latency.as_secs_f64());
    }

    pub fn record_request_size(&self, method: &str, endpoint: &str, status: u16, bytes: u64) {
        self.size(REQUEST_SIZE, method, endpoint, status, bytes);
    }

    pub fn record_response_size(&self, method: &str, endpoint: &str, status: u16, bytes: u64) {
        self.size(RESPONSE_SIZE, method, endpoint, status, bytes);
    }

    fn size(&self, name: &'static str, method: &str, endpoint: &str, status: u16, bytes: u64) {
        self.histogram(
            name,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
                Label::new("status_code", status.to_string()),
            ],
        )
        .record(bytes as f64);
    }

    /// Counts a request that ended in an unhandled failure.
    pub fn record_error(&self, method: &str, endpoint: &str, error_type: &str) {
        self.counter(
            ERROR_COUNT,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
                Label::new("error_type", error_type.to_owned()),
            ],
        )
        .increment(1);
    }

    pub(crate) fn in_progress(&self, method: &str, endpoint: &str) -> Gauge {
        self.gauge(
            REQUESTS_IN_PROGRESS,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
            ],
        )
    }

    pub fn record_login(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.counter(LOGIN_ATTEMPTS, vec![Label::new("outcome", outcome)])
            .increment(1);
    }

    pub fn record_token_issued(&self) {
        self.counter(TOKENS_ISSUED, vec![]).increment(1);
    }

    /// Prometheus text exposition of every metric in this registry.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Spawns the periodic upkeep task (drains histogram buffers).
    pub fn spawn_upkeep(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                handle.run_upkeep();
            }
        })
    }

    /// Reads back the value of one sample from the exposition, e.g.
    /// `sample("app_request_count", &[("method", "GET"), ("status_code", "200")])`.
    ///
    /// Labels not listed are not checked. Returns `None` when no sample matches.
    pub fn sample(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        let rendered = self.render();
        rendered
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter(|line| {
                let metric = line.split(['{', ' ']).next().unwrap_or_default();
                metric == name
            })
            .find(|line| {
                labels
                    .iter()
                    .all(|(key, value)| line.contains(&format!("{key}=\"{value}\"")))
            })
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }
}
