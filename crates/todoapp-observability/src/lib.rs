//! # Todo API Observability
//!
//! Everything that watches requests without taking part in them:
//!
//! - [`logging`]: tracing subscriber setup (console, rolling files, OTLP export)
//! - [`metrics`]: the Prometheus registry, [`HttpMetrics`]
//! - [`middleware`]: [`observe_request`], wrapping every request in a span,
//!   a timer and the request/error counters
//!
//! The metrics registry is not a global recorder. It is built once at startup
//! and handed to the middleware and to the `/metrics` handler, so independent
//! instances (tests, for one) never share counters.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use todoapp_observability::{HttpMetrics, init_tracing, observe_request, shutdown_tracer};
//!
//! init_tracing(false);
//! let metrics = HttpMetrics::new()?;
//! let app = Router::new()
//!     // ... routes ...
//!     .layer(middleware::from_fn_with_state(metrics.clone(), observe_request));
//! // ... serve ...
//! shutdown_tracer();
//! ```

pub mod logging;
pub mod metrics;
pub mod middleware;

pub use logging::{init_tracing, shutdown_tracer};
pub use metrics::HttpMetrics;
pub use middleware::observe_request;
