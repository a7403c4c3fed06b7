//! # Todo App API
//!
//! An authenticated todo service built with Axum and PostgreSQL, instrumented
//! with Prometheus metrics and OpenTelemetry tracing.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # CLI commands (create-admin)
//! ├── middleware/       # Bearer token extractor and admin gate
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration and token issuance
//! │   ├── todos/       # The caller's own todos
//! │   ├── users/       # Profile self-service
//! │   ├── admin/       # Admin-only management
//! │   └── health/      # Health, redirect, metrics exposition
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Route table and layers
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validating JSON and form extractors
//! ```
//!
//! Shared pieces live in workspace crates: `todoapp-core` (errors,
//! password hashing), `todoapp-config`, `todoapp-auth` (tokens, roles),
//! `todoapp-db` (pool, migrations) and `todoapp-observability`.
//!
//! ## Request path
//!
//! ```text
//! CatchPanicLayer → CORS → observe_request → route → AuthUser / require_admin → handler
//! ```
//!
//! `/metrics` is routed outside `observe_request`, so scrapes do not count
//! as traffic.
//!
//! ## Authentication
//!
//! `POST /auth/token` takes a username/password form and returns
//! `{"access_token": ..., "token_type": "bearer"}`. Every protected route
//! reads `Authorization: Bearer <token>`; any token problem answers
//! 401 `{"detail": "Could not validate user."}`.
//!
//! ### Creating an admin
//!
//! Registration always creates ordinary users. Admins are created with the
//! CLI:
//!
//! ```bash
//! cargo run --bin todoapp-cli -- create-admin
//! ```
//!
//! ## API documentation
//!
//! - Swagger UI: `http://localhost:8000/docs`
//! - Scalar: `http://localhost:8000/redoc`

pub mod cli;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use todoapp_auth;
pub use todoapp_config;
pub use todoapp_core;
pub use todoapp_db;
pub use todoapp_observability;
