//! # Todo API Core
//!
//! Foundational types shared by every crate of the Todo API:
//!
//! - [`errors`]: the application error type and its `{"detail": ...}` envelope
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use todoapp_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("s3cret-pass")?;
//! assert!(verify_password("s3cret-pass", &hash));
//!
//! let err = AppError::not_found(anyhow::anyhow!("Todo not found."));
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, INTERNAL_ERROR_DETAIL, UnhandledError};
pub use password::{
    hash_password, spawn_hash_password, spawn_verify_password, spawn_verify_unknown_account,
    verify_password,
};
