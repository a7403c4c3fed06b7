//! Request gates.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor, resolving the
//!   caller from `Authorization: Bearer <token>`
//! - [`role`]: the admin gate
//!
//! Every rejected token answers 401 `{"detail": "Could not validate user."}`,
//! whatever the reason was. An authenticated caller without the admin role
//! gets 403 on admin routes.

pub mod auth;
pub mod role;
