//! Access token claim set.

use serde::{Deserialize, Serialize};

use crate::role::UserRole;

/// Claims of a validated access token.
///
/// - `sub`: username of the token holder
/// - `id`: numeric user id
/// - `role`: authorization tier
/// - `exp`: expiry as a Unix timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub id: i64,
    pub role: UserRole,
    pub exp: usize,
}

/// Claim set as it arrives on the wire, before shape checks.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    pub sub: Option<String>,
    pub id: Option<i64>,
    pub role: Option<String>,
    pub exp: usize,
}
