use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// An opaque bearer credential issued by the backing API. By convention it is
/// three dot-separated base64url segments, but this crate never constructs,
/// signs, or verifies one; only the payload segment is ever looked at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[repr(transparent)]
pub struct Credential(pub String);

/// Claims carried in the credential's payload segment. Decoded on demand,
/// never persisted or cached.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The identity derived from an unverified credential payload.
///
/// The signature is never checked, so this is advisory only: good enough to
/// show a username or hide a button, never a substitute for the server's own
/// authorization decision on each protected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedIdentity {
    pub id: i64,
    pub username: String,
    pub roles: HashSet<String>,
}

impl UnverifiedIdentity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Where a session flow or guard sends the host application next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The login entry point.
    Login,
    /// The default authenticated landing page (the board).
    Home,
}
