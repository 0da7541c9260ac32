// ABOUTME: CSRF state handling for OAuth authorization attempts
// ABOUTME: Random state tokens bound to a (user, org) pair, JSON-encoded for the redirect roundtrip

use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Length of the random state token carried in the authorize URL.
const STATE_TOKEN_LENGTH: usize = 32;

/// One authorization attempt's CSRF defense: an opaque random token plus
/// the tenant pair it was issued for. Stored with a short TTL at authorize
/// time and consumed exactly once at callback time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: String,
    pub user_id: String,
    pub org_id: String,
}

impl StateRecord {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            state: generate_state_token(),
            user_id: user_id.into(),
            org_id: org_id.into(),
        }
    }

    /// Encode for embedding in the authorize URL's `state` parameter.
    pub fn encode(&self) -> AuthResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode the `state` parameter returned by the provider redirect.
    /// An undecodable payload is treated as a CSRF failure, not a server
    /// error; the redirect is attacker-controllable.
    pub fn decode(raw: &str) -> AuthResult<Self> {
        serde_json::from_str(raw).map_err(|_| AuthError::StateMismatch)
    }
}

/// Generate a random alphanumeric state token.
fn generate_state_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
