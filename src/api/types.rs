//! Shared types for the HTTP API layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::state::AppState;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

/// Authenticated owner for the current request. Injected into request
/// extensions by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct OwnerContext {
    pub owner_id: Uuid,
}

// ═══════════════════════════════════════════════════════════
// Token helpers
// ═══════════════════════════════════════════════════════════

/// Hash a bearer token with SHA-256. The registry stores only digests,
/// so a memory dump never yields a usable token.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random 256-bit bearer token, base64url encoded.
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_token_is_deterministic() {
        let a = hash_token("test-token");
        let b = hash_token("test-token");
        assert_eq!(a, b);
    }

    #[test]
    fn hash_token_differs_for_different_tokens() {
        let a = hash_token("token-1");
        let b = hash_token("token-2");
        assert_ne!(a, b);
    }

    #[test]
    fn generate_token_is_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 32 bytes base64url without padding is 43 characters.
        assert_eq!(a.len(), 43);
        assert!(!a.contains('+'));
        assert!(!a.contains('/'));
        assert!(!a.contains('='));
    }
}
