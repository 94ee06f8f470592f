//! Token validation port for the external identity provider.

use uuid::Uuid;

/// What the server takes from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
}

/// Bearer token codec.
///
/// Tokens are minted by the identity provider; `generate_token` exists for
/// local tooling and tests that need a valid caller.
pub trait TokenService: Send + Sync {
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
