//! Bearer-token extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use tally_core::domain::UserId;
use tally_core::ports::AuthError;

use crate::state::AppState;

fn authenticate(req: &HttpRequest) -> Result<UserId, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    state
        .tokens
        .validate_token(token)
        .map(|claims| claims.user_id)
}

/// Caller identity, anonymous when the header is missing or the token is unusable.
///
/// Rejecting anonymous writers is left to the vote service.
pub struct OptionalIdentity(pub Option<UserId>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<UserId> {
        self.0
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(user_id) => ready(Ok(OptionalIdentity(Some(user_id)))),
            Err(AuthError::MissingAuth) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable bearer token");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}
