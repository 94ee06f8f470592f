//! Current-user accessor.

use crate::domain::UserId;

/// Exposes the identity provider's active user, if any.
pub trait CurrentUser: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

/// No one is signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousUser;

impl CurrentUser for AnonymousUser {
    fn current_user(&self) -> Option<UserId> {
        None
    }
}

/// A user resolved once, e.g. from a validated bearer token.
#[derive(Debug, Clone, Copy)]
pub struct FixedUser(pub UserId);

impl CurrentUser for FixedUser {
    fn current_user(&self) -> Option<UserId> {
        Some(self.0)
    }
}
