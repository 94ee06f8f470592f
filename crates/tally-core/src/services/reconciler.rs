//! Write path: turns a click into the minimal vote change.

use std::sync::Arc;

use crate::domain::{NewVote, PostId, UserId, Vote, VoteValue};
use crate::error::VoteError;
use crate::ports::VoteRepository;

use super::invalidation::ProjectionInvalidator;

/// What a reconciliation did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote by this user on this post.
    Inserted(Vote),
    /// The user switched sides; holds the vote with its new value.
    Updated(Vote),
    /// The user repeated their current vote; holds the deleted row.
    Removed(Vote),
}

impl VoteOutcome {
    /// The vote left in the store, if any.
    pub fn current(&self) -> Option<&Vote> {
        match self {
            VoteOutcome::Inserted(vote) | VoteOutcome::Updated(vote) => Some(vote),
            VoteOutcome::Removed(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VoteOutcome::Inserted(_) => "inserted",
            VoteOutcome::Updated(_) => "updated",
            VoteOutcome::Removed(_) => "removed",
        }
    }
}

/// Applies a user's vote intent against the vote store.
///
/// The lookup and the write are separate store calls, so two concurrent
/// requests for the same `(post, user)` pair can both act on the same read.
/// The store's unique index on that pair decides which insert wins.
pub struct VoteReconciler {
    repo: Arc<dyn VoteRepository>,
    invalidator: ProjectionInvalidator,
}

impl VoteReconciler {
    pub fn new(repo: Arc<dyn VoteRepository>, invalidator: ProjectionInvalidator) -> Self {
        Self { repo, invalidator }
    }

    /// Insert, flip or remove the vote of `user` on `post_id`.
    ///
    /// On success the cached projection for the post is invalidated.
    pub async fn apply(
        &self,
        value: VoteValue,
        post_id: PostId,
        user: Option<UserId>,
    ) -> Result<VoteOutcome, VoteError> {
        let user_id = user.ok_or(VoteError::Unauthenticated)?;

        let outcome = self.reconcile(value, post_id, user_id).await?;

        tracing::info!(
            post_id,
            user_id = %user_id,
            vote = value.as_i16(),
            outcome = outcome.label(),
            "Vote reconciled"
        );

        self.invalidator.invalidate(post_id).await;

        Ok(outcome)
    }

    async fn reconcile(
        &self,
        value: VoteValue,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<VoteOutcome, VoteError> {
        let mut existing = self.repo.find_for_user(post_id, user_id).await?;

        if existing.len() > 1 {
            tracing::error!(
                post_id,
                user_id = %user_id,
                count = existing.len(),
                "Duplicate votes for one user on one post"
            );
            return Err(VoteError::RaceAnomaly {
                post_id,
                user_id,
                count: existing.len(),
            });
        }

        match existing.pop() {
            Some(vote) if vote.value == value => {
                self.repo.delete(vote.id).await?;
                Ok(VoteOutcome::Removed(vote))
            }
            Some(mut vote) => {
                self.repo.update_value(vote.id, value).await?;
                vote.value = value;
                Ok(VoteOutcome::Updated(vote))
            }
            None => {
                let vote = self
                    .repo
                    .insert(NewVote::new(post_id, user_id, value))
                    .await?;
                Ok(VoteOutcome::Inserted(vote))
            }
        }
    }
}
