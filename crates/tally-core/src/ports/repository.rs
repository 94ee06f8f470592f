use async_trait::async_trait;

use crate::domain::{NewVote, PostId, UserId, Vote, VoteId, VoteValue};
use crate::error::RepoError;

/// Vote store - the `votes` collection of the backing database.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// All votes cast by `user_id` on `post_id`.
    ///
    /// Returns a list rather than an option so callers can see a broken
    /// uniqueness invariant instead of silently picking a row.
    async fn find_for_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Vec<Vote>, RepoError>;

    /// All votes on a post, unordered.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Vote>, RepoError>;

    /// Insert a new vote, returning it with its assigned id.
    async fn insert(&self, vote: NewVote) -> Result<Vote, RepoError>;

    /// Overwrite the value of an existing vote.
    async fn update_value(&self, id: VoteId, value: VoteValue) -> Result<(), RepoError>;

    /// Delete a vote by id.
    async fn delete(&self, id: VoteId) -> Result<(), RepoError>;
}
