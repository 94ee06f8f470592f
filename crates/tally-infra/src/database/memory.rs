//! In-memory vote store - used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tally_core::domain::{NewVote, PostId, UserId, Vote, VoteId, VoteValue};
use tally_core::error::RepoError;
use tally_core::ports::VoteRepository;

#[derive(Default)]
struct Rows {
    votes: BTreeMap<VoteId, Vote>,
    last_id: VoteId,
}

/// Vote store held in process memory.
///
/// Enforces the one-vote-per-user-per-post rule the way the database's
/// unique index does: a second insert for a pair is a constraint violation.
#[derive(Default)]
pub struct InMemoryVoteRepository {
    rows: RwLock<Rows>,
}

impl InMemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteRepository for InMemoryVoteRepository {
    async fn find_for_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Vec<Vote>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows
            .votes
            .values()
            .filter(|v| v.post_id == post_id && v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Vote>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows
            .votes
            .values()
            .filter(|v| v.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, vote: NewVote) -> Result<Vote, RepoError> {
        let mut rows = self.rows.write().await;

        if rows
            .votes
            .values()
            .any(|v| v.post_id == vote.post_id && v.user_id == vote.user_id)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate vote for post {} by user {}",
                vote.post_id, vote.user_id
            )));
        }

        rows.last_id += 1;
        let vote = vote.with_id(rows.last_id);
        rows.votes.insert(vote.id, vote.clone());
        Ok(vote)
    }

    async fn update_value(&self, id: VoteId, value: VoteValue) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let vote = rows.votes.get_mut(&id).ok_or(RepoError::NotFound)?;
        vote.value = value;
        Ok(())
    }

    async fn delete(&self, id: VoteId) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        rows.votes.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}
