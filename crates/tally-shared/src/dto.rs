//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to cast, flip or withdraw a vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastVoteRequest {
    /// `1` for like, `-1` for dislike.
    pub vote: i16,
}

/// A stored vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub id: i64,
    pub post_id: i64,
    pub user_id: String,
    pub vote: i16,
    pub created_at: String,
}

/// Tally of a post as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummaryResponse {
    pub post_id: i64,
    pub likes: u64,
    pub dislikes: u64,
    /// The caller's own vote; absent for anonymous callers or non-voters.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_vote: Option<i16>,
}

/// What a cast did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Inserted,
    Updated,
    Removed,
}

/// Result of casting a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVoteResponse {
    pub action: VoteAction,
    /// The vote now stored for the caller, `None` after a removal.
    pub vote: Option<VoteResponse>,
}
