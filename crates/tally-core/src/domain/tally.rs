use serde::{Deserialize, Serialize};

use super::vote::{PostId, UserId, Vote, VoteValue};

/// Derived like/dislike counts for a post, as seen by one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub post_id: PostId,
    pub likes: usize,
    pub dislikes: usize,
    /// The viewer's own vote, if they have one.
    pub user_vote: Option<VoteValue>,
}

impl VoteTally {
    /// Project a full vote list for `post_id` into counts.
    pub fn from_votes(post_id: PostId, votes: &[Vote], viewer: Option<UserId>) -> Self {
        let likes = votes.iter().filter(|v| v.value == VoteValue::Like).count();
        let dislikes = votes
            .iter()
            .filter(|v| v.value == VoteValue::Dislike)
            .count();
        let user_vote = viewer.and_then(|user_id| {
            votes
                .iter()
                .find(|v| v.user_id == user_id)
                .map(|v| v.value)
        });

        Self {
            post_id,
            likes,
            dislikes,
            user_vote,
        }
    }

    pub fn empty(post_id: PostId) -> Self {
        Self {
            post_id,
            likes: 0,
            dislikes: 0,
            user_vote: None,
        }
    }
}
