use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VoteError;

/// Store-assigned vote identifier.
pub type VoteId = i64;

/// Identifier of the post being voted on.
pub type PostId = i64;

/// Subject of the identity provider's token.
pub type UserId = Uuid;

/// A like (+1) or a dislike (-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum VoteValue {
    Like,
    Dislike,
}

impl VoteValue {
    pub fn as_i16(self) -> i16 {
        match self {
            VoteValue::Like => 1,
            VoteValue::Dislike => -1,
        }
    }
}

impl TryFrom<i16> for VoteValue {
    type Error = VoteError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Like),
            -1 => Ok(VoteValue::Dislike),
            other => Err(VoteError::InvalidValue(other)),
        }
    }
}

impl From<VoteValue> for i16 {
    fn from(value: VoteValue) -> Self {
        value.as_i16()
    }
}

/// Vote entity - one user's opinion on one post.
///
/// At most one exists per `(post_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}

/// A vote that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub post_id: PostId,
    pub user_id: UserId,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}

impl NewVote {
    pub fn new(post_id: PostId, user_id: UserId, value: VoteValue) -> Self {
        Self {
            post_id,
            user_id,
            value,
            created_at: Utc::now(),
        }
    }

    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: VoteId) -> Vote {
        Vote {
            id,
            post_id: self.post_id,
            user_id: self.user_id,
            value: self.value,
            created_at: self.created_at,
        }
    }
}
