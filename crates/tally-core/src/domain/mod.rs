//! Domain entities - the core business objects.

mod tally;
mod vote;

pub use tally::VoteTally;
pub use vote::{NewVote, PostId, UserId, Vote, VoteId, VoteValue};
