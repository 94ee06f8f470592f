//! Application services - vote reconciliation and the read-side projection.

mod invalidation;
mod projector;
mod reconciler;

#[cfg(test)]
pub(crate) mod testing;

pub use invalidation::{ProjectionInvalidator, VOTES_CHANNEL, votes_cache_key};
pub use projector::VoteProjector;
pub use reconciler::{VoteOutcome, VoteReconciler};
