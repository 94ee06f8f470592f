//! # Tally Core
//!
//! The domain layer of the Tally vote service.
//! Vote reconciliation, the read-side projection and the view-state machine
//! live here, with every external collaborator behind a port.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod view;

pub use error::{RepoError, VoteError};
pub use services::{ProjectionInvalidator, VoteOutcome, VoteProjector, VoteReconciler};
