//! View-side state for a like/dislike control.
//!
//! [`VoteControl`] is the state machine a renderer reads; [`VoteWidget`]
//! drives it with the reconciler and projector.

use std::fmt;
use std::sync::Arc;

use crate::domain::{PostId, VoteTally, VoteValue};
use crate::error::VoteError;
use crate::ports::CurrentUser;
use crate::services::{VoteOutcome, VoteProjector, VoteReconciler};

/// Visible state of the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlState {
    Loading,
    Ready(VoteTally),
    Errored(String),
}

/// A vote was submitted while the controls were disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Vote controls are disabled")]
pub struct ControlDisabled;

/// Like/dislike control for a single post.
#[derive(Debug, Clone)]
pub struct VoteControl {
    post_id: PostId,
    state: ControlState,
    pending: bool,
}

impl VoteControl {
    pub fn new(post_id: PostId) -> Self {
        Self {
            post_id,
            state: ControlState::Loading,
            pending: false,
        }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Buttons are only live once counts are shown and nothing is in flight.
    pub fn is_disabled(&self) -> bool {
        self.pending || !matches!(self.state, ControlState::Ready(_))
    }

    /// Point the control at another post. Re-enters `Loading` on change.
    pub fn set_post(&mut self, post_id: PostId) {
        if post_id != self.post_id {
            self.post_id = post_id;
            self.state = ControlState::Loading;
        }
    }

    /// Record the result of a projection fetch issued for `post_id`.
    ///
    /// A late result for a previous post, success or failure, is ignored.
    pub fn finish_load(&mut self, post_id: PostId, result: Result<VoteTally, VoteError>) {
        if post_id != self.post_id {
            tracing::debug!(post_id, current = self.post_id, "Dropping stale vote load");
            return;
        }
        self.state = match result {
            Ok(tally) => ControlState::Ready(tally),
            Err(e) => ControlState::Errored(e.to_string()),
        };
    }

    /// Mark a reconciliation as in flight.
    pub fn begin_submit(&mut self) -> Result<(), ControlDisabled> {
        if self.is_disabled() {
            return Err(ControlDisabled);
        }
        self.pending = true;
        Ok(())
    }

    /// Record the result of a reconciliation.
    ///
    /// Success re-enters `Loading` so the caller refetches. Failure keeps the
    /// displayed counts.
    pub fn finish_submit(&mut self, result: &Result<VoteOutcome, VoteError>) {
        self.pending = false;
        match result {
            Ok(_) => self.state = ControlState::Loading,
            Err(e) => tracing::error!(post_id = self.post_id, error = %e, "Voting error"),
        }
    }
}

impl fmt::Display for VoteControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            ControlState::Loading => write!(f, "Loading votes..."),
            ControlState::Errored(message) => write!(f, "Error: {message}"),
            ControlState::Ready(tally) => {
                let like = format!("👍 {}", tally.likes);
                let dislike = format!("👎 {}", tally.dislikes);
                match tally.user_vote {
                    Some(VoteValue::Like) => write!(f, "[{like}] {dislike}"),
                    Some(VoteValue::Dislike) => write!(f, "{like} [{dislike}]"),
                    None => write!(f, "{like} {dislike}"),
                }
            }
        }
    }
}

/// Failure of a click on the widget.
#[derive(Debug, thiserror::Error)]
pub enum ClickError {
    #[error(transparent)]
    Disabled(#[from] ControlDisabled),

    #[error(transparent)]
    Vote(#[from] VoteError),
}

/// A [`VoteControl`] wired to its collaborators.
pub struct VoteWidget {
    control: VoteControl,
    reconciler: Arc<VoteReconciler>,
    projector: Arc<VoteProjector>,
    user: Arc<dyn CurrentUser>,
}

impl VoteWidget {
    pub fn new(
        post_id: PostId,
        reconciler: Arc<VoteReconciler>,
        projector: Arc<VoteProjector>,
        user: Arc<dyn CurrentUser>,
    ) -> Self {
        Self {
            control: VoteControl::new(post_id),
            reconciler,
            projector,
            user,
        }
    }

    pub fn control(&self) -> &VoteControl {
        &self.control
    }

    /// Fetch the tally for the current post.
    pub async fn refresh(&mut self) {
        let post_id = self.control.post_id();
        let result = self
            .projector
            .summarize(post_id, self.user.current_user())
            .await;
        self.control.finish_load(post_id, result);
    }

    /// Switch to another post and load it.
    pub async fn show_post(&mut self, post_id: PostId) {
        self.control.set_post(post_id);
        if matches!(self.control.state(), ControlState::Loading) {
            self.refresh().await;
        }
    }

    /// Handle a like or dislike click.
    pub async fn click(&mut self, value: VoteValue) -> Result<VoteOutcome, ClickError> {
        self.control.begin_submit()?;

        let result = self
            .reconciler
            .apply(value, self.control.post_id(), self.user.current_user())
            .await;
        self.control.finish_submit(&result);

        let outcome = result?;
        self.refresh().await;
        Ok(outcome)
    }
}
