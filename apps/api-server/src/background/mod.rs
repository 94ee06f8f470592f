//! Background processing: cross-instance cache invalidation and scheduled upkeep.

mod invalidation;
#[cfg(feature = "scheduler")]
mod scheduler;

pub use invalidation::subscribe_invalidations;
#[cfg(feature = "scheduler")]
pub use scheduler::{SchedulerConfig, start_scheduler};
