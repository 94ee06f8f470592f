//! Periodic upkeep on tokio-cron-scheduler.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::state::AppState;

/// Every minute, on the minute.
const PURGE_SCHEDULE: &str = "0 * * * * *";

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

/// Running upkeep jobs. Dropping it leaves the jobs running; call `shutdown`.
pub struct Upkeep {
    inner: Option<JobScheduler>,
}

impl Upkeep {
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        if let Some(mut scheduler) = self.inner.take() {
            scheduler.shutdown().await?;
            tracing::info!("Scheduler stopped");
        }
        Ok(())
    }
}

/// Register upkeep jobs for `state` and start them.
///
/// Only a process-local cache needs purging; Redis expires keys itself.
pub async fn start_scheduler(
    config: SchedulerConfig,
    state: &AppState,
) -> Result<Upkeep, JobSchedulerError> {
    let Some(cache) = state.memory_cache.clone() else {
        tracing::debug!("No process-local cache, nothing to schedule");
        return Ok(Upkeep { inner: None });
    };
    if !config.enabled {
        tracing::info!("Scheduler disabled");
        return Ok(Upkeep { inner: None });
    }

    let scheduler = JobScheduler::new().await?;
    let job = Job::new_async(PURGE_SCHEDULE, move |_uuid, _lock| {
        let cache = cache.clone();
        Box::pin(async move {
            let purged = cache.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired vote lists");
            }
        })
    })?;

    let id = scheduler.add(job).await?;
    tracing::info!(schedule = PURGE_SCHEDULE, job_id = %id, "Cache purge job registered");

    scheduler.start().await?;
    tracing::info!("Scheduler started");

    Ok(Upkeep {
        inner: Some(scheduler),
    })
}
