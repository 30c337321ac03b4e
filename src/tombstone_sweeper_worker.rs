use crate::comment_thread::CommentThreadManager;
use crate::configuration::{Configuration, SweeperConfigs};
use crate::startup::{Stores, get_connection_pool};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Duration;

#[derive(Debug)]
pub enum SweepOutcome {
    /// A full batch was purged, more tombstones are likely waiting.
    BatchFull,
    Drained,
}

pub async fn run_worker_until_stopped(config: Configuration) -> Result<(), anyhow::Error> {
    let connection_pool = get_connection_pool(&config.database);
    let manager = Stores::postgres(connection_pool).comment_thread_manager();
    worker_loop(manager, config.sweeper).await
}

async fn worker_loop(
    manager: CommentThreadManager,
    config: SweeperConfigs,
) -> Result<(), anyhow::Error> {
    let mut rng = StdRng::from_entropy();
    // start with 1s base delay, max 1 minute
    let mut backoff_secs = 1_u64;

    loop {
        match try_sweep(&manager, config.batch_size).await {
            Ok(SweepOutcome::BatchFull) => {
                backoff_secs = 1;
            }

            Ok(SweepOutcome::Drained) => {
                backoff_secs = 1;
                // 0-10% jitter keeps several instances from sweeping in lockstep
                let jitter = rng.gen_range(0.0..=0.1);
                let sleep_duration =
                    Duration::from_secs_f64(config.interval_secs as f64 * (1.0 + jitter));
                tokio::time::sleep(sleep_duration).await;
            }

            Err(e) => {
                tracing::warn!(error = ?e, "Transient failure while sweeping tombstones");
                let jitter = rng.gen_range(0.0..=0.2);
                let sleep_duration = Duration::from_secs_f64(backoff_secs as f64 * (1.0 + jitter));
                tokio::time::sleep(sleep_duration).await;

                // exponential backoff, capped at 60s
                backoff_secs = (backoff_secs * 2).min(60);
            }
        }
    }
}

#[tracing::instrument(skip(manager), fields(purged = tracing::field::Empty))]
pub async fn try_sweep(
    manager: &CommentThreadManager,
    batch_size: i64,
) -> Result<SweepOutcome, anyhow::Error> {
    let purged = manager.sweep_tombstones(batch_size).await?;
    tracing::Span::current().record("purged", purged);

    if purged > 0 {
        tracing::info!(purged, "Swept empty tombstones");
    }

    if batch_size > 0 && purged as i64 >= batch_size {
        Ok(SweepOutcome::BatchFull)
    } else {
        Ok(SweepOutcome::Drained)
    }
}
