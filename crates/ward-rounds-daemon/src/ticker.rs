//! Periodic rollover loop.
//!
//! Runs one pass at startup to catch up after downtime, then re-checks the
//! local day on every tick. Each pass loads the ward, rolls it to the clock's
//! day and writes back only the records that changed, so passes within the
//! same day are no-ops.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use ward_rounds_core::db::{Database, DbError};
use ward_rounds_core::{Clock, RolloverReport};

/// Keeps a stored ward rolled over to the current day.
pub struct RolloverTicker {
    db: Arc<Mutex<Database>>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    tick_interval: Duration,
}

impl RolloverTicker {
    /// Create a ticker over `db`. Call [`run`](Self::run) to start it.
    pub fn new(db: Arc<Mutex<Database>>, clock: Arc<dyn Clock>, cancel: CancellationToken) -> Self {
        Self {
            db,
            clock,
            cancel,
            tick_interval: Duration::from_secs(crate::config::MAX_TICK_INTERVAL_SECS),
        }
    }

    /// Override the tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Roll the stored ward over to the clock's current day.
    pub fn run_once(&self) -> Result<RolloverReport, DbError> {
        let today = self.clock.today();
        let mut db = self
            .db
            .lock()
            .map_err(|e| DbError::Constraint(format!("database lock poisoned: {e}")))?;
        db.rollover_stored_patients(today)
    }

    /// Run until the cancellation token is cancelled. Returns the number of
    /// passes that rolled at least one patient.
    ///
    /// ```rust,ignore
    /// let ticker = RolloverTicker::new(db, Arc::new(LocalClock), cancel.child_token());
    /// tokio::spawn(ticker.run());
    /// ```
    pub async fn run(self) -> usize {
        info!(interval_secs = self.tick_interval.as_secs(), "rollover ticker started");

        let mut productive_passes = 0;
        let mut tick = tokio::time::interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("rollover ticker cancelled");
                    break;
                }
                // The first tick completes immediately: that is the startup pass.
                _ = tick.tick() => {
                    match self.run_once() {
                        Ok(report) if report.rolled > 0 => {
                            productive_passes += 1;
                        }
                        Ok(_) => debug!("ward already current"),
                        Err(e) => error!(error = %e, "rollover pass failed"),
                    }
                }
            }
        }

        productive_passes
    }
}
