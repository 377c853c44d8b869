//! Poll-until-terminal-state watcher.
//!
//! Many Atlas operations are asynchronous on the server side: creating a snapshot, restoring a backup,
//! enabling a backup compliance policy or scaling a cluster all return immediately and then move through
//! a series of states. The [`Watcher`] repeatedly invokes a caller supplied probe until that probe reports
//! a terminal state, fails, times out or gets cancelled.
//!
//! The watcher knows nothing about resource states. Deciding which states are terminal is the job of the
//! probe, which keeps the watcher usable for every resource type.
//!
//! ```rust,ignore
//! let watcher = Watcher::new(WatchOptions::builder().timeout(Duration::from_secs(600)).build());
//!
//! let snapshot = watcher
//!     .watch(|| async {
//!         let snapshot = client.describe_snapshot(project_id, cluster_name, snapshot_id).await?;
//!         let done = snapshot.is_terminal();
//!         Ok(WatchStatus::from_done(snapshot, done))
//!     })
//!     .await?;
//! ```
use std::{future::Future, time::Duration};

use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Time between two probes when no interval is configured.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(4);

/// Options for a single watch.
///
/// By default the watcher polls every [`DEFAULT_WATCH_INTERVAL`] without any deadline or attempt limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct WatchOptions {
    /// Time to sleep between a pending probe and the next one.
    #[builder(default = DEFAULT_WATCH_INTERVAL)]
    pub interval: Duration,
    /// Maximum time the whole watch is allowed to take, measured from the start of the watch.
    #[builder(default, setter(strip_option(fallback = timeout_opt)))]
    pub timeout: Option<Duration>,
    /// Maximum number of probes before giving up.
    #[builder(default, setter(strip_option))]
    pub max_attempts: Option<u32>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// What a probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchStatus<T> {
    /// The resource is not in a terminal state yet, poll again.
    Pending,
    /// The resource reached a terminal state, stop polling and return the value.
    Terminal(T),
}

impl<T> WatchStatus<T> {
    /// Build a status from a value and a done flag.
    pub fn from_done(value: T, done: bool) -> Self {
        if done {
            Self::Terminal(value)
        } else {
            Self::Pending
        }
    }
}

/// Reasons a watch ended without a terminal state.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The probe failed. The error is returned as-is, the probe is never retried.
    #[error(transparent)]
    Probe(anyhow::Error),
    #[error("timed out after {timeout:?} waiting for a terminal state ({attempts} attempts)")]
    TimedOut { timeout: Duration, attempts: u32 },
    #[error("no terminal state after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
    #[error("watch cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Polls a probe until it reports a terminal state.
///
/// Probes are strictly sequential: the next probe only starts after the previous one returned
/// and the interval elapsed.
#[derive(Debug, Clone, Default)]
pub struct Watcher {
    options: WatchOptions,
}

impl Watcher {
    pub fn new(options: WatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Watch without a cancellation source.
    ///
    /// The configured timeout and attempt limit still apply. Without them this only returns once the probe
    /// reports a terminal state or fails.
    pub async fn watch<T, F, Fut>(&self, probe: F) -> Result<T, WatchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<WatchStatus<T>>>,
    {
        self.watch_until(probe, std::future::pending()).await
    }

    /// Watch until the probe reports a terminal state, the probe fails, the deadline passes,
    /// the attempt limit is reached or `cancel` resolves.
    ///
    /// # Arguments
    ///
    /// * `probe` - Invoked once per attempt, returns the observed [`WatchStatus`].
    /// * `cancel` - Future that stops the watch when it resolves, e.g. `tokio::signal::ctrl_c()`.
    ///
    /// # Returns
    ///
    /// The value of the first [`WatchStatus::Terminal`], or the reason the watch stopped.
    pub async fn watch_until<T, F, Fut, C>(&self, mut probe: F, cancel: C) -> Result<T, WatchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<WatchStatus<T>>>,
        C: Future<Output = ()>,
    {
        // A timeout too large to represent is no deadline at all.
        let deadline = self
            .options
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));
        tokio::pin!(cancel);

        // Number of probes that returned.
        let mut attempts: u32 = 0;

        loop {
            trace!(attempt = attempts + 1, "probing");

            // Cancellation wins over the deadline, the deadline wins over a probe.
            let status = tokio::select! {
                biased;
                _ = &mut cancel => return Err(WatchError::Cancelled { attempts }),
                _ = until(deadline) => return Err(self.timed_out(attempts)),
                // Lazy, so no probe starts once cancel or the deadline won.
                status = async { probe().await } => status,
            };
            attempts += 1;

            match status {
                Err(error) => {
                    debug!(attempts, %error, "probe failed, stopping watch");
                    return Err(WatchError::Probe(error));
                }
                Ok(WatchStatus::Terminal(value)) => {
                    debug!(attempts, "terminal state reached");
                    return Ok(value);
                }
                Ok(WatchStatus::Pending) => {}
            }

            if self.options.max_attempts.is_some_and(|max| attempts >= max) {
                debug!(attempts, "attempt limit reached");
                return Err(WatchError::AttemptsExhausted { attempts });
            }

            debug!(attempts, interval = ?self.options.interval, "not in a terminal state yet");

            tokio::select! {
                biased;
                _ = &mut cancel => return Err(WatchError::Cancelled { attempts }),
                _ = until(deadline) => return Err(self.timed_out(attempts)),
                _ = sleep(self.options.interval) => {}
            }
        }
    }

    fn timed_out(&self, attempts: u32) -> WatchError {
        debug!(attempts, "deadline passed");

        WatchError::TimedOut {
            timeout: self.options.timeout.unwrap_or_default(),
            attempts,
        }
    }
}

/// Resolves at the deadline, never resolves without one.
async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
