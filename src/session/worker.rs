use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
    mpsc,
};

use crate::{
    config::ShatterConfig,
    foundation::error::{ShatterError, ShatterResult},
    fragment::source::SourceImage,
    session::transition::{ShatterOrigin, TransitionSession, build_session},
};

struct BuildOutcome {
    generation: u64,
    result: ShatterResult<TransitionSession>,
}

/// Builds sessions on a worker thread, one generation per trigger.
///
/// The latest generation lives in a shared counter; a build whose generation is no longer
/// the latest when it finishes is reported as [`ShatterError::BuildCancelled`] and dropped.
/// Each build gets its own channel and only the worker holds the sender, so cancelling drops
/// the receiver and a superseded worker's session is freed as soon as it tries to deliver.
pub(crate) struct BackgroundBuilder {
    latest: Arc<AtomicU64>,
    pending: Option<mpsc::Receiver<BuildOutcome>>,
}

impl BackgroundBuilder {
    pub(crate) fn new() -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Generation a finished build must carry to be accepted.
    pub(crate) fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Invalidate whatever is in flight.
    pub(crate) fn cancel(&mut self) -> u64 {
        self.pending = None;
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether a build result is still expected.
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start building a session and return its generation.
    pub(crate) fn spawn(
        &mut self,
        source: Arc<SourceImage>,
        config: ShatterConfig,
        origin: ShatterOrigin,
        seed: u64,
    ) -> ShatterResult<u64> {
        let generation = self.cancel();
        let latest = Arc::clone(&self.latest);
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name(format!("shatter-build-{generation}"))
            .spawn(move || {
                let result = if latest.load(Ordering::Acquire) != generation {
                    Err(ShatterError::BuildCancelled(generation))
                } else {
                    build_session(&source, &config, origin, seed)
                };
                // Fails once the build was cancelled; the outcome is dropped right here.
                let _ = tx.send(BuildOutcome { generation, result });
            })
            .map_err(|e| anyhow::Error::from(e).context("spawning build worker"))?;
        self.pending = Some(rx);
        Ok(generation)
    }

    /// Non-blocking: the latest generation's result, if it has arrived.
    pub(crate) fn poll(&mut self) -> Option<ShatterResult<TransitionSession>> {
        let outcome = match self.pending.as_ref()?.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => None,
        };
        self.finish(outcome)
    }

    /// Blocking variant of [`BackgroundBuilder::poll`].
    ///
    /// Returns `None` at once when nothing is pending. A worker that dies without delivering
    /// drops its sender, which ends the wait with [`ShatterError::Other`].
    pub(crate) fn wait(&mut self) -> Option<ShatterResult<TransitionSession>> {
        let outcome = self.pending.as_ref()?.recv().ok();
        self.finish(outcome)
    }

    fn finish(
        &mut self,
        outcome: Option<BuildOutcome>,
    ) -> Option<ShatterResult<TransitionSession>> {
        self.pending = None;
        let Some(outcome) = outcome else {
            return Some(Err(anyhow::anyhow!("build worker exited without a result").into()));
        };
        match accept(outcome, self.latest()) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::debug!(%err, "discarding superseded build");
                None
            }
        }
    }
}

fn accept(
    outcome: BuildOutcome,
    latest: u64,
) -> Result<ShatterResult<TransitionSession>, ShatterError> {
    if outcome.generation != latest {
        return Err(ShatterError::BuildCancelled(outcome.generation));
    }
    Ok(outcome.result)
}

#[cfg(test)]
#[path = "../../tests/unit/session/worker.rs"]
mod tests;
