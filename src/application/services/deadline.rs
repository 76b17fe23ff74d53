use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Outer wall-clock budget shared by every stage of one invocation.
///
/// Stages run through [`Deadline::run_stage`], which races the stage against
/// both its own budget and this deadline. Cancelling the token aborts every
/// stage still in flight.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Instant,
    token: CancellationToken,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StageOutcome<T> {
    Completed(T),
    StageTimedOut,
    DeadlineExceeded,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self::with_token(budget, CancellationToken::new())
    }

    pub fn with_token(budget: Duration, token: CancellationToken) -> Self {
        Self {
            expires_at: Instant::now() + budget,
            token,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Budget a stage actually gets: never more than what is left overall.
    pub fn stage_budget(&self, stage: Duration) -> Duration {
        stage.min(self.remaining())
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || self.remaining().is_zero()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Resolves when the deadline passes or the token is cancelled.
    pub async fn expired(&self) {
        tokio::select! {
            _ = self.token.cancelled() => {}
            _ = tokio::time::sleep_until(self.expires_at) => {}
        }
    }

    /// Runs `stage` until it finishes, its own budget elapses, or the outer
    /// deadline fires. Ties go to the outer deadline. The stage future is
    /// dropped on timeout, which aborts any in-flight I/O it owns.
    pub async fn run_stage<F>(&self, stage_budget: Duration, stage: F) -> StageOutcome<F::Output>
    where
        F: Future,
    {
        if self.is_expired() {
            return StageOutcome::DeadlineExceeded;
        }

        let stage_expires_at = Instant::now() + stage_budget;

        tokio::select! {
            biased;
            _ = self.expired() => StageOutcome::DeadlineExceeded,
            _ = tokio::time::sleep_until(stage_expires_at) => StageOutcome::StageTimedOut,
            output = stage => StageOutcome::Completed(output),
        }
    }
}
