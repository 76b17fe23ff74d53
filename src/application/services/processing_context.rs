use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::User;

use super::Deadline;

/// Per-invocation state. Never shared between runs; dropping it cancels
/// whatever the run still has in flight.
#[derive(Debug)]
pub struct ProcessingContext {
    pub user: User,
    pub deadline: Deadline,
    pub received_at: DateTime<Utc>,
}

impl ProcessingContext {
    pub fn new(user: User, outer_deadline: Duration) -> Self {
        Self {
            user,
            deadline: Deadline::after(outer_deadline),
            received_at: Utc::now(),
        }
    }
}

impl Drop for ProcessingContext {
    fn drop(&mut self) {
        self.deadline.cancel();
    }
}
