use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::domain::ErrorKind;

/// Wall-clock bookkeeping for one pipeline run.
#[derive(Debug)]
pub struct PhaseTracker {
    started_at: Instant,
    current: Option<(&'static str, Instant)>,
    phases: BTreeMap<&'static str, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseMetrics {
    pub phases: BTreeMap<&'static str, u64>,
    pub total_ms: u64,
    pub file_size_bytes: u64,
    pub success: bool,
    pub error_kind: Option<ErrorKind>,
}

impl PhaseTracker {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            current: None,
            phases: BTreeMap::new(),
        }
    }

    /// Closes the running phase, if any, and opens `phase`.
    pub fn begin(&mut self, phase: &'static str) {
        self.end_current();
        self.current = Some((phase, Instant::now()));
    }

    pub fn end_current(&mut self) {
        if let Some((name, started)) = self.current.take() {
            let elapsed = started.elapsed().as_millis() as u64;
            *self.phases.entry(name).or_insert(0) += elapsed;
        }
    }

    pub fn finish(mut self, file_size_bytes: u64, error_kind: Option<ErrorKind>) -> PhaseMetrics {
        self.end_current();
        PhaseMetrics {
            phases: self.phases,
            total_ms: self.started_at.elapsed().as_millis() as u64,
            file_size_bytes,
            success: error_kind.is_none(),
            error_kind,
        }
    }
}

impl PhaseMetrics {
    pub fn phase_ms(&self, phase: &str) -> Option<u64> {
        self.phases.get(phase).copied()
    }

    pub fn exceeds(&self, sla: Duration) -> bool {
        u128::from(self.total_ms) > sla.as_millis()
    }

    /// Logging sink; called once per run.
    pub fn log(&self, sla: Duration) {
        let phases = self
            .phases
            .iter()
            .map(|(name, ms)| format!("{name}={ms}ms"))
            .collect::<Vec<_>>()
            .join(" ");

        tracing::info!(
            total_ms = self.total_ms,
            file_size_bytes = self.file_size_bytes,
            success = self.success,
            error_kind = self.error_kind.map(|k| k.as_str()).unwrap_or("none"),
            phases = %phases,
            "Pipeline phase metrics"
        );

        if self.exceeds(sla) {
            tracing::warn!(
                total_ms = self.total_ms,
                sla_ms = sla.as_millis() as u64,
                "Pipeline exceeded SLA threshold"
            );
        }
    }
}
