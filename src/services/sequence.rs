//! Follow-up sequence driver
//!
//! Walks the due enrollments of a follow-up campaign and delegates the
//! advance-and-send work to an injected touchpoint executor, one
//! enrollment at a time. A failure in one enrollment is recorded and
//! does not abort the rest of the run; a repository fetch failure is
//! fatal to the whole run.

use crate::domain::{Enrollment, EnrollmentId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Source of due enrollments
///
/// Implementations must return only enrollments whose next touchpoint
/// is at or before now and that are not paused.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn pending_touchpoints(&self) -> anyhow::Result<Vec<Enrollment>>;
}

/// Result of executing a single touchpoint
#[derive(Debug, Clone)]
pub struct TouchpointOutcome {
    pub success: bool,
    pub error: Option<String>,
}

/// Executes one touchpoint for an enrollment (advance and send)
#[async_trait]
pub trait TouchpointExecutor: Send + Sync {
    async fn execute(&self, enrollment_id: &EnrollmentId) -> anyhow::Result<TouchpointOutcome>;
}

/// Aggregate outcome of one driver run
#[derive(Debug, Clone, Default)]
pub struct SequenceRunReport {
    pub processed: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Drives due enrollments through their next touchpoint
pub struct SequenceDriver {
    repo: Arc<dyn EnrollmentRepository>,
    executor: Arc<dyn TouchpointExecutor>,
    /// Per-touchpoint execution timeout; a hung executor counts as that
    /// item's failure instead of blocking the run
    touchpoint_timeout: Duration,
}

impl SequenceDriver {
    pub fn new(
        repo: Arc<dyn EnrollmentRepository>,
        executor: Arc<dyn TouchpointExecutor>,
        touchpoint_timeout: Duration,
    ) -> Self {
        Self { repo, executor, touchpoint_timeout }
    }

    /// Process every due enrollment once
    ///
    /// Per-item failures are isolated: the error is recorded, counters
    /// are updated, and the loop continues. A repository fetch failure
    /// returns early with a single error and zero counts.
    pub async fn process_all_pending(&self) -> SequenceRunReport {
        let enrollments = match self.repo.pending_touchpoints().await {
            Ok(enrollments) => enrollments,
            Err(e) => {
                warn!(error = %e, "touchpoint_fetch_failed");
                return SequenceRunReport {
                    processed: 0,
                    failed: 0,
                    errors: vec![format!("Failed to fetch pending touchpoints: {}", e)],
                };
            }
        };

        self.run(enrollments).await
    }

    /// Process due enrollments belonging to one user
    ///
    /// Fetches the global due set and filters client-side, matching the
    /// repository contract of `process_all_pending`.
    pub async fn process_pending_for_user(&self, user_id: &UserId) -> SequenceRunReport {
        let enrollments = match self.repo.pending_touchpoints().await {
            Ok(enrollments) => enrollments,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "touchpoint_fetch_failed");
                return SequenceRunReport {
                    processed: 0,
                    failed: 0,
                    errors: vec![format!("Failed to fetch pending touchpoints: {}", e)],
                };
            }
        };

        let filtered: Vec<Enrollment> =
            enrollments.into_iter().filter(|e| &e.user_id == user_id).collect();
        self.run(filtered).await
    }

    /// Execute one touchpoint per enrollment, sequentially
    async fn run(&self, enrollments: Vec<Enrollment>) -> SequenceRunReport {
        let mut report = SequenceRunReport::default();
        let total = enrollments.len();

        for enrollment in enrollments {
            let id = enrollment.enrollment_id.clone();
            let result =
                tokio::time::timeout(self.touchpoint_timeout, self.executor.execute(&id)).await;

            match result {
                Ok(Ok(outcome)) if outcome.success => {
                    report.processed += 1;
                }
                Ok(Ok(outcome)) => {
                    report.failed += 1;
                    report.errors.push(format!(
                        "Touchpoint failed for enrollment {}: {}",
                        id,
                        outcome.error.unwrap_or_else(|| "unknown error".to_string())
                    ));
                }
                Ok(Err(e)) => {
                    warn!(enrollment_id = %id, error = %e, "touchpoint_execute_failed");
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("Touchpoint failed for enrollment {}: {}", id, e));
                }
                Err(_) => {
                    warn!(
                        enrollment_id = %id,
                        timeout_ms = %self.touchpoint_timeout.as_millis(),
                        "touchpoint_execute_timeout"
                    );
                    report.failed += 1;
                    report.errors.push(format!(
                        "Touchpoint timed out for enrollment {} after {}ms",
                        id,
                        self.touchpoint_timeout.as_millis()
                    ));
                }
            }
        }

        info!(
            total = %total,
            processed = %report.processed,
            failed = %report.failed,
            "sequence_run_completed"
        );
        report
    }
}

/// Whether a touchpoint is due: a missing schedule is never due
pub fn is_touchpoint_due(next_touchpoint_at: Option<DateTime<Utc>>) -> bool {
    match next_touchpoint_at {
        Some(at) => at <= Utc::now(),
        None => false,
    }
}

/// Schedule time for the next touchpoint, `delay_minutes` from now
pub fn calculate_next_touchpoint_time(delay_minutes: i64) -> DateTime<Utc> {
    Utc::now() + ChronoDuration::minutes(delay_minutes)
}
