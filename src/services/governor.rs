//! Export batching, time estimation, and SLA instrumentation
//!
//! Wraps the CSV/PDF generators without altering their output. Batching
//! is strictly sequential so at most one batch of items is in flight,
//! which bounds memory pressure and preserves input order. The
//! performance target is a tunable policy constant, not a measured
//! guarantee.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Items per batch for sequential batch processing
pub const BATCH_SIZE: usize = 50;

/// Visitor count above which callers should prefer a streaming path
pub const STREAMING_THRESHOLD: usize = 100;

/// Base export allowance in milliseconds
const BASE_TIME_MS: u64 = 2_000;
/// Per-visitor processing estimate in milliseconds
const PER_VISITOR_MS: u64 = 50;
/// Upload overhead estimate in milliseconds
const UPLOAD_TIME_MS: u64 = 1_000;

/// SLA target for exports of up to `STREAMING_THRESHOLD` visitors
const TARGET_MS: u64 = 10_000;
/// Additional allowance per visitor above the threshold
const TARGET_PER_EXTRA_VISITOR_MS: u64 = 100;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Process items in fixed-size batches, one batch in flight at a time
///
/// Batch N+1 never starts before batch N's future resolves. Results are
/// concatenated in input order. The first failing batch aborts the run.
pub async fn process_batches<T, R, F, Fut>(
    items: Vec<T>,
    mut processor: F,
) -> anyhow::Result<Vec<R>>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<R>>>,
{
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items;

    while !remaining.is_empty() {
        let rest = remaining.split_off(remaining.len().min(BATCH_SIZE));
        let batch = std::mem::replace(&mut remaining, rest);
        let batch_results = processor(batch).await?;
        results.extend(batch_results);
    }

    Ok(results)
}

/// Estimated wall-clock export time in milliseconds
///
/// Pure estimate (base + per-visitor + upload overhead), no measurement.
pub fn estimate_export_time(visitor_count: usize) -> u64 {
    BASE_TIME_MS + PER_VISITOR_MS * visitor_count as u64 + UPLOAD_TIME_MS
}

/// Policy signal for the caller to choose a streaming code path
pub fn should_use_streaming(visitor_count: usize) -> bool {
    visitor_count > STREAMING_THRESHOLD
}

/// Per-export timing capture, discarded after logging
#[derive(Debug, Clone)]
pub struct ExportMetrics {
    pub export_id: Uuid,
    pub format: ExportFormat,
    pub visitor_count: usize,
    pub started_at: DateTime<Utc>,
    start: Instant,
    pub duration_ms: Option<u64>,
    pub file_size: Option<usize>,
}

impl ExportMetrics {
    /// Begin timing an export call
    pub fn start(format: ExportFormat, visitor_count: usize) -> Self {
        Self {
            export_id: Uuid::now_v7(),
            format,
            visitor_count,
            started_at: Utc::now(),
            start: Instant::now(),
            duration_ms: None,
            file_size: None,
        }
    }

    /// Close out the metrics with the produced file size
    ///
    /// Exceeding the performance target logs a warning; it never blocks
    /// the export result.
    pub fn complete(mut self, file_size: usize) -> Self {
        self.duration_ms = Some(self.start.elapsed().as_millis() as u64);
        self.file_size = Some(file_size);

        info!(
            export_id = %self.export_id,
            format = %self.format.as_str(),
            visitors = %self.visitor_count,
            duration_ms = %self.duration_ms.unwrap_or(0),
            file_size = %file_size,
            "export_completed"
        );

        if !meets_performance_target(&self) {
            warn!(
                export_id = %self.export_id,
                format = %self.format.as_str(),
                visitors = %self.visitor_count,
                duration_ms = %self.duration_ms.unwrap_or(0),
                target_ms = %performance_target_ms(self.visitor_count),
                "export_exceeded_target"
            );
        }

        self
    }
}

/// SLA allowance for a given visitor count
pub fn performance_target_ms(visitor_count: usize) -> u64 {
    let extra = visitor_count.saturating_sub(STREAMING_THRESHOLD) as u64;
    TARGET_MS + TARGET_PER_EXTRA_VISITOR_MS * extra
}

/// Whether a completed export landed inside its SLA allowance
///
/// An export with no recorded duration trivially meets the target.
pub fn meets_performance_target(metrics: &ExportMetrics) -> bool {
    match metrics.duration_ms {
        Some(duration) => duration <= performance_target_ms(metrics.visitor_count),
        None => true,
    }
}
