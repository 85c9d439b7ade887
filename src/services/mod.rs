//! Services - export and sequencing business logic
//!
//! This module contains the core business logic services:
//! - `format` - pure display formatting shared by the export paths
//! - `csv_export` - RFC-4180 visitor CSV encoding
//! - `pdf_report` - paginated session report composition
//! - `governor` - export batching, estimation, and SLA instrumentation
//! - `sequence` - follow-up touchpoint sequence driver

pub mod csv_export;
pub mod format;
pub mod governor;
pub mod pdf_report;
pub mod sequence;

// Re-export commonly used types
pub use csv_export::{generate_visitor_csv, CsvFieldConfig};
pub use governor::{ExportFormat, ExportMetrics};
pub use pdf_report::generate_session_pdf;
pub use sequence::{
    EnrollmentRepository, SequenceDriver, SequenceRunReport, TouchpointExecutor, TouchpointOutcome,
};
