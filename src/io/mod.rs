//! IO modules - filesystem output
//!
//! This module contains all external IO operations:
//! - `export_writer` - writes finished export buffers to disk

pub mod export_writer;

// Re-export commonly used types
pub use export_writer::ExportWriter;
