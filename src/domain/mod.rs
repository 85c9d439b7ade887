//! Domain models - core business types for open-house sessions
//!
//! This module contains the canonical data types used throughout the system:
//! - `Session` - an open-house event with its interest-level distribution
//! - `Visitor` - a checked-in visitor owned by exactly one session
//! - `Enrollment` - a visitor's position in a follow-up sequence
//! - `InterestLevel` / `VisitorSource` / `SessionStatus` - record enums

pub mod session;
pub mod types;

// Re-export commonly used types at module level
pub use session::{InterestDistribution, Session};
pub use types::{
    Enrollment, EnrollmentId, EnrollmentState, InterestLevel, SequenceId, SessionId, SessionStatus,
    UserId, Visitor, VisitorId, VisitorSource,
};
