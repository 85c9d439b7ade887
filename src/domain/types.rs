//! Shared types for open-house visitors and follow-up enrollments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Newtype wrapper for session IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for visitor IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(pub String);

impl std::fmt::Display for VisitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for enrollment IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub String);

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for follow-up sequence IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(pub String);

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for agent/user IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-valued visitor qualification signal collected at check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestLevel {
    Low,
    Medium,
    High,
}

impl InterestLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestLevel::Low => "low",
            InterestLevel::Medium => "medium",
            InterestLevel::High => "high",
        }
    }

    /// Weight used for the weighted-average interest calculation
    #[inline]
    pub fn weight(&self) -> u32 {
        match self {
            InterestLevel::Low => 1,
            InterestLevel::Medium => 2,
            InterestLevel::High => 3,
        }
    }
}

/// How a visitor was checked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitorSource {
    Manual,
    Qr,
}

impl VisitorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorSource::Manual => "manual",
            VisitorSource::Qr => "qr",
        }
    }
}

/// Session lifecycle: scheduled -> active -> completed | cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

/// A checked-in open-house visitor
///
/// Owned by exactly one session. Immutable after creation except the
/// follow-up flags and notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub visitor_id: VisitorId,
    pub session_id: SessionId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest_level: InterestLevel,
    pub check_in_time: DateTime<Utc>,
    pub source: VisitorSource,
    pub follow_up_generated: bool,
    pub follow_up_sent: bool,
    #[serde(default)]
    pub follow_up_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A visitor's tracked progress through a follow-up sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub sequence_id: SequenceId,
    pub visitor_id: VisitorId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub current_touchpoint_index: u32,
    #[serde(default)]
    pub next_touchpoint_at: Option<DateTime<Utc>>,
    pub paused: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Derived enrollment state as seen by the sequence driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    /// Active with a future (or missing) next touchpoint
    ActivePending,
    /// Active with a touchpoint at or before `now`
    ActiveDue,
    Paused,
    Completed,
}

impl Enrollment {
    /// Classify the enrollment relative to `now`
    ///
    /// Completion wins over pause; an enrollment with no scheduled
    /// touchpoint is pending, never due.
    pub fn state(&self, now: DateTime<Utc>) -> EnrollmentState {
        if self.completed_at.is_some() {
            return EnrollmentState::Completed;
        }
        if self.paused {
            return EnrollmentState::Paused;
        }
        match self.next_touchpoint_at {
            Some(at) if at <= now => EnrollmentState::ActiveDue,
            _ => EnrollmentState::ActivePending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn enrollment(next: Option<DateTime<Utc>>) -> Enrollment {
        Enrollment {
            enrollment_id: EnrollmentId("e-1".to_string()),
            sequence_id: SequenceId("seq-1".to_string()),
            visitor_id: VisitorId("v-1".to_string()),
            session_id: SessionId("s-1".to_string()),
            user_id: UserId("u-1".to_string()),
            current_touchpoint_index: 0,
            next_touchpoint_at: next,
            paused: false,
            completed_at: None,
        }
    }

    #[test]
    fn test_enrollment_state_due_and_pending() {
        let now = Utc::now();

        let due = enrollment(Some(now - Duration::minutes(5)));
        assert_eq!(due.state(now), EnrollmentState::ActiveDue);

        let pending = enrollment(Some(now + Duration::minutes(5)));
        assert_eq!(pending.state(now), EnrollmentState::ActivePending);

        let unscheduled = enrollment(None);
        assert_eq!(unscheduled.state(now), EnrollmentState::ActivePending);
    }

    #[test]
    fn test_enrollment_state_terminal_over_paused() {
        let now = Utc::now();
        let mut e = enrollment(Some(now - Duration::minutes(1)));
        e.paused = true;
        assert_eq!(e.state(now), EnrollmentState::Paused);

        e.completed_at = Some(now);
        assert_eq!(e.state(now), EnrollmentState::Completed);
    }

    #[test]
    fn test_visitor_json_round_trip() {
        let json = r#"{
            "visitorId": "v-1",
            "sessionId": "s-1",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-0100",
            "interestLevel": "high",
            "checkInTime": "2025-06-14T18:05:00Z",
            "source": "qr",
            "followUpGenerated": true,
            "followUpSent": false,
            "createdAt": "2025-06-14T18:05:00Z",
            "updatedAt": "2025-06-14T18:05:00Z"
        }"#;
        let visitor: Visitor = serde_json::from_str(json).unwrap();
        assert_eq!(visitor.interest_level, InterestLevel::High);
        assert_eq!(visitor.source, VisitorSource::Qr);
        assert!(visitor.follow_up_sent_at.is_none());
        assert!(visitor.notes.is_none());
    }
}
