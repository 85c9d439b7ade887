//! Session data model for open-house events

use crate::domain::types::{SessionId, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Count of visitors per interest level for a session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InterestDistribution {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl InterestDistribution {
    #[inline]
    pub fn total(&self) -> u32 {
        self.high + self.medium + self.low
    }
}

/// An open-house event
///
/// Created at scheduling time; check-in events mutate the visitor count
/// and distribution, and the session is closed when `actual_end_time`
/// is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: SessionId,
    pub property_address: String,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_start_time: DateTime<Utc>,
    #[serde(default)]
    pub actual_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub visitor_count: u32,
    #[serde(default)]
    pub interest_level_distribution: InterestDistribution,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Session {
    /// Check the `visitor_count == high + medium + low` invariant
    ///
    /// Holds only once the distribution is populated; an all-zero
    /// distribution on a session with visitors means check-ins have not
    /// been tallied yet, which is tolerated.
    pub fn distribution_consistent(&self) -> bool {
        let total = self.interest_level_distribution.total();
        total == 0 || total == self.visitor_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(visitor_count: u32, dist: InterestDistribution) -> Session {
        Session {
            session_id: SessionId("s-1".to_string()),
            property_address: "12 Ocean Ave".to_string(),
            scheduled_date: Utc::now(),
            scheduled_start_time: Utc::now(),
            actual_start_time: None,
            actual_end_time: None,
            status: SessionStatus::Scheduled,
            visitor_count,
            interest_level_distribution: dist,
            notes: None,
        }
    }

    #[test]
    fn test_distribution_total() {
        let dist = InterestDistribution { high: 3, medium: 2, low: 1 };
        assert_eq!(dist.total(), 6);
    }

    #[test]
    fn test_distribution_consistency() {
        let consistent =
            session(6, InterestDistribution { high: 3, medium: 2, low: 1 });
        assert!(consistent.distribution_consistent());

        let untallied = session(4, InterestDistribution::default());
        assert!(untallied.distribution_consistent());

        let inconsistent =
            session(5, InterestDistribution { high: 3, medium: 2, low: 1 });
        assert!(!inconsistent.distribution_consistent());
    }
}
