use serde::Serialize;

use crate::applications::status::ApplicationStatus;

/// Per-owner aggregates, recomputed on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: u32,
    pub draft: u32,
    pub submitted: u32,
    pub interview: u32,
    pub accepted: u32,
    pub rejected: u32,
    /// Percent of applications that reached interview or acceptance.
    pub response_rate: u32,
    pub success_rate: u32,
}

impl ApplicationStats {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ApplicationStatus>,
    {
        let mut stats = ApplicationStats::default();
        for status in statuses {
            stats.total += 1;
            match status {
                ApplicationStatus::Draft => stats.draft += 1,
                ApplicationStatus::Submitted => stats.submitted += 1,
                ApplicationStatus::Interview => stats.interview += 1,
                ApplicationStatus::Accepted => stats.accepted += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
            }
        }
        stats.response_rate = percent(stats.interview + stats.accepted, stats.total);
        stats.success_rate = percent(stats.accepted, stats.total);
        stats
    }
}

/// Half-up rounding; 0 when there is nothing to divide.
fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(total) * 100.0 + 0.5).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn test_rates_for_mixed_statuses() {
        let stats =
            ApplicationStats::from_statuses([Draft, Draft, Submitted, Interview, Accepted, Rejected]);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.draft, 2);
        assert_eq!(stats.response_rate, 33);
        assert_eq!(stats.success_rate, 17);
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(ApplicationStats::from_statuses([]), ApplicationStats::default());
    }

    #[test]
    fn test_half_rounds_up() {
        let stats = ApplicationStats::from_statuses([Accepted, Draft]);
        assert_eq!(stats.success_rate, 50);
        let stats = ApplicationStats::from_statuses([Accepted, Draft, Draft, Draft, Draft, Draft, Draft, Draft]);
        // 12.5%
        assert_eq!(stats.success_rate, 13);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ApplicationStats::from_statuses([Interview])).unwrap();
        assert_eq!(json["responseRate"], 100);
        assert_eq!(json["successRate"], 0);
    }
}
