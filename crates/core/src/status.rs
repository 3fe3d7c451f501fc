// crates/core/src/status.rs
//! Job status vocabulary and the Work state classifier.
//!
//! A Work has no stored status of its own. Its state is derived from the
//! distribution of its Jobs' statuses under a fixed precedence:
//!
//! | Rule | Condition | State |
//! |------|-----------|-------|
//! | 1 | any Job in `wait` or `progress` | `progress` |
//! | 2 | every Job in `error` (≥1 Job) | `error` |
//! | 3 | every Job in `complete` (≥1 Job) | `complete` |
//! | 4 | anything else (incl. zero Jobs) | `partial` |

use serde::{Deserialize, Serialize};

/// Status of a single Job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued, not yet picked up.
    Wait,
    /// Actively being processed.
    Progress,
    /// Finished successfully. Terminal.
    Complete,
    /// Finished with a failure. Terminal.
    Error,
}

impl JobStatus {
    /// String form used for index storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Wait => "wait",
            JobStatus::Progress => "progress",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
        }
    }

    /// Parse from the stored string form.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "wait" => Some(JobStatus::Wait),
            "progress" => Some(JobStatus::Progress),
            "complete" => Some(JobStatus::Complete),
            "error" => Some(JobStatus::Error),
            _ => None,
        }
    }

    /// Terminal statuses count toward `jobs_done_count`.
    pub fn is_done(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }

    /// In-flight statuses force the Work into `progress`.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, JobStatus::Wait | JobStatus::Progress)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived overall state of a Work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkState {
    /// At least one Job is still in flight.
    Progress,
    /// Every Job errored.
    Error,
    /// Every Job completed.
    Complete,
    /// A mix of terminal outcomes, or no Jobs at all.
    Partial,
}

impl WorkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkState::Progress => "progress",
            WorkState::Error => "error",
            WorkState::Complete => "complete",
            WorkState::Partial => "partial",
        }
    }
}

impl std::fmt::Display for WorkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One bucket of the grouped Job-status aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub status: JobStatus,
    pub count: i64,
}

/// Derived status of a Work: overall state plus the Job counts behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatus {
    pub state: WorkState,
    pub jobs_count: i64,
    pub jobs_done_count: i64,
    pub jobs_per_state: Vec<StatusBucket>,
}

impl WorkStatus {
    /// Build the derived status from aggregation buckets.
    pub fn from_buckets(buckets: Vec<StatusBucket>) -> Self {
        let jobs_count: i64 = buckets.iter().map(|b| b.count).sum();
        let jobs_done_count: i64 = buckets
            .iter()
            .filter(|b| b.status.is_done())
            .map(|b| b.count)
            .sum();
        WorkStatus {
            state: classify(jobs_count, &buckets),
            jobs_count,
            jobs_done_count,
            jobs_per_state: buckets,
        }
    }
}

/// Classify a Job status distribution into a single Work state.
///
/// Evaluated in strict precedence order; `total` must be the sum of all
/// bucket counts. A Work with zero Jobs classifies as `Partial` — the
/// terminal rules only fire when at least one Job exists.
pub fn classify(total: i64, buckets: &[StatusBucket]) -> WorkState {
    let count_of = |status: JobStatus| -> i64 {
        buckets
            .iter()
            .filter(|b| b.status == status)
            .map(|b| b.count)
            .sum()
    };

    let in_flight = count_of(JobStatus::Wait) + count_of(JobStatus::Progress);
    if in_flight > 0 {
        return WorkState::Progress;
    }
    if total > 0 && count_of(JobStatus::Error) == total {
        return WorkState::Error;
    }
    if total > 0 && count_of(JobStatus::Complete) == total {
        return WorkState::Complete;
    }
    WorkState::Partial
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bucket(status: JobStatus, count: i64) -> StatusBucket {
        StatusBucket { status, count }
    }

    #[test]
    fn test_in_flight_wins_over_everything() {
        let buckets = vec![
            bucket(JobStatus::Wait, 1),
            bucket(JobStatus::Error, 10),
            bucket(JobStatus::Complete, 10),
        ];
        assert_eq!(classify(21, &buckets), WorkState::Progress);

        let buckets = vec![bucket(JobStatus::Progress, 1), bucket(JobStatus::Complete, 5)];
        assert_eq!(classify(6, &buckets), WorkState::Progress);
    }

    #[test]
    fn test_all_error() {
        let buckets = vec![bucket(JobStatus::Error, 2)];
        assert_eq!(classify(2, &buckets), WorkState::Error);
    }

    #[test]
    fn test_all_complete() {
        let buckets = vec![bucket(JobStatus::Complete, 3)];
        assert_eq!(classify(3, &buckets), WorkState::Complete);
    }

    #[test]
    fn test_terminal_mix_is_partial() {
        let buckets = vec![bucket(JobStatus::Complete, 1), bucket(JobStatus::Error, 1)];
        assert_eq!(classify(2, &buckets), WorkState::Partial);
    }

    #[test]
    fn test_zero_jobs_is_partial() {
        assert_eq!(classify(0, &[]), WorkState::Partial);
    }

    #[test]
    fn test_work_status_counts() {
        let status = WorkStatus::from_buckets(vec![
            bucket(JobStatus::Wait, 1),
            bucket(JobStatus::Progress, 1),
        ]);
        assert_eq!(status.state, WorkState::Progress);
        assert_eq!(status.jobs_count, 2);
        assert_eq!(status.jobs_done_count, 0);

        let status = WorkStatus::from_buckets(vec![
            bucket(JobStatus::Complete, 1),
            bucket(JobStatus::Error, 1),
        ]);
        assert_eq!(status.state, WorkState::Partial);
        assert_eq!(status.jobs_done_count, 2);
    }

    #[test]
    fn test_status_round_trip_strings() {
        for s in [
            JobStatus::Wait,
            JobStatus::Progress,
            JobStatus::Complete,
            JobStatus::Error,
        ] {
            assert_eq!(JobStatus::parse_str(s.as_str()), Some(s));
        }
        assert_eq!(JobStatus::parse_str("bogus"), None);
    }

    #[test]
    fn test_work_status_serializes_camel_case() {
        let status = WorkStatus::from_buckets(vec![bucket(JobStatus::Complete, 2)]);
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"state\":\"complete\""));
        assert!(json.contains("\"jobsCount\":2"));
        assert!(json.contains("\"jobsDoneCount\":2"));
        assert!(json.contains("\"jobsPerState\""));
    }
}
