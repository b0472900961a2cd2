//! Result aggregation over a completed scenario's outcomes

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::types::{serialize_seconds, Classification, SubmissionOutcome};

/// Latency distribution of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    #[serde(serialize_with = "serialize_seconds")]
    pub min: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub mean: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub p50: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub p95: Duration,
    #[serde(serialize_with = "serialize_seconds")]
    pub max: Duration,
}

impl LatencyStats {
    /// `None` for an empty scenario
    pub fn from_latencies(latencies: impl IntoIterator<Item = Duration>) -> Option<Self> {
        let mut sorted: Vec<Duration> = latencies.into_iter().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_unstable();

        let total: Duration = sorted.iter().sum();
        let count = sorted.len();

        Some(Self {
            min: sorted[0],
            mean: total / count as u32,
            p50: sorted[count * 50 / 100],
            p95: sorted[count * 95 / 100],
            max: sorted[count - 1],
        })
    }
}

/// Classified view over every outcome a scenario produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub outcomes: Vec<SubmissionOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
    pub latency: Option<LatencyStats>,
    pub status_distribution: BTreeMap<u16, usize>,
}

impl ScenarioResult {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successes(&self) -> impl Iterator<Item = &SubmissionOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SubmissionOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }
}

/// Classify and count a fixed collection of outcomes
///
/// Arrival order carries no meaning; counts depend only on status codes, so
/// aggregating the same collection twice gives the same result.
pub fn aggregate(outcomes: Vec<SubmissionOutcome>) -> ScenarioResult {
    let mut success_count = 0;
    let mut failure_count = 0;
    let mut status_distribution = BTreeMap::new();

    for outcome in &outcomes {
        match outcome.classification() {
            Classification::Success => success_count += 1,
            Classification::Failure => failure_count += 1,
        }
        *status_distribution.entry(outcome.status_code()).or_insert(0) += 1;
    }

    let latency = LatencyStats::from_latencies(outcomes.iter().map(|o| o.latency()));

    ScenarioResult {
        outcomes,
        success_count,
        failure_count,
        latency,
        status_distribution,
    }
}

/// First `max_chars` characters of a response body, with `...` when cut
pub fn preview(body: &str, max_chars: usize) -> Cow<'_, str> {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &body[..cut])),
        None => Cow::Borrowed(body),
    }
}
