//! Human-readable and JSON renderings of a probe run

use std::fmt;
use std::time::Duration;

use crate::aggregate::{preview, ScenarioResult};
use crate::orchestrator::ProbeReport;
use crate::runner::ScenarioRun;
use crate::scenario::ScenarioKind;
use crate::types::SubmissionOutcome;

/// Above this many outcomes only failures are listed individually
const OUTCOME_LISTING_LIMIT: usize = 10;

impl ProbeReport {
    /// Pretty-printed JSON form, for `--json`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_scenario(&self, f: &mut fmt::Formatter<'_>, run: &ScenarioRun) -> fmt::Result {
        let result = &run.result;
        writeln!(f)?;
        writeln!(
            f,
            "[Test {}] {}",
            run.kind.number(),
            run.kind.title(run.dispatched)
        )?;

        if run.kind == ScenarioKind::HighFanOut {
            if let Some(provisioning) = &self.fan_out {
                writeln!(
                    f,
                    "  {}/{} users created",
                    provisioning.created, provisioning.requested
                )?;
            }
            writeln!(
                f,
                "Results: {}/{} Success",
                result.success_count,
                result.total()
            )?;
            if result.failure_count > 0 {
                writeln!(f, "Failures: {}", result.failure_count)?;
            }
        } else {
            writeln!(
                f,
                "Results: {} Success, {} Failed",
                result.success_count, result.failure_count
            )?;
        }

        writeln!(f, "Elapsed: {}", seconds(run.elapsed))?;
        write_statistics(f, result)?;

        if result.total() > OUTCOME_LISTING_LIMIT {
            for outcome in result.failures() {
                self.write_outcome(f, outcome)?;
            }
        } else {
            for outcome in &result.outcomes {
                self.write_outcome(f, outcome)?;
            }
        }
        Ok(())
    }

    fn write_outcome(&self, f: &mut fmt::Formatter<'_>, outcome: &SubmissionOutcome) -> fmt::Result {
        writeln!(
            f,
            "  -> {} ({}) [{}]: {}",
            outcome.status_code(),
            seconds(outcome.latency()),
            outcome.label(),
            preview(outcome.body(), self.preview_chars)
        )
    }
}

fn write_statistics(f: &mut fmt::Formatter<'_>, result: &ScenarioResult) -> fmt::Result {
    if let Some(latency) = &result.latency {
        writeln!(
            f,
            "Latency: min {} / mean {} / p50 {} / p95 {} / max {}",
            seconds(latency.min),
            seconds(latency.mean),
            seconds(latency.p50),
            seconds(latency.p95),
            seconds(latency.max)
        )?;
    }

    if !result.status_distribution.is_empty() {
        let codes: Vec<String> = result
            .status_distribution
            .iter()
            .map(|(code, count)| format!("{} x{}", code, count))
            .collect();
        writeln!(f, "Status codes: {}", codes.join(", "))?;
    }
    Ok(())
}

fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Starting Concurrent KYC Submission Test ---")?;
        writeln!(f, "Started: {}", self.started_at.to_rfc3339())?;
        writeln!(f, "Target: {}", self.target)?;
        writeln!(f, "Payload: {}", self.payload)?;

        if !self.setup.is_empty() {
            writeln!(f)?;
            writeln!(f, "[Setup] Creating users...")?;
            for user in &self.setup {
                writeln!(
                    f,
                    "{}: ID={}, Email={}",
                    user.label, user.backend_user_id, user.email
                )?;
            }
        }

        for run in &self.scenarios {
            self.write_scenario(f, run)?;
        }

        if let Some(provisioning) = &self.fan_out {
            for failure in &provisioning.failures {
                writeln!(f, "  Failed to create {}", failure)?;
            }
        }

        for skipped in &self.skipped {
            writeln!(f)?;
            writeln!(
                f,
                "[Test {}] Skipped: {}",
                skipped.kind.number(),
                skipped.reason
            )?;
        }

        Ok(())
    }
}
