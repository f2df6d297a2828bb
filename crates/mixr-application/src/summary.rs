//! Human-readable reports returned by every orchestrator call.

use mixr_core::operation::OperationKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    /// Every attempted step succeeded
    Applied,
    /// Some steps succeeded, some failed
    Partial,
    /// Every attempted step failed
    Failed,
    /// Nothing actionable; the summary lists example phrasings
    Guidance,
    /// Read-only report (history, status, explain)
    Info,
}

/// What happened to one queued operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepResult {
    Applied { version: u32 },
    /// `version` is the session version left in place by the failure.
    Failed { reason: String, version: u32 },
    /// Needs an external regeneration workflow; never executed locally.
    Deferred,
    /// Dry run only.
    Planned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based position in the batch
    pub index: usize,
    pub kind: OperationKind,
    pub description: String,
    #[serde(flatten)]
    pub result: StepResult,
}

impl StepReport {
    pub fn is_applied(&self) -> bool {
        matches!(self.result, StepResult::Applied { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.result, StepResult::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub status: SummaryStatus,
    pub headline: String,
    pub lines: Vec<String>,
    /// Session version after the call, when a session is active
    pub version: Option<u32>,
    pub current_artifact: Option<PathBuf>,
    pub steps: Vec<StepReport>,
}

impl Summary {
    pub fn new(status: SummaryStatus, headline: impl Into<String>) -> Self {
        Self {
            status,
            headline: headline.into(),
            lines: Vec::new(),
            version: None,
            current_artifact: None,
            steps: Vec::new(),
        }
    }

    pub fn info(headline: impl Into<String>) -> Self {
        Self::new(SummaryStatus::Info, headline)
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn at(mut self, version: u32, current_artifact: Option<PathBuf>) -> Self {
        self.version = Some(version);
        self.current_artifact = current_artifact;
        self
    }

    /// Derives the batch status from the recorded steps.
    pub(crate) fn status_for(steps: &[StepReport]) -> SummaryStatus {
        let applied = steps.iter().filter(|s| s.is_applied()).count();
        let failed = steps.iter().filter(|s| s.is_failed()).count();
        match (applied, failed) {
            (0, 0) => SummaryStatus::Info,
            (_, 0) => SummaryStatus::Applied,
            (0, _) => SummaryStatus::Failed,
            _ => SummaryStatus::Partial,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == SummaryStatus::Failed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        if let Some(version) = self.version {
            writeln!(f, "Current version: v{:03}", version)?;
        }
        if let Some(artifact) = &self.current_artifact {
            writeln!(f, "Output: {}", artifact.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: usize, result: StepResult) -> StepReport {
        StepReport {
            index,
            kind: OperationKind::Volume,
            description: "Volume: +3dB".to_string(),
            result,
        }
    }

    #[test]
    fn test_status_for_mixed_batch() {
        let steps = vec![
            step(1, StepResult::Applied { version: 1 }),
            step(
                2,
                StepResult::Failed {
                    reason: "boom".to_string(),
                    version: 1,
                },
            ),
        ];
        assert_eq!(Summary::status_for(&steps), SummaryStatus::Partial);
        assert_eq!(Summary::status_for(&steps[..1]), SummaryStatus::Applied);
        assert_eq!(Summary::status_for(&steps[1..]), SummaryStatus::Failed);
        assert_eq!(
            Summary::status_for(&[step(1, StepResult::Deferred)]),
            SummaryStatus::Info
        );
    }

    #[test]
    fn test_display_includes_version_and_output() {
        let summary = Summary::info("Applied 1 of 1 operation(s)")
            .line("• Volume: +3dB")
            .at(4, Some(PathBuf::from("/tmp/demo/h0003_v004_volume.wav")));

        let text = summary.to_string();
        assert!(text.starts_with("Applied 1 of 1 operation(s)\n"));
        assert!(text.contains("  • Volume: +3dB\n"));
        assert!(text.contains("Current version: v004"));
        assert!(text.contains("Output: /tmp/demo/h0003_v004_volume.wav"));
    }

    #[test]
    fn test_step_report_serializes_flat() {
        let json = serde_json::to_value(step(1, StepResult::Applied { version: 2 })).unwrap();
        assert_eq!(json["result"], "applied");
        assert_eq!(json["version"], 2);
        assert_eq!(json["kind"], "volume");
    }
}
