//! JSONL decision log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use altar_decide::{AltarKind, Evaluation};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub timestamp: DateTime<Utc>,
    pub unit: String,
    pub kind: AltarKind,
    pub outcome: serde_json::Value,
    pub weights: serde_json::Value,
    /// Id of the button handed to the clicker, if any.
    pub button: Option<u64>,
}

impl DecisionEvent {
    pub fn new(unit: String, kind: AltarKind, evaluation: &Evaluation) -> Result<Self> {
        Ok(Self {
            timestamp: Utc::now(),
            unit,
            kind,
            outcome: serde_json::to_value(evaluation.outcome)?,
            // Infinite ratios have no JSON form and come out as null.
            weights: serde_json::to_value(evaluation.weights)?,
            button: evaluation.button.as_ref().map(|b| b.id()),
        })
    }
}

/// Appends one event per line.
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn emit(&self, event: &DecisionEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let line = serde_json::to_string(event)?;
        writeln!(file, "{}", line)?;

        Ok(())
    }

    /// Every event logged so far, skipping lines that fail to parse.
    pub fn read_all(&self) -> Result<Vec<DecisionEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use altar_core::Side;
    use altar_decide::{Outcome, WeightSet, WinReason};

    fn evaluation() -> Evaluation {
        let mut weights = WeightSet::default();
        weights.top.upside_total = 40;
        weights.bottom.ratio = f64::INFINITY;
        Evaluation {
            outcome: Outcome::Winner {
                side: Side::Top,
                reason: WinReason::BetterRatio,
            },
            weights,
            button: None,
        }
    }

    #[test]
    fn events_append_as_json_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = EventLog::new(dir.path().join("logs/decisions.jsonl"));

        for _ in 0..2 {
            let event = DecisionEvent::new("0x1/0x3".into(), AltarKind::Exarch, &evaluation())
                .expect("event");
            log.emit(&event).expect("emit");
        }

        let events = log.read_all().expect("read");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].unit, "0x1/0x3");
        assert_eq!(events[0].outcome["winner"]["side"], "top");
        assert_eq!(events[0].weights["top"]["upside_total"], 40);
        assert!(events[0].weights["bottom"]["ratio"].is_null());
    }

    #[test]
    fn missing_log_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = EventLog::new(dir.path().join("none.jsonl"));
        assert!(log.read_all().expect("read").is_empty());
    }
}
