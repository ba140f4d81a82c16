use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use crate::phases::PhaseId;
use crate::prompts::PromptVariables;
use super::progress::steps_completed;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Remediation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

impl From<bool> for Feedback {
    fn from(positive: bool) -> Self {
        if positive { Self::Positive } else { Self::Negative }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Negative => write!(f, "Negative"),
        }
    }
}

/// Measured TTR next to the simulated baseline. Always set as a pair.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TtrComparison {
    pub with_system_secs: f64,
    pub without_system_secs: f64,
}

impl TtrComparison {
    pub fn improvement_pct(&self) -> Option<f64> {
        if self.with_system_secs <= 0.0 {
            return None;
        }
        Some((self.without_system_secs - self.with_system_secs) / self.with_system_secs * 100.0)
    }
}

/// Generation bookkeeping and latest accepted result for one phase.
#[derive(Debug, Clone, Default)]
pub struct PhaseOutput {
    pub suggestion: Option<String>,
    pub steps: Vec<String>,
    pub(crate) issued_key: Option<u64>,
    pub(crate) issued_seq: u64,
    pub(crate) applied_seq: u64,
}

impl PhaseOutput {
    pub fn is_generating(&self) -> bool {
        self.issued_seq > self.applied_seq
    }
}

#[derive(Debug, Clone, Default)]
pub struct AutomationProgress {
    pub value: f64,
    pub ticks: u32,
    pub complete: bool,
    pub(crate) run: u64,
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub active_phase: PhaseId,
    pub bug_description: String,
    pub system_info: Option<String>,
    pub document_text: Option<String>,
    pub remediation_start: Option<DateTime<Utc>>,
    pub remediation_end: Option<DateTime<Utc>>,
    pub ttr: Option<TtrComparison>,
    pub view: View,
    pub demo_visible: bool,
    pub loading: bool,
    pub feedback: Option<Feedback>,
    pub outputs: HashMap<PhaseId, PhaseOutput>,
    pub automation: AutomationProgress,
    pub(crate) progress_token: Option<CancellationToken>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt_variables(&self) -> PromptVariables {
        PromptVariables {
            bug_description: self.bug_description.clone(),
            system_info: self.system_info.clone(),
            pdf_content: self.document_text.clone(),
        }
    }

    pub fn output(&self, phase: PhaseId) -> Option<&PhaseOutput> {
        self.outputs.get(&phase)
    }

    pub(crate) fn cancel_automation(&mut self) {
        if let Some(token) = self.progress_token.take() {
            token.cancel();
        }
    }

    pub fn snapshot(&self, id: &str) -> SessionSnapshot {
        let mut outputs: Vec<PhaseOutputSnapshot> = self.outputs.iter()
            .map(|(phase, out)| PhaseOutputSnapshot {
                phase: *phase,
                suggestion: out.suggestion.clone(),
                steps: out.steps.clone(),
                generating: out.is_generating(),
            })
            .collect();
        outputs.sort_by_key(|o| o.phase.as_str());

        let steps_total = self.output(PhaseId::Phase3).map_or(0, |o| o.steps.len());

        SessionSnapshot {
            id: id.to_string(),
            active_phase: self.active_phase,
            bug_description: self.bug_description.clone(),
            system_info: self.system_info.clone(),
            document_text: self.document_text.clone(),
            remediation_start: self.remediation_start,
            remediation_end: self.remediation_end,
            ttr: self.ttr.map(|t| TtrSnapshot {
                with_system_secs: t.with_system_secs,
                without_system_secs: t.without_system_secs,
                improvement_pct: t.improvement_pct(),
            }),
            view: self.view,
            demo_visible: self.demo_visible,
            loading: self.loading,
            feedback: self.feedback,
            outputs,
            automation: AutomationSnapshot {
                value: self.automation.value,
                ticks: self.automation.ticks,
                complete: self.automation.complete,
                steps_completed: steps_completed(self.automation.value, steps_total),
            },
        }
    }
}

/// Read-only view of a session handed to renderers and the HTTP API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub active_phase: PhaseId,
    pub bug_description: String,
    pub system_info: Option<String>,
    pub document_text: Option<String>,
    pub remediation_start: Option<DateTime<Utc>>,
    pub remediation_end: Option<DateTime<Utc>>,
    pub ttr: Option<TtrSnapshot>,
    pub view: View,
    pub demo_visible: bool,
    pub loading: bool,
    pub feedback: Option<Feedback>,
    pub outputs: Vec<PhaseOutputSnapshot>,
    pub automation: AutomationSnapshot,
}

impl SessionSnapshot {
    pub fn output(&self, phase: PhaseId) -> Option<&PhaseOutputSnapshot> {
        self.outputs.iter().find(|o| o.phase == phase)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TtrSnapshot {
    pub with_system_secs: f64,
    pub without_system_secs: f64,
    pub improvement_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseOutputSnapshot {
    pub phase: PhaseId,
    pub suggestion: Option<String>,
    pub steps: Vec<String>,
    pub generating: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutomationSnapshot {
    pub value: f64,
    pub ticks: u32,
    pub complete: bool,
    pub steps_completed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SessionState::new();
        assert_eq!(state.active_phase, PhaseId::Phase1);
        assert_eq!(state.view, View::Home);
        assert!(!state.demo_visible && !state.loading);
        assert!(state.remediation_start.is_none() && state.ttr.is_none());
    }

    #[test]
    fn test_improvement_pct() {
        let ttr = TtrComparison { with_system_secs: 10.0, without_system_secs: 25.0 };
        assert_eq!(ttr.improvement_pct(), Some(150.0));
        let zero = TtrComparison { with_system_secs: 0.0, without_system_secs: 0.0 };
        assert_eq!(zero.improvement_pct(), None);
    }

    #[test]
    fn test_generating_flag() {
        let mut out = PhaseOutput::default();
        assert!(!out.is_generating());
        out.issued_seq = 2;
        out.applied_seq = 1;
        assert!(out.is_generating());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = SessionState::new();
        state.bug_description = "disk full".into();
        state.outputs.entry(PhaseId::Phase3).or_default().steps = vec!["a".into(), "b".into()];
        state.automation.value = 60.0;
        let snap = state.snapshot("s-1");
        assert_eq!(snap.automation.steps_completed, 2);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["active_phase"], "phase1");
        assert_eq!(json["view"], "home");
        assert_eq!(json["outputs"][0]["phase"], "phase3");
    }

    #[test]
    fn test_feedback_from_bool() {
        assert_eq!(Feedback::from(true), Feedback::Positive);
        assert_eq!(Feedback::from(false).to_string(), "Negative");
    }
}
