use chrono::{DateTime, Utc};
use crate::phases::PhaseId;

/// Notifications a session sends to an attached observer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Start accepted, splash shown
    Loading,
    /// Splash finished, the remediation clock is running
    RemediationStarted {
        phase: PhaseId,
        started_at: DateTime<Utc>,
    },
    /// A generation request was sent
    GenerationIssued {
        phase: PhaseId,
        seq: u64,
    },
    /// A generation result was accepted
    SuggestionReady {
        phase: PhaseId,
        text: String,
    },
    /// An older response arrived after a newer one and was dropped
    GenerationDiscarded {
        phase: PhaseId,
        seq: u64,
    },
    /// Simulated automation advanced
    ProgressTick {
        value: f64,
        ticks: u32,
    },
    /// Simulated automation finished
    AutomationComplete,
    FeedbackReceived {
        positive: bool,
    },
    TtrComputed {
        with_system_secs: f64,
        without_system_secs: f64,
    },
}
