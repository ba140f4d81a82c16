use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhaseId {
    #[default]
    Phase1,
    Phase2,
    Phase3,
}

impl PhaseId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phase1 => "phase1",
            Self::Phase2 => "phase2",
            Self::Phase3 => "phase3",
        }
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    Completed,
    InProgress,
    Upcoming,
}

impl PhaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In-progress",
            Self::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseDescriptor {
    pub id: PhaseId,
    pub title: &'static str,
    pub description: &'static str,
    pub target_date: NaiveDate,
    pub status: PhaseStatus,
}

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid roadmap date"),
    }
}

/// Day the roadmap progress bars are measured from.
pub const ROADMAP_START: NaiveDate = ymd(2024, 1, 1);

/// The roadmap, in display order (also the temporal order of the milestones).
pub static PHASES: &[PhaseDescriptor] = &[
    PhaseDescriptor {
        id: PhaseId::Phase1,
        title: "Command Line Suggestion & Timeline",
        description: "Suggest command line and terminal fixes for identified vulnerabilities.",
        target_date: ymd(2024, 6, 30),
        status: PhaseStatus::Completed,
    },
    PhaseDescriptor {
        id: PhaseId::Phase2,
        title: "RAG-Based Personalized Remediation",
        description: "Provide personalized remediation steps based on system information and context.",
        target_date: ymd(2024, 9, 30),
        status: PhaseStatus::InProgress,
    },
    PhaseDescriptor {
        id: PhaseId::Phase3,
        title: "Automated Agent-Based Remediation",
        description: "Fully automated vulnerability remediation with minimal user intervention.",
        target_date: ymd(2024, 12, 30),
        status: PhaseStatus::Upcoming,
    },
];

pub fn by_id(id: &str) -> Option<&'static PhaseDescriptor> {
    PHASES.iter().find(|p| p.id.as_str() == id)
}

impl PhaseDescriptor {
    /// 1-based position in the roadmap.
    pub fn number(&self) -> usize {
        PHASES.iter().position(|p| p.id == self.id).map_or(0, |i| i + 1)
    }

    /// Signed number of days from `today` to the target date.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }

    /// Elapsed share of the span from [`ROADMAP_START`] to the target date, in percent.
    pub fn roadmap_progress(&self, today: NaiveDate) -> f64 {
        let span = (self.target_date - ROADMAP_START).num_days() as f64;
        if span <= 0.0 {
            return 100.0;
        }
        let elapsed = (today - ROADMAP_START).num_days() as f64;
        (elapsed / span * 100.0).clamp(0.0, 100.0)
    }
}
