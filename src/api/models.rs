use serde::{Deserialize, Serialize};
use crate::phases::{PhaseId, PhaseStatus};
use crate::session::View;

#[derive(Deserialize)]
pub struct SelectPhaseRequest {
    pub phase: String,
}

#[derive(Deserialize)]
pub struct BugDescriptionRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ViewRequest {
    pub view: View,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub positive: bool,
}

#[derive(Serialize)]
pub struct TtrResponse {
    pub ttr_with_system_secs: f64,
    pub ttr_without_system_secs: f64,
    pub improvement_pct: Option<f64>,
}

#[derive(Serialize)]
pub struct PhaseResponse {
    pub number: usize,
    pub id: PhaseId,
    pub title: &'static str,
    pub description: &'static str,
    pub target_date: String,
    pub status: PhaseStatus,
    pub status_label: &'static str,
    pub days_left: i64,
    pub roadmap_progress: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
