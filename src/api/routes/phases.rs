use axum::Json;
use chrono::Utc;
use crate::api::models::PhaseResponse;
use crate::phases::PHASES;

pub async fn list_phases() -> Json<Vec<PhaseResponse>> {
    let today = Utc::now().date_naive();
    Json(
        PHASES.iter()
            .map(|phase| PhaseResponse {
                number: phase.number(),
                id: phase.id,
                title: phase.title,
                description: phase.description,
                target_date: phase.target_date.format("%Y-%m-%d").to_string(),
                status: phase.status,
                status_label: phase.status.label(),
                days_left: phase.days_left(today),
                roadmap_progress: phase.roadmap_progress(today),
            })
            .collect(),
    )
}
