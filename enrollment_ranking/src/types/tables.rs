use chrono::{DateTime, Local};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Application {
    pub id: String,
    pub student_candidate_id: String,
    pub study_program_id: Option<String>,
    pub enrollment_deadline_id: Option<String>,
    pub ranking_mode_id: Option<String>,
    pub status: String,
    pub financing_type: String,
    pub total_points: Option<f64>,
    pub rank_position: Option<i32>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

/// One row of the pending-application fetch: an application joined to one of
/// its ranking mode's criteria and the score recorded for it. The criterion
/// columns are null when the mode has no criteria configured, the score
/// column when nothing was recorded.
#[derive(Debug, FromRow)]
pub struct CandidateRow {
    pub application_id: String,
    pub study_program_id: Option<String>,
    pub enrollment_deadline_id: Option<String>,
    pub ranking_mode_id: Option<String>,
    pub criterion_id: Option<String>,
    pub multiplication_factor: Option<f64>,
    pub score: Option<f64>,
}
