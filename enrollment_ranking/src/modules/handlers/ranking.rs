use crate::modules::ranking::{
    repository::{PgRankingRepository, RankingRepository},
    RankingCalculator, RankingRun,
};
use crate::types::tables::Application;
use axum::{extract::Extension, http::StatusCode, Json};
use enrollment_ranking_libs::api::{RankingRunResponse, RankingRunStats};
use std::sync::Arc;
use tokio::time::Instant;

pub async fn calculate_rankings(
    Extension(repository): Extension<Arc<PgRankingRepository>>,
) -> (StatusCode, Json<RankingRunResponse>) {
    let start_process = Instant::now();

    let calculator = RankingCalculator::new(repository.as_ref().clone());
    let run = match calculator.run().await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("ranking calculation failed cause: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RankingRunResponse::error("ranking calculation failed")),
            );
        }
    };

    let time: u32 = Instant::now().duration_since(start_process).as_millis() as u32;
    match run {
        RankingRun::NoPendingApplications => (
            StatusCode::OK,
            Json(RankingRunResponse::nothing_to_rank(time)),
        ),
        RankingRun::Completed(report) => {
            let stats = RankingRunStats {
                time,
                cohorts: report.cohorts as u32,
                ranked: report.updates.applied() as u32,
                skipped: report.skipped.len() as u32,
                failed: report.updates.failed() as u32,
            };

            tracing::info!(
                target: "ranklog",
                "elapsed_time={} stats={}",
                time,
                serde_json::to_string(&stats).unwrap_or(String::from(""))
            );

            (StatusCode::OK, Json(RankingRunResponse::completed(stats)))
        }
    }
}

pub async fn list_applications(
    Extension(repository): Extension<Arc<PgRankingRepository>>,
) -> Result<Json<Vec<Application>>, StatusCode> {
    match repository.list_applications().await {
        Ok(applications) => Ok(Json(applications)),
        Err(e) => {
            tracing::error!("failed to list applications cause: {:?}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
