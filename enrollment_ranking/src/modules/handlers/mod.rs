pub mod ranking;

pub use ranking::{calculate_rankings, list_applications};

use crate::modules::ranking::repository::PgRankingRepository;
use axum::{extract::Extension, http::StatusCode};
use std::sync::Arc;

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(
    Extension(repository): Extension<Arc<PgRankingRepository>>,
) -> StatusCode {
    if repository.ping().await.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
