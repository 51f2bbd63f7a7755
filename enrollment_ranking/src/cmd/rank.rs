use crate::modules::{
    migration::MIGRATOR,
    ranking::{repository::PgRankingRepository, RankingCalculator, RankingRun},
};
use anyhow::{Context, Result};
use itertools::Itertools;
use sqlx::{postgres::Postgres, Pool};
use std::env;

pub async fn run() -> Result<()> {
    let database_url: String = env::var("DATABASE_URL").with_context(|| {
        let message = "DATABASE_URL must be configured.";
        tracing::error!(message);
        message
    })?;

    let pool: Pool<Postgres> = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .with_context(|| {
            let message = "Failed to create database connection pool.";
            tracing::error!(message);
            message
        })?;

    MIGRATOR.run(&pool).await?;

    let calculator = RankingCalculator::new(PgRankingRepository::new(pool));
    match calculator.run().await? {
        RankingRun::NoPendingApplications => {
            tracing::info!("no pending applications to rank");
        }
        RankingRun::Completed(report) => {
            tracing::info!(
                "ranking calculation finished: {} cohorts, {} applications ranked, {} skipped, {} updates failed",
                report.cohorts,
                report.updates.applied(),
                report.skipped.len(),
                report.updates.failed()
            );
            if !report.skipped.is_empty() {
                tracing::warn!(
                    "applications excluded from ranking: {}",
                    report
                        .skipped
                        .iter()
                        .map(|skip| skip.application_id.as_str())
                        .join(", ")
                );
            }
        }
    }

    Ok(())
}
