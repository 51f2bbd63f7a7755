use crate::modules::ranking::collector::{fold_candidate_rows, Candidate};
use crate::types::tables::{Application, CandidateRow};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::Postgres, Pool};
use tokio_stream::StreamExt;

/// Data-access seam of the ranking calculator. The engine only ever issues
/// these operations against the store; callers inject an implementation
/// instead of reaching for a shared client.
#[async_trait]
pub trait RankingRepository {
    /// Every application in pending status, annotated with its ranking
    /// mode's criterion weights and its recorded scores, in submission
    /// order. An empty result is valid.
    async fn fetch_pending_candidates(&self) -> Result<Vec<Candidate>>;

    /// Writes the two derived ranking fields of one application.
    async fn update_application_ranking(
        &self,
        application_id: &str,
        total_points: f64,
        rank_position: i32,
    ) -> Result<()>;

    /// Current application rows, ranking fields included.
    async fn list_applications(&self) -> Result<Vec<Application>>;
}

#[derive(Clone)]
pub struct PgRankingRepository {
    pool: Pool<Postgres>,
}

impl PgRankingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RankingRepository for PgRankingRepository {
    async fn fetch_pending_candidates(&self) -> Result<Vec<Candidate>> {
        let mut stream = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT
                "applications"."id" AS "application_id",
                "applications"."study_program_id" AS "study_program_id",
                "applications"."enrollment_deadline_id" AS "enrollment_deadline_id",
                "applications"."ranking_mode_id" AS "ranking_mode_id",
                "ranking_mode_criteria"."ranking_criteria_id" AS "criterion_id",
                "ranking_mode_criteria"."multiplication_factor" AS "multiplication_factor",
                "application_criteria_scores"."score" AS "score"
            FROM
                "applications"
                LEFT JOIN "ranking_mode_criteria"
                    ON "applications"."ranking_mode_id" = "ranking_mode_criteria"."ranking_mode_id"
                LEFT JOIN "application_criteria_scores"
                    ON "applications"."id" = "application_criteria_scores"."application_id"
                    AND "ranking_mode_criteria"."ranking_criteria_id" = "application_criteria_scores"."ranking_criteria_id"
            WHERE
                "applications"."status" = 'pending'
            ORDER BY
                "applications"."created_at" ASC,
                "applications"."id" ASC
            "#,
        )
        .fetch(&self.pool);

        let mut rows: Vec<CandidateRow> = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(row);
        }

        Ok(fold_candidate_rows(rows))
    }

    async fn update_application_ranking(
        &self,
        application_id: &str,
        total_points: f64,
        rank_position: i32,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE "applications"
            SET
                "total_points" = $1,
                "rank_position" = $2
            WHERE
                "id" = $3
            "#,
        )
        .bind(total_points)
        .bind(rank_position)
        .bind(application_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_applications(&self) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT
                "id",
                "student_candidate_id",
                "study_program_id",
                "enrollment_deadline_id",
                "ranking_mode_id",
                "status",
                "financing_type",
                "total_points",
                "rank_position",
                "created_at",
                "updated_at"
            FROM
                "applications"
            ORDER BY
                "created_at" ASC,
                "id" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }
}
