pub mod collector;
pub mod grouper;
pub mod repository;
pub mod scorer;

use crate::modules::ranking::{
    grouper::{group_candidates, GroupingOutcome, SkippedCandidate},
    repository::RankingRepository,
    scorer::rank_cohort,
};
use enrollment_ranking_libs::BatchReport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("failed to fetch pending applications")]
    Fetch(#[source] anyhow::Error),
}

/// Result of one calculation pass.
#[derive(Debug)]
pub enum RankingRun {
    NoPendingApplications,
    Completed(RankingReport),
}

#[derive(Debug)]
pub struct RankingReport {
    pub cohorts: usize,
    pub skipped: Vec<SkippedCandidate>,
    pub updates: BatchReport<String>,
}

pub struct RankingCalculator<R> {
    repository: R,
}

impl<R: RankingRepository> RankingCalculator<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Runs collection, grouping, scoring and write-back over every pending
    /// application. Both ranking fields are recomputed wholesale on each
    /// invocation. Only the initial fetch can fail the run; a per-candidate
    /// update failure is recorded in the report and the run continues with
    /// the next candidate.
    pub async fn run(&self) -> Result<RankingRun, RankingError> {
        let candidates = self
            .repository
            .fetch_pending_candidates()
            .await
            .map_err(RankingError::Fetch)?;

        if candidates.is_empty() {
            tracing::info!("no pending applications found");
            return Ok(RankingRun::NoPendingApplications);
        }

        let GroupingOutcome { cohorts, skipped } = group_candidates(candidates);

        let cohort_count = cohorts.len();
        let mut updates = BatchReport::new();
        for (key, members) in cohorts {
            tracing::info!(
                "ranking {} applications for study program {} under deadline {}",
                members.len(),
                key.study_program_id,
                key.enrollment_deadline_id
            );

            for ranked in rank_cohort(&members) {
                match self
                    .repository
                    .update_application_ranking(
                        &ranked.application_id,
                        ranked.total_points,
                        ranked.rank_position,
                    )
                    .await
                {
                    Ok(()) => updates.record_applied(ranked.application_id),
                    Err(e) => {
                        tracing::error!(
                            "failed to update ranking of application {}: {:?}",
                            ranked.application_id,
                            e
                        );
                        updates.record_failed(ranked.application_id, e.to_string());
                    }
                }
            }
        }

        Ok(RankingRun::Completed(RankingReport {
            cohorts: cohort_count,
            skipped,
            updates,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::ranking::collector::{Candidate, CriterionWeight};
    use crate::modules::ranking::grouper::SkipReason;
    use crate::types::tables::Application;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use enrollment_ranking_libs::ItemStatus;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    const PROGRAM_A: &str = "3f2e9b1c-8a4d-4c6e-9f0a-1b2c3d4e5f60";
    const PROGRAM_B: &str = "11111111-2222-4333-8444-555555555555";
    const DEADLINE: &str = "0a1b2c3d-4e5f-4a6b-8c9d-0e1f2a3b4c5d";

    struct MockRepository {
        candidates: Vec<Candidate>,
        failing: HashSet<String>,
        updates: Arc<Mutex<Vec<(String, f64, i32)>>>,
    }

    #[async_trait]
    impl RankingRepository for MockRepository {
        async fn fetch_pending_candidates(&self) -> Result<Vec<Candidate>> {
            Ok(self.candidates.clone())
        }

        async fn update_application_ranking(
            &self,
            application_id: &str,
            total_points: f64,
            rank_position: i32,
        ) -> Result<()> {
            if self.failing.contains(application_id) {
                return Err(anyhow!("connection reset"));
            }
            self.updates.lock().unwrap().push((
                String::from(application_id),
                total_points,
                rank_position,
            ));
            Ok(())
        }

        async fn list_applications(&self) -> Result<Vec<Application>> {
            Ok(Vec::new())
        }
    }

    fn candidate(application_id: &str, study_program_id: &str, score: f64) -> Candidate {
        Candidate {
            application_id: String::from(application_id),
            study_program_id: Some(String::from(study_program_id)),
            enrollment_deadline_id: Some(String::from(DEADLINE)),
            ranking_mode_id: Some(String::from("standard")),
            criteria: vec![CriterionWeight {
                criterion_id: String::from("c1"),
                multiplication_factor: 1.0,
            }],
            scores: [(String::from("c1"), score)].into_iter().collect(),
        }
    }

    fn calculator(
        candidates: Vec<Candidate>,
        failing: &[&str],
    ) -> (
        RankingCalculator<MockRepository>,
        Arc<Mutex<Vec<(String, f64, i32)>>>,
    ) {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let repository = MockRepository {
            candidates,
            failing: failing.iter().map(|id| String::from(*id)).collect(),
            updates: Arc::clone(&updates),
        };
        (RankingCalculator::new(repository), updates)
    }

    #[tokio::test]
    async fn empty_fetch_reports_nothing_to_rank() {
        let (calculator, updates) = calculator(Vec::new(), &[]);

        let run = calculator.run().await.unwrap();
        assert!(matches!(run, RankingRun::NoPendingApplications));
        assert!(updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cohort_is_ranked_in_descending_total_order() {
        let (calculator, updates) = calculator(
            vec![
                candidate("app-a", PROGRAM_A, 10.0),
                candidate("app-b", PROGRAM_A, 25.5),
                candidate("app-c", PROGRAM_A, 25.5),
            ],
            &[],
        );

        let run = calculator.run().await.unwrap();
        let report = match run {
            RankingRun::Completed(report) => report,
            RankingRun::NoPendingApplications => panic!("expected a completed run"),
        };

        assert_eq!(report.cohorts, 1);
        assert!(report.skipped.is_empty());
        assert!(report.updates.is_complete());

        // Equal totals keep fetch order, so app-b outranks app-c.
        let recorded = updates.lock().unwrap();
        assert_eq!(
            *recorded,
            vec![
                (String::from("app-b"), 25.5, 1),
                (String::from("app-c"), 25.5, 2),
                (String::from("app-a"), 10.0, 3),
            ]
        );
    }

    #[tokio::test]
    async fn malformed_candidates_are_skipped_and_never_updated() {
        let (calculator, updates) = calculator(
            vec![
                candidate("app-ok", PROGRAM_A, 12.0),
                candidate("app-bad", "not-a-uuid", 99.0),
            ],
            &[],
        );

        let run = calculator.run().await.unwrap();
        let report = match run {
            RankingRun::Completed(report) => report,
            RankingRun::NoPendingApplications => panic!("expected a completed run"),
        };

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].application_id, "app-bad");
        assert_eq!(report.skipped[0].reason, SkipReason::MalformedStudyProgram);

        let recorded = updates.lock().unwrap();
        assert_eq!(*recorded, vec![(String::from("app-ok"), 12.0, 1)]);
    }

    #[tokio::test]
    async fn update_failure_does_not_stop_the_run() {
        let (calculator, updates) = calculator(
            vec![
                candidate("app-a", PROGRAM_A, 30.0),
                candidate("app-b", PROGRAM_A, 20.0),
                candidate("app-c", PROGRAM_A, 10.0),
            ],
            &["app-b"],
        );

        let run = calculator.run().await.unwrap();
        let report = match run {
            RankingRun::Completed(report) => report,
            RankingRun::NoPendingApplications => panic!("expected a completed run"),
        };

        assert_eq!(report.updates.applied(), 2);
        assert_eq!(report.updates.failed(), 1);
        assert!(!report.updates.is_complete());

        let failed: Vec<&String> = report
            .updates
            .items()
            .iter()
            .filter(|item| matches!(item.status, ItemStatus::Failed(_)))
            .map(|item| &item.key)
            .collect();
        assert_eq!(failed, vec!["app-b"]);

        let recorded = updates.lock().unwrap();
        assert_eq!(
            *recorded,
            vec![
                (String::from("app-a"), 30.0, 1),
                (String::from("app-c"), 10.0, 3),
            ]
        );
    }

    #[tokio::test]
    async fn cohorts_are_ranked_independently() {
        let (calculator, updates) = calculator(
            vec![
                candidate("app-a1", PROGRAM_A, 5.0),
                candidate("app-b1", PROGRAM_B, 50.0),
                candidate("app-a2", PROGRAM_A, 15.0),
                candidate("app-b2", PROGRAM_B, 40.0),
            ],
            &[],
        );

        let run = calculator.run().await.unwrap();
        let report = match run {
            RankingRun::Completed(report) => report,
            RankingRun::NoPendingApplications => panic!("expected a completed run"),
        };
        assert_eq!(report.cohorts, 2);

        let recorded = updates.lock().unwrap();
        let rank_of = |id: &str| {
            recorded
                .iter()
                .find(|(updated, _, _)| updated == id)
                .map(|&(_, _, position)| position)
                .unwrap()
        };
        assert_eq!(rank_of("app-a2"), 1);
        assert_eq!(rank_of("app-a1"), 2);
        assert_eq!(rank_of("app-b1"), 1);
        assert_eq!(rank_of("app-b2"), 2);
    }

    #[tokio::test]
    async fn fetch_failure_aborts_the_run() {
        struct FailingRepository;

        #[async_trait]
        impl RankingRepository for FailingRepository {
            async fn fetch_pending_candidates(&self) -> Result<Vec<Candidate>> {
                Err(anyhow!("relation does not exist"))
            }

            async fn update_application_ranking(&self, _: &str, _: f64, _: i32) -> Result<()> {
                panic!("no update may be attempted after a fetch failure");
            }

            async fn list_applications(&self) -> Result<Vec<Application>> {
                Ok(Vec::new())
            }
        }

        let calculator = RankingCalculator::new(FailingRepository);
        let error = calculator.run().await.unwrap_err();
        assert!(matches!(error, RankingError::Fetch(_)));
    }
}
