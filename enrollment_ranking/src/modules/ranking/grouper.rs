use crate::modules::ranking::collector::Candidate;
use enrollment_ranking_libs::CanonicalId;
use std::collections::BTreeMap;
use std::fmt;

/// Grouping key of one cohort: applications compete within one study program
/// under one enrollment deadline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CohortKey {
    pub study_program_id: CanonicalId,
    pub enrollment_deadline_id: CanonicalId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingStudyProgram,
    MissingEnrollmentDeadline,
    MalformedStudyProgram,
    MalformedEnrollmentDeadline,
    MissingRankingMode,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::MissingStudyProgram => write!(f, "study program id is missing"),
            SkipReason::MissingEnrollmentDeadline => write!(f, "enrollment deadline id is missing"),
            SkipReason::MalformedStudyProgram => write!(f, "study program id is malformed"),
            SkipReason::MalformedEnrollmentDeadline => {
                write!(f, "enrollment deadline id is malformed")
            }
            SkipReason::MissingRankingMode => write!(f, "ranking mode id is missing"),
        }
    }
}

#[derive(Debug)]
pub struct SkippedCandidate {
    pub application_id: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct GroupingOutcome {
    pub cohorts: BTreeMap<CohortKey, Vec<Candidate>>,
    pub skipped: Vec<SkippedCandidate>,
}

/// Partitions candidates into cohorts. A candidate whose grouping identifiers
/// are absent or fail the canonical format, or whose ranking mode reference
/// is empty, never reaches the update step: it is dropped with a warning and
/// reported in the outcome. Cohorts keep their candidates in fetch order;
/// cohorts with no valid candidate are absent from the map.
pub fn group_candidates(candidates: Vec<Candidate>) -> GroupingOutcome {
    let mut cohorts: BTreeMap<CohortKey, Vec<Candidate>> = BTreeMap::new();
    let mut skipped: Vec<SkippedCandidate> = Vec::new();

    for candidate in candidates {
        match cohort_key(&candidate) {
            Ok(key) => cohorts.entry(key).or_default().push(candidate),
            Err(reason) => {
                tracing::warn!(
                    "skipping application {} from ranking: {}",
                    candidate.application_id,
                    reason
                );
                skipped.push(SkippedCandidate {
                    application_id: candidate.application_id,
                    reason,
                });
            }
        }
    }

    GroupingOutcome { cohorts, skipped }
}

fn cohort_key(candidate: &Candidate) -> Result<CohortKey, SkipReason> {
    let study_program = candidate
        .study_program_id
        .as_deref()
        .ok_or(SkipReason::MissingStudyProgram)?;
    let enrollment_deadline = candidate
        .enrollment_deadline_id
        .as_deref()
        .ok_or(SkipReason::MissingEnrollmentDeadline)?;

    let study_program_id =
        CanonicalId::parse(study_program).map_err(|_| SkipReason::MalformedStudyProgram)?;
    let enrollment_deadline_id = CanonicalId::parse(enrollment_deadline)
        .map_err(|_| SkipReason::MalformedEnrollmentDeadline)?;

    if candidate
        .ranking_mode_id
        .as_deref()
        .map_or(true, str::is_empty)
    {
        return Err(SkipReason::MissingRankingMode);
    }

    Ok(CohortKey {
        study_program_id,
        enrollment_deadline_id,
    })
}
