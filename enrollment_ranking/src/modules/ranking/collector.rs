use crate::types::tables::CandidateRow;
use std::collections::HashMap;

/// One criterion of a ranking mode together with its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionWeight {
    pub criterion_id: String,
    pub multiplication_factor: f64,
}

/// A pending application annotated with its ranking mode's criteria and its
/// own recorded scores, as produced by one bulk fetch.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub application_id: String,
    pub study_program_id: Option<String>,
    pub enrollment_deadline_id: Option<String>,
    pub ranking_mode_id: Option<String>,
    pub criteria: Vec<CriterionWeight>,
    pub scores: HashMap<String, f64>,
}

/// Folds the flat join rows of one fetch into one candidate per application.
/// Candidates keep the order in which their application first appears in the
/// row stream; that order is the ranking tie-break basis.
pub fn fold_candidate_rows(rows: Vec<CandidateRow>) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let position = match positions.get(&row.application_id) {
            Some(&position) => position,
            None => {
                positions.insert(row.application_id.clone(), candidates.len());
                candidates.push(Candidate {
                    application_id: row.application_id,
                    study_program_id: row.study_program_id,
                    enrollment_deadline_id: row.enrollment_deadline_id,
                    ranking_mode_id: row.ranking_mode_id,
                    criteria: Vec::new(),
                    scores: HashMap::new(),
                });
                candidates.len() - 1
            }
        };

        let candidate = &mut candidates[position];
        if let (Some(criterion_id), Some(multiplication_factor)) =
            (row.criterion_id, row.multiplication_factor)
        {
            if let Some(score) = row.score {
                candidate.scores.insert(criterion_id.clone(), score);
            }
            candidate.criteria.push(CriterionWeight {
                criterion_id,
                multiplication_factor,
            });
        }
    }

    candidates
}
