use crate::modules::ranking::collector::Candidate;

/// A candidate's computed standing within its cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub application_id: String,
    pub total_points: f64,
    pub rank_position: i32,
}

/// Weighted total of one candidate: every criterion configured on its ranking
/// mode contributes its recorded score times the criterion's multiplication
/// factor, with 0 standing in for a score that was never recorded. Raw scores
/// are used directly; the criterion's min/max range is an entry-time
/// constraint and is not consulted here.
pub fn weighted_total(candidate: &Candidate) -> f64 {
    let total: f64 = candidate
        .criteria
        .iter()
        .map(|criterion| {
            let score = candidate
                .scores
                .get(&criterion.criterion_id)
                .copied()
                .unwrap_or(0.0);
            score * criterion.multiplication_factor
        })
        .sum();

    round2(total)
}

// Two decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores a cohort and assigns 1-based rank positions by descending total.
/// The sort is stable over fetch order, so candidates with equal totals keep
/// their submission order and still receive distinct consecutive positions.
pub fn rank_cohort(candidates: &[Candidate]) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .map(|candidate| RankedCandidate {
            application_id: candidate.application_id.clone(),
            total_points: weighted_total(candidate),
            rank_position: 0,
        })
        .collect();

    ranked.sort_by(|a, b| b.total_points.total_cmp(&a.total_points));

    for (position, candidate) in ranked.iter_mut().enumerate() {
        candidate.rank_position = (position + 1) as i32;
    }

    ranked
}
