use serde::{Deserialize, Serialize};

/// Summary statistics of one ranking calculation run. `time` is the elapsed
/// wall clock in milliseconds, the counters are application counts except
/// `cohorts`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct RankingRunStats {
    pub time: u32,
    pub cohorts: u32,
    pub ranked: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl RankingRunStats {
    fn empty(time: u32) -> Self {
        Self {
            time,
            cohorts: 0,
            ranked: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankingRunResponse {
    pub stats: RankingRunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RankingRunResponse {
    pub fn completed(stats: RankingRunStats) -> Self {
        Self {
            stats,
            message: Some(String::from("ranking calculation completed")),
        }
    }

    pub fn nothing_to_rank(time: u32) -> Self {
        Self {
            stats: RankingRunStats::empty(time),
            message: Some(String::from("no pending applications")),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Self {
            stats: RankingRunStats::empty(0),
            message: Some(message.to_string()),
        }
    }
}
