use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::submission::Submission;
use crate::types::{DbId, Timestamp};

/// Ranking window served by `GET /api/ranking/?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    Weekly,
    Monthly,
    AllTime,
}

impl RankingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::AllTime => "all_time",
        }
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One leaderboard slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub id: DbId,
    pub submission: Submission,
    pub ranking_type: RankingKind,
    pub rank: u32,
    pub speed_kmh: f64,
    pub created_at: Timestamp,
}
