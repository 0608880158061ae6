use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Inappropriate,
    Spam,
    Harassment,
    Violence,
    Other,
}

/// A user complaint about a submission, listed for admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: DbId,
    pub submission_id: DbId,
    pub reporter_username: String,
    pub reason: ReportReason,
    #[serde(default)]
    pub description: String,
    pub is_resolved: bool,
    pub created_at: Timestamp,
}

/// Body of `POST /api/submissions/{id}/report/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub reason: ReportReason,
    pub description: String,
}
