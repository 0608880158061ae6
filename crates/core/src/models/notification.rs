use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Category of a notification. Values the client does not know are kept
/// verbatim so they survive a re-encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Rejection,
    Approval,
    Ranking,
    Other(String),
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "REJECTION" => Self::Rejection,
            "APPROVAL" => Self::Approval,
            "RANKING" => Self::Ranking,
            _ => Self::Other(value),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Rejection => "REJECTION".into(),
            NotificationKind::Approval => "APPROVAL".into(),
            NotificationKind::Ranking => "RANKING".into(),
            NotificationKind::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: DbId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
