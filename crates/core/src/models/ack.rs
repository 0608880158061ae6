use serde::{Deserialize, Serialize};

/// `{"status": "..."}` acknowledgement (e.g. marking a notification read).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
}

/// `{"message": "..."}` acknowledgement. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAck {
    pub message: String,
}
