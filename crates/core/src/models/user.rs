use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Account snapshot returned alongside login/register responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: Timestamp,
    pub last_login: Option<Timestamp>,
}

/// Permission level attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfileRole {
    User,
    Judge,
    Admin,
}

impl ProfileRole {
    /// Judges and admins may record judgments.
    pub fn can_judge(self) -> bool {
        matches!(self, Self::Judge | Self::Admin)
    }
}

/// `GET/PUT /api/profile/` payload.
///
/// The backend merges `username` and `email` from the account into the
/// profile object, so both are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub bio: String,
    pub role: ProfileRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
