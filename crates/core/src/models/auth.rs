use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Body of `POST /api/auth/jwt/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/jwt/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Body of `POST /api/token/` (username/password pair).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairRequest {
    pub username: String,
    pub password: String,
}

/// Tokens plus account snapshot returned by login and register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: User,
}

/// Bare token pair from `POST /api/token/` (no account snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of `POST /api/token/refresh/`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh answer; `refresh` is only present when the server rotates
/// refresh tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Body of `POST /api/auth/reset-password/`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}
