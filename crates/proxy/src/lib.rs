//! Pass-through HTTP proxy in front of the punch REST backend.
//!
//! Mirrors the web app's `/api/django/*` and `/api/auth/jwt-login` routes.
//! Requests are forwarded with their `Authorization`, `Content-Type` and
//! body; upstream status and body come back unchanged.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
pub mod upstream;
