//! Shared domain types for the World's Fastest Punch client.
//!
//! Everything here mirrors a JSON shape served by the REST backend. The
//! only derived logic is the submission status mapping and the speed
//! category ladder in [`status`].

pub mod error;
pub mod models;
pub mod status;
pub mod types;

pub use error::CoreError;
pub use status::{SpeedCategory, SubmissionStatus};
