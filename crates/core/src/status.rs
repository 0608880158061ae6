//! Values derived from submission fields on the client side.

use std::fmt;

use serde::Serialize;

/// Displayed state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// Map the backend flags onto a status. `is_rejected` only counts
    /// once the submission has been judged.
    pub fn derive(is_judged: bool, is_rejected: Option<bool>) -> Self {
        match (is_judged, is_rejected) {
            (false, _) => Self::Pending,
            (true, Some(true)) => Self::Rejected,
            (true, _) => Self::Approved,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Badge colour used by the gallery views.
    pub fn color(self) -> &'static str {
        match self {
            Self::Pending => "yellow",
            Self::Approved => "green",
            Self::Rejected => "red",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Speed bucket shown next to a judged punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedCategory {
    AwaitingJudgment,
    VeryFast,
    FairlyFast,
    Average,
    NotVeryFast,
    NotFastAtAll,
}

impl SpeedCategory {
    pub fn from_speed(speed_kmh: Option<f64>) -> Self {
        match speed_kmh {
            None => Self::AwaitingJudgment,
            Some(s) if s >= 80.0 => Self::VeryFast,
            Some(s) if s >= 60.0 => Self::FairlyFast,
            Some(s) if s >= 40.0 => Self::Average,
            Some(s) if s >= 20.0 => Self::NotVeryFast,
            Some(_) => Self::NotFastAtAll,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AwaitingJudgment => "Awaiting judgment",
            Self::VeryFast => "Very fast punch",
            Self::FairlyFast => "Fairly fast punch",
            Self::Average => "Average punch",
            Self::NotVeryFast => "Not a very fast punch",
            Self::NotFastAtAll => "Not fast at all",
        }
    }
}

impl fmt::Display for SpeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
