use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::{SpeedCategory, SubmissionStatus};
use crate::types::{DbId, Timestamp};

/// Upper bound the backend accepts for `speed_kmh`.
pub const MAX_SPEED_KMH: f64 = 1000.0;

const MAX_COMMENT_CHARS: usize = 500;
const MAX_DETAILED_COMMENT_CHARS: usize = 1000;
const MAX_REJECTION_REASON_CHARS: usize = 200;

/// A punch photo uploaded for judging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: DbId,
    #[serde(rename = "user_username")]
    pub owner_username: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "thumbnail", default)]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "watermarked_image", default)]
    pub watermarked_image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    pub is_judged: bool,
    /// Not every backend revision serializes this flag.
    #[serde(default)]
    pub is_rejected: Option<bool>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub judgment: Option<Judgment>,
}

impl Submission {
    /// Displayed status, derived only from the judged/rejected flags.
    pub fn status(&self) -> SubmissionStatus {
        SubmissionStatus::derive(self.is_judged, self.is_rejected)
    }

    /// Speed bucket of the attached judgment, if any.
    pub fn speed_category(&self) -> SpeedCategory {
        SpeedCategory::from_speed(self.judgment.as_ref().and_then(|j| j.speed_kmh))
    }
}

/// What the backend echoes back after an upload: only the stored image
/// path and the description. The full record shows up in the next listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

/// Outcome recorded by a judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Approved,
    Rejected,
}

/// A judge's assessment of one submission.
///
/// A rejection deletes the submission and its judgment server-side before
/// the response is written, so both ids come back as `null` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub submission_id: Option<DbId>,
    #[serde(rename = "judgment")]
    pub verdict: Verdict,
    #[serde(default)]
    pub speed_kmh: Option<f64>,
    #[serde(rename = "metaphor_comment", default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub detailed_comment: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub judge_name: String,
    pub created_at: Timestamp,
}

/// Body of `POST /api/submissions/{id}/judge/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeRequest {
    #[serde(rename = "judgment")]
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
    #[serde(rename = "metaphor_comment")]
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl JudgeRequest {
    /// An approval with a measured speed.
    pub fn approve(speed_kmh: f64, comment: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Approved,
            speed_kmh: Some(speed_kmh),
            comment: comment.into(),
            detailed_comment: None,
            rejection_reason: None,
        }
    }

    /// A rejection carrying the reason shown to the submitter.
    pub fn reject(reason: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Rejected,
            speed_kmh: None,
            comment: comment.into(),
            detailed_comment: None,
            rejection_reason: Some(reason.into()),
        }
    }

    pub fn with_detailed_comment(mut self, detail: impl Into<String>) -> Self {
        self.detailed_comment = Some(detail.into());
        self
    }

    /// Check the field limits the backend enforces so obviously bad
    /// judgments fail before a round-trip.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(speed) = self.speed_kmh {
            if !(0.0..=MAX_SPEED_KMH).contains(&speed) {
                return Err(CoreError::Validation(format!(
                    "speed_kmh must be between 0 and {MAX_SPEED_KMH}, got {speed}"
                )));
            }
        }
        if self.comment.trim().is_empty() {
            return Err(CoreError::Validation("comment must not be empty".into()));
        }
        check_len("comment", &self.comment, MAX_COMMENT_CHARS)?;
        if let Some(detail) = &self.detailed_comment {
            check_len("detailed_comment", detail, MAX_DETAILED_COMMENT_CHARS)?;
        }
        if let Some(reason) = &self.rejection_reason {
            check_len("rejection_reason", reason, MAX_REJECTION_REASON_CHARS)?;
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judged_json() -> serde_json::Value {
        serde_json::json!({
            "id": 12,
            "user_username": "puncher",
            "image": "https://cdn.example.com/submissions/a.jpg",
            "thumbnail": "https://cdn.example.com/thumbnails/a.jpg",
            "watermarked_image": null,
            "description": "left hook",
            "is_judged": true,
            "created_at": "2024-03-01T09:30:00Z",
            "judgment": {
                "id": 3,
                "submission_id": 12,
                "judgment": "APPROVED",
                "speed_kmh": 72.5,
                "metaphor_comment": "like a bullet train",
                "detailed_comment": "",
                "rejection_reason": "",
                "judge_name": "admin",
                "created_at": "2024-03-02T09:30:00Z"
            }
        })
    }

    #[test]
    fn submission_decodes_backend_field_names() {
        let submission: Submission = serde_json::from_value(judged_json()).unwrap();

        assert_eq!(submission.owner_username, "puncher");
        assert_eq!(submission.image_url, "https://cdn.example.com/submissions/a.jpg");
        assert!(submission.watermarked_image_url.is_none());
        assert!(submission.is_rejected.is_none());
        assert_eq!(submission.status(), SubmissionStatus::Approved);
        assert_eq!(submission.speed_category(), SpeedCategory::FairlyFast);

        let judgment = submission.judgment.as_ref().unwrap();
        assert_eq!(judgment.verdict, Verdict::Approved);
        assert_eq!(judgment.comment.as_deref(), Some("like a bullet train"));
    }

    #[test]
    fn submission_round_trips() {
        let submission: Submission = serde_json::from_value(judged_json()).unwrap();
        let encoded = serde_json::to_value(&submission).unwrap();

        assert_eq!(encoded["user_username"], "puncher");
        assert_eq!(encoded["judgment"]["judgment"], "APPROVED");
        assert_eq!(encoded["judgment"]["metaphor_comment"], "like a bullet train");

        let decoded: Submission = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, submission);
    }

    #[test]
    fn judgment_round_trips() {
        let judgment: Judgment = serde_json::from_value(serde_json::json!({
            "id": 9,
            "submission_id": 4,
            "judgment": "REJECTED",
            "speed_kmh": null,
            "metaphor_comment": "blurry",
            "rejection_reason": "not a punch",
            "judge_name": "judge",
            "created_at": "2024-03-02T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(judgment.verdict, Verdict::Rejected);
        assert!(judgment.detailed_comment.is_none());

        let decoded: Judgment =
            serde_json::from_value(serde_json::to_value(&judgment).unwrap()).unwrap();
        assert_eq!(decoded, judgment);
    }

    #[test]
    fn rejected_judgment_has_no_ids() {
        let judgment: Judgment = serde_json::from_value(serde_json::json!({
            "id": null,
            "submission_id": null,
            "judgment": "REJECTED",
            "speed_kmh": null,
            "metaphor_comment": "missed",
            "rejection_reason": "not a punch",
            "judge_name": "judge",
            "created_at": "2024-03-02T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(judgment.verdict, Verdict::Rejected);
        assert!(judgment.id.is_none());
        assert!(judgment.submission_id.is_none());
        assert_eq!(judgment.rejection_reason.as_deref(), Some("not a punch"));
    }

    #[test]
    fn pending_submission_has_no_speed() {
        let mut json = judged_json();
        json["is_judged"] = false.into();
        json["judgment"] = serde_json::Value::Null;

        let submission: Submission = serde_json::from_value(json).unwrap();
        assert_eq!(submission.status(), SubmissionStatus::Pending);
        assert_eq!(submission.speed_category(), SpeedCategory::AwaitingJudgment);
    }

    #[test]
    fn judge_request_serializes_backend_names() {
        let body = serde_json::to_value(JudgeRequest::approve(55.0, "solid")).unwrap();
        assert_eq!(body["judgment"], "APPROVED");
        assert_eq!(body["speed_kmh"], 55.0);
        assert_eq!(body["metaphor_comment"], "solid");
        assert!(body.get("rejection_reason").is_none());
    }

    #[test]
    fn judge_request_validation() {
        assert!(JudgeRequest::approve(120.0, "fast").validate().is_ok());
        assert!(JudgeRequest::approve(-1.0, "fast").validate().is_err());
        assert!(JudgeRequest::approve(1000.5, "fast").validate().is_err());
        assert!(JudgeRequest::approve(10.0, "  ").validate().is_err());
        assert!(JudgeRequest::reject("x".repeat(201), "no").validate().is_err());
        assert!(JudgeRequest::reject("blurry photo", "no")
            .with_detailed_comment("y".repeat(1000))
            .validate()
            .is_ok());
    }
}
