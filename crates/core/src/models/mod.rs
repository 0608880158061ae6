//! DTOs mirrored from the REST backend's JSON shapes.

pub mod ack;
pub mod auth;
pub mod notification;
pub mod page;
pub mod ranking;
pub mod report;
pub mod submission;
pub mod user;

pub use ack::{MessageAck, StatusAck};
pub use auth::{
    AuthResponse, LoginRequest, PasswordResetRequest, RefreshRequest, RefreshResponse,
    RegisterRequest, TokenPair, TokenPairRequest,
};
pub use notification::{Notification, NotificationKind};
pub use page::Page;
pub use ranking::{Ranking, RankingKind};
pub use report::{Report, ReportReason, ReportRequest};
pub use submission::{JudgeRequest, Judgment, Submission, SubmissionReceipt, Verdict};
pub use user::{ProfileRole, User, UserProfile};
