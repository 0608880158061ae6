use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use punch_core::models::{RankingKind, ReportReason};
use punch_core::types::DbId;

#[derive(Parser)]
#[command(name = "punch")]
#[command(about = "World's Fastest Punch command-line client", version)]
pub struct Cli {
    /// Backend origin; overrides `PUNCH_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "punch_client=warn,punch=warn",
            1 => "punch_client=info,punch=info",
            _ => "punch_client=debug,punch=debug",
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        username: String,
    },
    /// Sign in through the username/password token endpoint.
    Token {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the current session.
    Whoami,
    /// Ask the backend to reset a password.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// List submissions.
    Submissions {
        /// Only submissions owned by the signed-in user.
        #[arg(long, default_value_t = false)]
        mine: bool,
    },
    /// Show one submission.
    Submission { id: DbId },
    /// Upload a JPEG punch photo.
    Submit {
        image: PathBuf,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Judge a submission.
    Judge {
        id: DbId,
        #[command(subcommand)]
        verdict: VerdictCommand,
    },
    /// Report a submission.
    Report {
        id: DbId,
        #[arg(long, value_enum)]
        reason: ReasonCli,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show the profile.
    Profile,
    /// Update the profile.
    UpdateProfile {
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Show a leaderboard.
    Rankings {
        #[arg(long, value_enum)]
        kind: Option<BoardCli>,
    },
    /// List notifications.
    Notifications,
    /// Mark a notification read.
    Read { id: DbId },
    /// Administrator views.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
pub enum VerdictCommand {
    Approve {
        #[arg(long)]
        speed: f64,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        detail: Option<String>,
    },
    Reject {
        #[arg(long)]
        reason: String,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        detail: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    Submissions,
    Reports,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BoardCli {
    Weekly,
    Monthly,
    AllTime,
}

impl From<BoardCli> for RankingKind {
    fn from(value: BoardCli) -> Self {
        match value {
            BoardCli::Weekly => RankingKind::Weekly,
            BoardCli::Monthly => RankingKind::Monthly,
            BoardCli::AllTime => RankingKind::AllTime,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReasonCli {
    Inappropriate,
    Spam,
    Harassment,
    Violence,
    Other,
}

impl From<ReasonCli> for ReportReason {
    fn from(value: ReasonCli) -> Self {
        match value {
            ReasonCli::Inappropriate => ReportReason::Inappropriate,
            ReasonCli::Spam => ReportReason::Spam,
            ReasonCli::Harassment => ReportReason::Harassment,
            ReasonCli::Violence => ReportReason::Violence,
            ReasonCli::Other => ReportReason::Other,
        }
    }
}
