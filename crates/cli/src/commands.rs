//! Subcommand dispatch. Results are printed to stdout as pretty JSON.

use anyhow::Context;
use punch_client::PunchApi;
use punch_core::models::{JudgeRequest, ReportRequest};
use serde::Serialize;
use serde_json::json;

use crate::cli::{AdminCommand, Command, VerdictCommand};

pub async fn run(api: &PunchApi, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = api.login(&email, &password).await.map_err(friendly)?;
            print_json(&user)
        }
        Command::Register {
            email,
            password,
            username,
        } => {
            let user = api.register(&email, &password, &username).await.map_err(friendly)?;
            print_json(&user)
        }
        Command::Token { username, password } => {
            api.obtain_token_pair(&username, &password).await.map_err(friendly)?;
            print_json(&json!({"authenticated": true}))
        }
        Command::Logout => {
            api.logout().await;
            print_json(&json!({"authenticated": false}))
        }
        Command::Whoami => {
            let session = api.session().session().await;
            print_json(&json!({
                "authenticated": session.is_some(),
                "expires_at": session.as_ref().and_then(|s| s.expires_at),
                "can_refresh": session.as_ref().is_some_and(|s| s.refresh_token.is_some()),
            }))
        }
        Command::ResetPassword { email } => print_json(&api.reset_password(&email).await.map_err(friendly)?),
        Command::Submissions { mine } => {
            let submissions = if mine {
                api.list_my_submissions().await
            } else {
                api.list_submissions().await
            };
            print_json(&submissions.map_err(friendly)?)
        }
        Command::Submission { id } => print_json(&api.get_submission(id).await.map_err(friendly)?),
        Command::Submit {
            image,
            description,
            username,
            email,
        } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("reading {}", image.display()))?;
            let receipt = api
                .create_submission(&bytes, &description, &username, &email)
                .await
                .map_err(friendly)?;
            print_json(&receipt)
        }
        Command::Judge { id, verdict } => {
            let request = match verdict {
                VerdictCommand::Approve { speed, comment, detail } => {
                    with_detail(JudgeRequest::approve(speed, comment), detail)
                }
                VerdictCommand::Reject { reason, comment, detail } => {
                    with_detail(JudgeRequest::reject(reason, comment), detail)
                }
            };
            print_json(&api.judge_submission(id, &request).await.map_err(friendly)?)
        }
        Command::Report {
            id,
            reason,
            description,
        } => {
            let request = ReportRequest {
                reason: reason.into(),
                description,
            };
            print_json(&api.report_submission(id, &request).await.map_err(friendly)?)
        }
        Command::Profile => print_json(&api.get_profile().await.map_err(friendly)?),
        Command::UpdateProfile {
            bio,
            username,
            email,
            image,
        } => {
            let image = match image {
                Some(path) => Some(
                    tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?,
                ),
                None => None,
            };
            let profile = api
                .update_profile(&bio, &username, &email, image.as_deref())
                .await
                .map_err(friendly)?;
            print_json(&profile)
        }
        Command::Rankings { kind } => {
            print_json(&api.list_rankings(kind.map(Into::into)).await.map_err(friendly)?)
        }
        Command::Notifications => print_json(&api.list_notifications().await.map_err(friendly)?),
        Command::Read { id } => print_json(&api.mark_notification_read(id).await.map_err(friendly)?),
        Command::Admin { command } => match command {
            AdminCommand::Submissions => print_json(&api.list_admin_submissions().await.map_err(friendly)?),
            AdminCommand::Reports => print_json(&api.list_admin_reports().await.map_err(friendly)?),
        },
    }
}

fn with_detail(request: JudgeRequest, detail: Option<String>) -> JudgeRequest {
    match detail {
        Some(detail) => request.with_detailed_comment(detail),
        None => request,
    }
}

/// Keep the technical cause in the logs and show the user-facing text.
fn friendly(err: punch_client::ApiError) -> anyhow::Error {
    tracing::debug!(error = ?err, "Request failed");
    anyhow::anyhow!(err.user_message())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
