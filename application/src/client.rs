//! Client context keeping an agency session on the local machine.

use std::convert::Infallible;

use service::{
    command::{
        ClearAgencySession, RefreshAgencySession, SignInAgencyUser,
        ValidateAgencySession,
    },
    domain::user::{
        session::{self, record::UserAgent},
        Session,
    },
    query::CurrentAgencySession,
    Command as _,
};
use tracing as log;

use crate::{args::SessionCommand, Client};

/// [`UserAgent`] this client introduces itself with.
const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Runs the provided [`SessionCommand`] with the provided [`Client`].
///
/// Returns `false` if the [`SessionCommand`] cannot be fulfilled, or answers
/// negatively.
pub async fn run(client: &Client, cmd: SessionCommand) -> bool {
    use SessionCommand as Cmd;

    match cmd {
        Cmd::SignIn { user_id } => {
            let session = client
                .execute(SignInAgencyUser {
                    user_id: user_id.into(),
                    user_agent: Some(UserAgent::from(USER_AGENT)),
                    client_address: None,
                })
                .await
                .unwrap_or_else(unreachable);
            let Some(session) = session else {
                log::error!("agency user `{user_id}` cannot be signed in");
                return false;
            };
            print(&session);
            true
        }
        Cmd::Status { validate } => {
            let Some(session) = current(client).await else {
                println!("not signed in");
                return false;
            };
            print(&session);
            if !validate {
                return true;
            }
            let valid = client
                .execute(ValidateAgencySession::from(&session))
                .await
                .unwrap_or_else(unreachable);
            println!("valid: {valid}");
            valid
        }
        Cmd::Refresh => {
            let Some(session) = current(client).await else {
                println!("not signed in");
                return false;
            };
            let refreshed = client
                .execute(RefreshAgencySession::from(session))
                .await
                .unwrap_or_else(unreachable);
            let Some(session) = refreshed else {
                log::error!("agency session cannot be refreshed");
                return false;
            };
            print(&session);
            true
        }
        Cmd::SignOut => {
            if let Some(session) = current(client).await {
                client
                    .execute(ClearAgencySession::from(&session))
                    .await
                    .unwrap_or_else(unreachable);
            }
            true
        }
        Cmd::Can { permission } => {
            let session = current(client).await;
            let granted =
                session::has_permission(session.as_ref(), &permission);
            println!("{granted}");
            granted
        }
        Cmd::Access { agency_id } => {
            let session = current(client).await;
            let allowed =
                session::can_access_agency(session.as_ref(), &agency_id);
            println!("{allowed}");
            allowed
        }
    }
}

/// Returns the [`Session`] currently cached by the provided [`Client`].
async fn current(client: &Client) -> Option<Session> {
    client
        .execute(CurrentAgencySession)
        .await
        .unwrap_or_else(unreachable)
}

/// Prints the provided [`Session`] as JSON.
fn print(session: &Session) {
    match serde_json::to_string_pretty(session) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("failed to print agency session: {e}"),
    }
}

/// Unwraps an [`Infallible`] error.
fn unreachable<T>(e: Infallible) -> T {
    match e {}
}
