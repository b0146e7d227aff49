//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Session authority of agency users.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Command to run, serving the HTTP API if omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Top-level command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serves the HTTP API.
    Serve,

    /// Manages the agency session cached on this machine.
    #[command(subcommand)]
    Session(SessionCommand),
}

/// Command on the locally cached agency session.
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Signs in the agency user with the provided ID.
    SignIn {
        /// ID of the agency user.
        user_id: Uuid,
    },

    /// Prints the cached session, if any.
    Status {
        /// Also checks the session against the authority.
        #[arg(long)]
        validate: bool,
    },

    /// Refreshes the cached session with the current user data.
    Refresh,

    /// Revokes the cached session and removes it.
    SignOut,

    /// Checks whether the cached session grants a permission.
    Can {
        /// Dot-separated permission, like `reports.view`.
        permission: String,
    },

    /// Checks whether the cached session may access an agency.
    Access {
        /// ID of the agency.
        agency_id: String,
    },
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::{Args, Command, SessionCommand};

    #[test]
    fn serves_by_default() {
        let args = Args::try_parse_from(["application"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_session_commands() {
        let args = Args::try_parse_from([
            "application",
            "--config",
            "local.toml",
            "session",
            "can",
            "reports.view",
        ])
        .unwrap();

        assert_eq!(args.config, "local.toml");
        assert!(matches!(
            args.command,
            Some(Command::Session(SessionCommand::Can { permission }))
                if permission == "reports.view",
        ));
    }

    #[test]
    fn rejects_malformed_user_id() {
        assert!(Args::try_parse_from([
            "application",
            "session",
            "sign-in",
            "not-a-uuid",
        ])
        .is_err());
    }
}
