//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// meetpulse - meetings and feedback from the terminal
#[derive(Debug, Parser)]
#[command(name = "meetpulse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MEETPULSE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL
    #[arg(long, env = "MEETPULSE_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Google OAuth client id
    #[arg(long, env = "MEETPULSE_GOOGLE_CLIENT_ID", global = true)]
    pub google_client_id: Option<String>,

    /// Path to the session file
    #[arg(long, global = true)]
    pub session_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Returns the settings given on the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            backend_url: self.backend_url.clone(),
            google_client_id: self.google_client_id.clone(),
            session_path: self.session_path.clone(),
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a Google ID token
    Login {
        /// The ID token. Read from stdin when neither this nor
        /// --response-file is given.
        token: Option<String>,

        /// JSON file holding the sign-in callback payload
        #[arg(long, conflicts_with = "token")]
        response_file: Option<PathBuf>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// Show meeting and feedback statistics for the signed-in user
    Dashboard,

    /// Profile commands
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Meeting commands
    Meetings {
        #[command(subcommand)]
        action: MeetingsAction,
    },

    /// Feedback commands
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Profile actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Show a profile (defaults to the signed-in user)
    Show { email: Option<String> },

    /// Create or update a profile from a JSON file
    Update { file: PathBuf },
}

/// Meeting actions.
#[derive(Debug, Subcommand)]
pub enum MeetingsAction {
    /// List meetings
    List {
        /// Only meetings owned by the signed-in user
        #[arg(long)]
        mine: bool,
    },

    /// Show one meeting
    Get { id: String },

    /// Create a meeting from a JSON file
    Create { file: PathBuf },
}

/// Feedback actions.
#[derive(Debug, Subcommand)]
pub enum FeedbackAction {
    /// List feedback
    List,

    /// Submit feedback from a JSON file
    Submit { file: PathBuf },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,

    /// Write settings into config.toml, keeping everything else in the file
    Init {
        /// Backend base URL
        #[arg(long = "set-backend-url")]
        backend_url: Option<String>,

        /// Google OAuth client id
        #[arg(long = "set-google-client-id")]
        google_client_id: Option<String>,
    },
}
