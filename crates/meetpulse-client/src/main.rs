//! meetpulse CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use meetpulse_core::{TracingConfig, init_tracing};

use meetpulse_client::cli::{
    Cli, Command, ConfigAction, FeedbackAction, MeetingsAction, ProfileAction,
};
use meetpulse_client::commands::{self, Context};
use meetpulse_client::config::ClientConfig;
use meetpulse_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)?
    } else {
        ClientConfig::load()?
    };
    let overrides = cli.overrides();

    // Config commands work without a complete configuration.
    if let Command::Config { ref action } = cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config, &overrides),
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Init {
                backend_url,
                google_client_id,
            } => commands::config::init(
                &config_path,
                backend_url.as_deref(),
                google_client_id.as_deref(),
            ),
        };
    }

    let ctx = Context::new(config.resolve(&overrides)?, cli.json)?;

    match cli.command {
        Command::Login {
            token,
            response_file,
        } => commands::session::login(&ctx, token, response_file).await,
        Command::Logout => commands::session::logout(&ctx),
        Command::Whoami => commands::session::whoami(&ctx).await,
        Command::Dashboard => commands::dashboard::show(&ctx).await,
        Command::Profile { action } => match action {
            ProfileAction::Show { email } => commands::profile::show(&ctx, email).await,
            ProfileAction::Update { file } => commands::profile::update(&ctx, &file).await,
        },
        Command::Meetings { action } => match action {
            MeetingsAction::List { mine } => commands::records::list_meetings(&ctx, mine).await,
            MeetingsAction::Get { id } => commands::records::get_meeting(&ctx, &id).await,
            MeetingsAction::Create { file } => commands::records::create_meeting(&ctx, &file).await,
        },
        Command::Feedback { action } => match action {
            FeedbackAction::List => commands::records::list_feedback(&ctx).await,
            FeedbackAction::Submit { file } => commands::records::submit_feedback(&ctx, &file).await,
        },
        Command::Config { .. } => Ok(()),
    }
}
