use std::process::ExitCode;

use clap::Parser;

use studymate::cli::{Cli, Commands, ConfigSubcommands, create_backend, repl};
use studymate::config::AppConfig;
use studymate::core::image::load_image;
use studymate::core::{ChatError, ChatSession, Result};
use studymate::logging;

fn run_config_command(command: &ConfigSubcommands) -> Result<()> {
    match command {
        ConfigSubcommands::Init => {
            let path = AppConfig::init_default()?;
            println!("✓ Created config file at {}", path.display());
        }
        ConfigSubcommands::Where => {
            let path = AppConfig::get_config_path()
                .ok_or_else(|| ChatError::Config("Could not determine config path".into()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Config { command }) = &cli.command {
        return run_config_command(command);
    }

    let config = AppConfig::load();
    let backend = create_backend(&cli, &config)?;
    let mut session = ChatSession::new(backend);

    match &cli.command {
        None => repl::run_repl(&mut session).await,
        Some(Commands::Ask {
            prompt,
            images,
            subject,
        }) => {
            let text = match subject {
                Some(subject) if prompt.is_empty() => subject.starter_prompt(),
                _ => prompt.join(" "),
            };
            let images = images
                .iter()
                .map(load_image)
                .collect::<Result<Vec<_>>>()?;
            repl::ask(&mut session, &text, images).await
        }
        Some(Commands::Config { .. }) => unreachable!(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Exiting with error");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
