mod cache;
mod cli;
mod error;
mod host;
mod logging;
mod options;
mod persist;
mod settings;

use clap::Parser;
use fvd_platform::AppPaths;
use log::{error, info};

use crate::cli::{Cli, Command};
use crate::error::AppError;
use crate::host::{Host, read_form_input};
use crate::settings::HostSettings;

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        error!("{error}");
        eprintln!("fvd-mbb: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let paths = match &cli.config_dir {
        Some(root) => AppPaths::rooted_at(root),
        None => AppPaths::new()?,
    };
    paths
        .ensure_dirs()
        .map_err(|error| AppError::io("failed to create application directories", error))?;

    let settings = HostSettings::load_from_path(&paths.settings_file());
    logging::init_logging(
        &paths.log_file(),
        settings.debug_logging,
        cli.verbose,
        settings.max_log_size_bytes,
    );
    info!("fvd-mbb {CURRENT_VERSION} using {}", paths.config_dir.display());

    let host = Host::new(paths, settings);

    match cli.command {
        Command::Render => print!("{}", host.render()),
        Command::Show => {
            let config = host.load_config();
            let json = serde_json::to_string_pretty(&config)
                .map_err(|error| AppError::json("failed to serialize settings", error))?;
            println!("{json}");
        }
        Command::Save { input } => {
            let form = read_form_input(&input)?;
            let config = host.save(&form)?;
            println!("Saved {} buttons", config.buttons_count);
        }
        Command::Reset => {
            if host.reset()? {
                println!("Settings reset to defaults");
            } else {
                println!("No stored settings");
            }
        }
        Command::CheckUpdate {
            current_version,
            force,
        } => {
            let current = current_version.as_deref().unwrap_or(CURRENT_VERSION);
            match host.check_for_update(current, force).await {
                Some(update) => {
                    let json = serde_json::to_string_pretty(&update)
                        .map_err(|error| AppError::json("failed to serialize update", error))?;
                    println!("{json}");
                }
                None => println!("No update available for {current}"),
            }
        }
        Command::Settings { write } => {
            if write {
                let path = host.paths().settings_file();
                host.settings()
                    .save_to_path(&path)
                    .map_err(|error| AppError::io("failed to write settings", error))?;
                info!("Wrote settings to {}", path.display());
            }
            let json = serde_json::to_string_pretty(host.settings())
                .map_err(|error| AppError::json("failed to serialize settings", error))?;
            println!("{json}");
        }
    }

    Ok(())
}
