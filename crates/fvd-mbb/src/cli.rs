use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fvd-mbb",
    version,
    about = "Configurable mobile bottom navigation bar",
    long_about = "Renders a fixed bottom navigation bar from stored settings,\n\
                  resolves submitted settings, and checks GitHub for newer releases."
)]
pub struct Cli {
    /// Keep config, cache and logs under this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the inline stylesheet and bar markup
    Render,

    /// Print the resolved settings as JSON
    Show,

    /// Resolve submitted settings (JSON) and store them
    Save {
        /// Form input file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Remove stored settings so defaults apply
    Reset,

    /// Check GitHub for a newer release
    CheckUpdate {
        /// Version to compare against (defaults to this build)
        #[arg(long, value_name = "VERSION")]
        current_version: Option<String>,

        /// Ignore a cached release and fetch again
        #[arg(long)]
        force: bool,
    },

    /// Print host settings
    Settings {
        /// Write the effective settings back to the settings file
        #[arg(long)]
        write: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["fvd-mbb", "render", "--config-dir", "/tmp/fvd", "-v"])
            .expect("arguments should parse");

        assert!(cli.verbose);
        assert_eq!(cli.config_dir.as_deref(), Some(std::path::Path::new("/tmp/fvd")));
        assert!(matches!(cli.command, Command::Render));
    }

    #[test]
    fn check_update_options_parse() {
        let cli = Cli::try_parse_from([
            "fvd-mbb",
            "check-update",
            "--current-version",
            "1.2.0",
            "--force",
        ])
        .expect("arguments should parse");

        match cli.command {
            Command::CheckUpdate {
                current_version,
                force,
            } => {
                assert_eq!(current_version.as_deref(), Some("1.2.0"));
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn save_requires_input() {
        assert!(Cli::try_parse_from(["fvd-mbb", "save"]).is_err());

        let cli = Cli::try_parse_from(["fvd-mbb", "save", "-"]).expect("stdin marker parses");
        assert!(matches!(cli.command, Command::Save { input } if input.as_os_str() == "-"));
    }
}
