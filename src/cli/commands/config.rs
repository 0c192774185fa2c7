//! Config command implementation.

use anyhow::Result;
use clap::Subcommand;

use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the active configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Write the default configuration to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Path => match Config::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!(
                "{}",
                formatter.format_message("No config directory available on this platform.")
            ),
        },
        ConfigCommand::Init { force } => {
            if let Some(path) = Config::config_path()
                && path.exists()
                && !force
            {
                anyhow::bail!(
                    "config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            let config = Config::default();
            config.save()?;
            if let Some(path) = Config::config_path() {
                println!(
                    "{}",
                    formatter.format_message(&format!("Wrote default config to {}", path.display()))
                );
            }
        }
    }

    Ok(())
}
