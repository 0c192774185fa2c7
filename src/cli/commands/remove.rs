//! Remove command implementation.

use anyhow::Result;
use clap::{ArgGroup, Args};
use console::style;

use crate::cli::output::{OutputFormat, RemovalOutcome, get_formatter};
use crate::models::Config;
use crate::services::{RemovalSelector, VectorStoreClient};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("selector").required(true).multiple(false)))]
pub struct RemoveArgs {
    /// Remove every chunk stored for this source file
    #[arg(long, group = "selector")]
    pub source: Option<String>,

    /// Remove every chunk stored under this document title
    #[arg(long, group = "selector")]
    pub title: Option<String>,

    /// Remove a single point by id
    #[arg(long, group = "selector")]
    pub id: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub force: bool,
}

pub async fn handle_remove(args: RemoveArgs, format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let selector = if let Some(source) = args.source {
        RemovalSelector::SourceFile(source)
    } else if let Some(title) = args.title {
        RemovalSelector::DocTitle(title)
    } else if let Some(id) = args.id {
        RemovalSelector::PointId(id)
    } else {
        unreachable!("clap enforces exactly one selector");
    };

    if !args.force && !confirm_removal(&selector)? {
        println!("{}", formatter.format_message("Aborted."));
        return Ok(());
    }

    let store = VectorStoreClient::connect(&config.vector_store).await?;
    let deleted = store.delete_matching(&selector).await?;

    print!(
        "{}",
        formatter.format_removal(&RemovalOutcome {
            field: selector.field().to_string(),
            value: selector.value().to_string(),
            deleted,
        })
    );

    Ok(())
}

fn confirm_removal(selector: &RemovalSelector) -> Result<bool> {
    let term = console::Term::stderr();
    term.write_str(&format!(
        "Remove every chunk where {} = '{}'? [y/N] ",
        style(selector.field()).bold(),
        style(selector.value()).bold()
    ))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
