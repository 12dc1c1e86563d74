//! Subcommand implementations.

use std::error::Error;

use waymark::Config;

use crate::{
    cli::{Cli, Commands},
    output::OutputFormat,
    session::Session,
};

pub mod edit;
pub mod list;
pub mod tree;

/// Open the workspaces, run one command, then save what changed.
pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let format = OutputFormat::from(cli.format);
    let config = Config::default().with_sort(cli.sort.into());
    let mut session = Session::open(&cli.workspaces, config).await?;

    match &cli.command {
        Commands::List(args) => list::run(&session, args, format)?,
        Commands::Group(args) => tree::group(&mut session, args, format)?,
        Commands::Mark(args) => tree::mark(&mut session, args, format)?,
        Commands::Rm(args) => tree::remove(&mut session, args, format)?,
        Commands::Rename(args) => tree::rename(&mut session, args, format)?,
        Commands::Mv(args) => tree::move_node(&mut session, args, format).await?,
        Commands::Convert(args) => tree::convert(&mut session, args, format)?,
        Commands::Activate(args) => tree::activate(&mut session, args, format)?,
        Commands::Edit(args) => edit::apply(&mut session, args, format)?,
        Commands::Reanchor(args) => edit::reanchor(&mut session, args, format).await?,
    }

    for key in session.save().await? {
        tracing::info!("Saved {key}");
    }
    Ok(())
}
