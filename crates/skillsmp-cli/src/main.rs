//! skillsmp - search the SkillsMP marketplace for agent skills.
//!
//! Two search modes:
//! - **Keyword** (default): paginated and sortable by stars or recency
//! - **AI** (`--ai`): semantic search, results carry a relevance score
//!
//! Results print as readable blocks, raw JSON (`--json`), or tab-separated
//! lines (`--plain`) for scripting.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod render;

use cli::Cli;
use config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            eprintln!("{}", cli::short_usage());
            return ExitCode::from(2);
        }
        Err(e) => e.exit(),
    };
    let settings = Settings::from_env();
    config::init_logging(&settings);

    let invocation = match cli.into_invocation() {
        Ok(invocation) => invocation,
        Err(e) => return error::report(&anyhow::Error::from(e)),
    };

    match commands::search::run(&invocation, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => error::report(&e),
    }
}
