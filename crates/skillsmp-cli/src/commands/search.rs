//! Search command - run one keyword or AI search and print the results.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;
use skillsmp_api::{Credential, Query, SearchOutcome, SkillsmpClient};

use crate::cli::{Invocation, OutputMode};
use crate::config::Settings;
use crate::error;
use crate::render;

const PROGRESS: &str = "Searching (AI)...";

const NO_RESULTS_TIP: &str =
    "Tip: try fewer or broader words, or --ai to search by meaning instead of keywords.";

/// Which standard streams are attached to a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Terminal {
    pub stdout: bool,
    pub stderr: bool,
}

impl Terminal {
    pub fn detect() -> Self {
        Self {
            stdout: io::stdout().is_tty(),
            stderr: io::stderr().is_tty(),
        }
    }
}

pub async fn run(invocation: &Invocation, settings: &Settings) -> Result<()> {
    let credential = Credential::load()?;
    let client = SkillsmpClient::with_base_url(credential, settings.base_url.as_str())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    search(
        &client,
        invocation,
        Terminal::detect(),
        &mut out,
        &mut io::stderr(),
    )
    .await
}

/// Run the search and write results to `out`, and progress and hints to `err`.
///
/// The progress line and the no-results tip only appear in human mode on a
/// terminal stderr. A failed `--json` search also writes an error object to
/// `out`.
pub async fn search<O, E>(
    client: &SkillsmpClient,
    invocation: &Invocation,
    terminal: Terminal,
    out: &mut O,
    err: &mut E,
) -> Result<()>
where
    O: Write,
    E: Write,
{
    let human = invocation.output == OutputMode::Human;
    let show_progress =
        terminal.stderr && human && matches!(invocation.query, Query::Semantic { .. });

    tracing::debug!(
        mode = invocation.query.mode().as_str(),
        base_url = client.base_url(),
        "starting search"
    );

    if show_progress {
        write!(err, "{}", PROGRESS).ok();
        err.flush().ok();
    }
    let fetched = client.fetch(&invocation.query).await;
    if show_progress {
        execute!(err, MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    }

    let raw = match fetched {
        Ok(raw) => raw,
        Err(e) => {
            if invocation.output == OutputMode::Json {
                error::write_json_envelope(out, &e).context("Failed to write results")?;
            }
            return Err(e.into());
        }
    };

    if invocation.output == OutputMode::Json {
        return render::render_json(out, &raw)
            .and_then(|()| out.flush())
            .context("Failed to write results");
    }

    let outcome = SearchOutcome::from_raw(invocation.query.clone(), raw)?;
    tracing::debug!(hits = outcome.results.hits().len(), "search complete");

    render::render(out, &outcome, invocation.output, terminal.stdout)
        .and_then(|()| out.flush())
        .context("Failed to write results")?;

    if human && terminal.stderr && outcome.results.is_empty() {
        writeln!(err, "{}", NO_RESULTS_TIP).ok();
    }

    Ok(())
}
