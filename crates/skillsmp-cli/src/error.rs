//! Top-level error reporting and exit codes.

use std::error::Error as _;
use std::io::{self, Write};
use std::process::ExitCode;

use crossterm::style::{style, Stylize};
use crossterm::tty::IsTty;
use serde_json::{json, Value};
use skillsmp_api::SkillsmpError;

/// Exit code for failures outside the search error taxonomy.
const GENERIC_FAILURE: u8 = 1;

/// Print `err` to stderr and pick the exit code for its category.
pub fn report(err: &anyhow::Error) -> ExitCode {
    let known = err.downcast_ref::<SkillsmpError>();

    let prefix = if io::stderr().is_tty() {
        style("skillsmp:").red().bold().to_string()
    } else {
        "skillsmp:".to_string()
    };
    eprintln!("{} {:#}", prefix, err);

    if known.is_some_and(SkillsmpError::is_usage) {
        eprintln!("Try \"skillsmp --help\" for usage.");
    }

    ExitCode::from(exit_code(err))
}

/// Exit code for `err`: the taxonomy's code, or 1 for anything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<SkillsmpError>()
        .map_or(GENERIC_FAILURE, SkillsmpError::exit_code)
}

/// The `--json` error object for a failed request, if `err` is one.
///
/// API errors carry the HTTP status as `code`. Errors raised before any
/// request is sent have no envelope.
pub fn json_envelope(err: &SkillsmpError) -> Option<Value> {
    match err {
        SkillsmpError::Api { status, message } => Some(json!({
            "error": message,
            "code": status,
        })),
        SkillsmpError::Network(_) | SkillsmpError::ResponseParse(_) => {
            Some(json!({ "error": chain_text(err) }))
        }
        SkillsmpError::MissingCredential | SkillsmpError::Config(_) => None,
    }
}

/// Write the envelope for `err` as one line of JSON, if it has one.
pub fn write_json_envelope<W: Write>(out: &mut W, err: &SkillsmpError) -> io::Result<()> {
    if let Some(envelope) = json_envelope(err) {
        serde_json::to_writer(&mut *out, &envelope)?;
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}

/// `err` and its sources, joined the way `{:#}` shows an anyhow chain.
fn chain_text(err: &SkillsmpError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
