//! Result rendering: human blocks, raw JSON, or tab-separated lines.

use std::io::{self, Write};

use crossterm::style::{style, Stylize};
use serde_json::Value;
use skillsmp_api::{SearchHit, SearchOutcome, SearchResults, Skill};

use crate::cli::OutputMode;

/// Description length in human output.
pub const DESC_DISPLAY_LIMIT: usize = 200;
/// Description length in plain output.
pub const DESC_PLAIN_LIMIT: usize = 120;

/// Write `outcome` to `out` in the given mode.
///
/// `styled` enables ANSI bold for skill names in human mode.
pub fn render<W: Write>(
    out: &mut W,
    outcome: &SearchOutcome,
    mode: OutputMode,
    styled: bool,
) -> io::Result<()> {
    match mode {
        OutputMode::Human => render_human(out, outcome, styled),
        OutputMode::Json => render_json(out, &outcome.raw),
        OutputMode::Plain => render_plain(out, &outcome.results),
    }
}

/// Pretty-print a response body as received, keys in the order they arrived.
pub fn render_json<W: Write>(out: &mut W, raw: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, raw)?;
    writeln!(out)
}

fn render_human<W: Write>(out: &mut W, outcome: &SearchOutcome, styled: bool) -> io::Result<()> {
    let query = outcome.query.text();
    let empty = outcome.results.is_empty();
    match &outcome.results {
        SearchResults::Keyword { hits, pagination } => {
            writeln!(
                out,
                "Keyword search: \"{}\" - {} results (page {}/{})\n",
                query,
                pagination.total(),
                pagination.page(),
                pagination.total_pages()
            )?;
            if empty {
                writeln!(out, "  No results found.")?;
                return Ok(());
            }
            for hit in hits {
                write_block(out, hit, styled)?;
            }
        }
        SearchResults::Semantic {
            hits,
            without_metadata,
        } => {
            writeln!(
                out,
                "AI search: \"{}\" - {} results ({} with metadata)\n",
                query,
                hits.len() + without_metadata,
                hits.len()
            )?;
            if empty {
                writeln!(out, "  No results found.")?;
                return Ok(());
            }
            for hit in hits {
                write_block(out, hit, styled)?;
            }
            if *without_metadata > 0 {
                writeln!(
                    out,
                    "  ({} additional results without full metadata, skipped)",
                    without_metadata
                )?;
            }
        }
    }
    Ok(())
}

fn write_block<W: Write>(out: &mut W, hit: &SearchHit, styled: bool) -> io::Result<()> {
    let skill = &hit.skill;
    let name = skill.full_name();
    if styled {
        write!(out, "  {}", style(&name).bold())?;
    } else {
        write!(out, "  {}", name)?;
    }
    if let Some(score) = hit.score {
        write!(out, "  (relevance: {:.2})", score)?;
    }
    writeln!(
        out,
        "  [{} stars, updated {}]",
        format_stars(skill.stars()),
        format_date(skill)
    )?;

    let desc = single_line(truncate_chars(skill.description(), DESC_DISPLAY_LIMIT));
    if !desc.is_empty() {
        writeln!(out, "    {}", desc)?;
    }
    if !skill.github_url().is_empty() {
        writeln!(out, "    github: {}", skill.github_url())?;
    }
    if !skill.skill_url().is_empty() {
        writeln!(out, "    skillsmp: {}", skill.skill_url())?;
    }
    writeln!(out)
}

/// One line per hit: name, stars, updated, description, and score in AI mode.
fn render_plain<W: Write>(out: &mut W, results: &SearchResults) -> io::Result<()> {
    for hit in results.hits() {
        let skill = &hit.skill;
        let mut fields = vec![
            single_line(&skill.full_name()),
            skill.stars().to_string(),
            format_date(skill),
            single_line(truncate_chars(skill.description(), DESC_PLAIN_LIMIT)),
        ];
        if matches!(results, SearchResults::Semantic { .. }) {
            fields.push(hit.score.map(|s| format!("{:.2}", s)).unwrap_or_default());
        }
        writeln!(out, "{}", fields.join("\t"))?;
    }
    Ok(())
}

/// `42`, `999`, `1.5k`.
pub fn format_stars(stars: u64) -> String {
    if stars >= 1000 {
        format!("{:.1}k", stars as f64 / 1000.0)
    } else {
        stars.to_string()
    }
}

/// `YYYY-MM-DD` in UTC, or `unknown`.
pub fn format_date(skill: &Skill) -> String {
    skill
        .updated_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// At most `max` characters of `s`, cut on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Replace tabs and line breaks so a field can never split a plain-mode line.
pub fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}
