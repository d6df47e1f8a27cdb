//! Command-line surface and its validation into a [`Query`].

use clap::{ArgAction, CommandFactory, Parser};
use skillsmp_api::{KeywordOptions, Query, SkillsmpError, SkillsmpResult, SortKey};

const AFTER_HELP: &str = "\
Environment:
  SKILLSMP_API_KEY   API key (falls back to a SKILLSMP_API_KEY=... line in ~/.env)
  SKILLSMP_API_URL   Override the API root (default: https://skillsmp.com/api/v1/skills)
  SKILLSMP_LOG       Log filter for diagnostics on stderr (default: warn)

Flags are read until the first query word; everything after it is query text.

Examples:
  skillsmp terraform
  skillsmp --sort recent --limit 5 react testing
  skillsmp --ai \"optimize database queries\"
  skillsmp --plain kubernetes | cut -f1,2";

#[derive(Parser, Debug)]
#[command(name = "skillsmp")]
#[command(version, about = "Search the SkillsMP marketplace for agent skills", long_about = None)]
#[command(disable_version_flag = true, arg_required_else_help = true)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Search query (words are joined with spaces)
    #[arg(value_name = "QUERY", required = true, num_args = 1.., trailing_var_arg = true)]
    pub query: Vec<String>,

    /// AI semantic search (no paging or sorting)
    #[arg(short = 'a', long)]
    pub ai: bool,

    /// Results per page, 1-100 [default: 10]
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<u32>,

    /// Page number [default: 1]
    #[arg(short = 'p', long, value_name = "N")]
    pub page: Option<u32>,

    /// Sort order: stars or recent [default: stars]
    #[arg(short = 's', long, value_name = "KEY")]
    pub sort: Option<String>,

    /// Print the raw API response as JSON
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Tab-separated output, one line per result
    #[arg(long)]
    pub plain: bool,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Human,
    Json,
    Plain,
}

/// A fully validated request: what to search and how to print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub query: Query,
    pub output: OutputMode,
}

/// What a bare `skillsmp` prints: the usage line and a pointer to `--help`.
pub fn short_usage() -> String {
    format!(
        "{}\n\nRun \"skillsmp --help\" for all options.",
        Cli::command().render_usage()
    )
}

impl Cli {
    /// Validate flag values and combinations.
    ///
    /// `--json` with `--plain` is a conflict, and `--ai` rejects every paging
    /// and sort flag rather than ignoring it.
    pub fn into_invocation(self) -> SkillsmpResult<Invocation> {
        let output = match (self.json, self.plain) {
            (true, true) => {
                return Err(SkillsmpError::config(
                    "--json and --plain are mutually exclusive",
                ))
            }
            (true, false) => OutputMode::Json,
            (false, true) => OutputMode::Plain,
            (false, false) => OutputMode::Human,
        };

        let text = self.query.join(" ");
        if text.trim().is_empty() {
            return Err(SkillsmpError::config("query must not be empty"));
        }

        let query = if self.ai {
            if self.limit.is_some() || self.page.is_some() || self.sort.is_some() {
                return Err(SkillsmpError::config(
                    "--limit, --page, --sort do not apply to --ai search",
                ));
            }
            Query::semantic(text)
        } else {
            let sort = self
                .sort
                .as_deref()
                .map(str::parse::<SortKey>)
                .transpose()?;
            Query::keyword(text, KeywordOptions::new(self.page, self.limit, sort)?)
        };

        Ok(Invocation { query, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> SkillsmpResult<Invocation> {
        let argv = std::iter::once("skillsmp").chain(args.iter().copied());
        Cli::try_parse_from(argv)
            .expect("clap should accept these arguments")
            .into_invocation()
    }

    fn clap_error(args: &[&str]) -> ErrorKind {
        let argv = std::iter::once("skillsmp").chain(args.iter().copied());
        Cli::try_parse_from(argv)
            .expect_err("clap should reject these arguments")
            .kind()
    }

    fn keyword_options(inv: &Invocation) -> KeywordOptions {
        match &inv.query {
            Query::Keyword { options, .. } => *options,
            other => panic!("expected keyword query, got {:?}", other),
        }
    }

    #[test]
    fn plain_query_uses_defaults() {
        let inv = parse(&["terraform"]).unwrap();
        assert_eq!(
            inv,
            Invocation {
                query: Query::keyword("terraform", KeywordOptions::default()),
                output: OutputMode::Human,
            }
        );
    }

    #[test]
    fn query_words_are_joined() {
        let inv = parse(&["react", "testing", "library"]).unwrap();
        assert_eq!(inv.query.text(), "react testing library");
    }

    #[test]
    fn short_and_long_flags() {
        let inv = parse(&["-n", "5", "-p", "3", "-s", "recent", "-j", "q"]).unwrap();
        let options = keyword_options(&inv);
        assert_eq!(options.limit, 5);
        assert_eq!(options.page, 3);
        assert_eq!(options.sort, SortKey::Recent);
        assert_eq!(inv.output, OutputMode::Json);

        let inv = parse(&[
            "--limit", "25", "--page", "2", "--sort", "stars", "--plain", "q",
        ])
        .unwrap();
        let options = keyword_options(&inv);
        assert_eq!(options.limit, 25);
        assert_eq!(options.page, 2);
        assert_eq!(options.sort, SortKey::Stars);
        assert_eq!(inv.output, OutputMode::Plain);
    }

    #[test]
    fn ai_flag_selects_semantic_search() {
        for flag in ["--ai", "-a"] {
            let inv = parse(&[flag, "optimize", "queries"]).unwrap();
            assert_eq!(inv.query, Query::semantic("optimize queries"));
        }
    }

    #[test]
    fn flags_stop_after_first_query_word() {
        let inv = parse(&["hello", "--ai", "--json"]).unwrap();
        assert_eq!(inv.query.text(), "hello --ai --json");
        assert!(matches!(inv.query, Query::Keyword { .. }));
        assert_eq!(inv.output, OutputMode::Human);
    }

    #[test]
    fn double_dash_ends_flag_parsing() {
        let inv = parse(&["--", "--ai", "-j"]).unwrap();
        assert_eq!(inv.query.text(), "--ai -j");
        assert!(matches!(inv.query, Query::Keyword { .. }));
    }

    #[test]
    fn limit_boundaries() {
        assert_eq!(keyword_options(&parse(&["--limit", "1", "q"]).unwrap()).limit, 1);
        assert_eq!(keyword_options(&parse(&["--limit", "100", "q"]).unwrap()).limit, 100);
    }

    #[test]
    fn limit_out_of_range_is_config_error() {
        for limit in ["0", "101", "200", "999999"] {
            let err = parse(&["--limit", limit, "q"]).unwrap_err();
            assert!(err.is_usage());
            assert!(err.to_string().contains("1-100"), "{}", err);
        }
    }

    #[test]
    fn unknown_sort_key_is_config_error() {
        let err = parse(&["--sort", "name", "q"]).unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().contains("'stars' or 'recent'"));
    }

    #[test]
    fn json_and_plain_conflict() {
        for args in [["--json", "--plain", "q"], ["--plain", "-j", "q"]] {
            let err = parse(&args).unwrap_err();
            assert!(err.to_string().contains("mutually exclusive"));
        }
    }

    #[test]
    fn ai_rejects_paging_and_sort_flags() {
        for args in [
            ["--ai", "--limit", "5", "q"],
            ["--ai", "--page", "2", "q"],
            ["--ai", "--sort", "recent", "q"],
            ["--limit", "5", "-a", "q"],
        ] {
            let err = parse(&args).unwrap_err();
            assert!(err.is_usage());
            assert!(err.to_string().contains("do not apply"), "{:?}", args);
        }
    }

    #[test]
    fn blank_query_is_config_error() {
        let err = parse(&["  "]).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn malformed_invocations_are_rejected_by_clap() {
        assert_eq!(clap_error(&["--unknown", "q"]), ErrorKind::UnknownArgument);
        assert_eq!(clap_error(&["--limit", "abc", "q"]), ErrorKind::ValueValidation);
        assert_eq!(clap_error(&["--page", "abc", "q"]), ErrorKind::ValueValidation);
        assert_eq!(clap_error(&["--limit", "5"]), ErrorKind::MissingRequiredArgument);
        for flag in ["--limit", "--page", "--sort"] {
            assert!(Cli::try_parse_from(["skillsmp", flag]).is_err());
        }
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        assert_eq!(clap_error(&["--help"]), ErrorKind::DisplayHelp);
        assert_eq!(clap_error(&["-h"]), ErrorKind::DisplayHelp);
        assert_eq!(clap_error(&["--version"]), ErrorKind::DisplayVersion);
    }

    #[test]
    fn no_arguments_asks_for_short_usage() {
        assert_eq!(
            clap_error(&[]),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );

        let usage = short_usage();
        assert!(usage.starts_with("Usage: skillsmp"), "{}", usage);
        assert!(usage.ends_with("Run \"skillsmp --help\" for all options."));
        assert!(!usage.contains("Environment:"));
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
