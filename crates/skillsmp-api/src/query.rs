//! Validated search queries.

use std::fmt;
use std::str::FromStr;

use crate::{SkillsmpError, SkillsmpResult};

/// Smallest accepted `limit`.
pub const MIN_LIMIT: u32 = 1;
/// Largest accepted `limit`.
pub const MAX_LIMIT: u32 = 100;
/// Results per page when no limit is given.
pub const DEFAULT_LIMIT: u32 = 10;
/// Page requested when no page is given.
pub const DEFAULT_PAGE: u32 = 1;

/// Ordering of keyword results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Most-starred first
    #[default]
    Stars,
    /// Most recently updated first
    Recent,
}

impl SortKey {
    /// Value sent as the `sortBy` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Recent => "recent",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SkillsmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stars" => Ok(SortKey::Stars),
            "recent" => Ok(SortKey::Recent),
            other => Err(SkillsmpError::config(format!(
                "--sort must be 'stars' or 'recent' (got: {})",
                other
            ))),
        }
    }
}

/// Paging and ordering for a keyword search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOptions {
    pub page: u32,
    pub limit: u32,
    pub sort: SortKey,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortKey::default(),
        }
    }
}

impl KeywordOptions {
    /// Build options, filling defaults and checking ranges.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        sort: Option<SortKey>,
    ) -> SkillsmpResult<Self> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(SkillsmpError::config(format!(
                "--limit must be {}-{} (got: {})",
                MIN_LIMIT, MAX_LIMIT, limit
            )));
        }

        let page = page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(SkillsmpError::config(format!(
                "--page must be 1 or greater (got: {})",
                page
            )));
        }

        Ok(Self {
            page,
            limit,
            sort: sort.unwrap_or_default(),
        })
    }
}

/// Which endpoint a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    Semantic,
}

impl SearchMode {
    /// Label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Semantic => "semantic",
        }
    }
}

/// A validated search request.
///
/// Only keyword queries carry paging and sort options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Keyword { text: String, options: KeywordOptions },
    Semantic { text: String },
}

impl Query {
    /// Keyword query with the given options.
    pub fn keyword(text: impl Into<String>, options: KeywordOptions) -> Self {
        Query::Keyword {
            text: text.into(),
            options,
        }
    }

    /// AI semantic query.
    pub fn semantic(text: impl Into<String>) -> Self {
        Query::Semantic { text: text.into() }
    }

    /// The free-text query.
    pub fn text(&self) -> &str {
        match self {
            Query::Keyword { text, .. } | Query::Semantic { text } => text,
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            Query::Keyword { .. } => SearchMode::Keyword,
            Query::Semantic { .. } => SearchMode::Semantic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_nothing_given() {
        let options = KeywordOptions::new(None, None, None).unwrap();
        assert_eq!(options, KeywordOptions::default());
        assert_eq!(options.limit, 10);
        assert_eq!(options.page, 1);
        assert_eq!(options.sort, SortKey::Stars);
    }

    #[test]
    fn limit_boundaries_are_inclusive() {
        assert_eq!(KeywordOptions::new(None, Some(1), None).unwrap().limit, 1);
        assert_eq!(KeywordOptions::new(None, Some(100), None).unwrap().limit, 100);
    }

    #[test]
    fn limit_outside_range_is_config_error() {
        for limit in [0, 101, 200, 999_999, u32::MAX] {
            let err = KeywordOptions::new(None, Some(limit), None).unwrap_err();
            assert!(matches!(err, SkillsmpError::Config(_)), "limit {}", limit);
            assert!(err.to_string().contains("1-100"));
        }
    }

    #[test]
    fn page_zero_is_config_error() {
        let err = KeywordOptions::new(Some(0), None, None).unwrap_err();
        assert!(matches!(err, SkillsmpError::Config(_)));
    }

    #[test]
    fn sort_key_parses_known_values_only() {
        assert_eq!("stars".parse::<SortKey>().unwrap(), SortKey::Stars);
        assert_eq!("recent".parse::<SortKey>().unwrap(), SortKey::Recent);
        for bad in ["name", "Stars", "", "recent "] {
            let err = bad.parse::<SortKey>().unwrap_err();
            assert!(err.to_string().contains("'stars' or 'recent'"));
        }
    }

    #[test]
    fn query_accessors() {
        let q = Query::semantic("optimize database queries");
        assert_eq!(q.text(), "optimize database queries");
        assert_eq!(q.mode(), SearchMode::Semantic);

        let q = Query::keyword("react", KeywordOptions::default());
        assert_eq!(q.mode().as_str(), "keyword");
    }
}
