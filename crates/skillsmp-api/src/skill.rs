//! Wire types for search responses and the typed results built from them.
//!
//! The service owns the schema, so every field is optional here and gets its
//! fallback at the accessor. Fields we don't render are ignored, and a field of
//! an unexpected type reads as absent instead of failing the whole response.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Query, SkillsmpResult, SortKey};

const UNKNOWN: &str = "unknown";

/// A marketplace listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub stars: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub skill_url: Option<String>,
}

impl Skill {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN)
    }

    /// `author/name`, the identifier shown in every output mode.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.author(), self.name())
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn stars(&self) -> u64 {
        self.stars.unwrap_or(0)
    }

    pub fn github_url(&self) -> &str {
        self.github_url.as_deref().unwrap_or_default()
    }

    pub fn skill_url(&self) -> &str {
        self.skill_url.as_deref().unwrap_or_default()
    }

    /// Last update time, if the service sent one we understand.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_ref().and_then(Timestamp::to_datetime)
    }

    /// Last update day in UTC.
    pub fn updated_date(&self) -> Option<NaiveDate> {
        self.updated().map(|dt| dt.date_naive())
    }
}

/// `updatedAt` as sent by the service: unix seconds, or a date string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Fractional(f64),
    Text(String),
}

impl Timestamp {
    /// Interpret the timestamp. Zero and unparseable values yield `None`.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Unix(secs) => from_unix(*secs),
            Timestamp::Fractional(secs) => from_unix(secs.trunc() as i64),
            Timestamp::Text(text) => {
                let text = text.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Some(dt.with_timezone(&Utc));
                }
                if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
                }
                text.parse::<i64>().ok().and_then(from_unix)
            }
        }
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

/// Keyword search paging as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: Option<u64>,
}

impl Pagination {
    pub fn total(&self) -> u64 {
        self.total.unwrap_or(0)
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages.unwrap_or(1)
    }
}

/// Body of `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordResponse {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub data: KeywordData,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub pagination: Pagination,
}

/// Body of `GET /ai-search`.
#[derive(Debug, Default, Deserialize)]
pub struct SemanticResponse {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub data: SemanticData,
}

#[derive(Debug, Default, Deserialize)]
pub struct SemanticData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub data: Vec<SemanticEntry>,
}

/// One vector-search match. Some matches come back without skill metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemanticEntry {
    /// `None` when the skill is missing, null, or an empty object
    #[serde(default, deserialize_with = "skill_metadata")]
    pub skill: Option<Skill>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
}

/// Read a field as `T`, or `None` if it has some other type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

/// A list of `T`. A non-list reads as empty; entries that don't fit are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A non-negative count sent as an integer, a float, or a numeric string.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count(&value))
}

fn count(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => match n.as_u64() {
            Some(whole) => return Some(whole),
            None => n.as_f64()?,
        },
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then(|| n.trunc() as u64)
}

fn skill_metadata<'de, D>(deserializer: D) -> Result<Option<Skill>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(fields) if !fields.is_empty() => {
            Ok(serde_json::from_value(Value::Object(fields)).ok())
        }
        _ => Ok(None),
    }
}

/// A skill together with its relevance score (AI mode only).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub skill: Skill,
    pub score: Option<f64>,
}

/// Typed view of a search response.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Keyword {
        hits: Vec<SearchHit>,
        pagination: Pagination,
    },
    Semantic {
        hits: Vec<SearchHit>,
        /// Matches the service returned without skill metadata
        without_metadata: usize,
    },
}

impl SearchResults {
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchResults::Keyword { hits, .. } | SearchResults::Semantic { hits, .. } => hits,
        }
    }

    /// True when the service matched nothing at all.
    ///
    /// AI matches that lack metadata still count as matches.
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResults::Keyword { hits, .. } => hits.is_empty(),
            SearchResults::Semantic {
                hits,
                without_metadata,
            } => hits.is_empty() && *without_metadata == 0,
        }
    }
}

impl KeywordResponse {
    /// Convert into results, stable-sorted by `sort`.
    pub fn into_results(self, sort: SortKey) -> SearchResults {
        let mut hits: Vec<SearchHit> = self
            .data
            .skills
            .into_iter()
            .map(|skill| SearchHit { skill, score: None })
            .collect();
        sort_hits(&mut hits, sort);
        SearchResults::Keyword {
            hits,
            pagination: self.data.pagination,
        }
    }
}

impl SemanticResponse {
    /// Convert into results, keeping the service's relevance order.
    pub fn into_results(self) -> SearchResults {
        let total = self.data.data.len();
        let hits: Vec<SearchHit> = self
            .data
            .data
            .into_iter()
            .filter_map(|entry| {
                entry.skill.map(|skill| SearchHit {
                    skill,
                    score: entry.score,
                })
            })
            .collect();
        SearchResults::Semantic {
            without_metadata: total - hits.len(),
            hits,
        }
    }
}

/// Stable sort, most stars or most recent first. Unknown dates sort last.
pub fn sort_hits(hits: &mut [SearchHit], sort: SortKey) {
    match sort {
        SortKey::Stars => hits.sort_by(|a, b| b.skill.stars().cmp(&a.skill.stars())),
        SortKey::Recent => hits.sort_by(|a, b| b.skill.updated().cmp(&a.skill.updated())),
    }
}

/// Everything one search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: Query,
    /// The response body exactly as parsed, for JSON passthrough
    pub raw: Value,
    pub results: SearchResults,
}

impl SearchOutcome {
    /// Build typed results from a response body fetched for `query`.
    ///
    /// Fails when the body cannot be read as a response object at all, such
    /// as a bare string or number. Odd field types inside it are tolerated.
    pub fn from_raw(query: Query, raw: Value) -> SkillsmpResult<Self> {
        let results = match &query {
            Query::Keyword { options, .. } => {
                KeywordResponse::deserialize(&raw)?.into_results(options.sort)
            }
            Query::Semantic { .. } => SemanticResponse::deserialize(&raw)?.into_results(),
        };
        Ok(Self {
            query,
            raw,
            results,
        })
    }
}
