//! # skillsmp-api
//!
//! Client library for the SkillsMP agent-skill marketplace search API.
//!
//! This crate provides:
//! - The API key loader (`SKILLSMP_API_KEY`, falling back to `~/.env`)
//! - Validated keyword and semantic queries
//! - Response types with lenient defaults for missing fields
//! - An async HTTP client that runs one search per call
//!
//! ## Example
//!
//! ```rust,no_run
//! use skillsmp_api::{Credential, KeywordOptions, Query, SkillsmpClient};
//!
//! # async fn demo() -> skillsmp_api::SkillsmpResult<()> {
//! let client = SkillsmpClient::new(Credential::load()?)?;
//! let outcome = client
//!     .search(&Query::keyword("terraform", KeywordOptions::default()))
//!     .await?;
//!
//! for hit in outcome.results.hits() {
//!     println!("{} ({} stars)", hit.skill.full_name(), hit.skill.stars());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod credential;
mod error;
mod query;
mod skill;

pub use client::*;
pub use credential::*;
pub use error::*;
pub use query::*;
pub use skill::*;

/// Crate version, reported by `skillsmp --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
