//! API key resolution.
//!
//! The key comes from `SKILLSMP_API_KEY` in the process environment, or failing
//! that from a `SKILLSMP_API_KEY=...` line in `~/.env`. The dotfile is only read,
//! never sourced: other entries in it are ignored and nothing is exported.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{SkillsmpError, SkillsmpResult};

/// Environment variable (and dotfile key) holding the API key.
pub const API_KEY_VAR: &str = "SKILLSMP_API_KEY";

/// File name of the fallback dotfile inside the home directory.
pub const DOTFILE_NAME: &str = ".env";

/// An opaque API key. Held in memory only; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key string. Returns `None` for an empty key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Resolve the key from the environment, then `~/.env`.
    pub fn load() -> SkillsmpResult<Self> {
        let from_env = std::env::var(API_KEY_VAR).ok();
        Self::resolve(from_env, default_dotfile().as_deref())
    }

    /// Resolve from an explicit environment value and dotfile path.
    ///
    /// An empty environment value counts as unset.
    pub fn resolve(env_value: Option<String>, dotfile: Option<&Path>) -> SkillsmpResult<Self> {
        if let Some(key) = env_value.and_then(Self::new) {
            tracing::debug!("using API key from {}", API_KEY_VAR);
            return Ok(key);
        }

        if let Some(path) = dotfile {
            match fs::read_to_string(path) {
                Ok(contents) => {
                    if let Some(key) = dotfile_value(&contents, API_KEY_VAR).and_then(Self::new) {
                        tracing::debug!("using API key from {}", path.display());
                        return Ok(key);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("could not read {}: {}", path.display(), e);
                }
            }
        }

        Err(SkillsmpError::MissingCredential)
    }

    /// The raw key, for building the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// `~/.env`, if a home directory can be determined.
fn default_dotfile() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DOTFILE_NAME))
}

/// Look up `key` in dotenv-style `contents`.
///
/// Accepts `KEY=value`, `export KEY=value`, and quoted values. Blank lines and
/// `#` comments are skipped. The first matching line wins.
pub fn dotfile_value(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (name, value) = line.split_once('=')?;
        if name.trim() != key {
            return None;
        }
        Some(unquote(value.trim()).to_string())
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
