//! Configuration loading and validation.
//!
//! Configuration is layered with [figment], later sources overriding earlier
//! ones:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. `config.toml` in the user's configuration directory, if present.
//! 3. An explicit file passed by the caller (TOML, YAML or JSON, chosen by
//!    extension). Unlike the user file, it must exist.
//! 4. Environment variables prefixed `FOLIO_`, with `__` separating nested
//!    keys (e.g. `FOLIO_CACHE__SAMPLE_LIMIT=20`).
//!
//! ```toml
//! [feed]
//! base_path = "/opds"
//! default_limit = 28
//!
//! [cache]
//! sample_limit = 15
//! sample_policy = "write_back"
//! refresh_interval_secs = 86400
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hard upper bound on page sizes, regardless of configuration.
pub const MAX_PAGE_SIZE: u32 = 100;
const ENV_PREFIX: &str = "FOLIO_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub cache: CacheConfig,
}

/// Feed composition settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Path prefix every generated link starts with.
    pub base_path: String,
    /// Title of the root catalog feed.
    pub title: String,
    /// Title of search result feeds.
    pub search_title: String,
    /// Page size used when the request has none (or an unparsable one).
    pub default_limit: u32,
    /// Number of subjects in the "Top Subjects in Results" facet.
    pub top_subjects_limit: usize,
    /// Number of matching documents scanned for the top subjects facet.
    pub top_subjects_max_docs: usize,
    /// Number of subjects listed on the subject navigation feed.
    pub subjects_nav_limit: usize,
}
impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_path: "/opds".to_string(),
            title: "Project Gutenberg Catalog".to_string(),
            search_title: "Gutenberg Search Results".to_string(),
            default_limit: 28,
            top_subjects_limit: 15,
            top_subjects_max_docs: 500,
            subjects_nav_limit: 100,
        }
    }
}

/// What to do with a bookshelf sample fetched live because it was missing
/// from the navigation cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePolicy {
    /// Use it for the current request only.
    #[default]
    RequestScoped,
    /// Publish it into the navigation cache for later requests.
    WriteBack,
}

/// Navigation cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Publications per bookshelf sample.
    pub sample_limit: u32,
    pub sample_policy: SamplePolicy,
    /// Bookshelf samples fetched concurrently while warming.
    pub warm_concurrency: usize,
    /// Period of the background rebuild; unset means rebuilds only happen
    /// when explicitly requested.
    pub refresh_interval_secs: Option<u64>,
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sample_limit: 15,
            sample_policy: SamplePolicy::RequestScoped,
            warm_concurrency: 4,
            refresh_interval_secs: None,
        }
    }
}
impl CacheConfig {
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }
}

impl Config {
    /// Location of the per-user configuration file, if the platform has a
    /// configuration directory.
    pub fn user_file() -> Option<PathBuf> {
        ProjectDirs::from("org", "folio", "folio").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Builds the layered [`Figment`] without extracting it.
    ///
    /// Exposed so callers (and tests) can merge additional providers before
    /// extraction.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user) = Self::user_file() {
            // Missing files are silently skipped by figment.
            figment = figment.merge(Toml::file(user));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Loads and validates the configuration from every layer.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(explicit)?.extract().or_raise(|| ErrorKind::Load)?;
        tracing::debug!(?config, "Configuration loaded");
        config.validate()
    }

    /// Rejects values the rest of the workspace cannot work with.
    pub fn validate(self) -> Result<Self> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.feed.default_limit) {
            exn::bail!(ErrorKind::Invalid(format!(
                "feed.default_limit must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.feed.default_limit
            )));
        }
        if self.cache.sample_limit == 0 {
            exn::bail!(ErrorKind::Invalid("cache.sample_limit must be at least 1".to_string()));
        }
        if self.cache.warm_concurrency == 0 {
            exn::bail!(ErrorKind::Invalid("cache.warm_concurrency must be at least 1".to_string()));
        }
        Ok(self)
    }
}
