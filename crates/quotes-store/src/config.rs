//! TOML configuration.
//!
//! ```toml
//! source = "quotes.json"        # path or http(s) URL
//! subcategory_policy = "strict" # or "union"
//! bind = "127.0.0.1:3000"
//! ```
//!
//! Every key is optional. Layering, lowest to highest: defaults, config file,
//! `QUOTES_SOURCE`, then whatever the caller applies on top (CLI flags).

use std::env;
use std::fs;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use quotes_core::SubcategoryPolicy;
use serde::Deserialize;

use crate::error::{Result, StoreError};
use crate::source::QuoteSource;

pub const CONFIG_ENV: &str = "QUOTES_CONFIG";
pub const SOURCE_ENV: &str = "QUOTES_SOURCE";
pub const DEFAULT_SOURCE: &str = "quotes.json";
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    source: Option<String>,
    subcategory_policy: SubcategoryPolicy,
    bind: Option<SocketAddr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: QuoteSource,
    pub subcategory_policy: SubcategoryPolicy,
    pub bind: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: QuoteSource::parse(DEFAULT_SOURCE),
            subcategory_policy: SubcategoryPolicy::default(),
            bind: DEFAULT_BIND,
        }
    }
}

impl Config {
    /// Parse TOML content. Relative file sources resolve against `base_dir`.
    pub fn from_toml(content: &str, base_dir: Option<&Path>) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Config::default();
        let source = match raw.source {
            Some(s) if s.trim().is_empty() => {
                return Err(StoreError::Config("source must not be empty".into()));
            }
            Some(s) => {
                let source = QuoteSource::parse(&s);
                match base_dir {
                    Some(base) => source.relative_to(base),
                    None => source,
                }
            }
            None => defaults.source,
        };
        Ok(Self {
            source,
            subcategory_policy: raw.subcategory_policy,
            bind: raw.bind.unwrap_or(defaults.bind),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path.parent())
    }

    /// Explicit path, else `QUOTES_CONFIG`, else defaults; then `QUOTES_SOURCE`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
        let mut config = match path {
            Some(path) => {
                let config = Self::from_file(&path)?;
                tracing::debug!("loaded config from {}", path.display());
                config
            }
            None => Self::default(),
        };
        if let Ok(source) = env::var(SOURCE_ENV)
            && !source.trim().is_empty()
        {
            config.source = QuoteSource::parse(&source);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("", None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.source, QuoteSource::parse(DEFAULT_SOURCE));
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(DEFAULT_BIND.to_string(), "127.0.0.1:3000");
        assert_eq!(config.subcategory_policy, SubcategoryPolicy::Strict);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            source = "https://example.com/quotes.json"
            subcategory_policy = "union"
            bind = "0.0.0.0:8080"
            "#,
            None,
        )
        .unwrap();
        assert_eq!(
            config.source,
            QuoteSource::Url("https://example.com/quotes.json".into())
        );
        assert_eq!(config.subcategory_policy, SubcategoryPolicy::Union);
        assert_eq!(config.bind.port(), 8080);
    }

    #[test]
    fn test_relative_source_resolves_against_config_dir() {
        let config = Config::from_toml(r#"source = "data/q.json""#, Some(Path::new("/opt/app"))).unwrap();
        assert_eq!(config.source, QuoteSource::File(PathBuf::from("/opt/app/data/q.json")));
    }

    #[test]
    fn test_partial_config_keeps_default_bind() {
        let config = Config::from_toml(r#"subcategory_policy = "union""#, None).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.bind, Config::default().bind);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_toml("colour = \"green\"", None).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_bad_policy_rejected() {
        assert!(Config::from_toml(r#"subcategory_policy = "everything""#, None).is_err());
    }

    #[test]
    fn test_empty_source_rejected() {
        assert!(Config::from_toml(r#"source = "  ""#, None).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("quotes.toml");
        fs::write(&path, "source = \"quotes.json\"\nsubcategory_policy = \"union\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.source, QuoteSource::File(dir.path().join("quotes.json")));
        assert_eq!(config.subcategory_policy, SubcategoryPolicy::Union);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file(Path::new("/no/such/quotes.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
