//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// Main configuration structure for vidmap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Video data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Static build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    ///
    /// When unset, the sitemap routes answer with a server error.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Hostname shown in the logo caption. Derived from `base_url` when unset.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Path segment under which video detail pages live.
    #[serde(default = "default_video_path")]
    pub video_path: String,

    /// Site-relative path of the logo image.
    #[serde(default = "default_logo")]
    pub logo: String,
}

/// Where video records are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path of the JSON file holding the video catalog.
    #[serde(default = "default_source_path")]
    pub path: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of pre-rendered pages and assets served as the fallback.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

/// Static build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated sitemaps.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

// Default value functions
fn default_title() -> String {
    "Video Site".to_string()
}

fn default_video_path() -> String {
    "video".to_string()
}

fn default_logo() -> String {
    "logo.png".to_string()
}

fn default_source_path() -> String {
    "data/videos.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            base_url: None,
            hostname: None,
            video_path: default_video_path(),
            logo: default_logo(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `VIDMAP__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("VIDMAP").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.source.path.trim().is_empty() {
            return Err(CoreError::config("source.path cannot be empty"));
        }

        if self.site.video_path.chars().any(char::is_whitespace) {
            return Err(CoreError::config(
                "site.video_path cannot contain whitespace",
            ));
        }

        match self.site_url() {
            Ok(_) => {}
            Err(CoreError::MissingSiteUrl) => {
                tracing::warn!("site.base_url is not set, sitemap routes will fail");
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    /// Resolve the configured base URL into a [`SiteUrl`].
    pub fn site_url(&self) -> Result<SiteUrl> {
        let base_url = self
            .site
            .base_url
            .as_deref()
            .ok_or(CoreError::MissingSiteUrl)?;
        let site = SiteUrl::parse(base_url)?;

        Ok(match self.site.hostname.as_deref().map(str::trim) {
            Some(hostname) if !hostname.is_empty() => site.with_hostname(hostname),
            _ => site,
        })
    }
}

/// Normalized site base URL together with its hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl {
    base: String,
    hostname: String,
}

impl SiteUrl {
    /// Parse a base URL, stripping a single trailing slash.
    pub fn parse(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(CoreError::MissingSiteUrl);
        }

        let parsed = Url::parse(trimmed).map_err(|e| {
            CoreError::config_with_source(format!("Invalid site base URL: {trimmed}"), e)
        })?;
        let hostname = parsed
            .host_str()
            .ok_or_else(|| CoreError::config(format!("Site base URL has no host: {trimmed}")))?
            .to_string();

        let base = trimmed.strip_suffix('/').unwrap_or(trimmed).to_string();
        Ok(Self { base, hostname })
    }

    /// Replace the hostname derived from the URL.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Base URL without its trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Hostname of the site.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Get the full URL for a site-relative path.
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }

    /// Resolve a media URL: absolute `http(s)` URLs pass through, anything
    /// else is treated as site-relative.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.join(url)
        }
    }
}
