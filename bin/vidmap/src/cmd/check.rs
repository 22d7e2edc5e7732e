//! Check command - validate configuration and video data

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use vidmap_core::{Config, CoreError};
use vidmap_generator::{SitemapBuilder, SitemapVariant};

use crate::source::{JsonFileSource, VideoSource};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and reports which videos each sitemap would
/// leave out. In strict mode any skipped video fails the check.
pub async fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and video data");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking video data...");
        check_videos(cfg, &mut result).await;
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Build both sitemaps in memory and record what they skip.
async fn check_videos(config: &Config, result: &mut ValidationResult) {
    let builder = match SitemapBuilder::from_config(config) {
        Ok(builder) => builder,
        Err(CoreError::MissingSiteUrl) => {
            result.add_error("site.base_url is not set; sitemap routes will answer 500");
            return;
        }
        Err(e) => {
            result.add_error(format!("Invalid site URL: {e}"));
            return;
        }
    };

    let videos = match JsonFileSource::new(&config.source.path).fetch_all().await {
        Ok(videos) => videos,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    println!("  ✓ Loaded {} videos", videos.len());

    for variant in SitemapVariant::ALL {
        let mut skipped = 0;
        for (index, video) in videos.iter().enumerate() {
            if let Err(reason) = builder.entry(variant, video) {
                skipped += 1;
                result.add_warning(format!(
                    "{}: video #{index} (id {}) skipped: {reason}",
                    variant.file_name(),
                    video.id().unwrap_or("none"),
                ));
            }
        }

        if skipped == 0 {
            println!("  ✓ {} includes every video", variant.file_name());
        } else {
            println!("  ⚠ {} skips {skipped} video(s)", variant.file_name());
        }
    }
}
