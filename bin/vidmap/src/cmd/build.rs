//! Build command - writes both sitemaps for static hosting

use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use vidmap_generator::{SitemapBuilder, SitemapVariant};

use super::load_config;
use crate::source::{JsonFileSource, VideoSource};

/// Run the build command.
///
/// Writes `image-sitemap.xml` and `video-sitemap.xml` into the output
/// directory.
pub async fn run(config_path: &Path, output: Option<&Path>, base_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?base_url, "Starting build");

    let mut config = load_config(config_path, base_url)?;
    if let Some(output) = output {
        config.build.output_dir = output.to_string_lossy().to_string();
    }

    let builder = SitemapBuilder::from_config(&config)
        .wrap_err("Site URL is required to build sitemaps")?;
    let videos = JsonFileSource::new(&config.source.path)
        .fetch_all()
        .await
        .wrap_err("Failed to load videos")?;

    let output_dir = Path::new(&config.build.output_dir);
    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create {}", output_dir.display()))?;

    println!();
    for variant in SitemapVariant::ALL {
        let path = output_dir.join(variant.file_name());
        let file = fs::File::create(&path)
            .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        let skipped = builder
            .write_to(variant, &videos, &mut writer)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        writer
            .flush()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

        println!(
            "  {:<18} {:>5} videos, {:>3} skipped",
            variant.file_name(),
            videos.len() - skipped,
            skipped
        );
    }

    let duration = start.elapsed();
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_dir.display());
    println!();

    tracing::info!(?duration, "Build completed successfully");
    Ok(())
}
