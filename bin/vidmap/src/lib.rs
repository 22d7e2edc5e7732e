//! vidmap CLI Library
//!
//! Serves and builds the image and video sitemaps of a video-listing site.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, build, check)
//! - [`server`] - axum router with the sitemap routes
//! - [`source`] - Video catalog sources

pub mod cmd;
pub mod server;
pub mod source;

pub use vidmap_core::{Config, VideoRecord};
pub use vidmap_generator::{SitemapBuilder, SitemapVariant};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
