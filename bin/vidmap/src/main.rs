//! vidmap CLI
//!
//! Image and video sitemaps for a video-listing site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for vidmap.
#[derive(Parser)]
#[command(
    name = "vidmap",
    version,
    about = "Image and video sitemaps for video-listing sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the sitemap routes and the public directory
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Write both sitemaps to the output directory
    Build {
        /// Output directory (overrides build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate configuration and video data
    Check {
        /// Treat skipped videos as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    vidmap::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { port, base_url } => {
            vidmap::cmd::serve::run(&cli.config, port, base_url.as_deref()).await?;
        }
        Commands::Build { output, base_url } => {
            vidmap::cmd::build::run(&cli.config, output.as_deref(), base_url.as_deref()).await?;
        }
        Commands::Check { strict } => {
            vidmap::cmd::check::run(&cli.config, strict).await?;
        }
    }

    Ok(())
}
