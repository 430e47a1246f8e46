mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Terminal client for the research agent backend.
#[derive(Debug, Parser)]
#[command(name = "research_app", version, about)]
struct Cli {
    /// Backend base URL, e.g. http://127.0.0.1:5000/
    #[arg(long)]
    base_url: Option<String>,
    /// RON config file; defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory downloaded reports are saved into.
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// Log file path.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = platform::config::Overrides {
        base_url: cli.base_url,
        download_dir: cli.download_dir,
        log_file: cli.log_file,
    };
    let settings = platform::config::load(cli.config.as_deref(), overrides)?;
    platform::logging::initialize(&settings.log_file);
    platform::run_app(settings)
}
