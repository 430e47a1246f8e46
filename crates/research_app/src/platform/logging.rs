//! Platform logging initialization for research_app.
//!
//! The terminal belongs to the UI, so log output only goes to a file.

use std::fs::{self, File};
use std::path::Path;

use log::LevelFilter;
use simplelog::{CombinedLogger, Config, ConfigBuilder, SharedLogger, WriteLogger};

/// Starts file logging at `path`. A file that cannot be created only costs
/// the log, never the session.
pub fn initialize(path: &Path) {
    let level = LevelFilter::Info;
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if let Some(file_logger) = create_file_logger(path, level, build_config()) {
        loggers.push(file_logger);
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory {:?}: {}", parent, err);
            return None;
        }
    }
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
