use std::fs::{self, File};
use std::path::Path;

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app_dirs::AppDirs;

/// Log to a file so nothing is written over the terminal UI.
///
/// Failing to open the log is not fatal; the game simply runs unlogged.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if init_file_logger(&path, level).is_ok() {
        log::info!("fretquiz starting (log level: {:?})", level);
    }
}

fn init_file_logger(path: &Path, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
