//! Command-line configuration for the binary.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for the log file.
const DATA_DIR_NAME: &str = ".recipe-box";
/// Log file name inside the data directory.
const LOG_FILE_NAME: &str = "recipe-box.log";

#[derive(Debug, Parser)]
#[command(name = "recipe-box", version, about = "Browse, search and favorite recipes in the terminal")]
pub struct Args {
    /// Where to write the log. Defaults to ~/.recipe-box/recipe-box.log
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RECIPE_BOX_LOG is not set (e.g. "debug" or
    /// "recipe_box=trace")
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Seed for the recommendation picker, for reproducible sessions
    #[arg(long, env = "RECIPE_BOX_SEED")]
    pub seed: Option<u64>,

    /// Start with an empty collection instead of the sample recipes
    #[arg(long)]
    pub empty: bool,
}

impl Args {
    /// Resolve the log path, falling back to the home directory default.
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

fn default_log_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}
