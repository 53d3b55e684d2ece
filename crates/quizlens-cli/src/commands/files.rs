//! The `quizlens files` command.

use std::path::PathBuf;

use anyhow::Result;

use quizlens_core::config::load_config_from;
use quizlens_core::parser::discover_spreadsheets;

pub fn execute(dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dir = dir.unwrap_or(config.data_dir);

    let files = discover_spreadsheets(&dir, &config.extensions)?;
    for file in &files {
        println!("{}", file.display());
    }
    eprintln!("{} spreadsheet(s) in {}", files.len(), dir.display());

    Ok(())
}
