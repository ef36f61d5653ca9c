//! Command implementations

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::Format;
use chainfind::util::config::{global_config_path, load_config, project_config_path, Config};

pub mod completions;
pub mod discover;
pub mod env;
pub mod triplet;

/// Global config merged with the one in the working directory.
pub fn config() -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(load_config(
        global_config_path().as_deref(),
        &project_config_path(&cwd),
    ))
}

/// Render `value` in `format`; `summary` writes the human-readable form.
pub fn render<T, F>(value: &T, format: Format, summary: F) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let buf = match format {
        Format::Json => {
            let mut buf = serde_json::to_vec_pretty(value)?;
            buf.push(b'\n');
            buf
        }
        Format::Yaml => serde_yaml::to_string(value)?.into_bytes(),
        Format::Summary => {
            let mut buf = Vec::new();
            summary(&mut buf)?;
            buf
        }
    };
    Ok(buf)
}

/// Write to `output`, or to stdout when none is given.
pub fn emit(buf: &[u8], output: Option<&Path>) -> Result<()> {
    use std::io::Write;

    match output {
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(buf)?;
            stdout.flush()?;
        }
        Some(path) => {
            fs::write(path, buf)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote results to {}", path.display());
        }
    }
    Ok(())
}
