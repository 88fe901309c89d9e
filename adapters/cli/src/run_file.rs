//! Loading and saving recorded runs.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use rampart_engine::RunRecord;

/// On-disk encodings accepted for run records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunFormat {
    Json,
    Toml,
}

impl RunFormat {
    /// Picks the encoding from the file extension; anything but `.toml` is JSON.
    pub(crate) fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Reads a run record from disk.
pub(crate) fn load(path: &Path) -> Result<RunRecord> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read run file {}", path.display()))?;
    parse(&contents, RunFormat::for_path(path))
        .with_context(|| format!("failed to parse run file {}", path.display()))
}

/// Writes a run record to disk in the encoding implied by its extension.
pub(crate) fn save(path: &Path, record: &RunRecord) -> Result<()> {
    let contents = encode(record, RunFormat::for_path(path))
        .with_context(|| format!("failed to encode run file {}", path.display()))?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write run file {}", path.display()))
}

fn encode(record: &RunRecord, format: RunFormat) -> Result<String> {
    let contents = match format {
        RunFormat::Json => serde_json::to_string_pretty(record)?,
        RunFormat::Toml => {
            // TOML integers are signed 64-bit.
            if i64::try_from(record.seed).is_err() {
                bail!(
                    "seed {} does not fit in a TOML integer; save the run as JSON instead",
                    record.seed
                );
            }
            toml::to_string(record)?
        }
    };
    Ok(contents)
}

fn parse(contents: &str, format: RunFormat) -> Result<RunRecord> {
    let record = match format {
        RunFormat::Json => serde_json::from_str(contents)?,
        RunFormat::Toml => toml::from_str(contents)?,
    };
    Ok(record)
}
