//! Batch job list (`jobs.json`) parsing.
//!
//! The job list replaces a hardcoded genre -> file mapping with explicit
//! configuration: a JSON array of labeled audio files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// One analysis job: a labeled audio file.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Category label shown in the plot title (e.g. a genre).
    pub genre: String,
    /// Path to an uncompressed WAV file.
    pub path: PathBuf,
}

impl Job {
    /// File-system friendly form of the genre label, used to name outputs.
    #[must_use]
    pub fn slug(&self) -> String {
        self.genre
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect()
    }
}

/// Load a job list from a JSON file:
/// `[{"genre": "Classical", "path": "content/a.wav"}, ...]`.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>> {
    let bytes = std::fs::read(path).with_context(|| format!("read job list {path:?}"))?;
    let jobs: Vec<Job> =
        serde_json::from_slice(&bytes).with_context(|| format!("parse job list {path:?}"))?;
    Ok(jobs)
}
