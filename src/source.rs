use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use tracing::warn;

use crate::fixture::{LeagueData, parse_league_data_json};
use crate::pipeline::merge_league_data;
use crate::pool::with_pool;

/// Paths from a space-separated config value.
pub fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split_whitespace().map(PathBuf::from).collect()
}

pub fn read_fixture_file(path: &Path) -> Result<LeagueData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_league_data_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[derive(Debug, Default)]
pub struct SourceSummary {
    pub docs: Vec<LeagueData>,
    pub errors: Vec<String>,
}

impl SourceSummary {
    /// All readable documents folded together; fails only when none could be read.
    pub fn into_league_data(self) -> Result<LeagueData> {
        if self.docs.is_empty() {
            return Err(anyhow!("all data files are empty or contain invalid data"));
        }
        Ok(merge_league_data(self.docs))
    }
}

/// Reads every file in parallel. Unreadable files are logged and skipped.
pub fn read_fixture_files(paths: &[PathBuf], threads: usize) -> SourceSummary {
    let results: Vec<Result<LeagueData>> = with_pool(threads, || {
        paths
            .par_iter()
            .map(|path| read_fixture_file(path))
            .collect()
    });

    let mut summary = SourceSummary::default();
    for result in results {
        match result {
            Ok(doc) => summary.docs.push(doc),
            Err(err) => {
                warn!("{err:#}");
                summary.errors.push(format!("{err:#}"));
            }
        }
    }
    summary
}
