use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use tracing::{error, info, warn};

use league_strength::analysis::analyze;
use league_strength::config::{self, Config};
use league_strength::persist::{self, OutputKind};
use league_strength::pool::with_pool;

/// Recompute the analysis tables from standings persisted by an earlier run.
fn main() -> Result<()> {
    config::load_dotenv();
    let cfg = Config::from_env()?;
    let _guard = league_strength::logging::init(&cfg.log_file)?;

    let data_dir = config::data_dir_arg(std::env::args().skip(1))
        .unwrap_or_else(|| cfg.data_dir.clone());

    let files = match cfg.standing_files() {
        Ok(files) => files,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };

    let results: Vec<(PathBuf, Result<PathBuf>)> = with_pool(cfg.parallelism, || {
        files
            .par_iter()
            .map(|path| (path.clone(), analyze_file(&data_dir, path)))
            .collect()
    });

    let mut written = 0usize;
    for (source, result) in results {
        match result {
            Ok(out) => {
                written += 1;
                info!("{} -> {}", source.display(), out.display());
            }
            Err(err) => warn!("error reading or processing standings: {err:#}"),
        }
    }

    info!("analysis complete: {}/{} standing files", written, files.len());
    Ok(())
}

fn analyze_file(data_dir: &Path, path: &Path) -> Result<PathBuf> {
    let (league, side) = persist::league_from_standing_path(path)
        .ok_or_else(|| anyhow!("no league identifier in {}", path.display()))?;
    let standings = persist::read_standings(path)?;
    if standings.is_empty() {
        warn!("no standings data found for {} {} fixtures", league, side.label());
    }
    let result = analyze(&standings);
    let out = persist::output_path(data_dir, &league, OutputKind::analysis(side));
    persist::write_pairs(&out, &result.teams)
        .with_context(|| format!("error writing {} analysis for {league}", side.label()))?;
    Ok(out)
}
