use anyhow::Result;
use rayon::prelude::*;
use tracing::{error, info, warn};

use league_strength::config::{self, Config};
use league_strength::persist::{self, PersistOutcome};
use league_strength::pipeline;
use league_strength::pool::with_pool;
use league_strength::source;

fn main() -> Result<()> {
    config::load_dotenv();
    let cfg = Config::from_env()?;
    let _guard = league_strength::logging::init(&cfg.log_file)?;

    let data_dir = config::data_dir_arg(std::env::args().skip(1))
        .unwrap_or_else(|| cfg.data_dir.clone());

    let paths = match cfg.fixture_files() {
        Ok(paths) => paths,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };

    let sources = source::read_fixture_files(&paths, cfg.parallelism);
    let unreadable = sources.errors.len();
    let data = match sources.into_league_data() {
        Ok(data) => data,
        Err(err) => {
            error!("{err:#}");
            return Err(err);
        }
    };

    let summary = with_pool(cfg.parallelism, || pipeline::process_leagues(&data));
    for err in &summary.errors {
        warn!("{err}; league skipped");
    }

    let outcomes: Vec<PersistOutcome> = with_pool(cfg.parallelism, || {
        summary
            .reports
            .par_iter()
            .map(|report| persist::persist_report(&data_dir, report))
            .collect()
    });

    let mut write_failures = 0usize;
    for (report, outcome) in summary.reports.iter().zip(&outcomes) {
        write_failures += outcome.errors.len();
        info!(
            "{}: {} played, {} unplayed, {} home teams, {} away teams, {} files written",
            report.league,
            report.played,
            report.unplayed,
            report.standings.home.len(),
            report.standings.away.len(),
            outcome.written.len()
        );
    }

    info!(
        "run complete: {} leagues ok, {} failed, {} files unreadable, {} writes failed",
        summary.reports.len(),
        summary.errors.len(),
        unreadable,
        write_failures
    );
    Ok(())
}
