use anyhow::{Result, anyhow};
use tracing::{error, info, warn};

use league_strength::config::{self, Config};
use league_strength::fetch;
use league_strength::persist;

fn main() -> Result<()> {
    config::load_dotenv();
    let cfg = Config::from_env()?;
    let _guard = league_strength::logging::init(&cfg.log_file)?;

    let data_dir = config::data_dir_arg(std::env::args().skip(1))
        .unwrap_or_else(|| cfg.data_dir.clone());

    let urls = match cfg.fixture_urls() {
        Ok(urls) => urls,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };

    let summary = fetch::fetch_all(&urls, cfg.parallelism);

    let mut saved = 0usize;
    for league in &summary.leagues {
        match persist::write_league_fixtures(&data_dir, &league.league, &league.entries) {
            Ok(path) => {
                saved += 1;
                info!(
                    "saved {} fixtures ({} unplayed) to {}",
                    league.entries.len(),
                    league.unplayed,
                    path.display()
                );
            }
            Err(err) => warn!("failed to save {}: {err:#}", league.league),
        }
    }

    info!(
        "fetch complete: {}/{} leagues saved, {} fetches failed",
        saved,
        urls.len(),
        summary.errors.len()
    );
    if saved == 0 {
        return Err(anyhow!("no fixture feed could be fetched"));
    }
    Ok(())
}
