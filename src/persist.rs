use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::pipeline::LeagueReport;
use crate::standings::{Side, Standing, Standings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    HomeStanding,
    AwayStanding,
    HomeAnalysis,
    AwayAnalysis,
}

impl OutputKind {
    pub const ALL: [OutputKind; 4] = [
        OutputKind::HomeStanding,
        OutputKind::AwayStanding,
        OutputKind::HomeAnalysis,
        OutputKind::AwayAnalysis,
    ];

    pub fn standing(side: Side) -> Self {
        match side {
            Side::Home => OutputKind::HomeStanding,
            Side::Away => OutputKind::AwayStanding,
        }
    }

    pub fn analysis(side: Side) -> Self {
        match side {
            Side::Home => OutputKind::HomeAnalysis,
            Side::Away => OutputKind::AwayAnalysis,
        }
    }

    pub fn stem(self) -> &'static str {
        match self {
            OutputKind::HomeStanding => "homeStanding",
            OutputKind::AwayStanding => "awayStanding",
            OutputKind::HomeAnalysis => "homeAnalysis",
            OutputKind::AwayAnalysis => "awayAnalysis",
        }
    }
}

/// `{data_dir}/{league}-{kind}.json`
pub fn output_path(data_dir: &Path, league: &str, kind: OutputKind) -> PathBuf {
    data_dir.join(format!("{league}-{}.json", kind.stem()))
}

/// `{data_dir}/{league}.json`, the fetcher's output and the aggregator's input.
pub fn fixtures_path(data_dir: &Path, league: &str) -> PathBuf {
    data_dir.join(format!("{league}.json"))
}

/// Recovers the league and side from a `{league}-homeStanding.json` style path.
pub fn league_from_standing_path(path: &Path) -> Option<(String, Side)> {
    let stem = path.file_stem()?.to_str()?;
    for side in [Side::Home, Side::Away] {
        let suffix = format!("-{}", OutputKind::standing(side).stem());
        if let Some(league) = stem.strip_suffix(&suffix) {
            if !league.is_empty() {
                return Some((league.to_string(), side));
            }
        }
    }
    None
}

/// Serialized as an array of `[key, value]` pairs.
pub fn write_pairs<V: Serialize>(path: &Path, map: &BTreeMap<String, V>) -> Result<()> {
    let pairs: Vec<(&String, &V)> = map.iter().collect();
    write_json_atomic(path, &pairs)
}

pub fn read_pairs<V: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, V>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let pairs: Vec<(String, V)> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(pairs.into_iter().collect())
}

/// Standings written by an earlier run. A team with no games or broken counters fails the file.
pub fn read_standings(path: &Path) -> Result<Standings> {
    let standings = read_pairs::<Standing>(path)?;
    if let Some((team, bad)) = standings
        .iter()
        .find(|(_, s)| s.gp == 0 || !s.is_consistent())
    {
        return Err(anyhow!(
            "inconsistent standing for {team} in {}: {bad:?}",
            path.display()
        ));
    }
    Ok(standings)
}

/// Writes `{ "<league>": [...] }`, the shape `parse_league_data_json` reads back.
pub fn write_league_fixtures<F: Serialize>(
    data_dir: &Path,
    league: &str,
    fixtures: &[F],
) -> Result<PathBuf> {
    let path = fixtures_path(data_dir, league);
    let doc: BTreeMap<&str, &[F]> = BTreeMap::from([(league, fixtures)]);
    write_json_atomic(&path, &doc)?;
    Ok(path)
}

#[derive(Debug, Default)]
pub struct PersistOutcome {
    pub written: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Writes the four per-league files. A failed file doesn't stop the others.
pub fn persist_report(data_dir: &Path, report: &LeagueReport) -> PersistOutcome {
    let mut out = PersistOutcome::default();
    for kind in OutputKind::ALL {
        let path = output_path(data_dir, &report.league, kind);
        let result = match kind {
            OutputKind::HomeStanding => write_pairs(&path, &report.standings.home),
            OutputKind::AwayStanding => write_pairs(&path, &report.standings.away),
            OutputKind::HomeAnalysis => write_pairs(&path, &report.home_analysis.teams),
            OutputKind::AwayAnalysis => write_pairs(&path, &report.away_analysis.teams),
        };
        match result {
            Ok(()) => out.written.push(path),
            Err(err) => {
                warn!("failed to write {}: {err:#}", path.display());
                out.errors.push(format!("{}: {err:#}", path.display()));
            }
        }
    }
    out
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string(value).context("serialize output")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}
