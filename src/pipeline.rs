use rayon::prelude::*;
use thiserror::Error;

use crate::analysis::{LeagueAnalysis, analyze};
use crate::error::InvalidFixtureError;
use crate::fixture::{Fixture, LeagueData, RawFixture, validate_fixtures};
use crate::standings::{HomeAwayStandings, Side};

/// Everything computed for one league in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueReport {
    pub league: String,
    pub standings: HomeAwayStandings,
    pub home_analysis: LeagueAnalysis,
    pub away_analysis: LeagueAnalysis,
    pub played: usize,
    pub unplayed: usize,
}

impl LeagueReport {
    pub fn from_fixtures(league: &str, fixtures: &[Fixture]) -> Result<Self, InvalidFixtureError> {
        let standings = HomeAwayStandings::from_fixtures(fixtures)?;
        let home_analysis = analyze(&standings.home);
        let away_analysis = analyze(&standings.away);
        Ok(Self {
            league: league.to_string(),
            standings,
            home_analysis,
            away_analysis,
            played: fixtures.len(),
            unplayed: 0,
        })
    }

    pub fn analysis(&self, side: Side) -> &LeagueAnalysis {
        match side {
            Side::Home => &self.home_analysis,
            Side::Away => &self.away_analysis,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("league {league}: {source}")]
pub struct LeagueError {
    pub league: String,
    #[source]
    pub source: InvalidFixtureError,
}

/// Validate, aggregate and analyze one league. One bad fixture fails the league.
pub fn process_league(league: &str, raw: &[RawFixture]) -> Result<LeagueReport, LeagueError> {
    let wrap = |source| LeagueError {
        league: league.to_string(),
        source,
    };
    let validated = validate_fixtures(raw).map_err(wrap)?;
    let mut report = LeagueReport::from_fixtures(league, &validated.fixtures).map_err(wrap)?;
    report.unplayed = validated.unplayed;
    Ok(report)
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<LeagueReport>,
    pub errors: Vec<LeagueError>,
}

/// Leagues run in parallel; a failed league never stops the others.
pub fn process_leagues(data: &LeagueData) -> RunSummary {
    let results: Vec<Result<LeagueReport, LeagueError>> = data
        .par_iter()
        .map(|(league, raw)| process_league(league, raw))
        .collect();

    let mut summary = RunSummary::default();
    for result in results {
        match result {
            Ok(report) => summary.reports.push(report),
            Err(err) => summary.errors.push(err),
        }
    }
    summary
}

/// Fold several input documents into one. Fixtures for a league seen twice are appended.
pub fn merge_league_data(docs: impl IntoIterator<Item = LeagueData>) -> LeagueData {
    let mut out = LeagueData::new();
    for doc in docs {
        for (league, fixtures) in doc {
            out.entry(league).or_default().extend(fixtures);
        }
    }
    out
}
