use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::standings::{Standing, Standings};

/// League-wide goal totals for one side. Only lives for a single `analyze` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStats {
    pub total_gf: u64,
    pub total_ga: u64,
    pub counted_teams: usize,
}

impl LeagueStats {
    pub fn from_standings(standings: &Standings) -> Self {
        let mut out = Self::default();
        for s in standings.values() {
            out.total_gf += u64::from(s.gf);
            out.total_ga += u64::from(s.ga);
            out.counted_teams += 1;
        }
        out
    }
}

/// Strength of one team relative to its league, for one side.
///
/// `AS` and `DS` are inverse ratios (league total over the team's own total), so a lower
/// value means a stronger attack or defense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeAwayAnalysis {
    /// Goals scored per game played.
    #[serde(rename = "AHG")]
    pub ahg: f64,
    /// Goals conceded per game played.
    #[serde(rename = "AHCG")]
    pub ahcg: f64,
    #[serde(rename = "AS")]
    pub attack_strength: f64,
    #[serde(rename = "DS")]
    pub defense_strength: f64,
}

impl HomeAwayAnalysis {
    pub fn for_team(standing: &Standing, stats: LeagueStats) -> Self {
        let gp = f64::from(standing.gp);
        let gf = f64::from(standing.gf);
        let ga = f64::from(standing.ga);

        let played = standing.gp > 0;
        let ahg = if played && standing.gf > 0 { gf / gp } else { 0.0 };
        let ahcg = if played && standing.ga > 0 { ga / gp } else { 0.0 };
        let attack_strength = if stats.total_gf > 0 && standing.gf > 0 {
            stats.total_gf as f64 / gf
        } else {
            0.0
        };
        let defense_strength = if stats.total_ga > 0 && standing.ga > 0 {
            stats.total_ga as f64 / ga
        } else {
            0.0
        };

        Self {
            ahg,
            ahcg,
            attack_strength,
            defense_strength,
        }
    }
}

/// Team name -> analysis, for one league and one side.
pub type Analysis = BTreeMap<String, HomeAwayAnalysis>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueAnalysis {
    pub stats: LeagueStats,
    pub teams: Analysis,
}

/// Totals first, then one entry per team in `standings`.
pub fn analyze(standings: &Standings) -> LeagueAnalysis {
    let stats = LeagueStats::from_standings(standings);
    let teams = standings
        .iter()
        .map(|(team, standing)| (team.clone(), HomeAwayAnalysis::for_team(standing, stats)))
        .collect();
    LeagueAnalysis { stats, teams }
}
