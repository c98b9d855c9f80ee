use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InvalidFixtureError;
use crate::fixture::Fixture;
use crate::outcome::{Outcome, classify};

/// Running won/drawn/lost aggregate for one team in one league and side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    #[serde(rename = "GP")]
    pub gp: u32,
    #[serde(rename = "W")]
    pub w: u32,
    #[serde(rename = "D")]
    pub d: u32,
    #[serde(rename = "L")]
    pub l: u32,
    #[serde(rename = "GF")]
    pub gf: u32,
    #[serde(rename = "GA")]
    pub ga: u32,
    #[serde(rename = "GD")]
    pub gd: i64,
    #[serde(rename = "Pts")]
    pub pts: u32,
}

impl Standing {
    fn first(team_score: u32, opponent_score: u32, outcome: Outcome) -> Self {
        Self {
            gp: 1,
            w: u32::from(outcome == Outcome::Win),
            d: u32::from(outcome == Outcome::Draw),
            l: u32::from(outcome == Outcome::Loss),
            gf: team_score,
            ga: opponent_score,
            gd: goal_diff(team_score, opponent_score),
            pts: outcome.points(),
        }
    }

    /// The standing after one more match, or `None` if a counter would overflow.
    fn recorded(&self, team_score: u32, opponent_score: u32, outcome: Outcome) -> Option<Self> {
        let mut next = *self;
        next.gp = next.gp.checked_add(1)?;
        next.gf = next.gf.checked_add(team_score)?;
        next.ga = next.ga.checked_add(opponent_score)?;
        next.gd = next.gd.checked_add(goal_diff(team_score, opponent_score))?;
        match outcome {
            Outcome::Win => next.w = next.w.checked_add(1)?,
            Outcome::Draw => next.d = next.d.checked_add(1)?,
            Outcome::Loss => next.l = next.l.checked_add(1)?,
        }
        next.pts = next.pts.checked_add(outcome.points())?;
        Some(next)
    }

    /// Field-wise sum, used to fold the home and away tables together.
    pub fn merged(&self, other: &Standing) -> Option<Self> {
        Some(Self {
            gp: self.gp.checked_add(other.gp)?,
            w: self.w.checked_add(other.w)?,
            d: self.d.checked_add(other.d)?,
            l: self.l.checked_add(other.l)?,
            gf: self.gf.checked_add(other.gf)?,
            ga: self.ga.checked_add(other.ga)?,
            gd: self.gd.checked_add(other.gd)?,
            pts: self.pts.checked_add(other.pts)?,
        })
    }

    pub fn is_consistent(&self) -> bool {
        let (gp, w, d, l) = (
            u64::from(self.gp),
            u64::from(self.w),
            u64::from(self.d),
            u64::from(self.l),
        );
        gp == w + d + l
            && u64::from(self.pts) == 3 * w + d
            && self.gd == goal_diff(self.gf, self.ga)
    }
}

fn goal_diff(scored: u32, conceded: u32) -> i64 {
    i64::from(scored) - i64::from(conceded)
}

/// Team name -> standing, for one league and one side.
pub type Standings = BTreeMap<String, Standing>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// Record one match for `team`. The table is left untouched on error.
pub fn update(
    standings: &mut Standings,
    team: &str,
    team_score: u32,
    opponent_score: u32,
) -> Result<(), InvalidFixtureError> {
    if team.trim().is_empty() {
        return Err(InvalidFixtureError::EmptyTeam);
    }
    let outcome = classify(team_score, opponent_score);
    match standings.get_mut(team) {
        Some(existing) => {
            let next = existing
                .recorded(team_score, opponent_score, outcome)
                .ok_or_else(|| InvalidFixtureError::Overflow {
                    team: team.to_string(),
                })?;
            *existing = next;
        }
        None => {
            standings.insert(
                team.to_string(),
                Standing::first(team_score, opponent_score, outcome),
            );
        }
    }
    Ok(())
}

/// Split home/away tables for one league.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeAwayStandings {
    pub home: Standings,
    pub away: Standings,
}

impl HomeAwayStandings {
    pub fn from_fixtures(fixtures: &[Fixture]) -> Result<Self, InvalidFixtureError> {
        let mut out = Self::default();
        out.record_all(fixtures)?;
        Ok(out)
    }

    pub fn record(&mut self, fixture: &Fixture) -> Result<(), InvalidFixtureError> {
        if fixture.home_team.trim().is_empty() || fixture.away_team.trim().is_empty() {
            return Err(InvalidFixtureError::EmptyTeam);
        }
        let home_before = self.home.get(&fixture.home_team).copied();
        update(
            &mut self.home,
            &fixture.home_team,
            fixture.home_score,
            fixture.away_score,
        )?;
        let away = update(
            &mut self.away,
            &fixture.away_team,
            fixture.away_score,
            fixture.home_score,
        );
        if away.is_err() {
            // keep the fixture all-or-nothing across both tables
            match home_before {
                Some(prev) => {
                    self.home.insert(fixture.home_team.clone(), prev);
                }
                None => {
                    self.home.remove(&fixture.home_team);
                }
            }
        }
        away
    }

    pub fn record_all(&mut self, fixtures: &[Fixture]) -> Result<(), InvalidFixtureError> {
        for (idx, fixture) in fixtures.iter().enumerate() {
            self.record(fixture)
                .map_err(|err| InvalidFixtureError::at(idx, err))?;
        }
        Ok(())
    }

    pub fn side(&self, side: Side) -> &Standings {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Overall table regardless of side.
    pub fn combined(&self) -> Result<Standings, InvalidFixtureError> {
        let mut out = self.home.clone();
        for (team, away) in &self.away {
            match out.get_mut(team) {
                Some(existing) => {
                    *existing = existing.merged(away).ok_or_else(|| {
                        InvalidFixtureError::Overflow { team: team.clone() }
                    })?;
                }
                None => {
                    out.insert(team.clone(), *away);
                }
            }
        }
        Ok(out)
    }
}

/// League table order: points, goal difference, goals scored, then name.
pub fn ranked(standings: &Standings) -> Vec<(&str, &Standing)> {
    let mut rows: Vec<(&str, &Standing)> = standings
        .iter()
        .map(|(team, standing)| (team.as_str(), standing))
        .collect();
    rows.sort_by(|(a_team, a), (b_team, b)| {
        b.pts
            .cmp(&a.pts)
            .then(b.gd.cmp(&a.gd))
            .then(b.gf.cmp(&a.gf))
            .then(a_team.cmp(b_team))
    });
    rows
}
