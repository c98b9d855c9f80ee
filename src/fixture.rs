use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvalidFixtureError;

/// A played match with both final scores known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(rename = "HomeTeam")]
    pub home_team: String,
    #[serde(rename = "AwayTeam")]
    pub away_team: String,
    #[serde(rename = "HomeTeamScore")]
    pub home_score: u32,
    #[serde(rename = "AwayTeamScore")]
    pub away_score: u32,
}

impl Fixture {
    pub fn new(home_team: &str, away_team: &str, home_score: u32, away_score: u32) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score,
            away_score,
        }
    }
}

/// Fixture as it appears on the wire. Any JSON value deserializes; nothing is trusted
/// until `validate_fixture`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "PascalCase")]
pub struct RawFixture {
    pub home_team: Option<Value>,
    pub away_team: Option<Value>,
    pub home_team_score: Option<Value>,
    pub away_team_score: Option<Value>,
    /// The entry itself when it was not a JSON object.
    #[serde(skip_serializing)]
    pub non_object: Option<Value>,
}

impl From<Value> for RawFixture {
    fn from(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Self {
                    non_object: Some(other),
                    ..Self::default()
                };
            }
        };
        let mut take = |key: &str| map.remove(key).filter(|v| !v.is_null());
        Self {
            home_team: take("HomeTeam"),
            away_team: take("AwayTeam"),
            home_team_score: take("HomeTeamScore"),
            away_team_score: take("AwayTeamScore"),
            non_object: None,
        }
    }
}

/// League id -> fixtures, the shape of an input document.
pub type LeagueData = BTreeMap<String, Vec<RawFixture>>;

#[derive(Debug, Clone, Default)]
pub struct ValidatedFixtures {
    pub fixtures: Vec<Fixture>,
    /// Fixtures dropped because a score was still null.
    pub unplayed: usize,
}

/// Returns `Ok(None)` for a fixture that has not been played yet. A null score wins over
/// any problem with the team fields.
pub fn validate_fixture(raw: &RawFixture) -> Result<Option<Fixture>, InvalidFixtureError> {
    if let Some(value) = &raw.non_object {
        return Err(InvalidFixtureError::NotAnObject {
            value: value.to_string(),
        });
    }

    let (Some(home_score), Some(away_score)) =
        (raw.home_team_score.as_ref(), raw.away_team_score.as_ref())
    else {
        return Ok(None);
    };

    let home_team = team_name(raw.home_team.as_ref(), "home")?;
    let away_team = team_name(raw.away_team.as_ref(), "away")?;
    let home_score = parse_score(&home_team, home_score)?;
    let away_score = parse_score(&away_team, away_score)?;

    Ok(Some(Fixture {
        home_team,
        away_team,
        home_score,
        away_score,
    }))
}

pub fn validate_fixtures(raw: &[RawFixture]) -> Result<ValidatedFixtures, InvalidFixtureError> {
    let mut out = ValidatedFixtures {
        fixtures: Vec::with_capacity(raw.len()),
        unplayed: 0,
    };
    for (idx, item) in raw.iter().enumerate() {
        match validate_fixture(item).map_err(|err| InvalidFixtureError::at(idx, err))? {
            Some(fixture) => out.fixtures.push(fixture),
            None => out.unplayed += 1,
        }
    }
    Ok(out)
}

pub fn parse_league_data_json(raw: &str) -> Result<LeagueData> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("data is empty"));
    }
    let data: LeagueData = serde_json::from_str(trimmed).context("invalid league data json")?;
    if data.is_empty() {
        return Err(anyhow!("data is empty"));
    }
    Ok(data)
}

fn team_name(name: Option<&Value>, side: &'static str) -> Result<String, InvalidFixtureError> {
    let name = match name {
        None => return Err(InvalidFixtureError::MissingTeam { side }),
        Some(Value::String(name)) => name.trim(),
        Some(other) => {
            return Err(InvalidFixtureError::InvalidTeam {
                side,
                value: other.to_string(),
            });
        }
    };
    if name.is_empty() {
        return Err(InvalidFixtureError::EmptyTeam);
    }
    Ok(name.to_string())
}

fn parse_score(team: &str, value: &Value) -> Result<u32, InvalidFixtureError> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| InvalidFixtureError::InvalidScore {
            team: team.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawFixture {
        serde_json::from_str(json).expect("raw fixture json")
    }

    #[test]
    fn played_fixture_validates() {
        let item = raw(
            r#"{"HomeTeam":"Arsenal","AwayTeam":"Wolves","HomeTeamScore":2,"AwayTeamScore":0}"#,
        );
        let fixture = validate_fixture(&item).unwrap().unwrap();
        assert_eq!(fixture, Fixture::new("Arsenal", "Wolves", 2, 0));
    }

    #[test]
    fn null_score_is_unplayed_not_invalid() {
        let item = raw(
            r#"{"HomeTeam":"Arsenal","AwayTeam":"Wolves","HomeTeamScore":null,"AwayTeamScore":0}"#,
        );
        assert_eq!(validate_fixture(&item), Ok(None));

        let item = raw(r#"{"HomeTeam":"Arsenal","AwayTeam":"Wolves"}"#);
        assert_eq!(validate_fixture(&item), Ok(None));
    }

    #[test]
    fn rejects_missing_and_blank_teams() {
        let item = raw(r#"{"AwayTeam":"Wolves","HomeTeamScore":1,"AwayTeamScore":0}"#);
        assert_eq!(
            validate_fixture(&item),
            Err(InvalidFixtureError::MissingTeam { side: "home" })
        );

        let item =
            raw(r#"{"HomeTeam":"  ","AwayTeam":"Wolves","HomeTeamScore":1,"AwayTeamScore":0}"#);
        assert_eq!(validate_fixture(&item), Err(InvalidFixtureError::EmptyTeam));
    }

    #[test]
    fn rejects_non_string_teams_and_non_object_entries() {
        let item =
            raw(r#"{"HomeTeam":7,"AwayTeam":"Wolves","HomeTeamScore":1,"AwayTeamScore":0}"#);
        assert_eq!(
            validate_fixture(&item),
            Err(InvalidFixtureError::InvalidTeam {
                side: "home",
                value: "7".to_string()
            })
        );

        for entry in ["null", "3", r#""Arsenal v Wolves""#, "[]"] {
            let item = raw(entry);
            assert!(
                matches!(validate_fixture(&item), Err(InvalidFixtureError::NotAnObject { .. })),
                "{entry}"
            );
        }
    }

    #[test]
    fn unplayed_fixture_is_filtered_before_team_checks() {
        let item = raw(r#"{"AwayTeam":"Wolves","HomeTeamScore":null,"AwayTeamScore":null}"#);
        assert_eq!(validate_fixture(&item), Ok(None));

        let item = raw(r#"{"HomeTeam":"","AwayTeam":7}"#);
        assert_eq!(validate_fixture(&item), Ok(None));
    }

    #[test]
    fn malformed_entries_do_not_reject_the_document() {
        let data = parse_league_data_json(
            r#"{"epl-2024":[{"HomeTeam":"A","AwayTeam":"B","HomeTeamScore":1,"AwayTeamScore":0}],
                "la-liga-2024":[null,{"HomeTeam":7}]}"#,
        )
        .unwrap();
        assert_eq!(data["epl-2024"].len(), 1);
        assert_eq!(data["la-liga-2024"].len(), 2);
    }

    #[test]
    fn unplayed_fixture_serializes_with_null_scores() {
        let item =
            raw(r#"{"HomeTeam":"A","AwayTeam":"B","HomeTeamScore":null,"AwayTeamScore":null}"#);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["HomeTeam"], "A");
        assert!(json["HomeTeamScore"].is_null());
        assert!(json.get("NonObject").is_none());
        let back: RawFixture = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn rejects_non_integer_scores() {
        for score in [r#""2""#, "-1", "1.5", "true"] {
            let item = raw(&format!(
                r#"{{"HomeTeam":"Arsenal","AwayTeam":"Wolves",
                    "HomeTeamScore":{score},"AwayTeamScore":0}}"#
            ));
            let err = validate_fixture(&item).unwrap_err();
            assert!(
                matches!(
                    err,
                    InvalidFixtureError::InvalidScore { ref team, .. } if team == "Arsenal"
                ),
                "{score}: {err:?}"
            );
        }
    }

    #[test]
    fn list_validation_counts_unplayed_and_reports_index() {
        let items = vec![
            raw(r#"{"HomeTeam":"A","AwayTeam":"B","HomeTeamScore":1,"AwayTeamScore":1}"#),
            raw(r#"{"HomeTeam":"B","AwayTeam":"A","HomeTeamScore":null,"AwayTeamScore":null}"#),
        ];
        let validated = validate_fixtures(&items).unwrap();
        assert_eq!(validated.fixtures.len(), 1);
        assert_eq!(validated.unplayed, 1);

        let mut bad = items.clone();
        bad.push(raw(r#"{"HomeTeam":"A","AwayTeam":"","HomeTeamScore":0,"AwayTeamScore":0}"#));
        let err = validate_fixtures(&bad).unwrap_err();
        assert_eq!(err, InvalidFixtureError::at(2, InvalidFixtureError::EmptyTeam));
        assert_eq!(err.to_string(), "fixture #2: team name is empty");
    }

    #[test]
    fn empty_league_document_is_an_error() {
        assert!(parse_league_data_json("{}").is_err());
        assert!(parse_league_data_json("null").is_err());
        assert!(parse_league_data_json("").is_err());
        let data = parse_league_data_json(r#"{"epl-2024":[]}"#).unwrap();
        assert!(data["epl-2024"].is_empty());
    }
}
