use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::fixture::{Fixture, RawFixture, ValidatedFixtures, validate_fixtures};
use crate::http_client::http_client;
use crate::pool::with_pool;

const CONTENT_TYPE_JSON: &str = "application/json";

/// One entry of a fixture feed. Only the team and score fields feed the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebFixture {
    #[serde(default)]
    pub match_number: Option<u32>,
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default)]
    pub date_utc: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub home_team: Option<Value>,
    #[serde(default)]
    pub away_team: Option<Value>,
    #[serde(default)]
    pub home_team_score: Option<Value>,
    #[serde(default)]
    pub away_team_score: Option<Value>,
}

impl WebFixture {
    /// The four fields the engine reads, in input document shape.
    pub fn into_raw(self) -> RawFixture {
        RawFixture {
            home_team: self.home_team,
            away_team: self.away_team,
            home_team_score: self.home_team_score,
            away_team_score: self.away_team_score,
            non_object: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedLeague {
    pub league: String,
    pub url: String,
    pub fixtures: Vec<Fixture>,
    pub unplayed: usize,
    /// Every feed entry, played or not, as written by the fetcher.
    pub entries: Vec<RawFixture>,
}

#[derive(Debug, Default)]
pub struct FetchSummary {
    pub leagues: Vec<FetchedLeague>,
    pub errors: Vec<String>,
}

pub fn parse_web_fixtures_json(raw: &str) -> Result<Vec<WebFixture>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid fixture feed json")
}

/// Feed entries in input document shape, checked the same way the aggregator checks them.
pub fn extract_fixtures(feed: Vec<WebFixture>) -> Result<(Vec<RawFixture>, ValidatedFixtures)> {
    let entries: Vec<RawFixture> = feed.into_iter().map(WebFixture::into_raw).collect();
    let validated = validate_fixtures(&entries).context("invalid fixture in feed")?;
    Ok((entries, validated))
}

/// League id from the last path segment, e.g. `.../fixtures/epl-2024` -> `epl-2024`.
pub fn league_key_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let segment = segment.trim();
    if segment.is_empty() || segment.contains(':') {
        return None;
    }
    Some(segment.to_string())
}

pub fn accepts_response(status: StatusCode, content_type: &str) -> bool {
    status == StatusCode::OK && content_type.contains(CONTENT_TYPE_JSON)
}

pub fn fetch_league(client: &Client, url: &str) -> Result<FetchedLeague> {
    let league =
        league_key_from_url(url).ok_or_else(|| anyhow!("no league key in url: {url}"))?;

    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !accepts_response(status, &content_type) {
        return Err(anyhow!("status({status}) unable to access: {url}"));
    }

    let body = resp.text().context("failed reading body")?;
    let feed = parse_web_fixtures_json(&body).with_context(|| format!("unable to read {url}"))?;
    let (entries, validated) =
        extract_fixtures(feed).with_context(|| format!("rejected {url}"))?;

    Ok(FetchedLeague {
        league,
        url: url.to_string(),
        fixtures: validated.fixtures,
        unplayed: validated.unplayed,
        entries,
    })
}

/// Fetch every url at once; each failure is logged and collected, never fatal to the rest.
pub fn fetch_all(urls: &[String], threads: usize) -> FetchSummary {
    let client = match http_client() {
        Ok(client) => client,
        Err(err) => {
            warn!("fixture client build failed: {err:#}");
            return FetchSummary {
                leagues: Vec::new(),
                errors: vec![format!("fixture client build failed: {err:#}")],
            };
        }
    };

    let results: Vec<Result<FetchedLeague>> = with_pool(threads, || {
        urls.par_iter()
            .map(|url| fetch_league(client, url))
            .collect()
    });

    let mut summary = FetchSummary::default();
    for result in results {
        match result {
            Ok(league) => {
                info!(
                    "fetched {}: {} played, {} unplayed",
                    league.league,
                    league.fixtures.len(),
                    league.unplayed
                );
                summary.leagues.push(league);
            }
            Err(err) => {
                warn!("fetch failed: {err:#}");
                summary.errors.push(format!("{err:#}"));
            }
        }
    }
    summary
}
