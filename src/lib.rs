pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fixture;
pub mod http_client;
pub mod logging;
pub mod outcome;
pub mod persist;
pub mod pipeline;
pub mod pool;
pub mod source;
pub mod standings;

pub use analysis::{Analysis, HomeAwayAnalysis, LeagueAnalysis, LeagueStats, analyze};
pub use error::InvalidFixtureError;
pub use fixture::{Fixture, LeagueData, RawFixture, validate_fixture, validate_fixtures};
pub use outcome::{Outcome, classify};
pub use pipeline::{LeagueReport, process_league, process_leagues};
pub use standings::{HomeAwayStandings, Side, Standing, Standings, ranked, update};
