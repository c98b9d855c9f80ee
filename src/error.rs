use thiserror::Error;

/// A fixture the engine refuses to aggregate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidFixtureError {
    #[error("fixture is missing the {side} team")]
    MissingTeam { side: &'static str },

    #[error("{side} team is not a string: {value}")]
    InvalidTeam { side: &'static str, value: String },

    #[error("team name is empty")]
    EmptyTeam,

    #[error("score for {team} is not a non-negative integer: {value}")]
    InvalidScore { team: String, value: String },

    #[error("fixture entry is not an object: {value}")]
    NotAnObject { value: String },

    #[error("standing counters overflowed for {team}")]
    Overflow { team: String },

    #[error("fixture #{index}: {reason}")]
    At {
        index: usize,
        reason: Box<InvalidFixtureError>,
    },
}

impl InvalidFixtureError {
    pub fn at(index: usize, reason: InvalidFixtureError) -> Self {
        InvalidFixtureError::At {
            index,
            reason: Box::new(reason),
        }
    }
}
