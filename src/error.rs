use thiserror::Error;

/// Why a single outcome-probability triple was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidProbabilities {
    #[error("probability {0} is outside [0, 1]")]
    OutOfRange(f64),

    #[error("probability is not a number")]
    NotANumber,

    #[error("probabilities sum to {sum}, expected 1 (tolerance {tolerance})")]
    NotNormalized { sum: f64, tolerance: f64 },

    #[error("no outcome has positive probability")]
    NoMass,

    #[error("malformed percentage {0:?}")]
    BadPercentage(String),
}

/// Errors raised by the projection engine.
///
/// Every variant is raised before the first simulation iteration runs;
/// a run either completes or fails up front.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("fixture #{index} ({home} vs {away}): {source}")]
    MalformedFixture {
        index: usize,
        home: String,
        away: String,
        #[source]
        source: InvalidProbabilities,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("team {0:?} appears more than once in the standings")]
    DuplicateTeam(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
