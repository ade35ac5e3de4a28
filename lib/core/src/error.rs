use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Class balance undefined for {records} record(s): at least 2 are required")]
    DegenerateInput { records: usize },

    #[error(
        "Cannot rebalance precision {precision} from class balance {from} to {to}: denominator {denominator} is not positive"
    )]
    Rebalance {
        precision: f64,
        from: f64,
        to: f64,
        denominator: f64,
    },

    #[error("Invalid probability for {name}: {value} is not in [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Record not found: {0}")]
    UnknownRecord(String),

    #[error("Record labeled more than once: {0}")]
    DuplicateRecord(String),

    #[error("Match function error: {0}")]
    MatchFunction(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Check that `value` is a finite probability.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidProbability { name, value })
    }
}
