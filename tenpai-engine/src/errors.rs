use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiichiError {
    /// Unparsable tile or hand string.
    Parse { input: String, message: String },
    /// Histogram or tile list violating counting rules (count > 4, bad length, meld count > 4).
    MalformedHand { message: String },
    /// Meld whose tiles do not form its declared type.
    InvalidMeld { message: String },
    /// Serialization/deserialization failure.
    Serialization { message: String },
}

impl RiichiError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        RiichiError::MalformedHand {
            message: message.into(),
        }
    }
}

impl fmt::Display for RiichiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiichiError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            RiichiError::MalformedHand { message } => {
                write!(f, "Malformed hand: {}", message)
            }
            RiichiError::InvalidMeld { message } => {
                write!(f, "Invalid meld: {}", message)
            }
            RiichiError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for RiichiError {}

impl From<serde_json::Error> for RiichiError {
    fn from(err: serde_json::Error) -> Self {
        RiichiError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type RiichiResult<T> = Result<T, RiichiError>;
