use thiserror::Error;

/// A raw listing timestamp that could not be turned into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("timestamp {raw:?} has too few tokens")]
    TooFewTokens { raw: String },

    #[error("invalid day {token:?} in timestamp {raw:?}")]
    InvalidDay { raw: String, token: String },

    #[error("unknown month {token:?} in timestamp {raw:?}")]
    UnknownMonth { raw: String, token: String },

    #[error("{day} {month} {year} is not a calendar date (timestamp {raw:?})")]
    InvalidDate {
        raw: String,
        day: u32,
        month: String,
        year: i32,
    },
}

impl DateParseError {
    /// The timestamp as it appeared in the listing.
    pub fn raw(&self) -> &str {
        match self {
            DateParseError::TooFewTokens { raw }
            | DateParseError::InvalidDay { raw, .. }
            | DateParseError::UnknownMonth { raw, .. }
            | DateParseError::InvalidDate { raw, .. } => raw,
        }
    }
}
