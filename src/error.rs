//! Error type shared by the catalog client, the mirror store and the
//! generation pipeline.

use std::{fmt, io};

/// Everything that can abort a TuneCraft operation.
///
/// Remote and store failures are never retried inside the core; they
/// propagate to the CLI which reports them and exits. Units of work that
/// were committed before the failure (one playlist's membership diff, for
/// instance) stay committed.
#[derive(Debug)]
pub enum TuneCraftError {
    /// The requested seed playlist is not part of the user's mirror.
    InvalidSeed(String),
    /// The seed playlist is mirrored but has no tracks to seed from.
    EmptySeed(String),
    /// The expander gave up before reaching the requested track count.
    RecommendationExhausted { accepted: usize, target: usize },
    /// The catalog answered with an error status.
    Remote(String),
    /// Transport level failure talking to the catalog.
    Http(reqwest::Error),
    Store(rusqlite::Error),
    Config(String),
    Auth(String),
    Io(io::Error),
    Serde(serde_json::Error),
}

impl TuneCraftError {
    /// True for failures that originate from the remote catalog.
    pub fn is_remote(&self) -> bool {
        matches!(self, TuneCraftError::Remote(_) | TuneCraftError::Http(_))
    }
}

impl fmt::Display for TuneCraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuneCraftError::InvalidSeed(id) => write!(f, "Invalid seed playlist ID: {}", id),
            TuneCraftError::EmptySeed(id) => {
                write!(f, "Seed playlist {} has no tracks in the local mirror", id)
            }
            TuneCraftError::RecommendationExhausted { accepted, target } => write!(
                f,
                "Recommendations exhausted after {} of {} tracks",
                accepted, target
            ),
            TuneCraftError::Remote(msg) => write!(f, "Spotify request failed: {}", msg),
            TuneCraftError::Http(e) => write!(f, "HTTP error: {}", e),
            TuneCraftError::Store(e) => write!(f, "Mirror store error: {}", e),
            TuneCraftError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TuneCraftError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            TuneCraftError::Io(e) => write!(f, "I/O error: {}", e),
            TuneCraftError::Serde(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for TuneCraftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuneCraftError::Http(e) => Some(e),
            TuneCraftError::Store(e) => Some(e),
            TuneCraftError::Io(e) => Some(e),
            TuneCraftError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TuneCraftError {
    fn from(err: reqwest::Error) -> Self {
        TuneCraftError::Http(err)
    }
}

impl From<rusqlite::Error> for TuneCraftError {
    fn from(err: rusqlite::Error) -> Self {
        TuneCraftError::Store(err)
    }
}

impl From<io::Error> for TuneCraftError {
    fn from(err: io::Error) -> Self {
        TuneCraftError::Io(err)
    }
}

impl From<serde_json::Error> for TuneCraftError {
    fn from(err: serde_json::Error) -> Self {
        TuneCraftError::Serde(err)
    }
}

pub type Result<T> = std::result::Result<T, TuneCraftError>;
