//! Error types for the bid feed.
//!
//! The simulation itself is infallible; errors only arise at the edge
//! where external bid messages enter the engine.

use std::fmt;

/// Errors that can occur while decoding an incoming bid message.
#[derive(Debug)]
pub enum FeedError {
    /// The message was not valid JSON or did not match the bid schema.
    Json(serde_json::Error),
    /// The bid amount was non-positive or not a finite number.
    InvalidAmount(f32),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Json(e) => write!(f, "Failed to decode bid message: {}", e),
            FeedError::InvalidAmount(amount) => {
                write!(f, "Bid amount must be a positive finite number, got {}", amount)
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Json(e) => Some(e),
            FeedError::InvalidAmount(_) => None,
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Json(e)
    }
}
