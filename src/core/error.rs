/*!
# Unified Error Type

This module provides a unified error enum that consolidates every failure mode the
path engine, the string-search library and the map loader can produce.
*/

use std::error::Error;
use std::fmt;

/// Unified error type for all roadscribe operations.
#[derive(Debug)]
pub enum RoadscribeError {
    /// A vertex/edge/road id lookup failed.
    NotFound(String),

    /// A vertex was rejected because its coordinates fall outside the canvas.
    OutOfBounds(String),

    /// A map file (meta/nodes/roads/subroads) was malformed.
    Parse(String),

    /// No path connects source and target.
    Unreachable(String),

    /// A road search returned no hits.
    EmptyMatch(String),

    /// An invariant the caller was supposed to uphold was violated
    /// (decrease-key on an absent element, extract-min on an empty heap,
    /// Hamming distance on unequal-length strings, ...).
    ProgrammingError(String),

    /// I/O error while loading or saving a map/graph.
    IoError(String),

    /// Serialization/deserialization error.
    SerializationError(String),
}

impl RoadscribeError {
    pub fn not_found(message: impl Into<String>) -> Self {
        RoadscribeError::NotFound(message.into())
    }

    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        RoadscribeError::OutOfBounds(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        RoadscribeError::Parse(message.into())
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        RoadscribeError::Unreachable(message.into())
    }

    pub fn empty_match(message: impl Into<String>) -> Self {
        RoadscribeError::EmptyMatch(message.into())
    }

    pub fn programming_error(message: impl Into<String>) -> Self {
        RoadscribeError::ProgrammingError(message.into())
    }
}

impl fmt::Display for RoadscribeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoadscribeError::NotFound(msg) => write!(f, "not found: {}", msg),
            RoadscribeError::OutOfBounds(msg) => write!(f, "out of bounds: {}", msg),
            RoadscribeError::Parse(msg) => write!(f, "parse error: {}", msg),
            RoadscribeError::Unreachable(msg) => write!(f, "unreachable: {}", msg),
            RoadscribeError::EmptyMatch(msg) => write!(f, "no match: {}", msg),
            RoadscribeError::ProgrammingError(msg) => write!(f, "programming error: {}", msg),
            RoadscribeError::IoError(msg) => write!(f, "I/O error: {}", msg),
            RoadscribeError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl Error for RoadscribeError {}

impl From<std::io::Error> for RoadscribeError {
    fn from(e: std::io::Error) -> Self {
        RoadscribeError::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for RoadscribeError {
    fn from(e: serde_json::Error) -> Self {
        RoadscribeError::SerializationError(e.to_string())
    }
}

impl From<bincode::Error> for RoadscribeError {
    fn from(e: bincode::Error) -> Self {
        RoadscribeError::SerializationError(e.to_string())
    }
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoadscribeError>;
