//! Error types for the Ant System solver.
//!
//! Every fallible operation returns [`AntSystemResult`]. Errors fall into two
//! kinds: bad input (detected before any iteration runs) and domain faults
//! that abort a run in progress.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{config::Float, index::CityIndex};

/// Result type alias for solver operations.
pub type AntSystemResult<T> = Result<T, AntSystemError>;

/// Coarse classification of [`AntSystemError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input data, or invalid parameters.
    Input,
    /// Arithmetic or ordering fault during a run.
    Domain,
}

#[derive(Debug, Error)]
pub enum AntSystemError {
    // ===== Input errors =====
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse TSPLIB file '{path}': {message}")]
    Tsplib { path: PathBuf, message: String },

    #[error("line {line}: expected `<id> <x> <y>`, found {found} fields")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid coordinate '{value}'")]
    InvalidCoordinate { line: usize, value: String },

    #[error("expected {expected} cities, found only {found}")]
    TooFewCities { expected: usize, found: usize },

    #[error("problem has no cities")]
    NoCities,

    #[error("{count} cities exceed the supported maximum of {max}")]
    TooManyCities { count: usize, max: usize },

    #[error("distance matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("distance {distance} between cities {from} and {to} does not fit the distance type")]
    DistanceOutOfRange { from: usize, to: usize, distance: f64 },

    #[error("distance matrix is not symmetric at ({0}, {1})")]
    Asymmetric(usize, usize),

    #[error("distance matrix has non-zero diagonal at {0}")]
    NonZeroDiagonal(usize),

    #[error("{name} must be positive")]
    NonPositive { name: &'static str },

    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: Float,
        reason: &'static str,
    },

    #[error("results file '{0}' already exists")]
    ResultsExist(PathBuf),

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    // ===== Domain errors =====
    #[error("zero distance between distinct cities {from} and {to}")]
    ZeroDistance { from: CityIndex, to: CityIndex },

    #[error("no allowed city left to visit")]
    NoAllowedCity,

    #[error("tour has {len} cities, a closed tour needs {expected}")]
    TourNotClosed { len: usize, expected: usize },

    #[error("tour cannot be closed: {unvisited} cities remain unvisited")]
    TourIncomplete { unvisited: usize },

    #[error("tour is already closed")]
    TourAlreadyClosed,

    #[error("tour length overflows the distance type")]
    TourLengthOverflow,
}

impl AntSystemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AntSystemError::ZeroDistance { .. }
            | AntSystemError::NoAllowedCity
            | AntSystemError::TourNotClosed { .. }
            | AntSystemError::TourIncomplete { .. }
            | AntSystemError::TourAlreadyClosed
            | AntSystemError::TourLengthOverflow => ErrorKind::Domain,
            _ => ErrorKind::Input,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AntSystemError::Io {
            path: path.into(),
            source,
        }
    }
}
