use thiserror::Error;

use crate::maze::Coord;

/// Invalid caller-supplied parameters. Always reported before any generation work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid line {line}: {reason}")]
    Syntax { line: usize, reason: String },
    #[error("unsupported key '{key}' on line {line}")]
    UnknownKey { key: String, line: usize },
    #[error("missing required parameter {0}")]
    MissingKey(&'static str),
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("width and height must be positive")]
    ZeroSize,
    #[error("maze too small ({width}x{height}), minimum is {min_width}x{min_height}")]
    TooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
    #[error(
        "a {width}x{height} maze cuts off part of the blocked region, use at least 8x6"
    )]
    IsolatedPockets { width: u16, height: u16 },
    #[error("{name} coordinates {coord:?} are out of bounds")]
    OutOfBounds { name: &'static str, coord: Coord },
    #[error("entry and exit must be different")]
    SameEntryExit,
    #[error("{name} {coord:?} lies inside the blocked region")]
    InsideBlockedRegion { name: &'static str, coord: Coord },
    #[error("output file name '{0}' is not a valid file")]
    InvalidOutputFile(String),
}

/// Errors raised by the maze core.
#[derive(Debug, Error)]
pub enum MazeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cells {0:?} and {1:?} are not adjacent")]
    NotAdjacent(Coord, Coord),
    #[error("cell {0:?} is out of bounds")]
    OutOfBounds(Coord),
    /// The carved maze does not reach every open cell. This is a generator bug, never a user error.
    #[error("internal invariant violated: {reached} of {expected} open cells reachable from entry")]
    Disconnected { reached: usize, expected: usize },
    #[error("no path from {entry:?} to {exit:?}")]
    NoPath { entry: Coord, exit: Coord },
    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed maze file at line {line}: {reason}")]
    Format { line: usize, reason: String },
}

impl MazeError {
    /// Whether the error signals a broken internal invariant rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MazeError::Disconnected { .. } | MazeError::NoPath { .. })
    }
}
