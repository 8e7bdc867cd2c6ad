use std::{io, num::ParseFloatError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse {text:?} as a number at {source_name}:{line}")]
    MalformedInput {
        source_name: String,
        line: usize,
        text: String,
        source: ParseFloatError,
    },
    #[error("no value from {0}")]
    EmptySource(String),
    #[error("failed to open {source_name}")]
    Open {
        source_name: String,
        source: io::Error,
    },
    #[error("failed to read {source_name}")]
    Read {
        source_name: String,
        source: io::Error,
    },

    #[error("bar character must not be empty")]
    EmptyBarChar,
    #[error("graph width must be positive")]
    ZeroGraphWidth,
    #[error("graph width {0} is too large")]
    GraphWidthTooLarge(usize),
    #[error("at least one histogram is required")]
    NoSeries,
    #[error("range points of {other} differ from those of {first}")]
    RangePointsMismatch { first: String, other: String },
    #[error("out of range policy of {other} differs from that of {first}")]
    PolicyMismatch { first: String, other: String },
    #[error("at least 2 range points are required, got {0}")]
    TooFewRangePoints(usize),
    #[error("range points must be finite and strictly increasing: {0:?}")]
    InvalidRangePoints(Vec<f64>),
    #[error("axis range is empty or not finite, min={min}, max={max}")]
    EmptyAxis { min: f64, max: f64 },
    #[error("significant digits must satisfy 1 <= min <= max, got min={min}, max={max}")]
    InvalidSignificantDigits { min: usize, max: usize },

    #[error("bar max width becomes too small, retry with larger graph width, bar_max_width={bar_max_width}, graph_width={graph_width}")]
    LayoutTooNarrow {
        bar_max_width: i64,
        graph_width: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
