/// Error type shared by the core and its hosts
use std::fmt;

/// Errors raised while configuring or driving a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Scale must be finite and strictly positive.
    InvalidScale(f64),
    /// Resolution must lie in `1..=MAX_RESOLUTION`.
    InvalidResolution(u32),
    /// Rotation speeds must be finite.
    InvalidSpeed(f64),
    /// Color text that is not `#rgb` or `#rrggbb`.
    InvalidColor(String),
    /// Property name not in {scale, resolution, color}.
    UnknownProperty(String),
    /// Control command or configuration that failed to parse.
    Parse(String),
    /// Drawing surface or its context could not be acquired.
    SurfaceUnavailable(String),
    /// The host refused to schedule a frame.
    Scheduler(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidScale(v) => write!(f, "scale must be a positive finite number, got {v}"),
            Error::InvalidResolution(v) => write!(
                f,
                "resolution must be between 1 and {}, got {v}",
                crate::shape::MAX_RESOLUTION
            ),
            Error::InvalidSpeed(v) => write!(f, "rotation speed must be finite, got {v}"),
            Error::InvalidColor(s) => write!(f, "invalid color {s:?}, expected #rgb or #rrggbb"),
            Error::UnknownProperty(s) => write!(f, "unknown property {s:?}"),
            Error::Parse(s) => write!(f, "parse error: {s}"),
            Error::SurfaceUnavailable(s) => write!(f, "drawing surface unavailable: {s}"),
            Error::Scheduler(s) => write!(f, "frame scheduling failed: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
