use crate::Couple;

use alloc::string::String;
use core::fmt;

/// Problem with a single scene element.
///
/// These are collected while walking a scene; none of them stops the
/// traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementError {
    /// the point is off the device grid; `nearest` is what gets drawn
    InvalidPoint {
        point: Couple,
        nearest: Couple,
    },
    /// required attributes are missing or unparsable
    MalformedElement {
        tag: String,
        reason: &'static str,
    },
    UnsupportedElement {
        tag: String,
    },
}

impl ElementError {
    pub fn malformed(tag: &str, reason: &'static str) -> Self {
        ElementError::MalformedElement { tag: tag.into(), reason }
    }
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementError::InvalidPoint { point, nearest } => write!(
                f,
                "Invalid point: ({}, {}). Closest supported coordinate: ({}, {})",
                point.x, point.y, nearest.x, nearest.y,
            ),
            ElementError::MalformedElement { tag, reason } => write!(f, "Malformed <{}>: {}", tag, reason),
            ElementError::UnsupportedElement { tag } => write!(f, "Unsupported element: {}", tag),
        }
    }
}

/// Problem with a serialized container.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParsingError {
    NotAPdcFile,
    TooShort,
    ExcessBytes,
    UnsupportedVersion,
    InvalidCommandType,
}

pub type ParsingResult<T> = Result<T, ParsingError>;

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParsingError::NotAPdcFile => "not a PDC file",
            ParsingError::TooShort => "unexpected end of data",
            ParsingError::ExcessBytes => "trailing bytes after the container",
            ParsingError::UnsupportedVersion => "unsupported draw command version",
            ParsingError::InvalidCommandType => "invalid draw command type",
        })
    }
}

/// Problem with values that cannot be written to a container.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// more than `u16::MAX` points in one command
    TooManyPoints,
    /// more than `u16::MAX` commands in one image or frame
    TooManyCommands,
    /// more than `u16::MAX` frames in one sequence
    TooManyFrames,
    /// the payload length does not fit its 32-bit field
    PayloadTooLarge,
    /// precise paths have no type code in the legacy scheme
    PreciseUnsupported,
}

pub type EncodingResult<T> = Result<T, EncodingError>;

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncodingError::TooManyPoints => "too many points in one command",
            EncodingError::TooManyCommands => "too many commands in one image or frame",
            EncodingError::TooManyFrames => "too many frames in one sequence",
            EncodingError::PayloadTooLarge => "payload larger than 4 GiB",
            EncodingError::PreciseUnsupported => "precise paths are not supported by the legacy format",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {}

#[cfg(feature = "std")]
pub use source::*;

#[cfg(feature = "std")]
mod source {
    use super::EncodingError;
    use std::{fmt, io, path::PathBuf};

    /// Problem with a whole scene source.
    #[derive(Debug)]
    pub enum SourceError {
        NotFound(PathBuf),
        Io(io::Error),
        Xml(roxmltree::Error),
        Encoding(EncodingError),
        /// no drawable command was produced
        EmptyScene,
        /// a command was dropped because of an off-grid point
        InvalidPoints,
        /// precise paths need the current type scheme
        PreciseUnsupported,
    }

    pub type SourceResult<T> = Result<T, SourceError>;

    impl fmt::Display for SourceError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                SourceError::NotFound(path) => write!(f, "{} does not exist", path.display()),
                SourceError::Io(e) => write!(f, "I/O error: {}", e),
                SourceError::Xml(e) => write!(f, "XML error: {}", e),
                SourceError::Encoding(e) => write!(f, "cannot encode: {}", e),
                SourceError::EmptyScene => f.write_str("the scene has no drawable element"),
                SourceError::InvalidPoints => f.write_str("the scene contains invalid points"),
                SourceError::PreciseUnsupported => f.write_str("precise paths are not supported by the legacy format"),
            }
        }
    }

    impl std::error::Error for SourceError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                SourceError::Io(e) => Some(e),
                SourceError::Xml(e) => Some(e),
                SourceError::Encoding(e) => Some(e),
                _ => None,
            }
        }
    }

    impl From<io::Error> for SourceError {
        fn from(e: io::Error) -> Self {
            SourceError::Io(e)
        }
    }

    impl From<EncodingError> for SourceError {
        fn from(e: EncodingError) -> Self {
            SourceError::Encoding(e)
        }
    }

    impl From<roxmltree::Error> for SourceError {
        fn from(e: roxmltree::Error) -> Self {
            SourceError::Xml(e)
        }
    }
}
