//! Build-time error taxonomy
//!
//! Every failure raised while turning a pages directory into a manifest is a
//! [`RouteError`]. Any of them aborts the whole build: no partial route table
//! is ever returned.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a file name was rejected as a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRouteReason {
    /// A segment produced no text at all
    EmptySegment,
    /// `[a][b]`: two parameters with nothing between them
    AdjacentParameters,
    /// Count of `[` differs from count of `]`
    UnbalancedBrackets,
    /// `[...rest]` shares its segment with other text
    RestNotStandalone,
    /// Parameter name outside `[A-Za-z0-9_$]`
    InvalidParameterName,
    /// The same parameter name appears twice along one route
    DuplicateParameter,
}

impl fmt::Display for InvalidRouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            InvalidRouteReason::EmptySegment => "segment is empty",
            InvalidRouteReason::AdjacentParameters => "parameters must be separated",
            InvalidRouteReason::UnbalancedBrackets => "brackets are unbalanced",
            InvalidRouteReason::RestNotStandalone => {
                "rest parameter must be a standalone segment"
            }
            InvalidRouteReason::InvalidParameterName => {
                "parameter name must match /^[a-zA-Z0-9_$]+$/"
            }
            InvalidRouteReason::DuplicateParameter => "parameter names must be unique",
        };
        f.write_str(message)
    }
}

/// Errors produced by the manifest builder and route generators
#[derive(Debug, Error)]
pub enum RouteError {
    /// A file or directory name cannot be turned into a route
    #[error("Invalid route {file}: {reason}")]
    InvalidRoute {
        file: String,
        reason: InvalidRouteReason,
    },

    /// The pages directory (or one of its children) could not be listed
    #[error("Failed to read pages directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The generated matcher was rejected by the regex engine
    #[error("Failed to compile route pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A required parameter was not supplied to a route generator
    #[error("Missing value for required route parameter \"{name}\"")]
    MissingParam { name: String },
}

impl RouteError {
    pub(crate) fn invalid(file: &str, reason: InvalidRouteReason) -> Self {
        RouteError::InvalidRoute {
            file: file.to_string(),
            reason,
        }
    }

    /// Relative file path of the offending route, for `InvalidRoute` errors
    pub fn file(&self) -> Option<&str> {
        match self {
            RouteError::InvalidRoute { file, .. } => Some(file),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RouteError>;
