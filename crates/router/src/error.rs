//! Error types for route registration and path matching.
//!
//! - [`InsertError`]: a pattern could not be added to a [`Tree`](crate::tree::Tree)
//! - [`MatchError`]: a path did not match, with a trailing slash hint
//! - [`RouteError`]: top-level registration error returned by the [`Router`](crate::Router)

use http::Method;
use thiserror::Error;

/// Reasons a route pattern is rejected at registration time.
///
/// Every variant carries the offending pattern so a broken route table can be
/// reported without re-deriving which registration failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    #[error("pattern '{pattern}' must begin with '/'")]
    MissingLeadingSlash { pattern: String },

    #[error("a handler is already registered for pattern '{pattern}'")]
    Duplicate { pattern: String },

    #[error("wildcard '{new}' in pattern '{pattern}' conflicts with existing wildcard '{existing}'")]
    WildcardConflict { pattern: String, existing: String, new: String },

    #[error("catch-all in pattern '{pattern}' must be the final segment")]
    CatchAllNotLast { pattern: String },

    #[error("catch-all in pattern '{pattern}' must directly follow a '/'")]
    CatchAllWithoutSlash { pattern: String },

    #[error("wildcard in pattern '{pattern}' has an empty name")]
    EmptyWildcardName { pattern: String },

    #[error("segment '{segment}' of pattern '{pattern}' holds more than one wildcard")]
    MultipleWildcards { pattern: String, segment: String },
}

impl InsertError {
    pub fn missing_leading_slash<S: ToString>(pattern: S) -> Self {
        Self::MissingLeadingSlash { pattern: pattern.to_string() }
    }

    pub fn duplicate<S: ToString>(pattern: S) -> Self {
        Self::Duplicate { pattern: pattern.to_string() }
    }

    pub fn wildcard_conflict(pattern: impl ToString, existing: impl ToString, new: impl ToString) -> Self {
        Self::WildcardConflict { pattern: pattern.to_string(), existing: existing.to_string(), new: new.to_string() }
    }

    /// The pattern whose registration failed.
    pub fn pattern(&self) -> &str {
        match self {
            Self::MissingLeadingSlash { pattern }
            | Self::Duplicate { pattern }
            | Self::WildcardConflict { pattern, .. }
            | Self::CatchAllNotLast { pattern }
            | Self::CatchAllWithoutSlash { pattern }
            | Self::EmptyWildcardName { pattern }
            | Self::MultipleWildcards { pattern, .. } => pattern,
        }
    }
}

/// A path that matched no route.
///
/// The variant tells whether toggling a single trailing `/` would have matched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    #[error("no route matched, but one exists with an additional trailing slash")]
    MissingTrailingSlash,

    #[error("no route matched, but one exists without the trailing slash")]
    ExtraTrailingSlash,

    #[error("no route matched")]
    NotFound,
}

impl MatchError {
    /// Whether a trailing slash redirect is recommended.
    #[inline]
    pub fn tsr(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("invalid http method: {source}")]
    InvalidMethod {
        #[from]
        source: http::Error,
    },

    #[error("failed to register {method} route: {source}")]
    Insert {
        method: Method,
        #[source]
        source: InsertError,
    },
}

impl RouteError {
    pub fn insert(method: Method, source: InsertError) -> Self {
        Self::Insert { method, source }
    }

    /// The underlying trie error, if the method itself was valid.
    pub fn insert_error(&self) -> Option<&InsertError> {
        match self {
            Self::Insert { source, .. } => Some(source),
            Self::InvalidMethod { .. } => None,
        }
    }
}
