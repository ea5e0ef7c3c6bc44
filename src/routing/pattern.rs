//! Route pattern compilation and validation.
//!
//! # Responsibilities
//! - Split a declared pattern into literal, parameter and wildcard segments
//! - Reject malformed patterns before any request is routed
//! - Decode percent-encoding in literals and parameter names
//!
//! # Design Decisions
//! - The empty string is a valid pattern that only matches the root
//! - Validation stops at the first offending segment

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One `/`-delimited unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the decoded request segment.
    Literal(String),
    /// `:name`, captures the request segment.
    Param(String),
    /// Trailing `*`, forwards the rest of the path.
    Wildcard,
}

impl Segment {
    fn compile(raw: &str) -> Self {
        if raw == "*" {
            Segment::Wildcard
        } else if let Some(name) = raw.strip_prefix(':') {
            Segment::Param(decode(name).into_owned())
        } else {
            Segment::Literal(decode(raw).into_owned())
        }
    }
}

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("leading/trailing/duplicate slashes aren't allowed: {0:?}")]
    EmptySegment(String),

    #[error("wildcards are only allowed at the end of the route path: {0:?}")]
    WildcardNotLast(String),

    #[error("wildcards can only appear as complete segments at the end of the route path: {0:?}")]
    PartialWildcard(String),

    #[error("'..' and '.' aren't allowed as route path segments: {0:?}")]
    DotSegment(String),
}

impl PatternError {
    /// The pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            PatternError::EmptySegment(p)
            | PatternError::WildcardNotLast(p)
            | PatternError::PartialWildcard(p)
            | PatternError::DotSegment(p) => p,
        }
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile and validate a pattern string.
    ///
    /// ```
    /// use nested_router::routing::{Pattern, PatternError, Segment};
    ///
    /// let pattern = Pattern::parse("users/:id/*").unwrap();
    /// assert_eq!(
    ///     pattern.segments(),
    ///     &[Segment::Literal("users".into()), Segment::Param("id".into()), Segment::Wildcard]
    /// );
    ///
    /// assert!(matches!(Pattern::parse("a//b"), Err(PatternError::EmptySegment(_))));
    /// ```
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Ok(Self {
                source: String::new(),
                segments: vec![Segment::Literal(String::new())],
            });
        }

        let raw: Vec<&str> = source.split('/').collect();
        let last = raw.len() - 1;
        for (i, segment) in raw.iter().enumerate() {
            if segment.is_empty() {
                return Err(PatternError::EmptySegment(source.to_string()));
            }
            if *segment == "*" && i != last {
                return Err(PatternError::WildcardNotLast(source.to_string()));
            }
            if *segment != "*" && segment.contains('*') {
                return Err(PatternError::PartialWildcard(source.to_string()));
            }
            if *segment == "." || *segment == ".." {
                return Err(PatternError::DotSegment(source.to_string()));
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments: raw.into_iter().map(Segment::compile).collect(),
        })
    }

    /// The pattern exactly as declared.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the last segment forwards the remaining path.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// True for the empty pattern, which only matches the root.
    pub fn is_root_empty(&self) -> bool {
        self.source.is_empty()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Percent-decode a segment; undecodable input is kept verbatim.
pub(crate) fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
