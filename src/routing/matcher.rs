//! Segment matching of compiled patterns against request paths.
//!
//! # Responsibilities
//! - Split the unrouted request path into raw and decoded segments
//! - Match a pattern segment by segment, capturing `:name` params
//! - Split the path into its routed and unrouted portions
//!
//! # Design Decisions
//! - Comparison uses decoded segments; routed/unrouted keep the raw text so
//!   nested routers never decode a segment twice
//! - Length check first: most patterns are rejected without a segment walk

use std::borrow::Cow;

use crate::context::Params;
use crate::routing::pattern::{decode, Pattern, Segment};

/// Path segments of a request, ready for matching.
#[derive(Debug, Clone)]
pub struct PathSegments<'a> {
    raw: Vec<&'a str>,
    decoded: Vec<Cow<'a, str>>,
}

impl<'a> PathSegments<'a> {
    /// Split a path that starts with `/`.
    pub fn parse(path: &'a str) -> Self {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let raw: Vec<&str> = trimmed.split('/').collect();
        let decoded = raw.iter().map(|s| decode(s)).collect();
        Self { raw, decoded }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// True when the path is exactly the synthesized root segment.
    fn is_root_index(&self) -> bool {
        self.decoded.len() == 1 && self.decoded[0] == "index"
    }
}

/// Result of a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    /// Captures from `:name` segments.
    pub params: Params,
    /// Consumed segments joined with `/`, no leading slash.
    pub routed: String,
    /// Segments forwarded by a wildcard, joined with `/`.
    pub unrouted: String,
}

impl Pattern {
    /// Match this pattern against request path segments.
    pub fn match_segments(&self, path: &PathSegments<'_>) -> Option<Match> {
        let segments = self.segments();
        let wildcard = self.is_wildcard();
        if (!wildcard && segments.len() != path.len())
            || (wildcard && segments.len() - 1 > path.len())
        {
            return None;
        }

        // The root's leading slash is always inferred, so the empty pattern
        // may stand in for "index". Trailing slashes are never inferred
        // elsewhere, hence only for the exact root segment.
        if self.is_root_empty() && path.is_root_index() {
            return Some(Match {
                params: Params::new(),
                routed: "index".to_string(),
                unrouted: String::new(),
            });
        }

        let mut m = Match::default();
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => {
                    m.unrouted = path.raw[i..].join("/");
                    break;
                }
                Segment::Param(name) => {
                    m.params.insert(name.clone(), path.decoded[i].clone().into_owned());
                }
                Segment::Literal(literal) => {
                    if *literal != path.decoded[i] {
                        return None;
                    }
                }
            }
            if !m.routed.is_empty() {
                m.routed.push('/');
            }
            m.routed.push_str(path.raw[i]);
        }

        Some(m)
    }
}
