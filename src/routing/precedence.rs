//! Precedence ordering between the patterns of one routing table.
//!
//! # Ordering Rules (most significant first)
//! 1. Wildcard-terminated patterns come after all others
//! 2. Segment by segment: literal < empty (root-only) < `:param` < `*`,
//!    and a pattern that runs out of segments first comes later
//! 3. Ties keep declaration order (stable sort)

use std::cmp::Ordering;

use crate::routing::pattern::{Pattern, Segment};

/// Rank of a segment at a given position; lower ranks are tried first.
fn rank(segment: &Segment) -> u8 {
    match segment {
        Segment::Literal(s) if s.is_empty() => 1,
        Segment::Literal(_) => 0,
        Segment::Param(_) => 2,
        Segment::Wildcard => 3,
    }
}

/// Compare two patterns by specificity. `Less` means `a` is tried first.
pub fn compare(a: &Pattern, b: &Pattern) -> Ordering {
    match (a.is_wildcard(), b.is_wildcard()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    let (sa, sb) = (a.segments(), b.segments());
    for i in 0..sa.len().max(sb.len()) {
        match (sa.get(i), sb.get(i)) {
            (Some(x), Some(y)) => match rank(x).cmp(&rank(y)) {
                Ordering::Equal => continue,
                other => return other,
            },
            // The shorter pattern is less specific
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (None, None) => break,
        }
    }

    Ordering::Equal
}

/// Stable-sort routes so the most specific pattern comes first.
pub fn sort_by_precedence<T>(routes: &mut [T], pattern: impl Fn(&T) -> &Pattern) {
    routes.sort_by(|a, b| compare(pattern(a), pattern(b)));
}
