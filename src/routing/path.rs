//! Path pattern grammar and the byte predicates shared by registration and lookup.
//!
//! # Grammar
//! - A pattern starts with `/`
//! - `:name` captures bytes up to the next `/`
//! - `*name` captures the remainder of the path and must follow a `/`
//! - A segment holds at most one wildcard, and wildcard names are non-empty
//!
//! All helpers work on raw bytes. Patterns are never decoded as UTF-8 here.

use std::fmt;

/// Marker byte of a named parameter segment.
pub const PARAM: u8 = b':';

/// Marker byte of a catch-all segment.
pub const CATCH_ALL: u8 = b'*';

/// A specific grammar rule a pattern violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathViolation {
    MissingLeadingSlash,
    EmptyWildcardName,
    MixedWildcards,
    CatchAllNotAfterSlash,
    SlashAfterCatchAll,
}

impl fmt::Display for PathViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingLeadingSlash => "first char must be '/'",
            Self::EmptyWildcardName => "the name of wildcard segment must not empty",
            Self::MixedWildcards => {
                "the wildcard '*' and ':' should not exist in the same path segment"
            }
            Self::CatchAllNotAfterSlash => "the previous character of '*' must be '/'",
            Self::SlashAfterCatchAll => "there should be no '/' after the wildcard '*'",
        };
        f.write_str(reason)
    }
}

/// Check a registration pattern against the grammar.
pub fn verify(path: &[u8]) -> Result<(), PathViolation> {
    if path.first() != Some(&b'/') {
        return Err(PathViolation::MissingLeadingSlash);
    }

    // Wildcard seen in the current segment, if any.
    let mut last_wildcard: Option<u8> = None;

    for i in 1..path.len() {
        let (prev, c) = (path[i - 1], path[i]);

        if c == b'/' {
            if last_wildcard == Some(CATCH_ALL) {
                return Err(PathViolation::SlashAfterCatchAll);
            }
            if is_wildcard(prev) {
                return Err(PathViolation::EmptyWildcardName);
            }
            last_wildcard = None;
            continue;
        }

        if !is_wildcard(c) {
            continue;
        }

        if last_wildcard.is_some() {
            return Err(PathViolation::MixedWildcards);
        }

        if c == CATCH_ALL && prev != b'/' {
            return Err(PathViolation::CatchAllNotAfterSlash);
        }

        last_wildcard = Some(c);
    }

    match path.last() {
        Some(&c) if is_wildcard(c) => Err(PathViolation::EmptyWildcardName),
        _ => Ok(()),
    }
}

/// Length of the longest common prefix of `a` and `b`.
pub fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

pub fn is_wildcard(c: u8) -> bool {
    c == PARAM || c == CATCH_ALL
}

/// True when `path` is a single wildcard token with nothing after it.
///
/// `:id` and `*rest` qualify; `:id/` and `/:id` do not.
pub fn is_wildcard_segment(path: &[u8]) -> bool {
    match path.split_first() {
        Some((&c, rest)) if is_wildcard(c) => !rest.contains(&b'/'),
        _ => false,
    }
}

pub fn is_slash(path: &[u8]) -> bool {
    path == b"/"
}

/// Locate the first wildcard token in `path`.
///
/// Returns the index of its marker together with the token itself. A `:`
/// token ends at the next `/`; a `*` token runs to the end of the path.
pub fn find_wildcard(path: &[u8]) -> Option<(usize, &[u8])> {
    let start = path.iter().position(|&c| is_wildcard(c))?;
    let token = &path[start..];
    if token[0] == CATCH_ALL {
        return Some((start, token));
    }
    let end = token.iter().position(|&c| c == b'/').unwrap_or(token.len());
    Some((start, &token[..end]))
}
