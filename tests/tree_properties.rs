//! Property tests for the radix tree.
//!
//! Lookups are checked against a brute-force matcher that compares a path
//! with every registered pattern segment by segment.

use proptest::prelude::*;
use radix_router::routing::{Lookup, Node};

const LITERALS: &[&str] = &["a", "b", "ab", "ba", "c"];
const VALUES: &[&str] = &["x", "y", "ab", "a1", "b"];
const REMAINDERS: &[&str] = &["z", "z/q", "a/b", "b"];

#[derive(Debug, Clone)]
enum Segment {
    Literal(&'static str),
    Param,
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        3 => prop::sample::select(LITERALS).prop_map(Segment::Literal),
        2 => Just(Segment::Param),
    ]
}

fn pattern() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(segment(), 1..=3),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.25),
    )
        .prop_map(|(segments, catch_all, trailing_slash)| {
            let mut pattern = String::new();
            for (i, segment) in segments.iter().enumerate() {
                pattern.push('/');
                match segment {
                    Segment::Literal(literal) => pattern.push_str(literal),
                    Segment::Param => pattern.push_str(&format!(":p{i}")),
                }
            }
            if catch_all {
                pattern.push_str("/*rest");
            } else if trailing_slash {
                pattern.push('/');
            }
            pattern
        })
}

/// A concrete path for `pattern`, wildcard values chosen by `picks`.
fn instantiate(pattern: &str, picks: &[usize]) -> String {
    pattern
        .split('/')
        .enumerate()
        .map(|(i, segment)| {
            let pick = picks[i % picks.len()];
            if segment.starts_with(':') {
                VALUES[pick % VALUES.len()]
            } else if segment.starts_with('*') {
                REMAINDERS[pick % REMAINDERS.len()]
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Brute-force matcher. With `allow_empty`, wildcards may capture nothing.
fn reference(pattern: &str, path: &str, allow_empty: bool) -> Option<Vec<(String, String)>> {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let path: Vec<&str> = path.split('/').collect();
    let mut params = Vec::new();

    for (i, segment) in pattern.iter().enumerate() {
        if let Some(name) = segment.strip_prefix('*') {
            let rest = path.get(i..).map(|s| s.join("/")).unwrap_or_default();
            if rest.is_empty() && !allow_empty {
                return None;
            }
            params.push((name.to_string(), rest));
            return Some(params);
        }
        let value = path.get(i)?;
        if let Some(name) = segment.strip_prefix(':') {
            if value.is_empty() && !allow_empty {
                return None;
            }
            params.push((name.to_string(), value.to_string()));
        } else if segment != value {
            return None;
        }
    }

    (path.len() == pattern.len()).then_some(params)
}

/// Register every pattern that the tree accepts; return the accepted ones.
fn build(patterns: &[String]) -> (Node<String>, Vec<String>) {
    let mut root = Node::new();
    let accepted: Vec<String> = patterns
        .iter()
        .filter(|p| root.register(p.as_bytes(), (*p).clone()).is_ok())
        .cloned()
        .collect();
    (root, accepted)
}

fn found(lookup: &Lookup<'_, '_, String>) -> Option<(String, Vec<(String, String)>)> {
    match lookup {
        Lookup::Found { handler, params } => {
            Some(((*handler).clone(), params.to_url_params().0))
        }
        _ => None,
    }
}

/// `path` with its trailing `/` removed, or with one added.
fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => format!("{path}/"),
    }
}

proptest! {
    #[test]
    fn lookup_agrees_with_brute_force(
        patterns in prop::collection::vec(pattern(), 1..6),
        picks in prop::collection::vec(0usize..64, 1..8),
    ) {
        let (root, accepted) = build(&patterns);

        for (i, pattern) in accepted.iter().enumerate() {
            let path = instantiate(pattern, &picks[i % picks.len()..]);
            let matches: Vec<_> = accepted
                .iter()
                .filter_map(|p| reference(p, &path, false).map(|params| (p.clone(), params)))
                .collect();
            if matches.len() != 1 {
                continue;
            }

            let lookup = root.lookup(path.as_bytes());
            prop_assert_eq!(found(&lookup), Some(matches[0].clone()), "path {}", path);
        }
    }

    #[test]
    fn lookup_never_invents_matches(
        patterns in prop::collection::vec(pattern(), 1..6),
        segments in prop::collection::vec(
            prop::sample::select(&["", "a", "b", "ab", "ba", "c", "x", "q"][..]),
            1..5,
        ),
    ) {
        let (root, accepted) = build(&patterns);
        let path = format!("/{}", segments.join("/"));

        if accepted.iter().all(|p| reference(p, &path, true).is_none()) {
            prop_assert!(!root.lookup(path.as_bytes()).is_found(), "path {}", path);
        }
    }

    #[test]
    fn lookup_is_idempotent(
        patterns in prop::collection::vec(pattern(), 1..6),
        picks in prop::collection::vec(0usize..64, 1..8),
    ) {
        let (root, accepted) = build(&patterns);

        for pattern in &accepted {
            let path = instantiate(pattern, &picks);
            for probe in [path.clone(), format!("{path}/"), path.trim_end_matches('/').to_string()] {
                prop_assert_eq!(root.lookup(probe.as_bytes()), root.lookup(probe.as_bytes()));
            }
        }
    }

    #[test]
    fn registration_order_does_not_change_lookups(
        patterns in prop::collection::vec(pattern(), 1..6),
        picks in prop::collection::vec(0usize..64, 1..8),
    ) {
        let (forward, accepted) = build(&patterns);
        let reversed: Vec<String> = accepted.iter().rev().cloned().collect();
        let (backward, again) = build(&reversed);
        prop_assert_eq!(again.len(), accepted.len());

        for pattern in &accepted {
            let path = instantiate(pattern, &picks);
            prop_assert_eq!(
                found(&forward.lookup(path.as_bytes())),
                found(&backward.lookup(path.as_bytes()))
            );
        }
    }

    #[test]
    fn redirect_target_is_found(
        patterns in prop::collection::vec(pattern(), 1..6),
        picks in prop::collection::vec(0usize..64, 1..8),
        segments in prop::collection::vec(
            prop::sample::select(&["", "a", "b", "ab", "ba", "c", "x", "q"][..]),
            1..5,
        ),
    ) {
        let (root, accepted) = build(&patterns);

        let mut probes = vec![format!("/{}", segments.join("/"))];
        for pattern in &accepted {
            let path = instantiate(pattern, &picks);
            probes.push(toggle_trailing_slash(&path));
            probes.push(format!("{path}//"));
            probes.push(path);
        }

        for path in probes {
            if root.lookup(path.as_bytes()).is_redirect() {
                let target = toggle_trailing_slash(&path);
                prop_assert!(
                    root.lookup(target.as_bytes()).is_found(),
                    "{} redirects but {} is not found",
                    path,
                    target
                );
            }
        }
    }
}
