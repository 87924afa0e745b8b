//! Compressed prefix tree of path patterns.
//!
//! # Responsibilities
//! - Insert patterns, splitting nodes on partial prefix matches
//! - Reject patterns that are ambiguous with registered ones
//! - Resolve request paths to a handler and captured parameters
//! - Infer trailing-slash redirects when no exact match exists
//!
//! # Design Decisions
//! - Each node owns its children; no back references are stored
//! - Children are sorted by first byte and searched by binary search
//! - A wildcard always occupies its own node and is then the only child
//! - Registration is single-writer; a finished tree is read-only and
//!   shared freely across threads
//!
//! # Shape
//! ```text
//! /aa/:version1/            / [#]
//! /aa/:version1/:version2/  └─ aa
//!                              └─ /
//!                                 └─ :version1
//!                                    └─ / [#]
//!                                       └─ :version2
//!                                          └─ / [#]
//! ```

use std::mem;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::params::Params;
use crate::routing::path::{
    find_wildcard, is_slash, is_wildcard, is_wildcard_segment, longest_common_prefix, verify,
    CATCH_ALL, PARAM,
};

/// A tree vertex: a path fragment, sorted children and an optional handler.
#[derive(Debug, Clone)]
pub struct Node<H> {
    path: Vec<u8>,
    children: Vec<Node<H>>,
    handler: Option<H>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            children: Vec::new(),
            handler: None,
        }
    }
}

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'t, 'p, H> {
    /// Exact match.
    Found {
        handler: &'t H,
        params: Params<'t, 'p>,
    },
    /// No exact match, but the path with a trailing `/` added or removed has one.
    Redirect,
    /// Neither the path nor its trailing-slash variant matches.
    NotFound,
}

impl<'t, 'p, H> Lookup<'t, 'p, H> {
    fn redirect_if(tsr: bool) -> Self {
        if tsr {
            Self::Redirect
        } else {
            Self::NotFound
        }
    }

    pub fn handler(&self) -> Option<&'t H> {
        match self {
            Self::Found { handler, .. } => Some(*handler),
            _ => None,
        }
    }

    pub fn params(&self) -> Option<&Params<'t, 'p>> {
        match self {
            Self::Found { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect)
    }
}

impl<H> Node<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Insert `path` bound to `handler`.
    ///
    /// Fails on invalid syntax, on a duplicate pattern and on any pattern that
    /// would be ambiguous with an already registered one. A failed call may
    /// leave nodes split, which never changes what the tree resolves.
    pub fn register(&mut self, path: &[u8], handler: H) -> RouteResult<()> {
        verify(path).map_err(|reason| RouteError::InvalidPath {
            path: String::from_utf8_lossy(path).into_owned(),
            reason,
        })?;

        let full_path = path;
        let mut path = path;
        // Bytes from the root down to the current node.
        let mut tree_path: Vec<u8> = Vec::with_capacity(full_path.len());
        let mut n = self;

        loop {
            if n.path.is_empty() {
                *n = Node::chain(path, handler);
                return Ok(());
            }

            let l = longest_common_prefix(&n.path, path);

            // A parameter node only admits the exact same name, followed by
            // the end of the pattern or a '/'.
            if n.path[0] == PARAM && !(l == n.path.len() && (l == path.len() || path[l] == b'/'))
            {
                n.write_leftmost_path(&mut tree_path);
                return Err(RouteError::conflict(full_path, &tree_path));
            }

            if l < n.path.len() {
                n.split(l);
            }

            tree_path.extend_from_slice(&n.path);

            if l == path.len() {
                if n.handler.is_some() {
                    return Err(RouteError::Duplicate {
                        path: String::from_utf8_lossy(full_path).into_owned(),
                    });
                }
                if let Some(child) = n.wildcard_child().filter(|c| c.handler.is_some()) {
                    child.write_leftmost_path(&mut tree_path);
                    return Err(RouteError::conflict(full_path, &tree_path));
                }
                n.handler = Some(handler);
                return Ok(());
            }

            path = &path[l..];

            if let Some(i) = n.child_index(path[0]) {
                if n.handler.is_some() && is_wildcard_segment(path) {
                    return Err(RouteError::conflict(full_path, &tree_path));
                }
                if n.children[i].path[0] == CATCH_ALL {
                    n.children[i].write_leftmost_path(&mut tree_path);
                    return Err(RouteError::conflict(full_path, &tree_path));
                }
                n = &mut n.children[i];
                continue;
            }

            // No child starts with path[0]. A new branch is only allowed when
            // it is literal and this node has no wildcard child, and a
            // wildcard may only start a branch under a leaf.
            if is_wildcard_segment(path)
                || n.is_wildcard_parent()
                || (is_wildcard(path[0]) && !n.is_leaf())
            {
                if let Some(first) = n.children.first() {
                    first.write_leftmost_path(&mut tree_path);
                }
                return Err(RouteError::conflict(full_path, &tree_path));
            }

            let at = n.children.partition_point(|c| c.path[0] < path[0]);
            n.children.insert(at, Node::chain(path, handler));
            return Ok(());
        }
    }

    /// Resolve `path` against the tree.
    ///
    /// Never fails: a path not starting with `/` is simply not found.
    pub fn lookup<'t, 'p>(&'t self, path: &'p [u8]) -> Lookup<'t, 'p, H> {
        if path.first() != Some(&b'/') || self.is_empty() {
            return Lookup::NotFound;
        }

        let mut n = self;
        let mut parent: Option<&'t Node<H>> = None;
        let mut path = path;
        let mut params = Params::new();

        loop {
            match n.path[0] {
                CATCH_ALL => {
                    params.push(&n.path[1..], path);
                    return match &n.handler {
                        Some(handler) => Lookup::Found { handler, params },
                        None => Lookup::NotFound,
                    };
                }
                PARAM => {
                    let key = &n.path[1..];
                    match path.iter().position(|&c| c == b'/') {
                        Some(end) => {
                            params.push(key, &path[..end]);
                            path = &path[end..];
                            match n.child(b'/') {
                                Some(child) => {
                                    parent = Some(n);
                                    n = child;
                                }
                                None => {
                                    return Lookup::redirect_if(is_slash(path) && n.can_handle())
                                }
                            }
                        }
                        None => {
                            if let Some(handler) = &n.handler {
                                params.push(key, path);
                                return Lookup::Found { handler, params };
                            }
                            return Lookup::redirect_if(Self::is_slash_leaf(n.child(b'/')));
                        }
                    }
                }
                _ => {
                    let l = longest_common_prefix(&n.path, path);

                    if l < n.path.len() {
                        // Either the path is one '/' past the parent, or it stops
                        // exactly one '/' short of this node.
                        let tsr = (is_slash(path) && parent.is_some_and(Node::can_handle))
                            || (path.last() != Some(&b'/')
                                && l == path.len()
                                && l + 1 == n.path.len()
                                && n.path[l] == b'/'
                                && n.can_handle());
                        return Lookup::redirect_if(tsr);
                    }

                    if l == path.len() {
                        if let Some(handler) = &n.handler {
                            return Lookup::Found { handler, params };
                        }

                        // Empty value for a wildcard hanging right below.
                        if let Some(child) = n.wildcard_child().filter(|c| c.handler.is_some()) {
                            n = child;
                            path = &[];
                            continue;
                        }

                        if path.last() == Some(&b'/') {
                            return Lookup::redirect_if(
                                is_slash(path) && parent.is_some_and(Node::can_handle),
                            );
                        }

                        if Self::is_slash_leaf(n.child(b'/')) {
                            return Lookup::Redirect;
                        }

                        let through_wildcard = n.wildcard_child().and_then(|w| w.child(b'/'));
                        return Lookup::redirect_if(Self::is_slash_leaf(through_wildcard));
                    }

                    path = &path[l..];

                    match n.wildcard_child().or_else(|| n.child(path[0])) {
                        Some(child) => {
                            parent = Some(n);
                            n = child;
                        }
                        None => return Lookup::redirect_if(n.can_handle() && is_slash(path)),
                    }
                }
            }
        }
    }

    /// Build the chain of nodes for a pattern suffix that has no existing
    /// branch. Every wildcard token gets a node of its own.
    fn chain(path: &[u8], handler: H) -> Self {
        let (head, rest) = match find_wildcard(path) {
            Some((0, wildcard)) => path.split_at(wildcard.len()),
            Some((start, _)) => path.split_at(start),
            None => (path, &[][..]),
        };

        if rest.is_empty() {
            return Self {
                path: head.to_vec(),
                children: Vec::new(),
                handler: Some(handler),
            };
        }

        Self {
            path: head.to_vec(),
            children: vec![Self::chain(rest, handler)],
            handler: None,
        }
    }

    /// Demote everything past `at` into a single new child.
    fn split(&mut self, at: usize) {
        let child = Self {
            path: self.path[at..].to_vec(),
            children: mem::take(&mut self.children),
            handler: self.handler.take(),
        };
        self.path.truncate(at);
        self.children = vec![child];
    }

    fn child_index(&self, first: u8) -> Option<usize> {
        self.children
            .binary_search_by(|c| c.path[0].cmp(&first))
            .ok()
    }

    fn child(&self, first: u8) -> Option<&Self> {
        self.child_index(first).map(|i| &self.children[i])
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn wildcard_child(&self) -> Option<&Self> {
        match self.children.as_slice() {
            [only] if is_wildcard(only.path[0]) => Some(only),
            _ => None,
        }
    }

    fn is_wildcard_parent(&self) -> bool {
        self.wildcard_child().is_some()
    }

    /// Whether a path ending exactly at this node resolves to a handler,
    /// directly or through an empty wildcard value.
    fn can_handle(&self) -> bool {
        self.handler.is_some() || self.wildcard_child().is_some_and(|c| c.handler.is_some())
    }

    fn is_slash_leaf(node: Option<&Self>) -> bool {
        node.is_some_and(|n| n.can_handle() && is_slash(&n.path))
    }

    /// Append the bytes from this node down to its left-most descendant.
    fn write_leftmost_path(&self, buf: &mut Vec<u8>) {
        let mut n = self;
        loop {
            buf.extend_from_slice(&n.path);
            match n.children.first() {
                Some(child) => n = child,
                None => break,
            }
        }
    }
}
