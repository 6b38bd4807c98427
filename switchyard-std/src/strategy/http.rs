//! HTTP request matching.
//!
//! Match specs look like `"GET /users/{id}"`: a method (or `*` for any
//! method) followed by a path pattern. Patterns are compiled into a segment
//! trie so every candidate for a path is found in one walk, however many
//! routes are registered.

use std::{collections::HashMap, sync::Arc};
use switchyard_core::{
    Event, HandlerEntry, MatchSpecError, MatchStrategy, Params, RouteMatch, Specificity,
};

const LITERAL_RANK: u16 = 2;
const PARAM_RANK: u16 = 1;
const CATCH_ALL_RANK: u16 = 0;

const EXACT_METHOD_RANK: u16 = 2;
const HEAD_AS_GET_RANK: u16 = 1;
const ANY_METHOD_RANK: u16 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

impl Segment {
    fn rank(&self) -> u16 {
        match self {
            Segment::Literal(_) => LITERAL_RANK,
            Segment::Param(_) => PARAM_RANK,
            Segment::CatchAll(_) => CATCH_ALL_RANK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HttpSpec {
    /// `None` matches any method.
    method: Option<String>,
    segments: Vec<Segment>,
}

impl HttpSpec {
    fn parse(spec: &str) -> Result<Self, MatchSpecError> {
        let mut parts = spec.split_whitespace();
        let (Some(method), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(MatchSpecError::new(
                "expected \"<METHOD> <path>\", e.g. \"GET /users/{id}\"",
            ));
        };

        let method = match method {
            "*" => None,
            token if is_method_token(token) => Some(token.to_ascii_uppercase()),
            token => {
                return Err(MatchSpecError::new(format!("invalid HTTP method {token:?}")));
            }
        };

        Ok(Self {
            method,
            segments: parse_path(path)?,
        })
    }

    fn method_rank(&self, method: &str) -> Option<u16> {
        match self.method.as_deref() {
            None => Some(ANY_METHOD_RANK),
            Some(expected) if expected == method => Some(EXACT_METHOD_RANK),
            Some("GET") if method == "HEAD" => Some(HEAD_AS_GET_RANK),
            Some(_) => None,
        }
    }

    fn capture(&self, path: &[&str]) -> Params {
        let mut params = Params::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(_) => {}
                Segment::Param(name) => params.push(name.as_str(), path[index]),
                Segment::CatchAll(name) => params.push(name.as_str(), path[index..].join("/")),
            }
        }
        params
    }
}

fn is_method_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-')
}

fn parse_path(path: &str) -> Result<Vec<Segment>, MatchSpecError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(MatchSpecError::new(format!("path {path:?} must start with '/'")));
    };
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let raw: Vec<&str> = rest.split('/').collect();
    let mut segments = Vec::with_capacity(raw.len());
    let mut names: Vec<&str> = Vec::new();

    for (index, part) in raw.iter().enumerate() {
        if part.is_empty() {
            return Err(MatchSpecError::new(format!("path {path:?} has an empty segment")));
        }
        let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(inner) => {
                let (name, catch_all) = match inner.strip_prefix('*') {
                    Some(name) => (name, true),
                    None => (inner, false),
                };
                if name.is_empty() || name.contains(['{', '}', '*']) {
                    return Err(MatchSpecError::new(format!(
                        "invalid parameter {part:?} in path {path:?}"
                    )));
                }
                if names.contains(&name) {
                    return Err(MatchSpecError::new(format!(
                        "duplicate parameter {name:?} in path {path:?}"
                    )));
                }
                if catch_all && index + 1 != raw.len() {
                    return Err(MatchSpecError::new(format!(
                        "catch-all {part:?} must be the last segment of {path:?}"
                    )));
                }
                names.push(name);
                if catch_all {
                    Segment::CatchAll(name.to_owned())
                } else {
                    Segment::Param(name.to_owned())
                }
            }
            None if part.contains(['{', '}']) => {
                return Err(MatchSpecError::new(format!(
                    "stray brace in segment {part:?} of {path:?}"
                )));
            }
            None => Segment::Literal((*part).to_owned()),
        };
        segments.push(segment);
    }

    Ok(segments)
}

/// Split a request path into segments, ignoring one trailing slash.
fn split_request_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    }
}

/// A trie node keyed by path segment.
#[derive(Default, Clone)]
struct Node {
    literals: HashMap<String, Node>,
    param: Option<Box<Node>>,
    /// Routes whose pattern ends at this node.
    terminal: Vec<usize>,
    /// Routes whose pattern ends with a catch-all below this node.
    catch_all: Vec<usize>,
}

impl Node {
    fn insert(&mut self, segments: &[Segment], index: usize) {
        let mut node = self;
        for segment in segments {
            match segment {
                Segment::Literal(text) => node = node.literals.entry(text.clone()).or_default(),
                Segment::Param(_) => node = node.param.get_or_insert_with(Box::default).as_mut(),
                Segment::CatchAll(_) => {
                    node.catch_all.push(index);
                    return;
                }
            }
        }
        node.terminal.push(index);
    }

    fn collect(&self, path: &[&str], found: &mut Vec<usize>) {
        let Some((head, tail)) = path.split_first() else {
            found.extend_from_slice(&self.terminal);
            return;
        };
        found.extend_from_slice(&self.catch_all);
        if let Some(child) = self.literals.get(*head) {
            child.collect(tail, found);
        }
        if let Some(child) = self.param.as_deref().filter(|_| !head.is_empty()) {
            child.collect(tail, found);
        }
    }
}

/// Matching strategy for the `http` kind.
///
/// Within equal priority, literal segments outrank `{param}` segments which
/// outrank a trailing `{*catch_all}`, compared from the left; an explicit
/// method then outranks `*`. `GET` routes also answer `HEAD`.
#[derive(Default, Clone)]
pub struct HttpStrategy {
    routes: Vec<(Arc<HandlerEntry>, HttpSpec)>,
    root: Node,
}

impl HttpStrategy {
    /// Create an empty strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStrategy for HttpStrategy {
    fn name(&self) -> &'static str {
        "http"
    }

    fn insert(&mut self, entry: Arc<HandlerEntry>) -> Result<(), MatchSpecError> {
        let spec = HttpSpec::parse(entry.match_spec())?;
        let index = self.routes.len();
        self.root.insert(&spec.segments, index);
        self.routes.push((entry, spec));
        Ok(())
    }

    fn matches(&self, event: &dyn Event) -> Vec<RouteMatch> {
        let (Some(method), Some(path)) = (event.attribute("method"), event.attribute("path"))
        else {
            return Vec::new();
        };
        let path = split_request_path(path);

        let mut found = Vec::new();
        self.root.collect(&path, &mut found);

        found
            .into_iter()
            .filter_map(|index| {
                let (entry, spec) = &self.routes[index];
                let method_rank = spec.method_rank(method)?;
                let ranks: Vec<u16> = spec
                    .segments
                    .iter()
                    .map(Segment::rank)
                    .chain(std::iter::once(method_rank))
                    .collect();
                Some(
                    RouteMatch::new(Arc::clone(entry), Specificity::new(ranks))
                        .with_params(spec.capture(&path)),
                )
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.routes.len()
    }

    fn entries(&self) -> Vec<Arc<HandlerEntry>> {
        self.routes.iter().map(|(entry, _)| Arc::clone(entry)).collect()
    }

    fn fork(&self) -> Box<dyn MatchStrategy> {
        Box::new(HttpStrategy::new())
    }
}
