//! Path patterns such as `/post/:id`.
//!
//! Segments are static text, `:name` parameters, or a trailing `*` / `*name`
//! catch-all that swallows the rest of the path. Empty segments are ignored,
//! so `/profile/` matches `/profile`. Static segments compare
//! ASCII-case-insensitively.

use crate::error::{InvalidPatternSnafu, MissingParamSnafu};
use snafu::prelude::*;
use std::borrow::Cow;
use std::collections::BTreeMap;

const DEFAULT_CATCH_ALL: &str = "pathMatch";

/// Named values captured from a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

/// Parameters handed to a view as named inputs.
pub type Props = Params;

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> crate::Result<Self> {
        ensure!(
            raw.starts_with('/'),
            InvalidPatternSnafu { pattern: raw, reason: "must start with '/'" }
        );

        let parts: Vec<&str> = segments_of(raw).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                ensure!(
                    is_identifier(name),
                    InvalidPatternSnafu { pattern: raw, reason: format!("bad parameter name '{name}'") }
                );
                Segment::Param(name.to_owned())
            } else if let Some(name) = part.strip_prefix('*') {
                ensure!(
                    i + 1 == parts.len(),
                    InvalidPatternSnafu { pattern: raw, reason: "catch-all must be the last segment" }
                );
                let name = if name.is_empty() { DEFAULT_CATCH_ALL } else { name };
                ensure!(
                    is_identifier(name),
                    InvalidPatternSnafu { pattern: raw, reason: format!("bad parameter name '{name}'") }
                );
                Segment::CatchAll(name.to_owned())
            } else {
                Segment::Static((*part).to_owned())
            };

            if let Segment::Param(name) | Segment::CatchAll(name) = &segment {
                let taken = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(n) | Segment::CatchAll(n) if n == name));
                ensure!(
                    !taken,
                    InvalidPatternSnafu { pattern: raw, reason: format!("duplicate parameter '{name}'") }
                );
            }
            segments.push(segment);
        }

        Ok(Self { raw: raw.to_owned(), segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    /// Match a concrete path, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = segments_of(path).collect();
        let mut params = Params::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(text) => {
                    let part = parts.get(i)?;
                    if !part.eq_ignore_ascii_case(text) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let part = parts.get(i)?;
                    params.insert(name.as_str(), decode(part));
                }
                Segment::CatchAll(name) => {
                    let rest = parts.get(i..).unwrap_or_default();
                    let joined = rest.iter().map(|p| decode(p)).collect::<Vec<_>>().join("/");
                    params.insert(name.as_str(), joined);
                    return Some(params);
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// Build a concrete path from parameters. `route` names the route in errors.
    pub fn build(&self, route: &str, params: &Params) -> crate::Result<String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .context(MissingParamSnafu { route, param: name.as_str() })?;
                    path.push_str(&urlencoding::encode(value));
                }
                Segment::CatchAll(name) => {
                    let value = params.get(name).unwrap_or_default();
                    let encoded: Vec<Cow<'_, str>> = value
                        .split('/')
                        .filter(|p| !p.is_empty())
                        .map(urlencoding::encode)
                        .collect();
                    path.push_str(&encoded.join("/"));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

fn segments_of(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map(Cow::into_owned).unwrap_or_else(|_| raw.to_owned())
}
