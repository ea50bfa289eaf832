//! Declarative route table.
//!
//! An ordered list of routes; the first entry whose pattern matches a path
//! wins. Each route names a lazily-loaded view and says whether its path
//! parameters are forwarded to the view as props.

use crate::error::{DuplicateRouteSnafu, UnknownRouteSnafu};
use crate::router::lazy::{LazyView, ViewFactory};
use crate::router::pattern::{Params, PathPattern, Props};
use snafu::prelude::*;

/// How path parameters reach the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropsMode {
    /// Parameters stay on the route match only.
    #[default]
    None,
    /// Parameters are also delivered as named props.
    Params,
}

/// A route as declared, before validation.
#[derive(Debug)]
pub struct RouteDef {
    path: String,
    name: String,
    view: LazyView,
    props: PropsMode,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: LazyView) -> Self {
        Self { path: path.into(), name: name.into(), view, props: PropsMode::None }
    }

    /// Forward path parameters to the view as props.
    #[must_use]
    pub fn with_props(mut self) -> Self {
        self.props = PropsMode::Params;
        self
    }
}

#[derive(Debug)]
pub struct Route {
    pattern: PathPattern,
    name: String,
    view: LazyView,
    props: PropsMode,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn props_mode(&self) -> PropsMode {
        self.props
    }

    pub fn view(&self) -> &LazyView {
        &self.view
    }
}

/// Outcome of matching a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub index: usize,
    pub name: String,
    pub path: String,
    pub params: Params,
    pub props: Props,
}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    defs: Vec<RouteDef>,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn route(mut self, def: RouteDef) -> Self {
        self.defs.push(def);
        self
    }

    pub fn build(self) -> crate::Result<RouteTable> {
        let mut routes: Vec<Route> = Vec::with_capacity(self.defs.len());
        for def in self.defs {
            ensure!(
                routes.iter().all(|r| r.name != def.name),
                DuplicateRouteSnafu { name: &def.name }
            );
            routes.push(Route {
                pattern: PathPattern::parse(&def.path)?,
                name: def.name,
                view: def.view,
                props: def.props,
            });
        }
        Ok(RouteTable { routes })
    }
}

#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// First route whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().enumerate().find_map(|(index, route)| {
            let params = route.pattern.matches(path)?;
            let props = match route.props {
                PropsMode::Params => params.clone(),
                PropsMode::None => Props::new(),
            };
            Some(RouteMatch {
                index,
                name: route.name.clone(),
                path: path.to_owned(),
                params,
                props,
            })
        })
    }

    /// Match for a named route, built from `params`.
    pub fn match_name(&self, name: &str, params: &Params) -> crate::Result<RouteMatch> {
        let path = self.href(name, params)?;
        let index = self
            .routes
            .iter()
            .position(|r| r.name == name)
            .context(UnknownRouteSnafu { name })?;
        let route = &self.routes[index];
        let props = match route.props {
            PropsMode::Params => params.clone(),
            PropsMode::None => Props::new(),
        };
        Ok(RouteMatch { index, name: route.name.clone(), path, params: params.clone(), props })
    }

    /// Path of a named route (reverse lookup).
    pub fn href(&self, name: &str, params: &Params) -> crate::Result<String> {
        let route = self.get(name).context(UnknownRouteSnafu { name })?;
        route.pattern.build(name, params)
    }

    /// Resolve the view factory of a match, loading the module on first use.
    pub async fn load(&self, matched: &RouteMatch) -> crate::Result<ViewFactory> {
        let route = self
            .routes
            .get(matched.index)
            .filter(|r| r.name == matched.name)
            .context(UnknownRouteSnafu { name: matched.name.as_str() })?;
        route.view.resolve(&route.name).await
    }
}

/// Declare a [`RouteTable`].
///
/// ```ignore
/// let table = routes! {
///     "/" => Home(home_view()),
///     "/post/:id" => PostDetails(post_view()) with props,
/// };
/// ```
#[macro_export]
macro_rules! routes {
    (@def $path:literal, $name:ident, $view:expr) => {
        $crate::router::RouteDef::new($path, stringify!($name), $view)
    };
    (@def $path:literal, $name:ident, $view:expr, props) => {
        $crate::router::RouteDef::new($path, stringify!($name), $view).with_props()
    };
    ($($path:literal => $name:ident ($view:expr) $(with $mode:ident)?),* $(,)?) => {
        $crate::router::RouteTable::builder()
            $(.route($crate::routes!(@def $path, $name, $view $(, $mode)?)))*
            .build()
    };
}
