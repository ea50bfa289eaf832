//! Turns hrefs into navigations.
//!
//! Every navigation gets a ticket from a shared generation counter. Only the
//! newest ticket may commit, so when loads finish out of order the last
//! navigation wins.

use crate::error::{NoMatchSnafu, UnknownRouteSnafu};
use crate::router::history::{BaseUrl, History};
use crate::router::pattern::Params;
use crate::router::table::{RouteMatch, RouteTable};
use crate::task::{TaskHandle, TaskTracker};
use snafu::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A committed position in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub path: String,
    pub href: String,
    /// Set when this entry was reached by a redirect.
    pub redirect: Option<Redirect>,
}

/// Why a navigation ended up somewhere other than where it was aimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub from: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while no newer navigation has been issued.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Push,
    Back,
}

/// A navigation in flight.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub ticket: Ticket,
    pub kind: NavigationKind,
    pub location: Location,
    pub matched: RouteMatch,
    pub redirect: Option<Redirect>,
}

#[derive(Debug)]
pub struct Navigator {
    table: Arc<RouteTable>,
    base: BaseUrl,
    fallback: Option<String>,
    history: Option<History<Location>>,
    latest: Arc<AtomicU64>,
    loads: TaskTracker,
}

impl Navigator {
    pub fn new(table: RouteTable, base: BaseUrl) -> Self {
        Self {
            table: Arc::new(table),
            base,
            fallback: None,
            history: None,
            latest: Arc::new(AtomicU64::new(0)),
            loads: TaskTracker::new(),
        }
    }

    /// Redirect unmatched paths and failed loads to the named route.
    pub fn with_fallback(mut self, name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        ensure!(self.table.get(&name).is_some(), UnknownRouteSnafu { name: &name });
        self.fallback = Some(name);
        Ok(self)
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn current(&self) -> Option<&Location> {
        self.history.as_ref().map(History::current)
    }

    pub fn can_go_back(&self) -> bool {
        self.history.as_ref().is_some_and(History::can_go_back)
    }

    /// Start navigating to `target`, superseding any navigation in flight.
    pub fn begin(&mut self, target: &str) -> crate::Result<Navigation> {
        let path = self.base.strip(strip_query(target));

        if let Some(matched) = self.table.match_path(path) {
            tracing::debug!(path, route = %matched.name, "route matched");
            return Ok(self.issue(NavigationKind::Push, matched, None, true));
        }

        let reason = format!("no route matches '{path}'");
        match self.fallback_match()? {
            Some(matched) => {
                tracing::warn!(path, fallback = %matched.name, "unmatched path, redirecting");
                let redirect = Redirect { from: path.to_owned(), reason };
                Ok(self.issue(NavigationKind::Push, matched, Some(redirect), true))
            }
            None => NoMatchSnafu { path }.fail(),
        }
    }

    /// Start navigating to the previous history entry.
    pub fn begin_back(&mut self) -> Option<Navigation> {
        let previous = self.history.as_ref()?.peek_back()?.clone();
        let matched = self.table.match_path(&previous.path)?;
        Some(self.issue(NavigationKind::Back, matched, previous.redirect, true))
    }

    /// Redirect a navigation whose view failed to load to the fallback route.
    ///
    /// Returns `None` when there is no fallback, when the failed navigation
    /// was already headed there, or when it has been superseded.
    pub fn recover(&mut self, failed: &Navigation, error: &crate::Error) -> Option<Navigation> {
        if !failed.ticket.is_current() {
            return None;
        }
        let fallback = self.fallback.as_deref()?;
        if failed.matched.name == fallback {
            return None;
        }
        let matched = self.fallback_match().ok().flatten()?;
        let redirect = Redirect { from: failed.location.path.clone(), reason: error.to_string() };
        tracing::warn!(from = %redirect.from, %error, "view failed to load, redirecting");
        Some(self.issue(NavigationKind::Push, matched, Some(redirect), false))
    }

    /// Record a finished navigation. Returns false if it was superseded.
    pub fn commit(&mut self, navigation: &Navigation) -> bool {
        if !navigation.ticket.is_current() {
            tracing::debug!(href = %navigation.location.href, "navigation superseded");
            return false;
        }
        match (&mut self.history, navigation.kind) {
            (Some(history), NavigationKind::Push) => history.push(navigation.location.clone()),
            (Some(history), NavigationKind::Back) => {
                history.back();
            }
            (None, _) => self.history = Some(History::new(navigation.location.clone())),
        }
        tracing::info!(href = %navigation.location.href, route = %navigation.location.name, "navigated");
        true
    }

    /// Keep a load task so a newer navigation can abort it.
    pub fn track(&mut self, handle: TaskHandle) {
        self.loads.track(handle);
    }

    /// Href of a named route, including the base.
    pub fn href(&self, name: &str, params: &Params) -> crate::Result<String> {
        Ok(self.base.join(&self.table.href(name, params)?))
    }

    fn fallback_match(&self) -> crate::Result<Option<RouteMatch>> {
        match &self.fallback {
            Some(name) => Ok(Some(self.table.match_name(name, &Params::new())?)),
            None => Ok(None),
        }
    }

    fn issue(
        &mut self,
        kind: NavigationKind,
        matched: RouteMatch,
        redirect: Option<Redirect>,
        supersede: bool,
    ) -> Navigation {
        if supersede {
            self.loads.abort_all();
        }
        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let location = Location {
            name: matched.name.clone(),
            path: matched.path.clone(),
            href: self.base.join(&matched.path),
            redirect: redirect.clone(),
        };
        Navigation {
            ticket: Ticket { id, latest: Arc::clone(&self.latest) },
            kind,
            location,
            matched,
            redirect,
        }
    }
}

fn strip_query(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Context;
    use crate::component::Component;
    use crate::router::lazy::{LazyView, view_factory};

    struct Blank;

    impl Component for Blank {
        fn render(&mut self, _frame: &mut ratatui::Frame, _cx: &mut Context<Self>) {}
    }

    fn blank() -> LazyView {
        LazyView::ready(view_factory(|_| Blank))
    }

    fn navigator(base: &str) -> Navigator {
        let table = crate::routes! {
            "/" => Home(blank()),
            "/post/:id" => PostDetails(blank()) with props,
            "/error" => Error(blank()),
        };
        Navigator::new(table.unwrap(), BaseUrl::new(base))
    }

    #[test]
    fn begin_strips_base_and_query() {
        let mut nav = navigator("/news/");
        let n = nav.begin("/news/post/42?tab=comments#top").unwrap();
        assert_eq!(n.matched.name, "PostDetails");
        assert_eq!(n.matched.props.get("id"), Some("42"));
        assert_eq!(n.location.href, "/news/post/42");
        assert!(n.redirect.is_none());
    }

    #[test]
    fn unmatched_path_without_fallback_is_an_error() {
        let mut nav = navigator("/");
        let err = nav.begin("/unknown").unwrap_err();
        assert!(matches!(err, crate::Error::NoMatch { ref path } if path == "/unknown"));
    }

    #[test]
    fn unmatched_path_with_fallback_redirects() {
        let mut nav = navigator("/").with_fallback("Error").unwrap();
        let n = nav.begin("/unknown").unwrap();
        assert_eq!(n.location.name, "Error");
        assert_eq!(n.location.path, "/error");
        let redirect = n.redirect.unwrap();
        assert_eq!(redirect.from, "/unknown");
    }

    #[test]
    fn fallback_must_name_a_route() {
        assert!(matches!(
            navigator("/").with_fallback("Missing"),
            Err(crate::Error::UnknownRoute { .. })
        ));
    }

    #[test]
    fn last_navigation_wins() {
        let mut nav = navigator("/");
        let first = nav.begin("/post/1").unwrap();
        let second = nav.begin("/post/2").unwrap();
        assert!(!first.ticket.is_current());
        assert!(second.ticket.is_current());

        assert!(!nav.commit(&first));
        assert!(nav.current().is_none());
        assert!(nav.commit(&second));
        assert_eq!(nav.current().unwrap().path, "/post/2");
    }

    #[test]
    fn back_returns_to_previous_entry() {
        let mut nav = navigator("/");
        let home = nav.begin("/").unwrap();
        nav.commit(&home);
        let post = nav.begin("/post/3").unwrap();
        nav.commit(&post);
        assert!(nav.can_go_back());

        let back = nav.begin_back().unwrap();
        assert_eq!(back.kind, NavigationKind::Back);
        assert_eq!(back.location.path, "/");
        assert!(nav.commit(&back));
        assert_eq!(nav.current().unwrap().name, "Home");
        assert!(!nav.can_go_back());
        assert!(nav.begin_back().is_none());
    }

    #[test]
    fn back_to_a_redirected_entry_keeps_the_redirect() {
        let mut nav = navigator("/").with_fallback("Error").unwrap();
        let missing = nav.begin("/unknown").unwrap();
        assert!(nav.commit(&missing));
        let home = nav.begin("/").unwrap();
        assert!(nav.commit(&home));
        assert!(nav.current().unwrap().redirect.is_none());

        let back = nav.begin_back().unwrap();
        assert_eq!(back.location.name, "Error");
        let redirect = back.redirect.as_ref().unwrap();
        assert_eq!(redirect.from, "/unknown");
        assert!(redirect.reason.contains("no route matches"));
        assert!(nav.commit(&back));
        assert_eq!(nav.current().unwrap().redirect.as_ref(), Some(redirect));
    }

    #[test]
    fn recover_redirects_once() {
        let mut nav = navigator("/").with_fallback("Error").unwrap();
        let failed = nav.begin("/post/5").unwrap();
        let error = crate::Error::ViewLoad { route: "PostDetails".into(), message: "boom".into() };

        let recovery = nav.recover(&failed, &error).unwrap();
        assert_eq!(recovery.location.name, "Error");
        assert_eq!(recovery.redirect.as_ref().unwrap().from, "/post/5");
        assert!(recovery.redirect.as_ref().unwrap().reason.contains("boom"));

        assert!(nav.recover(&recovery, &error).is_none());
    }

    #[test]
    fn href_includes_base() {
        let nav = navigator("/news");
        let params: Params = [("id", "8")].into_iter().collect();
        assert_eq!(nav.href("PostDetails", &params).unwrap(), "/news/post/8");
    }
}
