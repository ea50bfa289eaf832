//! Path-based routing.
//!
//! A [`RouteTable`] maps path patterns to named, lazily-loaded views. The
//! [`Navigator`] resolves hrefs against it and keeps history, and the
//! [`RouterOutlet`] component mounts the view of the current route.

pub mod history;
pub mod lazy;
pub mod navigator;
pub mod outlet;
pub mod pattern;
pub mod table;

pub use history::{BaseUrl, History};
pub use lazy::{BoxError, LazyView, ViewContext, ViewFactory, view_factory};
pub use navigator::{Location, Navigation, NavigationKind, Navigator, Redirect, Ticket};
pub use outlet::RouterOutlet;
pub use pattern::{Params, PathPattern, Props};
pub use table::{PropsMode, Route, RouteDef, RouteMatch, RouteTable, RouteTableBuilder};
