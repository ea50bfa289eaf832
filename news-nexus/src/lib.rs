//! Reactive terminal UI runtime with path-based routing and on-demand views.

pub mod application;
pub mod component;
pub mod error;
pub mod router;
pub mod state;
pub mod task;

pub use error::{Error, Result};

pub use application::{AppContext, Application, Context, EventContext};
pub use component::{Action, AnyComponent, Component, Event};
pub use router::{
    BaseUrl, BoxError, History, LazyView, Location, Navigation, Navigator, Params, Props, Redirect,
    RouteDef, RouteMatch, RouteTable, RouterOutlet, ViewContext, ViewFactory, view_factory,
};
pub use state::Entity;
pub use task::{TaskHandle, TaskTracker};
