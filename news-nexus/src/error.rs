use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to lock shared state: poisoned"))]
    LockPoisoned,

    #[snafu(display("Invalid route pattern '{pattern}': {reason}"))]
    InvalidPattern { pattern: String, reason: String },

    #[snafu(display("Route name '{name}' is declared more than once"))]
    DuplicateRoute { name: String },

    #[snafu(display("No route named '{name}'"))]
    UnknownRoute { name: String },

    #[snafu(display("Route '{route}' needs parameter '{param}'"))]
    MissingParam { route: String, param: String },

    #[snafu(display("No route matches '{path}'"))]
    NoMatch { path: String },

    #[snafu(display("Failed to load view for '{route}': {message}"))]
    ViewLoad { route: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
