//! Component module.

pub mod traits;

pub use traits::{Action, AnyComponent, Component, Event};
