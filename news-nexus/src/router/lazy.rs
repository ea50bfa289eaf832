//! On-demand view modules.
//!
//! A [`LazyView`] holds an async loader that produces a [`ViewFactory`]. The
//! loader runs on the first navigation to the route; its result is memoized
//! and every later navigation builds a fresh view from the cached factory.
//! A failed load leaves the cell empty so the next navigation tries again.

use crate::component::traits::{AnyComponent, Component};
use crate::router::navigator::Redirect;
use crate::router::pattern::Props;
use crate::router::table::RouteMatch;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a view is built from.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub route: &'a RouteMatch,
    pub props: &'a Props,
    /// Set when the navigation was redirected here, e.g. to the fallback route.
    pub redirect: Option<&'a Redirect>,
}

/// Builds a view instance for one navigation.
pub type ViewFactory = Arc<dyn Fn(&ViewContext<'_>) -> Box<dyn AnyComponent> + Send + Sync>;

type Loader = Box<dyn Fn() -> BoxFuture<'static, Result<ViewFactory, BoxError>> + Send + Sync>;

/// Wrap a constructor closure as a [`ViewFactory`].
pub fn view_factory<F, V>(build: F) -> ViewFactory
where
    F: Fn(&ViewContext<'_>) -> V + Send + Sync + 'static,
    V: Component,
{
    Arc::new(move |cx: &ViewContext<'_>| Box::new(build(cx)) as Box<dyn AnyComponent>)
}

pub struct LazyView {
    loader: Loader,
    module: OnceCell<ViewFactory>,
    attempts: AtomicUsize,
}

impl LazyView {
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ViewFactory, BoxError>> + Send + 'static,
    {
        Self {
            loader: Box::new(move || loader().boxed()),
            module: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// A view whose module is available up front.
    pub fn ready(factory: ViewFactory) -> Self {
        let cached = Arc::clone(&factory);
        Self {
            loader: Box::new(move || {
                let factory = Arc::clone(&cached);
                async move { Ok(factory) }.boxed()
            }),
            module: OnceCell::new_with(Some(factory)),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.module.initialized()
    }

    /// How many times the loader has been invoked.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    /// Resolve the view module, loading it on first use. `route` names the
    /// route in errors.
    pub async fn resolve(&self, route: &str) -> crate::Result<ViewFactory> {
        let factory = self
            .module
            .get_or_try_init(|| async {
                self.attempts.fetch_add(1, Ordering::AcqRel);
                tracing::debug!(route, "loading view module");
                (self.loader)().await.map_err(|source| crate::Error::ViewLoad {
                    route: route.to_owned(),
                    message: source.to_string(),
                })
            })
            .await?;
        Ok(Arc::clone(factory))
    }
}

impl std::fmt::Debug for LazyView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyView")
            .field("loaded", &self.is_loaded())
            .field("attempts", &self.attempts())
            .finish_non_exhaustive()
    }
}
