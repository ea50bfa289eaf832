//! Where the catalog comes from.
//!
//! The catalog is loaded on first use and kept; a failed load is retried on
//! the next request.

use crate::catalog::Catalog;
use crate::error::{ReadFeedSnafu, Result};
use snafu::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

const SAMPLE: &str = include_str!("../data/news.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOrigin {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for FeedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => f.write_str("bundled sample"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub struct FeedSource {
    origin: FeedOrigin,
    catalog: OnceCell<Arc<Catalog>>,
}

impl FeedSource {
    pub fn new(origin: FeedOrigin) -> Self {
        Self { origin, catalog: OnceCell::new() }
    }

    pub fn from_path(path: Option<PathBuf>) -> Self {
        Self::new(path.map_or(FeedOrigin::Embedded, FeedOrigin::File))
    }

    pub fn origin(&self) -> &FeedOrigin {
        &self.origin
    }

    /// The loaded catalog, if a load already succeeded.
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.catalog.get().cloned()
    }

    pub async fn catalog(&self) -> Result<Arc<Catalog>> {
        let catalog = self.catalog.get_or_try_init(|| self.load()).await?;
        Ok(Arc::clone(catalog))
    }

    async fn load(&self) -> Result<Arc<Catalog>> {
        let catalog = match &self.origin {
            FeedOrigin::Embedded => Catalog::from_json(SAMPLE)?,
            FeedOrigin::File(path) => {
                let text = tokio::fs::read_to_string(path).await.context(ReadFeedSnafu { path })?;
                Catalog::from_json(&text)?
            }
        };
        for gap in catalog.category_gaps() {
            tracing::warn!(%gap, "category out of step with post labels");
        }
        tracing::info!(
            origin = %self.origin,
            posts = catalog.posts.len(),
            users = catalog.users.len(),
            "feed loaded"
        );
        Ok(Arc::new(catalog))
    }
}
