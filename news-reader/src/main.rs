//! Terminal news reader built on news-nexus.

mod catalog;
mod config;
mod error;
mod feed;
mod logging;
mod model;
mod pages;
mod routes;
mod shell;

use crate::config::Config;
use crate::shell::Shell;
use news_nexus::Application;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _guard = logging::init(&config)?;
    tracing::info!(base = config.base_url.as_str(), start = %config.start, "starting news reader");

    let result = Application::new().run(move |cx| {
        let shell = Shell::build(config, cx)?;
        cx.set_root(shell)?;
        Ok(())
    });

    if let Err(error) = &result {
        tracing::error!(%error, "news reader exited with an error");
    }
    result
}
