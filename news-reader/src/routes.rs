//! The application's route table.

use crate::config::Config;
use crate::feed::FeedSource;
use crate::model::AppState;
use crate::pages;
use news_nexus::{Entity, Navigator, RouteTable};
use std::sync::Arc;

/// Route every unmatched path and failed view load ends up on.
pub const FALLBACK: &str = "Error";

/// What views are built from.
#[derive(Debug, Clone)]
pub struct ViewEnv {
    pub feed: Arc<FeedSource>,
    pub config: Arc<Config>,
    pub state: Entity<AppState>,
}

impl ViewEnv {
    pub fn new(config: Config, state: Entity<AppState>) -> Self {
        Self {
            feed: Arc::new(FeedSource::from_path(config.data.clone())),
            config: Arc::new(config),
            state,
        }
    }

    /// Href for an application path under the configured base.
    pub fn link(&self, path: &str) -> String {
        self.config.base_url.join(path)
    }
}

pub fn table(env: &ViewEnv) -> news_nexus::Result<RouteTable> {
    news_nexus::routes!(
        "/" => Home(pages::home::view(env)),
        "/post/:id" => PostDetails(pages::post_details::view(env)) with props,
        "/profile" => Profile(pages::profile::view(env)),
        "/settings" => Settings(pages::settings::view(env)),
        "/error" => Error(pages::error::view(env)),
    )
}

pub fn navigator(env: &ViewEnv) -> news_nexus::Result<Navigator> {
    Navigator::new(table(env)?, env.config.base_url.clone()).with_fallback(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_nexus::Params;

    fn env() -> ViewEnv {
        ViewEnv::new(Config::default(), Entity::new(AppState::default()))
    }

    #[tokio::test]
    async fn every_declared_path_resolves() {
        let table = table(&env()).unwrap();
        let cases = [
            ("/", "Home"),
            ("/post/1", "PostDetails"),
            ("/profile", "Profile"),
            ("/settings", "Settings"),
            ("/error", "Error"),
        ];
        for (path, name) in cases {
            let matched = table.match_path(path).unwrap();
            assert_eq!(matched.name, name);
            assert!(table.load(&matched).await.is_ok(), "{name} failed to load");
        }
    }

    #[tokio::test]
    async fn views_load_on_first_navigation_only() {
        let table = table(&env()).unwrap();
        let home = table.get("Home").unwrap().view();
        assert!(!home.is_loaded());

        let matched = table.match_path("/").unwrap();
        table.load(&matched).await.unwrap();
        table.load(&matched).await.unwrap();
        assert_eq!(home.attempts(), 1);
        assert!(!table.get("Profile").unwrap().view().is_loaded());
    }

    #[test]
    fn post_id_is_delivered_as_a_prop() {
        let table = table(&env()).unwrap();
        let matched = table.match_path("/post/42").unwrap();
        assert_eq!(matched.props.get("id"), Some("42"));

        let settings = table.match_path("/settings").unwrap();
        assert!(settings.props.is_empty());
    }

    #[test]
    fn table_has_no_catch_all() {
        let table = table(&env()).unwrap();
        assert_eq!(table.len(), 5);
        assert!(table.match_path("/unknown").is_none());
    }

    #[test]
    fn unknown_paths_fall_back_to_error() {
        let mut navigator = navigator(&env()).unwrap();
        let navigation = navigator.begin("/unknown").unwrap();
        assert_eq!(navigation.location.name, FALLBACK);
        assert_eq!(navigation.redirect.unwrap().from, "/unknown");
    }

    #[test]
    fn links_respect_base_url() {
        let config = Config { base_url: news_nexus::BaseUrl::new("/news"), ..Config::default() };
        let env = ViewEnv::new(config, Entity::new(AppState::default()));
        assert_eq!(env.link("/post/42"), "/news/post/42");

        let navigator = navigator(&env).unwrap();
        let params: Params = [("id", "42")].into_iter().collect();
        assert_eq!(navigator.href("PostDetails", &params).unwrap(), "/news/post/42");
    }
}
