pub mod error;
pub mod home;
pub mod post_details;
pub mod profile;
pub mod settings;

use crate::catalog::{Catalog, average_rating};
use crate::model::Theme;
use crate::routes::ViewEnv;
use news_nexus::{BoxError, Component, LazyView, ViewContext, view_factory};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use std::sync::Arc;

/// A view whose module needs the catalog. The feed is read when the route is
/// first visited, and a failing feed fails the navigation.
pub(crate) fn with_catalog<F, V>(env: &ViewEnv, build: F) -> LazyView
where
    F: Fn(&ViewEnv, Arc<Catalog>, &ViewContext<'_>) -> V + Send + Sync + 'static,
    V: Component,
{
    let env = env.clone();
    let build = Arc::new(build);
    LazyView::new(move || {
        let env = env.clone();
        let build = Arc::clone(&build);
        async move {
            let catalog = env.feed.catalog().await?;
            Ok::<_, BoxError>(view_factory(move |cx| build(&env, Arc::clone(&catalog), cx)))
        }
    })
}

/// A view whose module needs nothing but the environment.
pub(crate) fn deferred<F, V>(env: &ViewEnv, build: F) -> LazyView
where
    F: Fn(&ViewEnv, &ViewContext<'_>) -> V + Send + Sync + 'static,
    V: Component,
{
    let env = env.clone();
    let factory = view_factory(move |cx| build(&env, cx));
    LazyView::new(move || {
        let factory = Arc::clone(&factory);
        async move { Ok::<_, BoxError>(factory) }
    })
}

pub(crate) fn panel(title: &str, theme: Theme) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.color()))
}

pub(crate) fn rating_label(ratings: &[f64]) -> String {
    match average_rating(ratings) {
        Some(avg) => format!("★ {avg:.1} ({})", ratings.len()),
        None => "unrated".to_owned(),
    }
}

pub(crate) fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Move a list selection, wrapping at both ends.
pub(crate) fn step(selected: usize, len: usize, forward: bool) -> usize {
    match (len, forward) {
        (0, _) => 0,
        (_, true) => (selected + 1) % len,
        (_, false) => selected.checked_sub(1).unwrap_or(len - 1),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::Config;
    use crate::model::AppState;
    use crate::routes::ViewEnv;
    use news_nexus::{AnyComponent, AppContext, Context, Entity, Event};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn env() -> ViewEnv {
        ViewEnv::new(Config::default(), Entity::new(AppState::default()))
    }

    pub fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Render a view once and return the screen as text.
    pub fn render(view: &mut dyn AnyComponent, width: u16, height: u16) -> String {
        let (app, _rx) = AppContext::headless();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let mut cx = Context::<dyn AnyComponent>::new(app.clone(), frame.area());
                view.render_any(frame, &mut cx);
            })
            .unwrap();
        text(terminal.backend().buffer())
    }

    pub fn text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    pub fn handle(view: &mut dyn AnyComponent, event: Event) -> Option<news_nexus::Action> {
        let (app, _rx) = AppContext::headless();
        let mut cx = Context::<dyn AnyComponent>::new(app, Default::default());
        view.handle_event_any(event, &mut cx)
    }
}
