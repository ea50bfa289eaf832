use crate::pages::{deferred, muted, panel};
use crate::routes::ViewEnv;
use crossterm::event::KeyCode;
use news_nexus::{Action, Component, Context, EventContext, Event, LazyView};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub fn view(env: &ViewEnv) -> LazyView {
    deferred(env, |env, _| SettingsPage::new(env.clone()))
}

pub struct SettingsPage {
    env: ViewEnv,
}

impl SettingsPage {
    pub fn new(env: ViewEnv) -> Self {
        Self { env }
    }
}

impl Component for SettingsPage {
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let theme = self.env.state.read(|s| s.theme).unwrap_or_default();
        let config = &self.env.config;
        let feed = match self.env.feed.cached() {
            Some(catalog) => format!("{} ({} posts)", self.env.feed.origin(), catalog.posts.len()),
            None => format!("{} (not loaded)", self.env.feed.origin()),
        };

        let row = |label: &str, value: String| {
            Line::from(vec![Span::styled(format!(" {label:<10}"), muted()), Span::raw(value)])
        };
        let lines = vec![
            row("Base URL", config.base_url.as_str().to_owned()),
            row("Feed", feed),
            row("User", config.user_id.to_string()),
            row("Logs", format!("{} [{}]", config.log_dir.display(), config.log_filter)),
            Line::from(vec![
                Span::styled(format!(" {:<10}", "Theme"), muted()),
                Span::styled(
                    theme.name(),
                    Style::default().fg(theme.color()).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (t to change)", muted()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel("Settings", theme)), cx.area);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
        match event {
            Event::Key(key) if key.code == KeyCode::Char('t') => {
                if let Err(error) = self.env.state.update(|s| s.theme = s.theme.next()) {
                    tracing::error!(%error, "failed to change theme");
                }
                None
            }
            _ => None,
        }
    }
}
