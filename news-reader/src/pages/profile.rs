use crate::catalog::Catalog;
use crate::model::Post;
use crate::pages::{muted, panel, rating_label, step, with_catalog};
use crate::routes::ViewEnv;
use crossterm::event::KeyCode;
use news_nexus::{Action, Component, Context, EventContext, Event, LazyView};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use std::sync::Arc;

pub fn view(env: &ViewEnv) -> LazyView {
    with_catalog(env, |env, catalog, _| ProfilePage::new(env.clone(), catalog))
}

/// The configured user and what they wrote.
pub struct ProfilePage {
    env: ViewEnv,
    catalog: Arc<Catalog>,
    selected: usize,
}

impl ProfilePage {
    pub fn new(env: ViewEnv, catalog: Arc<Catalog>) -> Self {
        Self { env, catalog, selected: 0 }
    }

    fn user_id(&self) -> i64 {
        self.env.config.user_id
    }

    fn posts(&self) -> Vec<&Post> {
        self.catalog.posts_by(self.user_id()).collect()
    }
}

impl Component for ProfilePage {
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let theme = self.env.state.read(|s| s.theme).unwrap_or_default();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(cx.area);

        let header = match self.catalog.user(self.user_id()) {
            Some(user) => vec![
                Line::styled(
                    user.name.clone(),
                    Style::default().fg(theme.color()).add_modifier(Modifier::BOLD),
                ),
                Line::styled(format!("user #{}", user.id), muted()),
            ],
            None => vec![Line::from(format!("No user with id {} in the feed.", self.user_id()))],
        };
        frame.render_widget(Paragraph::new(header).block(panel("Profile", theme)), chunks[0]);

        let posts = self.posts();
        let items: Vec<ListItem> = posts
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let marker = if i == self.selected { "▶ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme.color())),
                    Span::raw(post.title.clone()),
                    Span::styled(format!("  {} · {}", post.date, rating_label(&post.rating)), muted()),
                ]))
            })
            .collect();
        let title = format!("Posts ({})", posts.len());
        frame.render_widget(List::new(items).block(panel(&title, theme)), chunks[1]);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
        let Event::Key(key) = event else { return None };
        let len = self.posts().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = step(self.selected, len, false);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = step(self.selected, len, true);
                None
            }
            KeyCode::Enter => {
                let id = self.posts().get(self.selected)?.id;
                Some(Action::navigate(self.env.link(&format!("/post/{id}"))))
            }
            _ => None,
        }
    }
}
