use crate::catalog::Catalog;
use crate::model::{Category, Post};
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
    with_catalog(env, |env, catalog, _| HomePage::new(env.clone(), catalog))
}

/// Post list with a category filter.
pub struct HomePage {
    env: ViewEnv,
    catalog: Arc<Catalog>,
    categories: Vec<Category>,
    /// Index into `categories`; `None` shows every post.
    filter: Option<usize>,
    selected: usize,
}

impl HomePage {
    pub fn new(env: ViewEnv, catalog: Arc<Catalog>) -> Self {
        let categories = catalog.derive_categories();
        Self { env, catalog, categories, filter: None, selected: 0 }
    }

    fn visible(&self) -> Vec<&Post> {
        match self.filter.and_then(|i| self.categories.get(i)) {
            Some(category) => category.posts.iter().collect(),
            None => self.catalog.posts.iter().collect(),
        }
    }

    fn filter_name(&self) -> &str {
        self.filter
            .and_then(|i| self.categories.get(i))
            .map_or("all", |c| c.name.as_str())
    }

    fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            None if !self.categories.is_empty() => Some(0),
            Some(i) if i + 1 < self.categories.len() => Some(i + 1),
            _ => None,
        };
        self.selected = 0;
    }
}

impl Component for HomePage {
    fn on_enter(&mut self, _cx: &mut Context<Self>) {
        tracing::debug!(posts = self.catalog.posts.len(), "home entered");
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let theme = self.env.state.read(|s| s.theme).unwrap_or_default();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(cx.area);

        let mut tabs = vec![Span::styled(" Category: ", muted())];
        tabs.push(Span::styled(
            self.filter_name().to_owned(),
            Style::default().fg(theme.color()).add_modifier(Modifier::BOLD),
        ));
        tabs.push(Span::styled("  (c to change)", muted()));
        frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

        let posts = self.visible();
        let items: Vec<ListItem> = posts
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let is_selected = i == self.selected;
                let author = self.catalog.author(post).map_or("unknown author", |u| u.name.as_str());
                let marker = if is_selected { "▶ " } else { "  " };
                let title_style = if is_selected {
                    Style::default().fg(theme.color()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(theme.color())),
                        Span::styled(post.title.clone(), title_style),
                    ]),
                    Line::from(vec![
                        Span::raw("    "),
                        Span::styled(
                            format!(
                                "{author} · {} · {} · {}",
                                post.date,
                                post.category.join(", "),
                                rating_label(&post.rating)
                            ),
                            muted(),
                        ),
                    ]),
                ])
            })
            .collect();

        let title = format!("Latest posts ({})", posts.len());
        frame.render_widget(List::new(items).block(panel(&title, theme)), chunks[1]);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
        let Event::Key(key) = event else { return None };
        let len = self.visible().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = step(self.selected, len, false);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = step(self.selected, len, true);
                None
            }
            KeyCode::Char('c') => {
                self.cycle_filter();
                None
            }
            KeyCode::Enter => {
                let id = self.visible().get(self.selected)?.id;
                Some(Action::navigate(self.env.link(&format!("/post/{id}"))))
            }
            _ => None,
        }
    }
}
