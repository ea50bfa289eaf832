use crate::catalog::Catalog;
use crate::model::Post;
use crate::pages::{muted, panel, rating_label, with_catalog};
use crate::routes::ViewEnv;
use crossterm::event::KeyCode;
use news_nexus::{Action, Component, Context, EventContext, Event, LazyView, Props};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};
use std::sync::Arc;

pub fn view(env: &ViewEnv) -> LazyView {
    with_catalog(env, |env, catalog, cx| {
        PostDetailsPage::new(env.clone(), catalog, PostDetailsProps::from_props(cx.props))
    })
}

/// Inputs of the post details view, taken from the route's props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetailsProps {
    /// The `id` segment as it appeared in the path.
    pub raw_id: String,
    pub id: Option<i64>,
}

impl PostDetailsProps {
    pub fn from_props(props: &Props) -> Self {
        let raw_id = props.get("id").unwrap_or_default().to_owned();
        let id = raw_id.parse().ok();
        Self { raw_id, id }
    }
}

pub struct PostDetailsPage {
    env: ViewEnv,
    catalog: Arc<Catalog>,
    props: PostDetailsProps,
    scroll: u16,
}

impl PostDetailsPage {
    pub fn new(env: ViewEnv, catalog: Arc<Catalog>, props: PostDetailsProps) -> Self {
        Self { env, catalog, props, scroll: 0 }
    }

    fn post(&self) -> Option<&Post> {
        self.catalog.post(self.props.id?)
    }
}

impl Component for PostDetailsPage {
    fn on_mount(&mut self, _cx: &mut Context<Self>) {
        if self.post().is_none() {
            tracing::warn!(id = %self.props.raw_id, "post not found");
        }
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let theme = self.env.state.read(|s| s.theme).unwrap_or_default();

        let Some(post) = self.post() else {
            let message = Paragraph::new(vec![
                Line::from(format!("Post '{}' not found.", self.props.raw_id)),
                Line::styled("Press h for the front page.", muted()),
            ])
            .block(panel("Post", theme));
            frame.render_widget(message, cx.area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Percentage(40)])
            .split(cx.area);

        let author = self.catalog.author(post).map_or("unknown author", |u| u.name.as_str());
        let mut lines = vec![
            Line::styled(
                post.title.clone(),
                Style::default().fg(theme.color()).add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format!("{author} · {} · {}", post.date, post.category.join(", ")),
                muted(),
            ),
            Line::styled(rating_label(&post.rating), muted()),
            Line::from(""),
            Line::from(post.content.clone()),
        ];
        if !post.content_image.is_empty() {
            lines.push(Line::from(""));
            for image in &post.content_image {
                lines.push(Line::from(vec![Span::styled("▣ ", muted()), Span::raw(image.clone())]));
            }
        }
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0))
            .block(panel("Post", theme));
        frame.render_widget(body, chunks[0]);

        let comments: Vec<ListItem> = post
            .comments
            .iter()
            .map(|c| {
                let who = self.catalog.user(c.user_id).map_or("anonymous", |u| u.name.as_str());
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(who.to_owned(), Style::default().fg(theme.color())),
                        Span::styled(format!("  {} · ★ {}", c.date, c.rating), muted()),
                    ]),
                    Line::from(format!("  {}", c.content)),
                ])
            })
            .collect();
        let title = format!("Comments ({})", post.comments.len());
        frame.render_widget(List::new(comments).block(panel(&title, theme)), chunks[1]);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
        let Event::Key(key) = event else { return None };
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{env, render};

    async fn page(id: &str) -> PostDetailsPage {
        let env = env();
        let catalog = env.feed.catalog().await.unwrap();
        let props: Props = [("id", id)].into_iter().collect();
        PostDetailsPage::new(env, catalog, PostDetailsProps::from_props(&props))
    }

    #[test]
    fn props_parse_the_id() {
        let props: Props = [("id", "42")].into_iter().collect();
        assert_eq!(
            PostDetailsProps::from_props(&props),
            PostDetailsProps { raw_id: "42".into(), id: Some(42) }
        );
        let props: Props = [("id", "latest")].into_iter().collect();
        assert_eq!(PostDetailsProps::from_props(&props).id, None);
        assert_eq!(PostDetailsProps::from_props(&Props::new()).raw_id, "");
    }

    #[tokio::test]
    async fn shows_post_and_comments() {
        let mut page = page("42").await;
        let screen = render(&mut page, 100, 30);
        assert!(screen.contains("New chip plant breaks ground"));
        assert!(screen.contains("Comments (2)"));
        assert!(screen.contains("Lin Okafor"));
        assert!(screen.contains("images/wafer.jpg"));
    }

    #[tokio::test]
    async fn post_without_images_or_ratings_renders() {
        let mut page = page("12").await;
        let screen = render(&mut page, 100, 30);
        assert!(screen.contains("unrated"));
    }

    #[tokio::test]
    async fn unknown_id_renders_not_found() {
        let mut page = page("999").await;
        let screen = render(&mut page, 60, 8);
        assert!(screen.contains("Post '999' not found."));
    }
}
