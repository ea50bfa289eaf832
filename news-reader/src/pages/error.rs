use crate::pages::{deferred, muted, panel};
use crate::routes::ViewEnv;
use crossterm::event::KeyCode;
use news_nexus::{Action, Component, Context, EventContext, Event, LazyView, Redirect};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

pub fn view(env: &ViewEnv) -> LazyView {
    deferred(env, |env, cx| ErrorPage::new(env.clone(), cx.redirect.cloned()))
}

/// Where unmatched paths and failed views land.
pub struct ErrorPage {
    env: ViewEnv,
    redirect: Option<Redirect>,
}

impl ErrorPage {
    pub fn new(env: ViewEnv, redirect: Option<Redirect>) -> Self {
        Self { env, redirect }
    }
}

impl Component for ErrorPage {
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let theme = self.env.state.read(|s| s.theme).unwrap_or_default();
        let mut lines = vec![
            Line::from(""),
            Line::styled("Something went wrong", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Line::from(""),
        ];
        match &self.redirect {
            Some(redirect) => {
                lines.push(Line::from(format!("Could not open {}", redirect.from)));
                lines.push(Line::styled(redirect.reason.clone(), muted()));
            }
            None => lines.push(Line::styled("No details available.", muted())),
        }
        lines.push(Line::from(""));
        lines.push(Line::styled("Enter: front page", muted()));

        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel("Error", theme));
        frame.render_widget(body, cx.area);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
        match event {
            Event::Key(key) if key.code == KeyCode::Enter => Some(Action::navigate(self.env.link("/"))),
            _ => None,
        }
    }
}
