use crate::config::Config;
use crate::error::Result;
use crate::model::AppState;
use crate::routes::{self, ViewEnv};
use crossterm::event::KeyCode;
use news_nexus::{
    Action, AppContext, Component, Context, Event, EventContext, RouterOutlet, TaskTracker,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Root component: header, the routed view, and a footer with key help.
pub struct Shell {
    env: ViewEnv,
    outlet: RouterOutlet,
    tasks: TaskTracker,
}

impl Shell {
    /// Build the shell and start navigating to the configured start page.
    pub fn build(config: Config, app: &AppContext) -> Result<Self> {
        let env = ViewEnv::new(config, app.new_entity(AppState::default()));
        let outlet = RouterOutlet::new(routes::navigator(&env)?);
        outlet.navigate(&env.config.start, app)?;
        Ok(Self { env, outlet, tasks: TaskTracker::new() })
    }

    fn global(&self, key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('h') => Some(Action::navigate(self.env.link("/"))),
            KeyCode::Char('p') => Some(Action::navigate(self.env.link("/profile"))),
            KeyCode::Char('s') => Some(Action::navigate(self.env.link("/settings"))),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
            _ => None,
        }
    }
}

impl Component for Shell {
    fn on_mount(&mut self, cx: &mut Context<Self>) {
        self.tasks.track(cx.subscribe(&self.env.state));
    }

    fn on_shutdown(&mut self, cx: &mut Context<Self>) {
        self.outlet.on_shutdown(&mut cx.cast());
        self.tasks.abort_all();
        tracing::info!("shutting down");
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let theme = self.env.state.read(|s| s.theme).unwrap_or_default();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(cx.area);

        let location = match (self.outlet.pending(), self.outlet.current()) {
            (Some(pending), _) => format!("loading {}", pending.href),
            (None, Some(current)) => current.href,
            (None, None) => String::new(),
        };
        let header = Line::from(vec![
            Span::styled(
                " News Reader ",
                Style::default().bg(theme.color()).fg(Color::Black).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {location}"), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let mut body = cx.child(chunks[1]);
        self.outlet.render(frame, &mut body);

        let footer = match self.outlet.notice() {
            Some(notice) => Paragraph::new(format!(" {notice} "))
                .style(Style::default().bg(Color::Red).fg(Color::White)),
            None => Paragraph::new(" h Home │ p Profile │ s Settings │ Esc Back │ q Quit ")
                .style(Style::default().bg(theme.color()).fg(Color::Black)),
        };
        frame.render_widget(footer.alignment(Alignment::Center), chunks[2]);
    }

    fn handle_event(&mut self, event: Event, cx: &mut EventContext<Self>) -> Option<Action> {
        if let Event::Key(key) = &event {
            if let Some(action) = self.global(key.code) {
                return self.outlet.dispatch(action, &cx.app);
            }
        }
        self.outlet.handle_event(event, &mut cx.cast())
    }
}
