use crate::application::{Context, EventContext};
use std::any::Any;

/// Input delivered to components.
#[derive(Debug, Clone)]
pub enum Event {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize(u16, u16),
    FocusGained,
    FocusLost,
    Paste(String),
}

/// What a component asks its host to do after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Navigate to an href such as `/post/42`.
    Navigate(String),
    Back,
    Quit,
}

impl Action {
    pub fn navigate(href: impl Into<String>) -> Self {
        Self::Navigate(href.into())
    }
}

/// The core Component trait for implementers.
///
/// Routed views are created fresh on every navigation, so `on_mount` and
/// `on_enter` both run once before the first `render` of an instance.
pub trait Component: Send + Sync + 'static {
    /// Called once, before the first render.
    fn on_mount(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    /// Called each time the component becomes the active view.
    fn on_enter(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    /// Called when the component stops being the active view.
    fn on_exit(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    /// Called when the application is about to shut down.
    fn on_shutdown(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    /// Render the component into `cx.area`.
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>);

    /// Handle an event, returning an optional action.
    fn handle_event(&mut self, event: Event, cx: &mut EventContext<Self>) -> Option<Action> {
        let _ = event;
        let _ = cx;
        None
    }
}

/// Object-safe form of [`Component`], used for routed views and the root.
pub trait AnyComponent: Any + Send + Sync + 'static {
    fn on_mount_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn on_enter_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn on_exit_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn on_shutdown_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn render_any(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<dyn AnyComponent>);
    fn handle_event_any(&mut self, event: Event, cx: &mut EventContext<dyn AnyComponent>) -> Option<Action>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Component> AnyComponent for T {
    fn on_mount_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        self.on_mount(&mut cx.cast());
    }

    fn on_enter_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        self.on_enter(&mut cx.cast());
    }

    fn on_exit_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        self.on_exit(&mut cx.cast());
    }

    fn on_shutdown_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        self.on_shutdown(&mut cx.cast());
    }

    fn render_any(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<dyn AnyComponent>) {
        self.render(frame, &mut cx.cast());
    }

    fn handle_event_any(&mut self, event: Event, cx: &mut EventContext<dyn AnyComponent>) -> Option<Action> {
        self.handle_event(event, &mut cx.cast())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
