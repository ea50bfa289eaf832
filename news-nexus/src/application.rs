//! Application runtime: terminal lifecycle, the render/event loop and the
//! contexts handed to components.

use crate::component::traits::{Action, AnyComponent, Component, Event};
use crate::state::Entity;
use crate::task::TaskHandle;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

type Root = Arc<Mutex<dyn AnyComponent>>;

/// How long the loop waits for terminal input before checking for re-renders.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Handle to application-wide services, cheap to clone into tasks.
#[derive(Clone)]
pub struct AppContext {
    root: Arc<Mutex<Option<Root>>>,
    re_render_tx: mpsc::UnboundedSender<()>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    fn new(re_render_tx: mpsc::UnboundedSender<()>) -> Self {
        Self { root: Arc::new(Mutex::new(None)), re_render_tx }
    }

    /// A context that is not attached to a terminal.
    ///
    /// Re-render requests arrive on the returned receiver.
    pub fn headless() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Create a new entity with the given value.
    pub fn new_entity<T>(&self, value: T) -> Entity<T>
    where
        T: Send + Sync + 'static,
    {
        Entity::new(value)
    }

    /// Spawn a task on the runtime and return a handle that can abort it.
    ///
    /// Must be called from within the tokio runtime.
    pub fn spawn_task<F, Fut>(&self, f: F) -> TaskHandle
    where
        F: FnOnce(AppContext) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cx = self.clone();
        let join = tokio::spawn(async move {
            f(cx).await;
        });
        TaskHandle::new(join.abort_handle())
    }

    /// Set the root component of the application.
    pub fn set_root<C: Component>(&self, root: C) -> crate::Result<()> {
        let mut guard = self.root.lock().map_err(|_| crate::Error::LockPoisoned)?;
        *guard = Some(Arc::new(Mutex::new(root)));
        drop(guard);
        self.refresh();
        Ok(())
    }

    /// Request a re-render.
    pub fn refresh(&self) {
        let _ = self.re_render_tx.send(());
    }

    fn root(&self) -> anyhow::Result<Option<Root>> {
        let guard = self.root.lock().map_err(|_| anyhow::anyhow!("Root mutex poisoned"))?;
        Ok(guard.clone())
    }
}

/// Per-call context passed to component methods.
///
/// `V` ties the context to the component type receiving it; `cast`
/// re-targets it when a parent delegates to a child.
pub struct Context<V: ?Sized> {
    pub app: AppContext,
    pub area: Rect,
    view: PhantomData<fn(&V)>,
}

impl<V: ?Sized> Context<V> {
    pub fn new(app: AppContext, area: Rect) -> Self {
        Self { app, area, view: PhantomData }
    }

    /// The same context, re-targeted at another component type.
    pub fn cast<U: ?Sized>(&self) -> Context<U> {
        Context::new(self.app.clone(), self.area)
    }

    /// The same context, re-targeted and restricted to `area`.
    pub fn child<U: ?Sized>(&self, area: Rect) -> Context<U> {
        Context::new(self.app.clone(), area)
    }

    /// Re-render whenever `entity` changes.
    ///
    /// Spawns a forwarding task, so call it once (e.g. from `on_mount`), not per render.
    pub fn subscribe<T>(&self, entity: &Entity<T>) -> TaskHandle
    where
        T: Send + Sync + 'static,
    {
        let mut rx = entity.subscribe();
        let tx = self.app.re_render_tx.clone();
        let join = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        TaskHandle::new(join.abort_handle())
    }
}

/// Context for event handling; the same type under a clearer name.
pub type EventContext<V> = Context<V>;

/// Main application handle.
#[derive(Debug, Default)]
pub struct Application;

impl Application {
    pub fn new() -> Self {
        Self
    }

    /// Run the application. `setup` installs the root component.
    pub fn run<F>(self, setup: F) -> anyhow::Result<()>
    where
        F: FnOnce(&AppContext) -> anyhow::Result<()>,
    {
        let rt = Runtime::new().map_err(|e| anyhow::anyhow!("Failed to start tokio: {}", e))?;

        let (re_render_tx, re_render_rx) = mpsc::unbounded_channel();
        let app_context = AppContext::new(re_render_tx);

        let guard = rt.enter();
        setup(&app_context)?;
        drop(guard);

        let root = match app_context.root()? {
            Some(root) => root,
            None => Arc::new(Mutex::new(EmptyView)),
        };

        rt.block_on(async move { self.run_loop(app_context, root, re_render_rx).await })
    }

    async fn run_loop(
        &self,
        app: AppContext,
        root: Root,
        re_render_rx: mpsc::UnboundedReceiver<()>,
    ) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, event::EnableFocusChange)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        tracing::debug!("terminal initialized");

        {
            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);
            let mut guard = root.lock().map_err(|_| anyhow::anyhow!("Root mutex poisoned during on_mount"))?;
            let mut cx = Context::<dyn AnyComponent>::new(app.clone(), area);
            guard.on_mount_any(&mut cx);
            guard.on_enter_any(&mut cx);
        }

        let result = self.run_app_loop(app, &mut terminal, root, re_render_rx).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            event::DisableFocusChange
        )?;
        terminal.show_cursor()?;
        tracing::debug!("terminal restored");

        result
    }

    async fn run_app_loop(
        &self,
        app: AppContext,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        root: Root,
        mut re_render_rx: mpsc::UnboundedReceiver<()>,
    ) -> anyhow::Result<()> {
        app.refresh();

        loop {
            tokio::select! {
                _ = re_render_rx.recv() => {
                    terminal.draw(|frame| {
                        let area = frame.area();
                        let mut cx = Context::<dyn AnyComponent>::new(app.clone(), area);
                        match root.lock() {
                            Ok(mut guard) => guard.render_any(frame, &mut cx),
                            Err(_) => tracing::error!("root mutex poisoned during render"),
                        }
                    })?;
                }
                event_ready = async { event::poll(INPUT_POLL) } => {
                    if let Ok(true) = event_ready {
                        let Some(event) = translate(event::read()?) else { continue };

                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        let mut cx = EventContext::<dyn AnyComponent>::new(app.clone(), area);

                        let mut guard = root.lock().map_err(|_| anyhow::anyhow!("Root mutex poisoned during event"))?;
                        let action = guard.handle_event_any(event, &mut cx);
                        app.refresh();

                        if action == Some(Action::Quit) {
                            tracing::info!("quit requested");
                            guard.on_shutdown_any(&mut cx);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        CrosstermEvent::FocusGained => Some(Event::FocusGained),
        CrosstermEvent::FocusLost => Some(Event::FocusLost),
        CrosstermEvent::Paste(s) => Some(Event::Paste(s)),
        _ => None,
    }
}

struct EmptyView;

impl Component for EmptyView {
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let paragraph = ratatui::widgets::Paragraph::new("No component set")
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(paragraph, cx.area);
    }
}
