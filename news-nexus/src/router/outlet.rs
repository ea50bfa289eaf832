//! The component that shows whatever view the current route resolves to.
//!
//! Navigation is asynchronous: `navigate` matches the href right away, then a
//! background task loads the view module, commits the navigation and mounts a
//! fresh view. Lifecycle hooks of mounted and retired views run on the next
//! render, where a frame and context are at hand.

use crate::application::{AppContext, Context, EventContext};
use crate::component::traits::{Action, AnyComponent, Component, Event};
use crate::router::lazy::ViewContext;
use crate::router::navigator::{Location, Navigation, Navigator};
use crate::state::Entity;
use ratatui::layout::Alignment;
use ratatui::style::{Style, Stylize};
use ratatui::widgets::Paragraph;
use std::sync::Arc;

struct Mounted {
    location: Location,
    view: Box<dyn AnyComponent>,
    entered: bool,
}

#[derive(Default)]
struct Slot {
    current: Option<Mounted>,
    retired: Vec<Box<dyn AnyComponent>>,
    pending: Option<(u64, Location)>,
    notice: Option<String>,
    mounted_ticket: u64,
}

impl Slot {
    /// Install a view unless a newer navigation already mounted one.
    fn mount(&mut self, location: Location, ticket: u64, view: Box<dyn AnyComponent>) -> bool {
        if ticket <= self.mounted_ticket {
            return false;
        }
        if let Some(old) = self.current.take() {
            if old.entered {
                self.retired.push(old.view);
            }
        }
        self.current = Some(Mounted { location, view, entered: false });
        self.mounted_ticket = ticket;
        self.notice = None;
        self.clear_pending(ticket);
        true
    }

    fn fail(&mut self, ticket: u64, notice: String) {
        self.notice = Some(notice);
        self.clear_pending(ticket);
    }

    fn clear_pending(&mut self, ticket: u64) {
        if self.pending.as_ref().is_some_and(|(id, _)| *id <= ticket) {
            self.pending = None;
        }
    }
}

/// Hosts the routed view.
#[derive(Debug)]
pub struct RouterOutlet {
    navigator: Entity<Navigator>,
    slot: Entity<Slot>,
}

impl RouterOutlet {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator: Entity::new(navigator), slot: Entity::new(Slot::default()) }
    }

    pub fn navigator(&self) -> &Entity<Navigator> {
        &self.navigator
    }

    /// Start navigating to `target`. Errors only when the href matches no
    /// route and there is no fallback.
    pub fn navigate(&self, target: &str, app: &AppContext) -> crate::Result<()> {
        let navigation = self.navigator.update(|n| n.begin(target))??;
        self.start(navigation, app)
    }

    /// Go back one history entry. Returns false when there is nowhere to go.
    pub fn back(&self, app: &AppContext) -> crate::Result<bool> {
        match self.navigator.update(Navigator::begin_back)? {
            Some(navigation) => self.start(navigation, app).map(|()| true),
            None => Ok(false),
        }
    }

    /// Location of the mounted view.
    pub fn current(&self) -> Option<Location> {
        self.slot
            .read(|s| s.current.as_ref().map(|m| m.location.clone()))
            .ok()
            .flatten()
    }

    /// Location still being loaded, if any.
    pub fn pending(&self) -> Option<Location> {
        self.slot
            .read(|s| s.pending.as_ref().map(|(_, l)| l.clone()))
            .ok()
            .flatten()
    }

    /// Message left by the last failed navigation.
    pub fn notice(&self) -> Option<String> {
        self.slot.read(|s| s.notice.clone()).ok().flatten()
    }

    pub fn can_go_back(&self) -> bool {
        self.navigator.read(Navigator::can_go_back).unwrap_or(false)
    }

    /// Run `f` against the mounted view.
    pub fn read_view<R>(&self, f: impl FnOnce(Option<&dyn AnyComponent>) -> R) -> crate::Result<R> {
        self.slot.read(|s| f(s.current.as_ref().map(|m| m.view.as_ref())))
    }

    fn start(&self, navigation: Navigation, app: &AppContext) -> crate::Result<()> {
        let ticket = navigation.ticket.id();
        let location = navigation.location.clone();
        self.slot.update(|s| s.pending = Some((ticket, location)))?;

        let navigator = self.navigator.clone();
        let slot = self.slot.clone();
        let handle = app.spawn_task(move |app| settle(navigator, slot, navigation, app));
        self.navigator.update(|n| n.track(handle))?;
        app.refresh();
        Ok(())
    }

    /// Carry out a navigation action. Anything else is handed back.
    pub fn dispatch(&self, action: Action, app: &AppContext) -> Option<Action> {
        let result = match action {
            Action::Navigate(href) => self.navigate(&href, app),
            Action::Back => self.back(app).map(|_| ()),
            other => return Some(other),
        };
        if let Err(error) = result {
            tracing::warn!(%error, "navigation rejected");
            let _ = self.slot.update(|s| s.notice = Some(error.to_string()));
        }
        None
    }
}

async fn settle(navigator: Entity<Navigator>, slot: Entity<Slot>, mut navigation: Navigation, app: AppContext) {
    let table = match navigator.read(|n| Arc::clone(n.table())) {
        Ok(table) => table,
        Err(error) => {
            tracing::error!(%error, "navigator unavailable");
            return;
        }
    };

    loop {
        let error = match table.load(&navigation.matched).await {
            Ok(factory) => {
                if !navigator.update(|n| n.commit(&navigation)).unwrap_or(false) {
                    return;
                }
                let view = factory(&ViewContext {
                    route: &navigation.matched,
                    props: &navigation.matched.props,
                    redirect: navigation.redirect.as_ref(),
                });
                let ticket = navigation.ticket.id();
                let _ = slot.update(|s| s.mount(navigation.location, ticket, view));
                app.refresh();
                return;
            }
            Err(error) => error,
        };

        tracing::error!(route = %navigation.matched.name, %error, "view load failed");
        match navigator.update(|n| n.recover(&navigation, &error)).ok().flatten() {
            Some(next) => navigation = next,
            None => {
                if navigation.ticket.is_current() {
                    let _ = slot.update(|s| s.fail(navigation.ticket.id(), error.to_string()));
                    app.refresh();
                }
                return;
            }
        }
    }
}

impl Component for RouterOutlet {
    fn on_shutdown(&mut self, cx: &mut Context<Self>) {
        let _ = self.slot.update(|slot| {
            if let Some(mounted) = slot.current.as_mut() {
                mounted.view.on_shutdown_any(&mut cx.cast());
            }
        });
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let rendered = self.slot.update(|slot| {
            let mut child: Context<dyn AnyComponent> = cx.cast();
            for mut view in slot.retired.drain(..) {
                view.on_exit_any(&mut child);
            }

            let Some(mounted) = slot.current.as_mut() else {
                return false;
            };
            if !mounted.entered {
                mounted.view.on_mount_any(&mut child);
                mounted.view.on_enter_any(&mut child);
                mounted.entered = true;
            }
            mounted.view.render_any(frame, &mut child);
            true
        });

        if !matches!(rendered, Ok(true)) {
            let text = match (self.notice(), self.pending()) {
                (Some(notice), _) => notice,
                (None, Some(location)) => format!("Loading {}…", location.href),
                (None, None) => String::new(),
            };
            let placeholder = Paragraph::new(text)
                .style(Style::default().dark_gray())
                .alignment(Alignment::Center);
            frame.render_widget(placeholder, cx.area);
        }
    }

    fn handle_event(&mut self, event: Event, cx: &mut EventContext<Self>) -> Option<Action> {
        let action = self
            .slot
            .update(|slot| {
                let mounted = slot.current.as_mut()?;
                let mut child: EventContext<dyn AnyComponent> = cx.cast();
                mounted.view.handle_event_any(event, &mut child)
            })
            .ok()
            .flatten()?;
        self.dispatch(action, &cx.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::history::BaseUrl;
    use crate::router::lazy::{BoxError, LazyView, ViewFactory, view_factory};
    use crate::router::navigator::Redirect;
    use crate::router::pattern::Props;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Probe {
        name: String,
        props: Props,
        redirect: Option<Redirect>,
        log: Log,
    }

    impl Probe {
        fn record(&self, hook: &str) {
            self.log.lock().unwrap().push(format!("{hook} {}", self.name));
        }
    }

    impl Component for Probe {
        fn on_mount(&mut self, _cx: &mut Context<Self>) {
            self.record("mount");
        }

        fn on_enter(&mut self, _cx: &mut Context<Self>) {
            self.record("enter");
        }

        fn on_exit(&mut self, _cx: &mut Context<Self>) {
            self.record("exit");
        }

        fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
            frame.render_widget(Paragraph::new(self.name.clone()), cx.area);
        }

        fn handle_event(&mut self, _event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
            Some(Action::navigate("/profile"))
        }
    }

    fn probe(log: &Log) -> ViewFactory {
        let log = Arc::clone(log);
        view_factory(move |cx| Probe {
            name: cx.route.name.clone(),
            props: cx.props.clone(),
            redirect: cx.redirect.cloned(),
            log: Arc::clone(&log),
        })
    }

    fn slow(log: &Log) -> LazyView {
        let factory = probe(log);
        LazyView::new(move || {
            let factory = Arc::clone(&factory);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(factory)
            }
        })
    }

    fn broken() -> LazyView {
        LazyView::new(|| async { Err::<ViewFactory, BoxError>("chunk missing".into()) })
    }

    fn outlet(log: &Log, fallback: bool) -> RouterOutlet {
        let table = crate::routes! {
            "/" => Home(LazyView::ready(probe(log))),
            "/post/:id" => PostDetails(LazyView::ready(probe(log))) with props,
            "/profile" => Profile(LazyView::ready(probe(log))),
            "/slow" => Slow(slow(log)),
            "/broken" => Broken(broken()),
            "/error" => Error(LazyView::ready(probe(log))),
        };
        let navigator = Navigator::new(table.unwrap(), BaseUrl::default());
        let navigator = if fallback { navigator.with_fallback("Error").unwrap() } else { navigator };
        RouterOutlet::new(navigator)
    }

    async fn wait_until(mut done: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("navigation did not settle");
    }

    async fn settle_on(outlet: &RouterOutlet, name: &str) {
        wait_until(|| outlet.current().is_some_and(|l| l.name == name)).await;
    }

    fn draw(outlet: &mut RouterOutlet, app: &AppContext) {
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal
            .draw(|frame| {
                let mut cx = Context::<RouterOutlet>::new(app.clone(), frame.area());
                outlet.render(frame, &mut cx);
            })
            .unwrap();
    }

    fn with_probe<R>(outlet: &RouterOutlet, f: impl FnOnce(&Probe) -> R) -> R {
        outlet
            .read_view(|view| f(view.unwrap().as_any().downcast_ref::<Probe>().unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn navigation_mounts_view_with_props() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let outlet = outlet(&log, true);

        outlet.navigate("/post/42", &app).unwrap();
        assert_eq!(outlet.pending().unwrap().path, "/post/42");
        settle_on(&outlet, "PostDetails").await;

        assert!(outlet.pending().is_none());
        with_probe(&outlet, |p| {
            assert_eq!(p.props.get("id"), Some("42"));
            assert!(p.redirect.is_none());
        });
    }

    #[tokio::test]
    async fn lifecycle_hooks_run_on_render() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let mut outlet = outlet(&log, true);

        outlet.navigate("/", &app).unwrap();
        settle_on(&outlet, "Home").await;
        assert!(log.lock().unwrap().is_empty());
        draw(&mut outlet, &app);

        outlet.navigate("/profile", &app).unwrap();
        settle_on(&outlet, "Profile").await;
        draw(&mut outlet, &app);

        assert_eq!(
            *log.lock().unwrap(),
            ["mount Home", "enter Home", "exit Home", "mount Profile", "enter Profile"]
        );
    }

    #[tokio::test]
    async fn last_navigation_wins() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let outlet = outlet(&log, true);

        outlet.navigate("/slow", &app).unwrap();
        outlet.navigate("/profile", &app).unwrap();
        settle_on(&outlet, "Profile").await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(outlet.current().unwrap().name, "Profile");
        assert!(!outlet.can_go_back());
    }

    #[tokio::test]
    async fn unknown_path_lands_on_fallback() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let outlet = outlet(&log, true);

        outlet.navigate("/unknown", &app).unwrap();
        settle_on(&outlet, "Error").await;
        with_probe(&outlet, |p| assert_eq!(p.redirect.as_ref().unwrap().from, "/unknown"));
    }

    #[tokio::test]
    async fn unknown_path_without_fallback_is_rejected() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let outlet = outlet(&log, false);

        let err = outlet.navigate("/unknown", &app).unwrap_err();
        assert!(matches!(err, crate::Error::NoMatch { .. }));
        assert!(outlet.pending().is_none());
    }

    #[tokio::test]
    async fn failed_load_redirects_to_fallback() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let outlet = outlet(&log, true);

        outlet.navigate("/broken", &app).unwrap();
        settle_on(&outlet, "Error").await;
        with_probe(&outlet, |p| {
            let redirect = p.redirect.as_ref().unwrap();
            assert_eq!(redirect.from, "/broken");
            assert!(redirect.reason.contains("chunk missing"));
        });
    }

    #[tokio::test]
    async fn failed_load_without_fallback_keeps_current_view() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let outlet = outlet(&log, false);

        outlet.navigate("/", &app).unwrap();
        settle_on(&outlet, "Home").await;
        outlet.navigate("/broken", &app).unwrap();
        wait_until(|| outlet.notice().is_some()).await;

        assert_eq!(outlet.current().unwrap().name, "Home");
        assert!(outlet.notice().unwrap().contains("chunk missing"));
        assert!(outlet.pending().is_none());
    }

    #[tokio::test]
    async fn view_actions_drive_navigation() {
        let log = Log::default();
        let (app, _rx) = AppContext::headless();
        let mut outlet = outlet(&log, true);

        outlet.navigate("/", &app).unwrap();
        settle_on(&outlet, "Home").await;

        let key = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        let mut cx = EventContext::<RouterOutlet>::new(app.clone(), Default::default());
        assert_eq!(outlet.handle_event(key, &mut cx), None);
        settle_on(&outlet, "Profile").await;

        assert!(outlet.can_go_back());
        assert!(outlet.back(&app).unwrap());
        settle_on(&outlet, "Home").await;
        assert!(!outlet.back(&app).unwrap());
    }
}
