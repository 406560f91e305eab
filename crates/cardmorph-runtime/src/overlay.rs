#![forbid(unsafe_code)]

//! Single-overlay host shell.
//!
//! [`OverlayHost`] is the host side of the integration contract. It owns
//! the scheduler, the listener registry and the environment, and keeps the
//! one piece of shared state the morph relies on: which selection, if any,
//! has an overlay open.
//!
//! # Invariants
//!
//! - At most one instance is mounted; a second open is refused.
//! - The source card of the open selection reports hidden from open until
//!   `on_start_falling` fires for it.
//! - The instance is dropped as soon as `on_close` fires, so the next open
//!   is accepted from then on.
//! - `LayoutChanged` is emitted once, 100 ms after [`OverlayHost::start`].

use std::cell::RefCell;
use std::rc::Rc;

use cardmorph_core::environment::Environment;
use cardmorph_core::event::Event;
use cardmorph_core::geometry::{Rect, Size};
use cardmorph_engine::kind::{CardDensity, ContentKind};
use cardmorph_engine::phase::{CardPhase, PanePhase, Wait};
use tracing::{debug, info};
use web_time::Duration;

use crate::cancellation::CancellationToken;
use crate::config::MorphConfig;
use crate::error::OpenError;
use crate::instance::{MorphAction, MorphCallbacks, MorphInstance, MountContext};
use crate::listeners::ListenerRegistry;
use crate::scheduler::{ClockScheduler, ManualScheduler, Scheduler, TimerId};

/// Delay between [`OverlayHost::start`] and the layout notice.
pub const LAYOUT_NOTICE_DELAY: Duration = Duration::from_millis(100);

/// Something outside observers may want to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNotice<S> {
    /// Page layout settled after start.
    LayoutChanged,
    /// The overlay for this selection began falling back to its card.
    StartFalling(S),
    /// The overlay for this selection closed.
    Closed(S),
}

#[derive(Debug)]
enum Mounted {
    Card(MorphInstance<CardPhase>),
    Panes(MorphInstance<PanePhase>),
}

impl Mounted {
    fn on_timer(&mut self, id: TimerId) -> bool {
        match self {
            Self::Card(m) => m.on_timer(id).is_some(),
            Self::Panes(m) => m.on_timer(id).is_some(),
        }
    }

    fn handle_event(&mut self, event: &Event) -> Option<MorphAction> {
        match self {
            Self::Card(m) => m.handle_event(event),
            Self::Panes(m) => m.handle_event(event),
        }
    }

    fn sync_environment(&mut self) -> Option<MorphAction> {
        match self {
            Self::Card(m) => m.sync_environment(),
            Self::Panes(m) => m.sync_environment(),
        }
    }

    fn request_close(&mut self) -> bool {
        match self {
            Self::Card(m) => m.request_close().is_ok(),
            Self::Panes(m) => m.request_close().is_ok(),
        }
    }

    fn is_closing(&self) -> bool {
        match self {
            Self::Card(m) => m.is_closing(),
            Self::Panes(m) => m.is_closing(),
        }
    }
}

#[derive(Debug)]
struct Shared<S> {
    notices: Vec<HostNotice<S>>,
    source_hidden: bool,
    closed: bool,
}

/// Hosts at most one morph overlay at a time.
///
/// `S` identifies what was opened (a project id, a document kind).
#[derive(Debug)]
pub struct OverlayHost<S, C: Scheduler = ClockScheduler> {
    scheduler: Rc<C>,
    listeners: ListenerRegistry,
    environment: Environment,
    config: MorphConfig,
    mounted: Option<Mounted>,
    selection: Option<S>,
    shared: Rc<RefCell<Shared<S>>>,
    layout_timer: Option<TimerId>,
    started: bool,
}

impl<S, C> OverlayHost<S, C>
where
    S: Clone + PartialEq + std::fmt::Debug + 'static,
    C: Scheduler + 'static,
{
    pub fn new(scheduler: C, environment: Environment, config: MorphConfig) -> Self {
        Self {
            scheduler: Rc::new(scheduler),
            listeners: ListenerRegistry::new(),
            environment,
            config,
            mounted: None,
            selection: None,
            shared: Rc::new(RefCell::new(Shared {
                notices: Vec::new(),
                source_hidden: false,
                closed: false,
            })),
            layout_timer: None,
            started: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn scheduler(&self) -> &C {
        &self.scheduler
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// The open selection, if any.
    pub fn selection(&self) -> Option<&S> {
        self.selection.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.mounted.is_some()
    }

    /// Whether the source card for `selection` should be hidden.
    pub fn is_source_hidden(&self, selection: &S) -> bool {
        self.shared.borrow().source_hidden && self.selection.as_ref() == Some(selection)
    }

    /// The mounted single-pane instance.
    pub fn card(&self) -> Option<&MorphInstance<CardPhase>> {
        match &self.mounted {
            Some(Mounted::Card(m)) => Some(m),
            _ => None,
        }
    }

    /// The mounted two-pane instance.
    pub fn panes(&self) -> Option<&MorphInstance<PanePhase>> {
        match &self.mounted {
            Some(Mounted::Panes(m)) => Some(m),
            _ => None,
        }
    }

    /// Take the notices emitted so far.
    pub fn drain_notices(&mut self) -> Vec<HostNotice<S>> {
        std::mem::take(&mut self.shared.borrow_mut().notices)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Arm the one-shot layout notice. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.layout_timer = Some(self.scheduler.schedule(Wait::Delay(LAYOUT_NOTICE_DELAY)));
    }

    /// Open a single-pane overlay for `selection`.
    pub fn open(&mut self, selection: S, source: Rect, kind: ContentKind) -> Result<(), OpenError> {
        self.check_free()?;
        let callbacks = self.callbacks(&selection);
        let instance = MorphInstance::mount(source, kind, callbacks, &self.mount_context());
        self.adopt(selection, Mounted::Card(instance));
        Ok(())
    }

    /// Open a two-pane project overlay for `selection`.
    pub fn open_two_pane(
        &mut self,
        selection: S,
        source: Rect,
        density: CardDensity,
    ) -> Result<(), OpenError> {
        self.check_free()?;
        let callbacks = self.callbacks(&selection);
        let instance = MorphInstance::mount(
            source,
            ContentKind::Project { density },
            callbacks,
            &self.mount_context(),
        );
        self.adopt(selection, Mounted::Panes(instance));
        Ok(())
    }

    /// Ask the open overlay to close. Returns whether the close started.
    pub fn request_close(&mut self) -> bool {
        self.mounted.as_mut().is_some_and(Mounted::request_close)
    }

    /// Route an input event. Resizes also update the shared environment.
    pub fn handle_event(&mut self, event: &Event) -> Option<MorphAction> {
        if let Event::Resize { width, height } = *event {
            self.environment.set_viewport(Size::new(width, height));
        }
        let mounted = self.mounted.as_mut()?;
        let action = mounted.handle_event(event);
        mounted.sync_environment().or(action)
    }

    /// Dispatch every timer that is due now. Returns the number dispatched.
    pub fn pump(&mut self) -> usize {
        let mut fired = 0;
        loop {
            let due = self.scheduler.take_due();
            if due.is_empty() {
                return fired;
            }
            for id in due {
                self.dispatch(id);
                fired += 1;
            }
        }
    }

    /// Route one fired timer.
    pub fn dispatch(&mut self, id: TimerId) {
        if self.layout_timer == Some(id) {
            self.layout_timer = None;
            debug!("layout changed");
            self.shared.borrow_mut().notices.push(HostNotice::LayoutChanged);
            return;
        }
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.on_timer(id);
        }
        self.reap();
    }

    /// Drop the overlay and the layout timer.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.layout_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.mounted.take().is_some() {
            info!(selection = ?self.selection, "overlay dropped on shutdown");
        }
        self.selection = None;
        self.shared.borrow_mut().source_hidden = false;
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_free(&self) -> Result<(), OpenError> {
        match &self.mounted {
            None => Ok(()),
            Some(m) if m.is_closing() => Err(OpenError::StillClosing),
            Some(_) => Err(OpenError::AlreadyOpen),
        }
    }

    fn mount_context(&self) -> MountContext<'_> {
        let scheduler: Rc<dyn Scheduler> = self.scheduler.clone();
        MountContext {
            scheduler,
            listeners: &self.listeners,
            environment: &self.environment,
            config: &self.config,
        }
    }

    fn callbacks(&self, selection: &S) -> MorphCallbacks {
        let on_close = {
            let shared = Rc::clone(&self.shared);
            let selection = selection.clone();
            move || {
                let mut shared = shared.borrow_mut();
                shared.closed = true;
                shared.source_hidden = false;
                shared.notices.push(HostNotice::Closed(selection.clone()));
            }
        };
        let on_start_falling = {
            let shared = Rc::clone(&self.shared);
            let selection = selection.clone();
            move || {
                let mut shared = shared.borrow_mut();
                shared.source_hidden = false;
                shared.notices.push(HostNotice::StartFalling(selection.clone()));
            }
        };
        MorphCallbacks::new(on_close).with_start_falling(on_start_falling)
    }

    fn adopt(&mut self, selection: S, mounted: Mounted) {
        info!(?selection, "overlay opened");
        {
            let mut shared = self.shared.borrow_mut();
            shared.source_hidden = true;
            shared.closed = false;
        }
        self.selection = Some(selection);
        self.mounted = Some(mounted);
    }

    fn reap(&mut self) {
        let closed = std::mem::take(&mut self.shared.borrow_mut().closed);
        if closed {
            self.mounted = None;
            if let Some(selection) = self.selection.take() {
                debug!(?selection, "overlay released");
            }
        }
    }
}

impl<S> OverlayHost<S, ManualScheduler>
where
    S: Clone + PartialEq + std::fmt::Debug + 'static,
{
    /// Move virtual time forward by `dt`, dispatching every timer that falls
    /// due on the way, including ones scheduled while dispatching.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let target = self.scheduler.now() + dt;
        let mut fired = self.pump();
        loop {
            let due = self.scheduler.advance_to_next(target);
            if due.is_empty() {
                return fired;
            }
            for id in due {
                self.dispatch(id);
                fired += 1;
            }
            fired += self.pump();
        }
    }
}

impl<S> OverlayHost<S, ClockScheduler>
where
    S: Clone + PartialEq + std::fmt::Debug + 'static,
{
    /// Block on the wall clock until no timer is pending or `token` is
    /// cancelled. Returns the number of timers dispatched.
    pub fn run_until_idle(&mut self, token: &CancellationToken) -> usize {
        let scheduler = Rc::clone(&self.scheduler);
        scheduler.run_until_idle(token, |id| self.dispatch(id))
    }
}

impl<S, C: Scheduler> Drop for OverlayHost<S, C> {
    fn drop(&mut self) {
        if let Some(id) = self.layout_timer.take() {
            self.scheduler.cancel(id);
        }
        self.mounted = None;
    }
}
