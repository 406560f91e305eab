#![forbid(unsafe_code)]

//! A mounted morph.
//!
//! [`MorphInstance`] is one lifecycle of a card-to-overlay transition, from
//! the open trigger to unmount. It wires the pure engine to the outside
//! world: a [`Scheduler`] for phase timers, the [`ListenerRegistry`] for its
//! `keydown`/`resize` listeners, and the injected [`Environment`].
//!
//! # Lifecycle
//!
//! 1. [`mount`](MorphInstance::mount) captures the source rect, picks the
//!    [`KindProfile`] once, attaches listeners and arms the open plan.
//! 2. The host routes fired timers to [`on_timer`](MorphInstance::on_timer)
//!    and input to [`handle_event`](MorphInstance::handle_event).
//! 3. Closing runs the close plan; entering the falling phase calls
//!    `on_start_falling`, the final step calls `on_close` and tears down.
//!
//! # Invariants
//!
//! - At most one phase timer is outstanding at any time.
//! - `on_start_falling` fires at most once and strictly before `on_close`.
//! - `on_close` fires at most once, only from the final close step.
//! - After unmount (by close or by [`unmount`](MorphInstance::unmount) or
//!   drop) no timer of this instance is pending and none of its listeners
//!   is attached.
//!
//! # Failure Modes
//!
//! - A degenerate source rect animates from a point instead of failing.
//! - Close requests outside the expanded phase are rejected, not queued.

use std::fmt;
use std::rc::Rc;

use cardmorph_core::environment::{Environment, EnvironmentObserver};
use cardmorph_core::event::{Event, HitTarget, ListenerKind};
use cardmorph_core::geometry::{Rect, Size};
use cardmorph_engine::backdrop::BackdropConfig;
use cardmorph_engine::crossfade::StaggerSchedule;
use cardmorph_engine::frame::MorphFrame;
use cardmorph_engine::kind::{ContentKind, KindProfile};
use cardmorph_engine::machine::{Advance, CloseRejected, MorphMachine, Stage};
use cardmorph_engine::phase::MorphPhase;
use cardmorph_engine::style::{StyleDescriptor, Viewport};
use tracing::{debug, info};

use crate::cancellation::{CancelReason, CancellationSource};
use crate::config::MorphConfig;
use crate::driver::PhaseDriver;
use crate::listeners::{ListenerGuard, ListenerRegistry};
use crate::scheduler::{Scheduler, TimerId};

/// Host callbacks for one instance.
pub struct MorphCallbacks {
    on_close: Box<dyn FnMut()>,
    on_start_falling: Option<Box<dyn FnMut()>>,
}

impl MorphCallbacks {
    /// Callbacks with only `on_close`.
    pub fn new(on_close: impl FnMut() + 'static) -> Self {
        Self {
            on_close: Box::new(on_close),
            on_start_falling: None,
        }
    }

    /// Set the `on_start_falling` callback (builder pattern).
    #[must_use]
    pub fn with_start_falling(mut self, on_start_falling: impl FnMut() + 'static) -> Self {
        self.on_start_falling = Some(Box::new(on_start_falling));
        self
    }
}

impl fmt::Debug for MorphCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphCallbacks")
            .field("on_start_falling", &self.on_start_falling.is_some())
            .finish_non_exhaustive()
    }
}

/// Shared resources an instance mounts into.
#[derive(Clone)]
pub struct MountContext<'a> {
    pub scheduler: Rc<dyn Scheduler>,
    pub listeners: &'a ListenerRegistry,
    pub environment: &'a Environment,
    pub config: &'a MorphConfig,
}

/// What an input event did to the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphAction {
    /// The close sequence started.
    Close,
    /// The viewport changed and the frame was recomputed.
    Relayout,
}

/// One mounted morph.
pub struct MorphInstance<P: MorphPhase> {
    scheduler: Rc<dyn Scheduler>,
    machine: MorphMachine<P>,
    driver: PhaseDriver<P>,
    cancel: CancellationSource,
    kind: ContentKind,
    profile: KindProfile,
    breakpoint: f64,
    backdrop: BackdropConfig,
    source: Rect,
    viewport: Viewport,
    observer: EnvironmentObserver,
    listeners: Vec<ListenerGuard>,
    callbacks: MorphCallbacks,
    fell: bool,
    closed: bool,
    mounted: bool,
    frame: MorphFrame<P>,
}

impl<P: MorphPhase> fmt::Debug for MorphInstance<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphInstance")
            .field("kind", &self.kind)
            .field("phase", &self.machine.phase())
            .field("stage", &self.machine.stage())
            .field("source", &self.source)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<P: MorphPhase> MorphInstance<P> {
    /// Mount a morph of `kind` growing out of `source`.
    pub fn mount(
        source: Rect,
        kind: ContentKind,
        callbacks: MorphCallbacks,
        ctx: &MountContext<'_>,
    ) -> Self {
        let mut observer = ctx.environment.observe();
        observer.poll();
        let snapshot = observer.current();
        let breakpoint = ctx.config.mobile_breakpoint;
        let profile = ctx.config.profile_for(&kind, snapshot.reduced_motion);
        let source = source.sanitized();
        let viewport = Viewport::from_snapshot(&snapshot, breakpoint);
        let backdrop = ctx.config.backdrop;
        let machine = MorphMachine::<P>::new(profile.timings);
        let frame = MorphFrame::compute(machine.phase(), source, &viewport, &profile, &backdrop);
        let cancel = CancellationSource::new();
        let mut driver = PhaseDriver::new(cancel.token());
        let listeners = vec![
            ctx.listeners.attach(ListenerKind::KeyDown),
            ctx.listeners.attach(ListenerKind::Resize),
        ];

        info!(
            kind = kind.label(),
            top = source.top,
            left = source.left,
            width = source.width,
            height = source.height,
            reduced_motion = snapshot.reduced_motion,
            "morph mounted"
        );
        driver.start(machine.open_plan(), &*ctx.scheduler);

        Self {
            scheduler: Rc::clone(&ctx.scheduler),
            machine,
            driver,
            cancel,
            kind,
            profile,
            breakpoint,
            backdrop,
            source,
            viewport,
            observer,
            listeners,
            callbacks,
            fell: false,
            closed: false,
            mounted: true,
            frame,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> P {
        self.machine.phase()
    }

    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// The profile chosen at mount.
    pub fn profile(&self) -> &KindProfile {
        &self.profile
    }

    /// The sanitized source rect.
    pub fn source(&self) -> Rect {
        self.source
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Render state for the current phase and viewport.
    pub fn frame(&self) -> &MorphFrame<P> {
        &self.frame
    }

    /// Surface style for the current phase and viewport.
    pub fn style(&self) -> &StyleDescriptor {
        &self.frame.surface
    }

    /// Enter/exit delays for `count` ordered items of the expanded content.
    pub fn stagger(&self, count: usize) -> StaggerSchedule {
        StaggerSchedule::new(count, &self.profile.stagger)
    }

    /// Whether the instance still holds listeners or timers.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether `on_close` has fired.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the close sequence is running.
    pub fn is_closing(&self) -> bool {
        self.mounted && self.machine.stage() == Stage::Closing
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Handle a fired timer. Returns the phase change it caused, if the
    /// timer belonged to this instance.
    pub fn on_timer(&mut self, id: TimerId) -> Option<Advance<P>> {
        if !self.mounted {
            return None;
        }
        let step = self.driver.fire(id)?;
        let Some(advance) = self.machine.apply(step.target) else {
            self.driver.arm_next(&*self.scheduler);
            return None;
        };
        if advance.start_falling {
            self.start_falling();
        }
        if advance.is_unmount() {
            self.finish();
        } else {
            self.refresh_frame();
            self.driver.arm_next(&*self.scheduler);
        }
        Some(advance)
    }

    /// Begin closing. Only honored in the expanded phase.
    pub fn request_close(&mut self) -> Result<(), CloseRejected<P>> {
        if !self.mounted {
            return Err(CloseRejected {
                phase: self.machine.phase(),
            });
        }
        let plan = self.machine.request_close()?;
        self.refresh_frame();
        self.driver.start(plan, &*self.scheduler);
        Ok(())
    }

    /// Route an input event.
    pub fn handle_event(&mut self, event: &Event) -> Option<MorphAction> {
        if !self.mounted {
            return None;
        }
        match event {
            Event::Key(key) if key.is_escape_press() => self.close_action(),
            Event::Pointer(pointer) if pointer.is_primary_down() => match pointer.target {
                HitTarget::Backdrop if self.frame.backdrop.dismisses_on(pointer.target) => {
                    self.close_action()
                }
                HitTarget::CloseButton if self.frame.close.pointer_events.is_enabled() => {
                    self.close_action()
                }
                _ => None,
            },
            Event::Resize { width, height } => {
                let viewport = Viewport::new(Size::new(*width, *height), self.breakpoint);
                self.adopt_viewport(viewport)
            }
            _ => None,
        }
    }

    /// Pick up environment changes made outside the event stream.
    pub fn sync_environment(&mut self) -> Option<MorphAction> {
        if !self.mounted {
            return None;
        }
        let snapshot = self.observer.poll()?;
        self.adopt_viewport(Viewport::from_snapshot(&snapshot, self.breakpoint))
    }

    /// Tear down without running the close sequence. `on_close` is not
    /// called. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        debug!(kind = self.kind.label(), phase = %self.machine.phase(), "morph unmounted by host");
        self.teardown(CancelReason::Unmounted);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn close_action(&mut self) -> Option<MorphAction> {
        self.request_close().ok().map(|()| MorphAction::Close)
    }

    fn adopt_viewport(&mut self, viewport: Viewport) -> Option<MorphAction> {
        if viewport == self.viewport {
            return None;
        }
        self.viewport = viewport;
        self.refresh_frame();
        Some(MorphAction::Relayout)
    }

    fn refresh_frame(&mut self) {
        self.frame = MorphFrame::compute(
            self.machine.phase(),
            self.source,
            &self.viewport,
            &self.profile,
            &self.backdrop,
        );
    }

    fn start_falling(&mut self) {
        if self.fell {
            return;
        }
        self.fell = true;
        debug!(kind = self.kind.label(), "on_start_falling");
        if let Some(callback) = self.callbacks.on_start_falling.as_mut() {
            callback();
        }
    }

    fn finish(&mut self) {
        self.teardown(CancelReason::Closed);
        if self.closed {
            return;
        }
        self.closed = true;
        info!(kind = self.kind.label(), "on_close");
        (self.callbacks.on_close)();
    }

    fn teardown(&mut self, reason: CancelReason) {
        self.mounted = false;
        self.cancel.cancel(reason);
        self.driver.cancel(&*self.scheduler);
        self.listeners.clear();
    }
}

impl<P: MorphPhase> Drop for MorphInstance<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use cardmorph_engine::kind::CardDensity;
    use cardmorph_engine::phase::{CardPhase, PanePhase};
    use std::cell::RefCell;
    use web_time::Duration;

    struct Fixture {
        sched: Rc<ManualScheduler>,
        listeners: ListenerRegistry,
        env: Environment,
        config: MorphConfig,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                sched: Rc::new(ManualScheduler::new()),
                listeners: ListenerRegistry::new(),
                env: Environment::new(Size::new(1200.0, 800.0)),
                config: MorphConfig::default(),
                log: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn mount<P: MorphPhase>(&self, kind: ContentKind) -> MorphInstance<P> {
            let close_log = Rc::clone(&self.log);
            let fall_log = Rc::clone(&self.log);
            let callbacks = MorphCallbacks::new(move || close_log.borrow_mut().push("close"))
                .with_start_falling(move || fall_log.borrow_mut().push("fall"));
            let scheduler: Rc<dyn Scheduler> = self.sched.clone();
            MorphInstance::mount(
                Rect::new(100.0, 50.0, 200.0, 150.0),
                kind,
                callbacks,
                &MountContext {
                    scheduler,
                    listeners: &self.listeners,
                    environment: &self.env,
                    config: &self.config,
                },
            )
        }

        /// Fire every timer up to `limit` into `instance`.
        fn run<P: MorphPhase>(&self, instance: &mut MorphInstance<P>, limit: Duration) {
            let target = self.sched.now() + limit;
            loop {
                let due = self.sched.advance_to_next(target);
                if due.is_empty() {
                    break;
                }
                for id in due {
                    instance.on_timer(id);
                }
            }
        }
    }

    #[test]
    fn opens_to_expanded_and_closes_with_callbacks_in_order() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        assert_eq!(morph.phase(), CardPhase::Entering);
        assert_eq!(fx.listeners.len(), 2);

        fx.run(&mut morph, Duration::from_secs(2));
        assert_eq!(morph.phase(), CardPhase::Expanded);
        assert_eq!(fx.sched.pending(), 0);

        assert_eq!(morph.handle_event(&Event::escape()), Some(MorphAction::Close));
        assert_eq!(morph.phase(), CardPhase::Collapsing);
        fx.run(&mut morph, Duration::from_secs(2));

        assert!(morph.is_closed());
        assert!(!morph.is_mounted());
        assert_eq!(*fx.log.borrow(), vec!["fall", "close"]);
        assert!(morph.stagger(3).item_style(morph.phase(), 0).is_some());
        assert!(fx.listeners.is_empty());
        assert_eq!(fx.sched.pending(), 0);
    }

    #[test]
    fn close_is_ignored_before_expanded() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        for id in fx.sched.advance(Duration::from_millis(16)) {
            morph.on_timer(id);
        }
        assert_eq!(morph.phase(), CardPhase::Lifted);
        assert!(morph.request_close().is_err());
        assert_eq!(morph.handle_event(&Event::escape()), None);
        fx.run(&mut morph, Duration::from_secs(1));
        assert_eq!(morph.phase(), CardPhase::Expanded);
    }

    #[test]
    fn backdrop_click_closes_only_when_expanded() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        assert_eq!(morph.handle_event(&Event::click(HitTarget::Backdrop)), None);
        fx.run(&mut morph, Duration::from_secs(1));
        assert_eq!(morph.handle_event(&Event::click(HitTarget::Surface)), None);
        assert_eq!(
            morph.handle_event(&Event::click(HitTarget::Backdrop)),
            Some(MorphAction::Close)
        );
    }

    #[test]
    fn close_button_closes() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<PanePhase>(ContentKind::Project {
            density: CardDensity::Regular,
        });
        fx.run(&mut morph, Duration::from_secs(2));
        assert_eq!(morph.phase(), PanePhase::Expanded);
        assert_eq!(
            morph.handle_event(&Event::click(HitTarget::CloseButton)),
            Some(MorphAction::Close)
        );
        assert_eq!(morph.phase(), PanePhase::Collapsing);
    }

    #[test]
    fn resize_recenters_without_phase_change() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        fx.run(&mut morph, Duration::from_secs(1));
        let before = morph.style().rect;
        let action = morph.handle_event(&Event::resize(Size::new(1000.0, 700.0)));
        assert_eq!(action, Some(MorphAction::Relayout));
        assert_eq!(morph.phase(), CardPhase::Expanded);
        let after = morph.style().rect;
        assert_ne!(before, after);
        assert_eq!(after.left, (1000.0 - after.width) / 2.0);
        assert_eq!(morph.handle_event(&Event::resize(Size::new(1000.0, 700.0))), None);
    }

    #[test]
    fn environment_changes_are_picked_up() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        assert_eq!(morph.sync_environment(), None);
        fx.env.set_viewport(Size::new(500.0, 900.0));
        assert_eq!(morph.sync_environment(), Some(MorphAction::Relayout));
        assert!(morph.viewport().mobile);
    }

    #[test]
    fn host_unmount_cancels_everything_without_on_close() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        assert_eq!(fx.sched.pending(), 1);
        morph.unmount();
        assert_eq!(fx.sched.pending(), 0);
        assert!(fx.listeners.is_empty());
        assert!(fx.log.borrow().is_empty());
        morph.unmount();
        assert_eq!(morph.handle_event(&Event::escape()), None);
    }

    #[test]
    fn close_after_unmount_is_rejected() {
        let fx = Fixture::new();
        let mut morph = fx.mount::<CardPhase>(ContentKind::Contact);
        fx.run(&mut morph, Duration::from_secs(2));
        assert_eq!(morph.phase(), CardPhase::Expanded);
        morph.unmount();

        let rejected = morph.request_close().unwrap_err();
        assert_eq!(rejected.phase, CardPhase::Expanded);
        assert_eq!(morph.phase(), CardPhase::Expanded);
        assert_eq!(fx.sched.pending(), 0);
        assert!(fx.log.borrow().is_empty());
    }

    #[test]
    fn drop_tears_down() {
        let fx = Fixture::new();
        let morph = fx.mount::<PanePhase>(ContentKind::Project {
            density: CardDensity::Compact,
        });
        drop(morph);
        assert_eq!(fx.sched.pending(), 0);
        assert!(fx.listeners.is_empty());
    }

    #[test]
    fn degenerate_source_still_animates() {
        let fx = Fixture::new();
        let scheduler: Rc<dyn Scheduler> = fx.sched.clone();
        let mut morph = MorphInstance::<CardPhase>::mount(
            Rect::new(f64::NAN, 10.0, -5.0, 0.0),
            ContentKind::Contact,
            MorphCallbacks::new(|| {}),
            &MountContext {
                scheduler,
                listeners: &fx.listeners,
                environment: &fx.env,
                config: &fx.config,
            },
        );
        assert!(morph.style().rect.width >= 0.0);
        fx.run(&mut morph, Duration::from_secs(1));
        assert_eq!(morph.phase(), CardPhase::Expanded);
    }
}
