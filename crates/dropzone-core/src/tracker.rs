#![forbid(unsafe_code)]

//! Drop-zone drag tracking.
//!
//! [`DropZoneTracker`] turns document-level drag events into at most one
//! enter/leave pair per drag session plus a drop, regardless of how many
//! nested children the pointer crosses inside the zone.
//!
//! # State Machine
//!
//! ```text
//!            Enter (accepted)
//!   Idle ───────────────────────▶ DraggingOver
//!    ▲                               │   │
//!    │  Leave outside rect, or       │   │ Enter / Leave inside rect:
//!    │  active zone w/o related ◀────┘   │ no change
//!    │                                   │
//!    └──────────── Drop (any state) ◀────┘
//! ```
//!
//! # Invariants
//!
//! 1. `on_drag_enter` fires at most once per drag session.
//! 2. `on_drag_leave` only fires from `DraggingOver`.
//! 3. A drop always fires `on_drop` and leaves the tracker `Idle`.
//! 4. Rejected events (target outside the zone, payload refused) never
//!    change state and never fire a callback.
//! 5. Listeners are held iff the tracker is mounted, enabled and focused.
//! 6. After deactivation no listener, wake, or load event can reach a
//!    callback or the geometry cache.
//!
//! # Failure Modes
//!
//! - Zone element not mounted at measurement time: the cache keeps its
//!   previous value (possibly empty) until the next refresh trigger.
//! - Leave while no geometry has ever been measured: only the active-zone
//!   rule can end the session.

use web_time::Instant;

use crate::config::{DropZoneConfig, DropZoneConfigError};
use crate::event::{DragEvent, DragEventKind, DropEffect, ElementId, Listener};
use crate::geometry::ZoneRect;
use crate::handler::DropZoneHandler;
use crate::host::DropZoneHost;
use crate::page_load::{PageLoadAction, PageLoadGate};
use crate::throttle::{Throttle, ThrottleCall};

/// Whether a drag is currently considered over the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingOver,
}

/// State change produced by one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTransition {
    Entered,
    Left,
    Dropped,
}

/// Why an accepted event left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// Enter while already dragging over the zone (nested child).
    AlreadyDragging,
    /// Leave without a preceding enter.
    NotDragging,
    /// Leave onto a nested child; the pointer is still inside the zone.
    StillInside,
}

/// Why an event was refused before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OutsideZone,
    PayloadRefused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Transition(DragTransition),
    Unchanged(UnchangedReason),
    Rejected(RejectReason),
    /// The tracker holds no listeners; the host should not have delivered it.
    Ignored,
}

/// Result of one drag-event dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDispatch {
    pub kind: DragEventKind,
    pub outcome: DragOutcome,
    /// Drop-effect hint to write back to the platform event, if any.
    pub drop_effect: Option<DropEffect>,
    /// Whether the platform's default action must be prevented.
    pub prevent_default: bool,
}

impl DragDispatch {
    fn new(kind: DragEventKind, outcome: DragOutcome, drop_effect: Option<DropEffect>) -> Self {
        Self {
            kind,
            outcome,
            drop_effect,
            prevent_default: !matches!(outcome, DragOutcome::Ignored),
        }
    }

    #[inline]
    pub fn transition(&self) -> Option<DragTransition> {
        match self.outcome {
            DragOutcome::Transition(t) => Some(t),
            _ => None,
        }
    }
}

/// Stateful drop-zone tracker.
///
/// All methods take the host explicitly and the current time where the
/// resize throttle is involved.
pub struct DropZoneTracker<H> {
    config: DropZoneConfig,
    handler: H,
    drag_state: DragState,
    geometry: Option<ZoneRect>,
    resize_throttle: Throttle,
    page_load: PageLoadGate,
    mounted: bool,
    enabled: bool,
    focused: bool,
    listening: bool,
}

impl<H> std::fmt::Debug for DropZoneTracker<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropZoneTracker")
            .field("zone_id", &self.config.zone_id)
            .field("drag_state", &self.drag_state)
            .field("geometry", &self.geometry)
            .field("listening", &self.listening)
            .finish()
    }
}

impl<H: DropZoneHandler> DropZoneTracker<H> {
    /// Create an unmounted tracker. Fails if `config` does not validate.
    pub fn new(config: DropZoneConfig, handler: H) -> Result<Self, DropZoneConfigError> {
        let config = config.validated()?;
        Ok(Self {
            resize_throttle: Throttle::new(config.resize_throttle()),
            enabled: config.enabled,
            config,
            handler,
            drag_state: DragState::Idle,
            geometry: None,
            page_load: PageLoadGate::new(),
            mounted: false,
            focused: false,
            listening: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &DropZoneConfig {
        &self.config
    }

    #[inline]
    pub fn zone_id(&self) -> &ElementId {
        &self.config.zone_id
    }

    #[inline]
    pub fn drag_state(&self) -> DragState {
        self.drag_state
    }

    /// Cached zone rectangle, if it has been measured.
    #[inline]
    pub fn geometry(&self) -> Option<ZoneRect> {
        self.geometry
    }

    #[inline]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[inline]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    #[inline]
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Attach the tracker to its host with the current focus signal.
    pub fn mount(&mut self, focused: bool, host: &mut impl DropZoneHost) {
        self.mounted = true;
        self.focused = focused;
        self.sync_listeners(host);
    }

    /// Detach from the host. Safe to call more than once.
    pub fn unmount(&mut self, host: &mut impl DropZoneHost) {
        self.mounted = false;
        self.sync_listeners(host);
    }

    pub fn set_enabled(&mut self, enabled: bool, host: &mut impl DropZoneHost) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.sync_listeners(host);
    }

    pub fn set_focused(&mut self, focused: bool, host: &mut impl DropZoneHost) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;
        self.sync_listeners(host);
    }

    fn should_listen(&self) -> bool {
        self.mounted && self.enabled && self.focused
    }

    fn sync_listeners(&mut self, host: &mut impl DropZoneHost) {
        match (self.should_listen(), self.listening) {
            (true, false) => self.activate(host),
            (false, true) => self.deactivate(host),
            _ => {}
        }
    }

    fn activate(&mut self, host: &mut impl DropZoneHost) {
        tracing::debug!(zone = %self.config.zone_id, "drop zone listening");
        self.listening = true;
        self.refresh_geometry(host);
        for listener in Listener::ACTIVE {
            host.add_listener(listener);
        }
        match self.page_load.arm(host.document_ready()) {
            PageLoadAction::Listen => host.add_listener(Listener::Load),
            PageLoadAction::RunNow | PageLoadAction::AlreadyListening => {}
        }
    }

    fn deactivate(&mut self, host: &mut impl DropZoneHost) {
        tracing::debug!(zone = %self.config.zone_id, "drop zone stopped listening");
        for listener in Listener::ACTIVE {
            host.remove_listener(listener);
        }
        if self.page_load.disarm() {
            host.remove_listener(Listener::Load);
        }
        if self.resize_throttle.cancel() {
            host.cancel_wake();
        }
        self.listening = false;
        self.drag_state = DragState::Idle;
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Re-measure the zone element. A missing element leaves the cache as is.
    fn refresh_geometry(&mut self, host: &mut impl DropZoneHost) {
        let Some(measured) = host.measure(&self.config.zone_id) else {
            tracing::debug!(zone = %self.config.zone_id, "drop zone not mounted; geometry deferred");
            return;
        };
        let rect = ZoneRect::from_measured(
            measured,
            host.viewport_width(),
            self.config.responsive_breakpoint,
        );
        tracing::debug!(
            zone = %self.config.zone_id,
            left = rect.left(),
            right = rect.right(),
            top = rect.top(),
            bottom = rect.bottom(),
            "drop zone geometry refreshed"
        );
        self.geometry = Some(rect);
    }

    /// Window resized. Refreshes now or schedules a trailing refresh.
    pub fn handle_resize(&mut self, now: Instant, host: &mut impl DropZoneHost) {
        if !self.listening {
            return;
        }
        match self.resize_throttle.call(now) {
            ThrottleCall::Immediate => self.refresh_geometry(host),
            ThrottleCall::Scheduled { delay } => host.schedule_wake(delay),
            ThrottleCall::Coalesced => {}
        }
    }

    /// The wake requested through [`DropZoneHost::schedule_wake`] fired.
    pub fn handle_wake(&mut self, now: Instant, host: &mut impl DropZoneHost) {
        if !self.listening {
            return;
        }
        if self.resize_throttle.poll(now) {
            self.refresh_geometry(host);
        } else if let Some(remaining) = self.resize_throttle.remaining(now) {
            // Woken early; wait out the rest of the window.
            host.schedule_wake(remaining);
        }
    }

    /// The window finished loading.
    pub fn handle_page_load(&mut self, host: &mut impl DropZoneHost) {
        if !self.listening || !self.page_load.on_load() {
            return;
        }
        host.remove_listener(Listener::Load);
        self.refresh_geometry(host);
    }

    // -----------------------------------------------------------------------
    // Drag events
    // -----------------------------------------------------------------------

    /// Filter and classify one drag event, invoking the handler on a
    /// transition.
    pub fn handle_drag_event(&mut self, event: &DragEvent) -> DragDispatch {
        if !self.listening {
            tracing::trace!(zone = %self.config.zone_id, kind = ?event.kind, "drag event while not listening");
            return DragDispatch::new(event.kind, DragOutcome::Ignored, None);
        }

        if let Some(reason) = self.reject_reason(event) {
            tracing::trace!(zone = %self.config.zone_id, kind = ?event.kind, ?reason, "drag event rejected");
            return DragDispatch::new(
                event.kind,
                DragOutcome::Rejected(reason),
                Some(DropEffect::None),
            );
        }

        match event.kind {
            DragEventKind::Enter => self.on_enter(event),
            DragEventKind::Leave => self.on_leave(event),
            DragEventKind::Drop => self.on_drop(event),
        }
    }

    fn reject_reason(&self, event: &DragEvent) -> Option<RejectReason> {
        let inside = event
            .target
            .as_ref()
            .is_some_and(|target| target.is_within(&self.config.zone_id));
        if !inside {
            Some(RejectReason::OutsideZone)
        } else if !self.handler.should_accept_drop(event) {
            Some(RejectReason::PayloadRefused)
        } else {
            None
        }
    }

    fn on_enter(&mut self, event: &DragEvent) -> DragDispatch {
        if self.drag_state == DragState::DraggingOver {
            return DragDispatch::new(
                event.kind,
                DragOutcome::Unchanged(UnchangedReason::AlreadyDragging),
                None,
            );
        }
        self.drag_state = DragState::DraggingOver;
        tracing::debug!(zone = %self.config.zone_id, "drag entered drop zone");
        self.handler.on_drag_enter(event);
        DragDispatch::new(
            event.kind,
            DragOutcome::Transition(DragTransition::Entered),
            Some(DropEffect::Copy),
        )
    }

    fn on_leave(&mut self, event: &DragEvent) -> DragDispatch {
        if self.drag_state == DragState::Idle {
            return DragDispatch::new(
                event.kind,
                DragOutcome::Unchanged(UnchangedReason::NotDragging),
                None,
            );
        }
        if !self.left_zone(event) {
            return DragDispatch::new(
                event.kind,
                DragOutcome::Unchanged(UnchangedReason::StillInside),
                None,
            );
        }
        self.drag_state = DragState::Idle;
        tracing::debug!(zone = %self.config.zone_id, "drag left drop zone");
        self.handler.on_drag_leave(event);
        DragDispatch::new(
            event.kind,
            DragOutcome::Transition(DragTransition::Left),
            None,
        )
    }

    fn on_drop(&mut self, event: &DragEvent) -> DragDispatch {
        self.drag_state = DragState::Idle;
        tracing::debug!(zone = %self.config.zone_id, "payload dropped on drop zone");
        self.handler.on_drop(event);
        DragDispatch::new(
            event.kind,
            DragOutcome::Transition(DragTransition::Dropped),
            None,
        )
    }

    /// Leave ends the session when the pointer is outside the cached rect, or
    /// when the active zone is left with no related target (a file manager
    /// window now covers the zone).
    fn left_zone(&self, event: &DragEvent) -> bool {
        let outside = self
            .geometry
            .is_some_and(|rect| rect.is_outside(event.client_x, event.client_y));
        let covered = event.related_target.is_none()
            && event
                .target
                .as_ref()
                .is_some_and(|target| target.is(&self.config.active_zone_id));
        outside || covered
    }
}
