//! End-to-end behaviour of the drop-zone tracker against the fake host.
//!
//! 1. Consecutive enters fire the enter callback once
//! 2. Leave without a prior enter never fires
//! 3. Drop always fires once and resets to idle
//! 4. Leave is classified against the cached rectangle
//! 5. Narrow viewports clamp the cached rectangle
//! 6. Nothing reaches a callback after teardown
//! 7. Non-file payloads are rejected before classification
//!
//! Run:
//!   cargo test -p dropzone-core --test drop_zone_properties

use dropzone_core::testing::{FakeHost, HandlerCall, RecordingHandler};
use dropzone_core::{
    BoundingRect, DragEvent, DragEventKind, DragOutcome, DragState, DragTransition, DropEffect,
    DropZoneConfig, DropZoneTracker, ElementId, EventTarget, Listener, RejectReason,
};
use web_time::{Duration, Instant};

const ZONE: &str = "report-drop-zone";
const ACTIVE: &str = "report-drop-zone-active";

fn zone_rect() -> BoundingRect {
    BoundingRect::from_edges(10.0, 10.0, 110.0, 60.0)
}

fn mounted() -> (DropZoneTracker<RecordingHandler>, FakeHost) {
    let mut host = FakeHost::new(1280.0).with_element(ZONE, zone_rect());
    let mut tracker = DropZoneTracker::new(
        DropZoneConfig::new(ZONE, ACTIVE),
        RecordingHandler::default(),
    )
    .expect("valid config");
    tracker.mount(true, &mut host);
    (tracker, host)
}

fn child_target() -> EventTarget {
    EventTarget::from_path(
        ["attachment-preview", "composer", ZONE]
            .into_iter()
            .map(ElementId::new),
    )
}

fn files_event(kind: DragEventKind, x: f64, y: f64) -> DragEvent {
    DragEvent::new(kind)
        .with_payload_type("Files")
        .with_position(x, y)
        .with_target(child_target())
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Idempotent enter
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn consecutive_enters_fire_once() {
    let (mut tracker, _host) = mounted();
    for step in 0..10 {
        let dispatch = tracker.handle_drag_event(&files_event(
            DragEventKind::Enter,
            20.0 + f64::from(step),
            30.0,
        ));
        if step == 0 {
            assert_eq!(dispatch.transition(), Some(DragTransition::Entered));
        } else {
            assert_eq!(dispatch.transition(), None);
        }
    }
    assert_eq!(tracker.handler().kinds(), vec![HandlerCall::Enter]);
}

#[test]
fn enter_after_leave_starts_new_session() {
    let (mut tracker, _host) = mounted();
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));
    tracker.handle_drag_event(&files_event(DragEventKind::Leave, 5.0, 30.0));
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));
    assert_eq!(
        tracker.handler().kinds(),
        vec![HandlerCall::Enter, HandlerCall::Leave, HandlerCall::Enter]
    );
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Leave requires prior enter
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn leave_while_idle_is_silent() {
    let (mut tracker, _host) = mounted();
    for (x, y) in [(5.0, 30.0), (50.0, 30.0), (200.0, 200.0)] {
        tracker.handle_drag_event(&files_event(DragEventKind::Leave, x, y));
    }
    assert_eq!(tracker.handler().count(HandlerCall::Leave), 0);
    assert_eq!(tracker.drag_state(), DragState::Idle);
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Drop always resets
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn drop_from_idle_and_dragging() {
    let (mut tracker, _host) = mounted();

    let dispatch = tracker.handle_drag_event(&files_event(DragEventKind::Drop, 50.0, 30.0));
    assert_eq!(dispatch.transition(), Some(DragTransition::Dropped));
    assert_eq!(tracker.drag_state(), DragState::Idle);
    assert_eq!(tracker.handler().count(HandlerCall::Drop), 1);

    tracker.handler_mut().clear();
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));
    tracker.handle_drag_event(&files_event(DragEventKind::Drop, 50.0, 30.0));
    assert_eq!(tracker.drag_state(), DragState::Idle);
    assert_eq!(tracker.handler().count(HandlerCall::Drop), 1);
}

#[test]
fn drop_callback_receives_originating_event() {
    let (mut tracker, _host) = mounted();
    let event = files_event(DragEventKind::Drop, 42.0, 24.0).with_payload_type("text/uri-list");
    tracker.handle_drag_event(&event);
    let (call, received) = &tracker.handler().calls()[0];
    assert_eq!(*call, HandlerCall::Drop);
    assert_eq!(received, &event);
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Boundary classification
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn leave_left_of_boundary_transitions() {
    let (mut tracker, _host) = mounted();
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));

    let dispatch = tracker.handle_drag_event(&files_event(DragEventKind::Leave, 5.0, 30.0));
    assert_eq!(dispatch.transition(), Some(DragTransition::Left));
    assert_eq!(tracker.drag_state(), DragState::Idle);
    assert_eq!(tracker.handler().count(HandlerCall::Leave), 1);
}

#[test]
fn leave_inside_boundary_is_ignored() {
    let (mut tracker, _host) = mounted();
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));

    let dispatch = tracker.handle_drag_event(&files_event(DragEventKind::Leave, 50.0, 30.0));
    assert_eq!(dispatch.transition(), None);
    assert_eq!(tracker.drag_state(), DragState::DraggingOver);
    assert_eq!(tracker.handler().count(HandlerCall::Leave), 0);
}

#[test]
fn each_edge_ends_the_session() {
    for (x, y) in [(50.0, 10.0), (50.0, 60.0), (10.0, 30.0), (110.0, 30.0)] {
        let (mut tracker, _host) = mounted();
        tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));
        let dispatch = tracker.handle_drag_event(&files_event(DragEventKind::Leave, x, y));
        assert_eq!(
            dispatch.transition(),
            Some(DragTransition::Left),
            "leave at ({x}, {y}) should end the session"
        );
    }
}

#[test]
fn resize_mid_drag_moves_the_boundary() {
    let t0 = Instant::now();
    let (mut tracker, mut host) = mounted();
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));

    // Zone grows to the left; x = 5 is now inside.
    host.set_element(ZONE, BoundingRect::from_edges(0.0, 10.0, 110.0, 60.0));
    tracker.handle_resize(t0, &mut host);

    let dispatch = tracker.handle_drag_event(&files_event(DragEventKind::Leave, 5.0, 30.0));
    assert_eq!(dispatch.transition(), None);
    assert_eq!(tracker.drag_state(), DragState::DraggingOver);
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Responsive clamp
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn narrow_viewport_clamps_edges() {
    let mut host = FakeHost::new(400.0)
        .with_element(ZONE, BoundingRect::from_edges(20.0, 0.0, 380.0, 200.0));
    let mut tracker = DropZoneTracker::new(
        DropZoneConfig::new(ZONE, ACTIVE).with_responsive_breakpoint(500.0),
        RecordingHandler::default(),
    )
    .unwrap();
    tracker.mount(true, &mut host);

    let rect = tracker.geometry().expect("zone measured on activation");
    assert_eq!(rect.left(), 0.0);
    assert_eq!(rect.right(), 400.0);
}

#[test]
fn clamp_follows_viewport_across_resizes() {
    let t0 = Instant::now();
    let mut host = FakeHost::new(1280.0)
        .with_element(ZONE, BoundingRect::from_edges(20.0, 0.0, 380.0, 200.0));
    let mut tracker = DropZoneTracker::new(
        DropZoneConfig::new(ZONE, ACTIVE).with_responsive_breakpoint(500.0),
        RecordingHandler::default(),
    )
    .unwrap();
    tracker.mount(true, &mut host);
    assert_eq!(tracker.geometry().map(|r| r.left()), Some(20.0));

    host.set_viewport_width(400.0);
    tracker.handle_resize(t0, &mut host);
    assert_eq!(
        tracker.geometry().map(|r| (r.left(), r.right())),
        Some((0.0, 400.0))
    );
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Teardown silence
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn nothing_fires_after_unmount() {
    let t0 = Instant::now();
    let (mut tracker, mut host) = mounted();
    tracker.handle_resize(t0, &mut host);
    tracker.handle_resize(t0 + Duration::from_millis(5), &mut host);
    assert!(host.wake().is_some());
    let geometry = tracker.geometry();

    tracker.unmount(&mut host);
    assert!(host.registered().is_empty());
    assert_eq!(host.wake(), None);
    assert_eq!(host.unbalanced(), 0);

    // A host that still delivers stale events and timers must not leak.
    host.set_element(ZONE, BoundingRect::from_edges(0.0, 0.0, 900.0, 900.0));
    tracker.handle_wake(t0 + Duration::from_millis(500), &mut host);
    tracker.handle_resize(t0 + Duration::from_millis(600), &mut host);
    tracker.handle_page_load(&mut host);
    for kind in [DragEventKind::Enter, DragEventKind::Leave, DragEventKind::Drop] {
        let dispatch = tracker.handle_drag_event(&files_event(kind, 50.0, 30.0));
        assert_eq!(dispatch.outcome, DragOutcome::Ignored);
    }

    assert!(tracker.handler().calls().is_empty());
    assert_eq!(tracker.geometry(), geometry);
    assert_eq!(host.wake(), None);
}

#[test]
fn refocus_after_teardown_starts_fresh() {
    let t0 = Instant::now();
    let (mut tracker, mut host) = mounted();
    tracker.handle_drag_event(&files_event(DragEventKind::Enter, 50.0, 30.0));
    tracker.handle_resize(t0, &mut host);
    tracker.handle_resize(t0 + Duration::from_millis(5), &mut host);

    tracker.set_focused(false, &mut host);
    tracker.set_focused(true, &mut host);

    assert_eq!(tracker.drag_state(), DragState::Idle);
    assert_eq!(host.registered().len(), Listener::ACTIVE.len());
    // The throttle forgot the pre-teardown burst: the next resize leads.
    host.set_element(ZONE, BoundingRect::from_edges(0.0, 0.0, 300.0, 60.0));
    tracker.handle_resize(t0 + Duration::from_millis(10), &mut host);
    assert_eq!(tracker.geometry().map(|r| r.right()), Some(300.0));
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Rejection path
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn non_file_payloads_never_fire() {
    let (mut tracker, _host) = mounted();
    for kind in [
        DragEventKind::Enter,
        DragEventKind::Leave,
        DragEventKind::Drop,
        DragEventKind::Enter,
    ] {
        let event = DragEvent::new(kind)
            .with_payload_type("text/html")
            .with_payload_type("text/plain")
            .with_position(50.0, 30.0)
            .with_target(child_target());
        let dispatch = tracker.handle_drag_event(&event);
        assert_eq!(
            dispatch.outcome,
            DragOutcome::Rejected(RejectReason::PayloadRefused)
        );
        assert_eq!(dispatch.drop_effect, Some(DropEffect::None));
    }
    assert!(tracker.handler().calls().is_empty());
    assert_eq!(tracker.drag_state(), DragState::Idle);
}

#[test]
fn custom_acceptance_replaces_files_rule() {
    let mut host = FakeHost::new(1280.0).with_element(ZONE, zone_rect());
    let mut tracker = DropZoneTracker::new(
        DropZoneConfig::new(ZONE, ACTIVE),
        RecordingHandler::accepting(|event| event.has_payload_type("text/uri-list")),
    )
    .unwrap();
    tracker.mount(true, &mut host);

    let files = files_event(DragEventKind::Enter, 50.0, 30.0);
    assert_eq!(
        tracker.handle_drag_event(&files).outcome,
        DragOutcome::Rejected(RejectReason::PayloadRefused)
    );

    let link = DragEvent::new(DragEventKind::Enter)
        .with_payload_type("text/uri-list")
        .with_target(child_target());
    assert_eq!(
        tracker.handle_drag_event(&link).transition(),
        Some(DragTransition::Entered)
    );
}
