#![no_main]

use arbitrary::Arbitrary;
use dropzone_core::testing::{FakeHost, HandlerCall, RecordingHandler};
use dropzone_core::{
    BoundingRect, DragEvent, DragEventKind, DragOutcome, DragState, DropZoneConfig,
    DropZoneTracker, ElementId, EventTarget, Listener,
};
use libfuzzer_sys::fuzz_target;
use web_time::{Duration, Instant};

const ZONE: &str = "zone";
const ACTIVE: &str = "zone-active";

#[derive(Debug, Arbitrary)]
enum Op {
    Drag {
        kind: u8,
        files: bool,
        x: i16,
        y: i16,
        target: u8,
        related: bool,
    },
    Resize {
        advance_ms: u8,
        left: i16,
        right: i16,
        top: i16,
        bottom: i16,
        viewport: u16,
    },
    Wake {
        advance_ms: u8,
    },
    Focus(bool),
    Enable(bool),
    Remount,
    Load,
}

fn kind(byte: u8) -> DragEventKind {
    match byte % 3 {
        0 => DragEventKind::Enter,
        1 => DragEventKind::Leave,
        _ => DragEventKind::Drop,
    }
}

fn target(byte: u8) -> Option<EventTarget> {
    let path: &[&str] = match byte % 5 {
        0 => &[ZONE],
        1 => &["child", ZONE],
        2 => &[ACTIVE, ZONE],
        3 => &["sidebar"],
        _ => return None,
    };
    Some(EventTarget::from_path(path.iter().copied().map(ElementId::new)))
}

fuzz_target!(|ops: Vec<Op>| {
    let mut host = FakeHost::new(1024.0)
        .loading()
        .with_element(ZONE, BoundingRect::from_edges(10.0, 10.0, 110.0, 60.0));
    let Ok(mut tracker) =
        DropZoneTracker::new(DropZoneConfig::new(ZONE, ACTIVE), RecordingHandler::default())
    else {
        return;
    };
    tracker.mount(true, &mut host);

    let mut now = Instant::now();
    let (mut mounted, mut enabled, mut focused) = (true, true, true);
    let mut dragging = false;

    for op in ops.iter().take(512) {
        let was_listening = tracker.is_listening();
        let before = tracker.handler().calls().len();

        match op {
            Op::Drag {
                kind: k,
                files,
                x,
                y,
                target: t,
                related,
            } => {
                let mut event = DragEvent::new(kind(*k))
                    .with_payload_type(if *files { "Files" } else { "text/plain" })
                    .with_position(f64::from(*x), f64::from(*y));
                event.target = target(*t);
                if *related {
                    event.related_target = target(1);
                }
                let dispatch = tracker.handle_drag_event(&event);
                if matches!(
                    dispatch.outcome,
                    DragOutcome::Rejected(_) | DragOutcome::Ignored
                ) {
                    assert_eq!(tracker.handler().calls().len(), before);
                }
                assert_eq!(
                    dispatch.prevent_default,
                    !matches!(dispatch.outcome, DragOutcome::Ignored)
                );
            }
            Op::Resize {
                advance_ms,
                left,
                right,
                top,
                bottom,
                viewport,
            } => {
                now += Duration::from_millis(u64::from(*advance_ms));
                host.set_element(
                    ZONE,
                    BoundingRect::from_edges(
                        f64::from(*left),
                        f64::from(*top),
                        f64::from(*right),
                        f64::from(*bottom),
                    ),
                );
                host.set_viewport_width(f64::from(*viewport));
                tracker.handle_resize(now, &mut host);
            }
            Op::Wake { advance_ms } => {
                now += Duration::from_millis(u64::from(*advance_ms));
                if host.fire_wake().is_some() {
                    tracker.handle_wake(now, &mut host);
                }
            }
            Op::Focus(value) => {
                focused = *value;
                tracker.set_focused(*value, &mut host);
            }
            Op::Enable(value) => {
                enabled = *value;
                tracker.set_enabled(*value, &mut host);
            }
            Op::Remount => {
                tracker.unmount(&mut host);
                tracker.mount(focused, &mut host);
                mounted = true;
            }
            Op::Load => {
                host.set_ready(true);
                tracker.handle_page_load(&mut host);
            }
        }

        let calls = tracker.handler().kinds();
        if !was_listening {
            assert_eq!(calls.len(), before, "callback while not listening");
        }
        let reset = match op {
            Op::Remount => was_listening,
            _ => was_listening && !tracker.is_listening(),
        };
        if reset {
            dragging = false;
        }
        for call in &calls[before..] {
            match call {
                HandlerCall::Enter => {
                    assert!(!dragging, "enter fired twice");
                    dragging = true;
                }
                HandlerCall::Leave => {
                    assert!(dragging, "leave without enter");
                    dragging = false;
                }
                HandlerCall::Drop => dragging = false,
            }
        }
        assert_eq!(dragging, tracker.drag_state() == DragState::DraggingOver);

        let listening = mounted && enabled && focused;
        assert_eq!(tracker.is_listening(), listening);
        for listener in Listener::ACTIVE {
            assert_eq!(host.is_registered(listener), listening);
        }
        if let Some(rect) = tracker.geometry() {
            assert!(rect.left() <= rect.right());
            assert!(rect.top() <= rect.bottom());
        }
    }

    tracker.unmount(&mut host);
    assert!(host.registered().is_empty());
    assert_eq!(host.wake(), None);
    assert_eq!(host.unbalanced(), 0);
});
