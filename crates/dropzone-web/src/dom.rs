#![forbid(unsafe_code)]

//! DOM event names and target translation.
//!
//! Kept free of `web-sys` so the mapping is testable on native targets.

use dropzone_core::{DragDispatch, DragEventKind, ElementId, EventTarget, Listener};

pub const DRAG_ENTER_EVENT: &str = "dragenter";
pub const DRAG_LEAVE_EVENT: &str = "dragleave";
pub const DROP_EVENT: &str = "drop";
pub const RESIZE_EVENT: &str = "resize";
pub const LOAD_EVENT: &str = "load";

/// `document.readyState` once every subresource has loaded.
pub const READY_STATE_COMPLETE: &str = "complete";

/// DOM event type registered for `listener`.
pub const fn listener_event_name(listener: Listener) -> &'static str {
    match listener {
        Listener::DragEnter => DRAG_ENTER_EVENT,
        Listener::DragLeave => DRAG_LEAVE_EVENT,
        Listener::Drop => DROP_EVENT,
        Listener::Resize => RESIZE_EVENT,
        Listener::Load => LOAD_EVENT,
    }
}

/// Drag kind for a DOM event type; other types (e.g. `dragover`) map to `None`.
pub fn drag_kind_from_event_type(event_type: &str) -> Option<DragEventKind> {
    match event_type {
        DRAG_ENTER_EVENT => Some(DragEventKind::Enter),
        DRAG_LEAVE_EVENT => Some(DragEventKind::Leave),
        DROP_EVENT => Some(DragEventKind::Drop),
        _ => None,
    }
}

/// Build a target from an event's composed path.
///
/// Each entry is the `id` of a path node, or `None` for nodes that are not
/// elements. The first entry is the target itself. Empty ids are dropped.
pub fn target_from_path_ids<I>(ids: I) -> Option<EventTarget>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut ids = ids.into_iter();
    let first = ids.next()?;
    let id = first.filter(|id| !id.is_empty()).map(ElementId::from);
    let mut path: Vec<ElementId> = id.iter().cloned().collect();
    path.extend(
        ids.flatten()
            .filter(|id| !id.is_empty())
            .map(ElementId::from),
    );
    Some(EventTarget { id, path })
}

/// Whether a `document.readyState` value means the page has loaded.
#[inline]
pub fn is_ready_state_complete(ready_state: &str) -> bool {
    ready_state == READY_STATE_COMPLETE
}

/// What to write back onto the DOM event after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWriteBack {
    /// Call `preventDefault()`.
    pub prevent_default: bool,
    /// Value for `dataTransfer.dropEffect`; `None` leaves it untouched.
    pub drop_effect: Option<&'static str>,
}

impl EventWriteBack {
    pub fn from_dispatch(dispatch: &DragDispatch) -> Self {
        Self {
            prevent_default: dispatch.prevent_default,
            drop_effect: dispatch.drop_effect.map(|effect| effect.as_str()),
        }
    }
}
