#![forbid(unsafe_code)]

//! Callbacks invoked on drag-state transitions.

use crate::event::DragEvent;

/// Receiver of drop-zone transitions.
///
/// Each callback gets the event that caused the transition.
pub trait DropZoneHandler {
    fn on_drag_enter(&mut self, event: &DragEvent);

    fn on_drag_leave(&mut self, event: &DragEvent);

    fn on_drop(&mut self, event: &DragEvent);

    /// Whether this zone accepts the dragged payload.
    ///
    /// Defaults to accepting payloads that advertise files.
    fn should_accept_drop(&self, event: &DragEvent) -> bool {
        event.carries_files()
    }
}

impl<H: DropZoneHandler + ?Sized> DropZoneHandler for Box<H> {
    fn on_drag_enter(&mut self, event: &DragEvent) {
        (**self).on_drag_enter(event);
    }

    fn on_drag_leave(&mut self, event: &DragEvent) {
        (**self).on_drag_leave(event);
    }

    fn on_drop(&mut self, event: &DragEvent) {
        (**self).on_drop(event);
    }

    fn should_accept_drop(&self, event: &DragEvent) -> bool {
        (**self).should_accept_drop(event)
    }
}
