#![forbid(unsafe_code)]

//! In-memory host and handler for tests and fuzzing.

use std::collections::{HashMap, HashSet};

use web_time::Duration;

use crate::event::{DragEvent, ElementId, Listener};
use crate::geometry::BoundingRect;
use crate::handler::DropZoneHandler;
use crate::host::DropZoneHost;

/// Host that records listener and timer calls and serves element bounds
/// from a map.
#[derive(Debug, Clone)]
pub struct FakeHost {
    registered: HashSet<Listener>,
    adds: usize,
    removes: usize,
    elements: HashMap<ElementId, BoundingRect>,
    viewport_width: f64,
    ready: bool,
    wake: Option<Duration>,
    wakes_scheduled: usize,
    /// Listener operations that did not match the registration state,
    /// e.g. removing a listener that was never added.
    unbalanced: usize,
}

impl FakeHost {
    /// A loaded document with the given viewport width and no elements.
    pub fn new(viewport_width: f64) -> Self {
        Self {
            registered: HashSet::new(),
            adds: 0,
            removes: 0,
            elements: HashMap::new(),
            viewport_width,
            ready: true,
            wake: None,
            wakes_scheduled: 0,
            unbalanced: 0,
        }
    }

    /// Document still loading.
    #[must_use]
    pub fn loading(mut self) -> Self {
        self.ready = false;
        self
    }

    #[must_use]
    pub fn with_element(mut self, id: impl Into<ElementId>, rect: BoundingRect) -> Self {
        self.elements.insert(id.into(), rect);
        self
    }

    pub fn set_element(&mut self, id: impl Into<ElementId>, rect: BoundingRect) {
        self.elements.insert(id.into(), rect);
    }

    pub fn remove_element(&mut self, id: &ElementId) {
        self.elements.remove(id);
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn is_registered(&self, listener: Listener) -> bool {
        self.registered.contains(&listener)
    }

    pub fn registered(&self) -> &HashSet<Listener> {
        &self.registered
    }

    pub fn add_count(&self) -> usize {
        self.adds
    }

    pub fn remove_count(&self) -> usize {
        self.removes
    }

    /// Delay of the outstanding wake, if any.
    pub fn wake(&self) -> Option<Duration> {
        self.wake
    }

    /// Take the outstanding wake, as a timer firing would.
    pub fn fire_wake(&mut self) -> Option<Duration> {
        self.wake.take()
    }

    pub fn wakes_scheduled(&self) -> usize {
        self.wakes_scheduled
    }

    pub fn unbalanced(&self) -> usize {
        self.unbalanced
    }
}

impl DropZoneHost for FakeHost {
    fn add_listener(&mut self, listener: Listener) {
        self.adds += 1;
        if !self.registered.insert(listener) {
            self.unbalanced += 1;
        }
    }

    fn remove_listener(&mut self, listener: Listener) {
        self.removes += 1;
        if !self.registered.remove(&listener) {
            self.unbalanced += 1;
        }
    }

    fn measure(&self, element: &ElementId) -> Option<BoundingRect> {
        self.elements.get(element).copied()
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn document_ready(&self) -> bool {
        self.ready
    }

    fn schedule_wake(&mut self, delay: Duration) {
        self.wakes_scheduled += 1;
        self.wake = Some(delay);
    }

    fn cancel_wake(&mut self) {
        self.wake = None;
    }
}

/// Which handler callback ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerCall {
    Enter,
    Leave,
    Drop,
}

/// Handler that records every callback.
#[derive(Default)]
pub struct RecordingHandler {
    calls: Vec<(HandlerCall, DragEvent)>,
    accept: Option<Box<dyn Fn(&DragEvent) -> bool>>,
}

impl std::fmt::Debug for RecordingHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHandler")
            .field("calls", &self.calls.len())
            .field("custom_accept", &self.accept.is_some())
            .finish()
    }
}

impl RecordingHandler {
    /// Replace the default files-only acceptance rule.
    #[must_use]
    pub fn accepting(accept: impl Fn(&DragEvent) -> bool + 'static) -> Self {
        Self {
            calls: Vec::new(),
            accept: Some(Box::new(accept)),
        }
    }

    pub fn calls(&self) -> &[(HandlerCall, DragEvent)] {
        &self.calls
    }

    pub fn kinds(&self) -> Vec<HandlerCall> {
        self.calls.iter().map(|(call, _)| *call).collect()
    }

    pub fn count(&self, call: HandlerCall) -> usize {
        self.calls.iter().filter(|(c, _)| *c == call).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DropZoneHandler for RecordingHandler {
    fn on_drag_enter(&mut self, event: &DragEvent) {
        self.calls.push((HandlerCall::Enter, event.clone()));
    }

    fn on_drag_leave(&mut self, event: &DragEvent) {
        self.calls.push((HandlerCall::Leave, event.clone()));
    }

    fn on_drop(&mut self, event: &DragEvent) {
        self.calls.push((HandlerCall::Drop, event.clone()));
    }

    fn should_accept_drop(&self, event: &DragEvent) -> bool {
        match &self.accept {
            Some(accept) => accept(event),
            None => event.carries_files(),
        }
    }
}
