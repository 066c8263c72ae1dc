#![forbid(unsafe_code)]

//! Canonical drag/drop input types.
//!
//! Hosts translate their native drag events into [`DragEvent`] before
//! handing them to the tracker. The tracker answers with a
//! [`DragDispatch`](crate::tracker::DragDispatch) that carries the
//! [`DropEffect`] the host should apply.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Payload type advertised by the platform when files are being dragged.
pub const FILES_PAYLOAD_TYPE: &str = "Files";

/// Identifier of a host element (a DOM `id` or equivalent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(transparent))]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of drag event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    Enter,
    Leave,
    Drop,
}

/// Target element of a drag event.
///
/// `path` lists the ids of the target and its ancestors, innermost first.
/// Elements without an id are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventTarget {
    pub id: Option<ElementId>,
    pub path: Vec<ElementId>,
}

impl EventTarget {
    /// A target whose id (if any) is the first entry of `path`.
    pub fn from_path(path: impl IntoIterator<Item = ElementId>) -> Self {
        let path: Vec<ElementId> = path.into_iter().collect();
        Self {
            id: path.first().cloned(),
            path,
        }
    }

    /// Whether `element` is this target or one of its ancestors.
    pub fn is_within(&self, element: &ElementId) -> bool {
        self.path.iter().any(|id| id == element)
    }

    /// Whether the target element itself carries `element`'s id.
    pub fn is(&self, element: &ElementId) -> bool {
        self.id.as_ref() == Some(element)
    }
}

/// A native drag event, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    pub kind: DragEventKind,
    /// Payload types advertised by the drag data (e.g. `"Files"`).
    pub payload_types: Vec<String>,
    /// Pointer position in viewport coordinates.
    pub client_x: f64,
    pub client_y: f64,
    pub target: Option<EventTarget>,
    /// Element the pointer moved to/from, if the platform reports one.
    pub related_target: Option<EventTarget>,
}

impl DragEvent {
    pub fn new(kind: DragEventKind) -> Self {
        Self {
            kind,
            payload_types: Vec::new(),
            client_x: 0.0,
            client_y: 0.0,
            target: None,
            related_target: None,
        }
    }

    #[must_use]
    pub fn with_payload_type(mut self, payload_type: impl Into<String>) -> Self {
        self.payload_types.push(payload_type.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.client_x = x;
        self.client_y = y;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_related_target(mut self, target: EventTarget) -> Self {
        self.related_target = Some(target);
        self
    }

    /// Whether the payload advertises `payload_type`.
    pub fn has_payload_type(&self, payload_type: &str) -> bool {
        self.payload_types.iter().any(|t| t == payload_type)
    }

    /// Default acceptance rule: the payload carries files.
    #[inline]
    pub fn carries_files(&self) -> bool {
        self.has_payload_type(FILES_PAYLOAD_TYPE)
    }
}

/// Drop-effect hint shown to the user while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropEffect {
    Copy,
    None,
}

impl DropEffect {
    /// Platform string (`dataTransfer.dropEffect` values).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::None => "none",
        }
    }
}

/// Scope a listener is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    Document,
    Window,
}

/// Host listeners the tracker registers and removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    DragEnter,
    DragLeave,
    Drop,
    Resize,
    Load,
}

impl Listener {
    /// Listeners held for as long as the tracker is listening.
    pub const ACTIVE: [Listener; 4] = [
        Listener::DragEnter,
        Listener::DragLeave,
        Listener::Drop,
        Listener::Resize,
    ];

    pub const fn scope(self) -> ListenerScope {
        match self {
            Self::DragEnter | Self::DragLeave | Self::Drop => ListenerScope::Document,
            Self::Resize | Self::Load => ListenerScope::Window,
        }
    }

    /// Drag kind delivered through this listener, if any.
    pub const fn drag_kind(self) -> Option<DragEventKind> {
        match self {
            Self::DragEnter => Some(DragEventKind::Enter),
            Self::DragLeave => Some(DragEventKind::Leave),
            Self::Drop => Some(DragEventKind::Drop),
            Self::Resize | Self::Load => None,
        }
    }
}
