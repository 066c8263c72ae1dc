#![forbid(unsafe_code)]

//! Core: drag-and-drop zone tracking, independent of any UI toolkit.
//!
//! # Role in dropzone
//! `dropzone-core` interprets document-level drag events for one drop zone.
//! It owns the drag state, the cached zone geometry, and the listener
//! lifecycle; the host (browser binding, native adapter, or test fake) owns
//! every platform side effect through [`DropZoneHost`].
//!
//! # Primary responsibilities
//! - **DropZoneTracker**: enter/leave/drop classification across nested
//!   children, with a single enter per drag session.
//! - **Geometry**: zone rectangle cache with the narrow-viewport clamp.
//! - **Throttle**: deterministic leading + trailing rate limit for resize
//!   refreshes, cancelled on teardown.
//! - **Configuration**: zone ids and tuning, loadable from TOML/JSON with the
//!   `config` feature.
//!
//! # How it fits in the system
//! `dropzone-web` wraps the tracker with `web-sys` listeners and exposes it to
//! JavaScript. Other hosts only need to implement [`DropZoneHost`] and
//! translate their events into [`DragEvent`].

pub mod config;
pub mod event;
pub mod geometry;
pub mod handler;
pub mod host;
pub mod page_load;
pub mod throttle;
pub mod tracker;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::{DropZoneConfig, DropZoneConfigError};
pub use event::{DragEvent, DragEventKind, DropEffect, ElementId, EventTarget, Listener};
pub use geometry::{BoundingRect, ZoneRect};
pub use handler::DropZoneHandler;
pub use host::DropZoneHost;
pub use tracker::{
    DragDispatch, DragOutcome, DragState, DragTransition, DropZoneTracker, RejectReason,
    UnchangedReason,
};
