#![forbid(unsafe_code)]

//! Platform seam for the tracker.
//!
//! Everything the tracker does to the outside world goes through
//! [`DropZoneHost`]: listener registration, element measurement, viewport
//! queries, and the one-shot wake timer used by the resize throttle. Hosts
//! are passed per call and never stored, so a browser binding, a native
//! toolkit adapter, and the test fake can all own their host however they
//! like.

use web_time::Duration;

use crate::event::{ElementId, Listener};
use crate::geometry::BoundingRect;

pub trait DropZoneHost {
    /// Start delivering events for `listener` to the tracker.
    fn add_listener(&mut self, listener: Listener);

    /// Stop delivering events for `listener`.
    fn remove_listener(&mut self, listener: Listener);

    /// Current bounds of `element`, or `None` when it is not mounted.
    fn measure(&self, element: &ElementId) -> Option<BoundingRect>;

    /// Current viewport width in the same units as [`BoundingRect`].
    fn viewport_width(&self) -> f64;

    /// Whether the document has finished loading.
    fn document_ready(&self) -> bool;

    /// Call [`DropZoneTracker::handle_wake`](crate::tracker::DropZoneTracker::handle_wake)
    /// once after `delay`. Replaces any outstanding wake.
    fn schedule_wake(&mut self, delay: Duration);

    /// Drop the outstanding wake, if any.
    fn cancel_wake(&mut self);
}
