#![forbid(unsafe_code)]

//! Browser binding for `dropzone-core`.
//!
//! # Role in dropzone
//! `dropzone-web` is the DOM host. It registers the document and window
//! listeners the tracker asks for, measures the zone with
//! `getBoundingClientRect`, drives the resize throttle with `setTimeout`, and
//! forwards transitions to JavaScript callbacks.
//!
//! # Design
//! The event-name and path translation in [`dom`] and the timer bookkeeping
//! in [`timer`] are plain Rust so they can be tested on native targets. The
//! `wasm-bindgen` surface ([`WebDropZone`]) is only compiled for `wasm32`.
//!
//! JavaScript callbacks are queued during dispatch and invoked after the
//! tracker is released, so a callback may call back into the zone (for
//! example to unmount it on drop).

use core::fmt;

use dropzone_core::DropZoneConfigError;

pub mod dom;
pub mod timer;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebDropZone;

/// Errors raised while wiring a drop zone into the page.
#[derive(Debug)]
pub enum WebDropZoneError {
    /// No global `window` (e.g. running in a worker).
    NoWindow,
    /// `window.document` is missing.
    NoDocument,
    /// A DOM call threw; carries the stringified exception.
    Js(String),
    /// Configuration failed to parse or validate.
    Config(DropZoneConfigError),
    /// Called from inside one of the zone's own callbacks while it is
    /// dispatching an event.
    Busy,
}

impl fmt::Display for WebDropZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::Js(msg) => write!(f, "javascript error: {msg}"),
            Self::Config(err) => write!(f, "drop zone config: {err}"),
            Self::Busy => write!(f, "drop zone is busy dispatching an event"),
        }
    }
}

impl std::error::Error for WebDropZoneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DropZoneConfigError> for WebDropZoneError {
    fn from(err: DropZoneConfigError) -> Self {
        Self::Config(err)
    }
}
