#![forbid(unsafe_code)]

//! One-shot "run once the page has loaded" gate.
//!
//! When the document is already complete the work runs at arm time.
//! Otherwise the caller registers a load listener and the gate fires once
//! when the load event arrives. Disarming drops a pending listener so a late
//! load event is ignored.

/// What the caller should do after [`PageLoadGate::arm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadAction {
    /// The document is complete: run now.
    RunNow,
    /// Register the load listener and wait for [`PageLoadGate::on_load`].
    Listen,
    /// Already waiting for the load event.
    AlreadyListening,
}

#[derive(Debug, Clone, Default)]
pub struct PageLoadGate {
    listening: bool,
}

impl PageLoadGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { listening: false }
    }

    #[inline]
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn arm(&mut self, document_ready: bool) -> PageLoadAction {
        if self.listening {
            PageLoadAction::AlreadyListening
        } else if document_ready {
            PageLoadAction::RunNow
        } else {
            self.listening = true;
            PageLoadAction::Listen
        }
    }

    /// Load event arrived. Returns `true` if the gate was waiting for it;
    /// the caller then runs its work and removes the listener.
    pub fn on_load(&mut self) -> bool {
        std::mem::replace(&mut self.listening, false)
    }

    /// Stop waiting. Returns `true` if a listener must be removed.
    pub fn disarm(&mut self) -> bool {
        std::mem::replace(&mut self.listening, false)
    }
}
