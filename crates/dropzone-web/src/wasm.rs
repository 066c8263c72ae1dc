#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for [`WebDropZone`].
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dropzone_core::{
    BoundingRect, DragEvent, DragEventKind, DragState, DropZoneConfig, DropZoneHandler,
    DropZoneHost, DropZoneTracker, ElementId, Listener, event::ListenerScope,
};
use js_sys::{Function, Reflect};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent, Window};
use web_time::{Duration, Instant};

use crate::WebDropZoneError;
use crate::dom::{
    EventWriteBack, drag_kind_from_event_type, is_ready_state_complete, listener_event_name,
    target_from_path_ids,
};
use crate::timer::{TimerSlot, TimerToken};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn js_error(err: &JsValue) -> WebDropZoneError {
    WebDropZoneError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl From<WebDropZoneError> for JsValue {
    fn from(err: WebDropZoneError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Forwards transitions to JavaScript.
///
/// Calls are queued with the DOM event that caused them and run by the
/// dispatcher once the zone is no longer borrowed.
struct JsCallbacks {
    on_drag_enter: Function,
    on_drag_leave: Function,
    on_drop: Function,
    should_accept_drop: Option<Function>,
    current: Option<web_sys::Event>,
    fired: Vec<(Function, JsValue)>,
}

impl JsCallbacks {
    fn current_event(&self) -> JsValue {
        self.current
            .clone()
            .map_or(JsValue::UNDEFINED, JsValue::from)
    }

    fn queue(&mut self, callback: Function) {
        let event = self.current_event();
        self.fired.push((callback, event));
    }
}

impl DropZoneHandler for JsCallbacks {
    fn on_drag_enter(&mut self, _event: &DragEvent) {
        self.queue(self.on_drag_enter.clone());
    }

    fn on_drag_leave(&mut self, _event: &DragEvent) {
        self.queue(self.on_drag_leave.clone());
    }

    fn on_drop(&mut self, _event: &DragEvent) {
        self.queue(self.on_drop.clone());
    }

    fn should_accept_drop(&self, event: &DragEvent) -> bool {
        let Some(accept) = &self.should_accept_drop else {
            return event.carries_files();
        };
        match accept.call1(&JsValue::NULL, &self.current_event()) {
            Ok(verdict) => verdict.is_truthy(),
            Err(err) => {
                console_error(&format!("shouldAcceptDrop threw: {}", js_error(&err)));
                false
            }
        }
    }
}

fn run_callbacks(fired: Vec<(Function, JsValue)>) {
    for (callback, event) in fired {
        if let Err(err) = callback.call1(&JsValue::NULL, &event) {
            console_error(&format!("drop zone callback threw: {}", js_error(&err)));
        }
    }
}

// ---------------------------------------------------------------------------
// DOM host
// ---------------------------------------------------------------------------

type Tracker = DropZoneTracker<JsCallbacks>;
type DomListener = Closure<dyn FnMut(web_sys::Event)>;

struct Shared {
    tracker: Tracker,
    host: DomHost,
}

/// Run `f` against the zone unless it was dropped or is already borrowed.
fn with_shared(
    shared: &Weak<RefCell<Shared>>,
    context: &'static str,
    f: impl FnOnce(&mut Tracker, &mut DomHost),
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        warn!(context, "drop zone re-entered; event dropped");
        return;
    };
    let Shared { tracker, host } = &mut *guard;
    f(tracker, host);
}

struct DomHost {
    window: Window,
    document: Document,
    shared: Weak<RefCell<Shared>>,
    on_drag: DomListener,
    on_resize: DomListener,
    on_load: DomListener,
    timer: TimerSlot<i32>,
}

impl DomHost {
    fn new(window: Window, document: Document, shared: Weak<RefCell<Shared>>) -> Self {
        let drag = shared.clone();
        let on_drag = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            dispatch_drag(&drag, event);
        });
        let resize = shared.clone();
        let on_resize = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            with_shared(&resize, "resize", |tracker, host| {
                tracker.handle_resize(Instant::now(), host);
            });
        });
        let load = shared.clone();
        let on_load = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            with_shared(&load, "load", |tracker, host| tracker.handle_page_load(host));
        });
        Self {
            window,
            document,
            shared,
            on_drag,
            on_resize,
            on_load,
            timer: TimerSlot::new(),
        }
    }

    fn listener_target(&self, listener: Listener) -> &web_sys::EventTarget {
        match listener.scope() {
            ListenerScope::Document => self.document.as_ref(),
            ListenerScope::Window => self.window.as_ref(),
        }
    }

    fn listener_callback(&self, listener: Listener) -> &Function {
        let closure = match listener {
            Listener::DragEnter | Listener::DragLeave | Listener::Drop => &self.on_drag,
            Listener::Resize => &self.on_resize,
            Listener::Load => &self.on_load,
        };
        closure.as_ref().unchecked_ref()
    }
}

impl DropZoneHost for DomHost {
    fn add_listener(&mut self, listener: Listener) {
        let name = listener_event_name(listener);
        if let Err(err) = self
            .listener_target(listener)
            .add_event_listener_with_callback(name, self.listener_callback(listener))
        {
            warn!(event = name, error = %js_error(&err), "addEventListener failed");
        }
    }

    fn remove_listener(&mut self, listener: Listener) {
        let name = listener_event_name(listener);
        if let Err(err) = self
            .listener_target(listener)
            .remove_event_listener_with_callback(name, self.listener_callback(listener))
        {
            warn!(event = name, error = %js_error(&err), "removeEventListener failed");
        }
    }

    fn measure(&self, element: &ElementId) -> Option<BoundingRect> {
        let rect = self
            .document
            .get_element_by_id(element.as_str())?
            .get_bounding_client_rect();
        Some(BoundingRect::from_edges(
            rect.left(),
            rect.top(),
            rect.right(),
            rect.bottom(),
        ))
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn document_ready(&self) -> bool {
        is_ready_state_complete(&self.document.ready_state())
    }

    fn schedule_wake(&mut self, delay: Duration) {
        let (token, stale) = self.timer.schedule();
        if let Some(handle) = stale {
            self.window.clear_timeout_with_handle(handle);
        }
        let shared = self.shared.clone();
        let callback = Closure::once_into_js(move || fire_wake(&shared, token));
        let millis = i32::try_from(delay.as_micros().div_ceil(1_000)).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(handle) => {
                self.timer.armed(token, handle);
            }
            Err(err) => warn!(error = %js_error(&err), "setTimeout failed"),
        }
    }

    fn cancel_wake(&mut self) {
        if let Some(handle) = self.timer.cancel() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

impl Drop for DomHost {
    fn drop(&mut self) {
        self.cancel_wake();
    }
}

fn fire_wake(shared: &Weak<RefCell<Shared>>, token: TimerToken) {
    with_shared(shared, "wake", |tracker, host| {
        if host.timer.fire(token) {
            tracker.handle_wake(Instant::now(), host);
        }
    });
}

// ---------------------------------------------------------------------------
// Event translation
// ---------------------------------------------------------------------------

fn ancestor_ids(element: Element) -> impl Iterator<Item = Option<String>> {
    std::iter::successors(Some(element), |el| el.parent_element()).map(|el| Some(el.id()))
}

fn translate(kind: DragEventKind, event: &web_sys::Event) -> DragEvent {
    let mut drag = DragEvent::new(kind);
    drag.target = target_from_path_ids(
        event
            .composed_path()
            .iter()
            .map(|node| node.dyn_ref::<Element>().map(Element::id)),
    );
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        drag.client_x = f64::from(mouse.client_x());
        drag.client_y = f64::from(mouse.client_y());
        drag.related_target = mouse
            .related_target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| target_from_path_ids(ancestor_ids(element)));
    }
    if let Some(transfer) = event
        .dyn_ref::<web_sys::DragEvent>()
        .and_then(web_sys::DragEvent::data_transfer)
    {
        drag.payload_types = transfer
            .types()
            .iter()
            .filter_map(|ty| ty.as_string())
            .collect();
    }
    drag
}

fn dispatch_drag(shared: &Weak<RefCell<Shared>>, event: web_sys::Event) {
    let Some(kind) = drag_kind_from_event_type(&event.type_()) else {
        return;
    };
    let mut fired = Vec::new();
    with_shared(shared, "drag", |tracker, _host| {
        let drag = translate(kind, &event);
        tracker.handler_mut().current = Some(event.clone());
        let dispatch = tracker.handle_drag_event(&drag);
        let callbacks = tracker.handler_mut();
        callbacks.current = None;
        fired = std::mem::take(&mut callbacks.fired);

        let write_back = EventWriteBack::from_dispatch(&dispatch);
        if write_back.prevent_default {
            event.prevent_default();
        }
        if let Some(effect) = write_back.drop_effect {
            if let Some(transfer) = event
                .dyn_ref::<web_sys::DragEvent>()
                .and_then(web_sys::DragEvent::data_transfer)
            {
                transfer.set_drop_effect(effect);
            }
        }
    });
    run_callbacks(fired);
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// A drop zone bound to an element of the current document.
///
/// `config` is a JSON object with `zone_id`, `active_zone_id` and the
/// optional `enabled`, `resize_throttle_ms` and `responsive_breakpoint`
/// keys. Callbacks receive the DOM drag event.
#[wasm_bindgen]
pub struct WebDropZone {
    shared: Rc<RefCell<Shared>>,
}

#[wasm_bindgen]
impl WebDropZone {
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: &str,
        on_drag_enter: Function,
        on_drag_leave: Function,
        on_drop: Function,
        should_accept_drop: Option<Function>,
    ) -> Result<WebDropZone, JsValue> {
        install_panic_hook();
        let callbacks = JsCallbacks {
            on_drag_enter,
            on_drag_leave,
            on_drop,
            should_accept_drop,
            current: None,
            fired: Vec::new(),
        };
        Ok(Self::build(config, callbacks)?)
    }

    /// Attach to the page. Listeners are registered when `focused` is true
    /// and the zone is enabled.
    pub fn mount(&mut self, focused: bool) -> Result<(), JsValue> {
        self.with(|tracker, host| tracker.mount(focused, host))
    }

    /// Detach from the page, removing every listener and pending timer.
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        self.with(|tracker, host| tracker.unmount(host))
    }

    #[wasm_bindgen(js_name = setEnabled)]
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.with(|tracker, host| tracker.set_enabled(enabled, host))
    }

    #[wasm_bindgen(js_name = setFocused)]
    pub fn set_focused(&mut self, focused: bool) -> Result<(), JsValue> {
        self.with(|tracker, host| tracker.set_focused(focused, host))
    }

    #[wasm_bindgen(js_name = isListening)]
    pub fn is_listening(&self) -> bool {
        self.shared
            .try_borrow()
            .is_ok_and(|shared| shared.tracker.is_listening())
    }

    #[wasm_bindgen(js_name = isDraggingOver)]
    pub fn is_dragging_over(&self) -> bool {
        self.shared
            .try_borrow()
            .is_ok_and(|shared| shared.tracker.drag_state() == DragState::DraggingOver)
    }
}

impl WebDropZone {
    fn build(config: &str, callbacks: JsCallbacks) -> Result<Self, WebDropZoneError> {
        let config = DropZoneConfig::from_json_str(config)?;
        let window = web_sys::window().ok_or(WebDropZoneError::NoWindow)?;
        let document = window.document().ok_or(WebDropZoneError::NoDocument)?;
        let tracker = DropZoneTracker::new(config, callbacks)?;
        let shared = Rc::new_cyclic(|weak| {
            RefCell::new(Shared {
                tracker,
                host: DomHost::new(window, document, weak.clone()),
            })
        });
        Ok(Self { shared })
    }

    fn with(&self, f: impl FnOnce(&mut Tracker, &mut DomHost)) -> Result<(), JsValue> {
        let mut guard = self
            .shared
            .try_borrow_mut()
            .map_err(|_| WebDropZoneError::Busy)?;
        let Shared { tracker, host } = &mut *guard;
        f(tracker, host);
        Ok(())
    }
}

impl Drop for WebDropZone {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shared.try_borrow_mut() {
            let Shared { tracker, host } = &mut *guard;
            tracker.unmount(host);
        }
    }
}
