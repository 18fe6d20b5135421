use std::time::Duration;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, Window};

use gamehub_core::fullscreen::FullscreenHost;

use crate::diag;

/// Change notifications, standard name first.
pub const FULLSCREEN_CHANGE_EVENTS: [&str; 4] = [
    "fullscreenchange",
    "webkitfullscreenchange",
    "mozfullscreenchange",
    "MSFullscreenChange",
];

const REQUEST_METHODS: [&str; 4] = [
    "requestFullscreen",
    "webkitRequestFullscreen",
    "mozRequestFullScreen",
    "msRequestFullscreen",
];

const EXIT_METHODS: [&str; 4] = [
    "exitFullscreen",
    "webkitExitFullscreen",
    "mozCancelFullScreen",
    "msExitFullscreen",
];

const ELEMENT_PROPERTIES: [&str; 4] = [
    "fullscreenElement",
    "webkitFullscreenElement",
    "mozFullScreenElement",
    "msFullscreenElement",
];

/// First of `names` that `target` exposes as a function.
fn find_method(target: &JsValue, names: &[&str]) -> Option<Function> {
    names.iter().find_map(|name| {
        Reflect::get(target, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
    })
}

/// Call `method` on `target`, logging a rejected promise if one comes back.
fn invoke(method: &Function, target: &JsValue, what: &'static str) -> Result<(), String> {
    let result = method.call0(target).map_err(|e| format!("{e:?}"))?;
    if let Ok(promise) = result.dyn_into::<Promise>() {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                diag::console_warn!("{what} rejected: {e:?}");
            }
        });
    }
    Ok(())
}

/// Fullscreen and pointer lock for the game container, across vendor
/// prefixes.
pub struct DomFullscreen {
    window: Window,
    document: Document,
    container: Element,
    capture_click: Option<Closure<dyn FnMut(Event)>>,
}

impl DomFullscreen {
    pub fn new(window: &Window, document: &Document, container: Element) -> Self {
        Self {
            window: window.clone(),
            document: document.clone(),
            container,
            capture_click: None,
        }
    }
}

fn request_pointer_lock(container: &Element) {
    let Some(method) = find_method(container, &["requestPointerLock"]) else {
        return;
    };
    if let Err(e) = invoke(&method, container, "pointer lock") {
        diag::console_warn!("Pointer lock request failed: {e}");
    }
}

impl FullscreenHost for DomFullscreen {
    fn fullscreen_supported(&self) -> bool {
        find_method(&self.container, &REQUEST_METHODS).is_some()
    }

    fn is_fullscreen(&self) -> bool {
        ELEMENT_PROPERTIES.iter().any(|name| {
            Reflect::get(&self.document, &JsValue::from_str(name))
                .map(|v| !v.is_null() && !v.is_undefined())
                .unwrap_or(false)
        })
    }

    fn request_fullscreen(&mut self) -> Result<(), String> {
        let method =
            find_method(&self.container, &REQUEST_METHODS).ok_or("fullscreen unavailable")?;
        invoke(&method, &self.container, "fullscreen request")
    }

    fn exit_fullscreen(&mut self) {
        let Some(method) = find_method(&self.document, &EXIT_METHODS) else {
            return;
        };
        if let Err(e) = invoke(&method, &self.document, "fullscreen exit") {
            diag::console_warn!("Exiting fullscreen failed: {e}");
        }
    }

    fn pointer_lock_supported(&self) -> bool {
        find_method(&self.container, &["requestPointerLock"]).is_some()
    }

    fn request_pointer_lock_after(&mut self, delay: Duration) {
        let container = self.container.clone();
        let deferred = Closure::once_into_js(move || request_pointer_lock(&container));
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(deferred.unchecked_ref(), millis)
        {
            diag::console_warn!("Failed to schedule pointer lock: {e:?}");
        }
    }

    fn attach_capture_click(&mut self) {
        if self.capture_click.is_some() {
            return;
        }
        let container = self.container.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            request_pointer_lock(&container);
        });
        if let Err(e) = self
            .container
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            diag::console_warn!("Failed to attach capture click: {e:?}");
            return;
        }
        self.capture_click = Some(closure);
    }

    fn detach_capture_click(&mut self) {
        let Some(closure) = self.capture_click.take() else {
            return;
        };
        if let Err(e) = self
            .container
            .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            diag::console_warn!("Failed to detach capture click: {e:?}");
        }
    }
}
