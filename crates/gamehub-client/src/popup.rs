use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url, Window};

use gamehub_core::launch::{BLANK_PAGE, LaunchError, PopupHost};

use crate::diag;

/// Popup windows and object URLs of the real browser.
pub struct BrowserPopups {
    window: Window,
}

impl BrowserPopups {
    pub fn new(window: &Window) -> Self {
        Self {
            window: window.clone(),
        }
    }
}

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

impl PopupHost for BrowserPopups {
    type Window = Window;

    fn create_document_url(&mut self, html: &str) -> Result<String, LaunchError> {
        let parts = js_sys::Array::of1(&JsValue::from_str(html));
        let options = BlobPropertyBag::new();
        options.set_type("text/html");
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(|e| LaunchError::Document(describe(e)))?;
        Url::create_object_url_with_blob(&blob).map_err(|e| LaunchError::Document(describe(e)))
    }

    fn open_blank(&mut self) -> Option<Window> {
        match self.window.open_with_url_and_target(BLANK_PAGE, "_blank") {
            Ok(Some(popup)) => Some(popup),
            Ok(None) => {
                diag::console_warn!("Popup window was blocked");
                None
            },
            Err(e) => {
                diag::console_warn!("window.open failed: {e:?}");
                None
            },
        }
    }

    fn redirect(&mut self, window: &Window, url: &str) -> Result<(), LaunchError> {
        window
            .location()
            .set_href(url)
            .map_err(|e| LaunchError::Redirect(describe(e)))
    }

    fn close(&mut self, window: &Window) {
        let _ = window.close();
    }

    fn open_direct(&mut self, url: &str) -> bool {
        matches!(self.window.open_with_url_and_target(url, "_blank"), Ok(Some(_)))
    }

    fn revoke_later(&mut self, object_url: &str, delay: Duration) {
        let url = object_url.to_string();
        let revoke = Closure::once_into_js(move || {
            if let Err(e) = Url::revoke_object_url(&url) {
                diag::console_warn!("Failed to revoke {url}: {e:?}");
            }
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), millis)
        {
            diag::console_warn!("Failed to schedule object URL revocation: {e:?}");
        }
    }
}
