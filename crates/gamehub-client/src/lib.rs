mod diag;
pub mod report;
pub mod site;

#[cfg(target_family = "wasm")]
mod app;
#[cfg(target_family = "wasm")]
mod chat_panel;
#[cfg(target_family = "wasm")]
mod dom;
#[cfg(target_family = "wasm")]
mod fetch;
#[cfg(target_family = "wasm")]
mod fullscreen;
#[cfg(target_family = "wasm")]
mod popup;

use wasm_bindgen::prelude::*;

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        wasm_bindgen_futures::spawn_local(app::run());
    }
}
