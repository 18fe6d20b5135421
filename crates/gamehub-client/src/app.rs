use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, KeyboardEvent};

use gamehub_core::catalog::GameId;
use gamehub_core::chat::{ChatRequest, ChatTranscript, build_system_prompt};
use gamehub_core::fullscreen::{FullscreenCoordinator, FullscreenHost, FullscreenToggle};
use gamehub_core::launch::launch;
use gamehub_core::view::ViewController;

use crate::chat_panel::ChatPanel;
use crate::diag;
use crate::dom::{CARD_CLASS, DomRegions, GAME_ID_ATTR, element, set_hidden};
use crate::fetch;
use crate::fullscreen::{DomFullscreen, FULLSCREEN_CHANGE_EVENTS};
use crate::popup::BrowserPopups;
use crate::report::launch_warning;
use crate::site::{CONFIG_ELEMENT_ID, site_config_from};

/// Everything the page's event handlers share.
/// Uses Rc<RefCell> because WASM is single-threaded.
struct App {
    controller: ViewController<DomRegions>,
    popups: BrowserPopups,
    coordinator: FullscreenCoordinator,
    screen: DomFullscreen,
    chat: ChatTranscript,
    chat_panel: Option<ChatPanel>,
}

type Shared = Rc<RefCell<App>>;

pub async fn run() {
    if let Err(e) = start().await {
        diag::console_error!("Game hub failed to start: {e}");
    }
}

async fn start() -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let raw_config = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    let config = site_config_from(raw_config.as_deref());
    for (id, text) in [("site-logo", &config.site_name), ("site-tagline", &config.tagline)] {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    let regions = DomRegions::bind(&window, &document, &config)?;
    let container = element(&document, "game-container")?;
    let chat_panel = if config.features.chat {
        Some(ChatPanel::bind(&document)?)
    } else {
        None
    };

    let app = Rc::new(RefCell::new(App {
        controller: ViewController::new(regions, config.clone()),
        popups: BrowserPopups::new(&window),
        coordinator: FullscreenCoordinator::new(config.features.pointer_lock),
        screen: DomFullscreen::new(&window, &document, container),
        chat: ChatTranscript::default(),
        chat_panel,
    }));

    wire_navigation(&document, &app)?;
    wire_search(&app)?;
    wire_fullscreen(&document, &app)?;
    wire_chat(&document, &app)?;

    let result = fetch::load_catalog(&config).await;
    match &result {
        Ok(catalog) => diag::console_log!("Loaded {} games", catalog.len()),
        Err(e) => diag::console_error!("Failed to load games: {e}"),
    }
    app.borrow_mut().controller.catalog_loaded(result);

    // Cards are only launchable once the catalog has settled.
    wire_library(&app)
}

/// Attach `handler` for the lifetime of the page.
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), String> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| format!("failed to listen for {event}: {e:?}"))?;
    closure.forget();
    Ok(())
}

fn wire_navigation(document: &Document, app: &Shared) -> Result<(), String> {
    let back = element(document, "back-btn")?;
    let shared = Rc::clone(app);
    listen(&back, "click", move |_| go_home(&shared))?;

    if let Some(logo) = document.get_element_by_id("site-logo") {
        let shared = Rc::clone(app);
        listen(&logo, "click", move |evt| {
            evt.prevent_default();
            go_home(&shared);
        })?;
    }
    Ok(())
}

fn go_home(app: &Shared) {
    let mut guard = app.borrow_mut();
    let App {
        controller,
        coordinator,
        screen,
        ..
    } = &mut *guard;
    if screen.is_fullscreen() {
        coordinator.toggle(screen);
    }
    controller.show_library();
}

fn wire_search(app: &Shared) -> Result<(), String> {
    let Some(input) = app.borrow().controller.regions().search_input().cloned() else {
        return Ok(());
    };
    let shared = Rc::clone(app);
    let source = input.clone();
    listen(&input, "input", move |_| {
        shared.borrow_mut().controller.set_query(&source.value());
    })
}

fn wire_library(app: &Shared) -> Result<(), String> {
    let grid = app.borrow().controller.regions().grid().clone();

    let shared = Rc::clone(app);
    listen(&grid, "click", move |evt| {
        if let Some(id) = card_id(&evt) {
            launch_game(&shared, &id);
        }
    })?;

    let shared = Rc::clone(app);
    listen(&grid, "keydown", move |evt| {
        let activates = evt
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Enter" || key.key() == " ");
        if !activates {
            return;
        }
        if let Some(id) = card_id(&evt) {
            evt.prevent_default();
            launch_game(&shared, &id);
        }
    })
}

/// Id of the card an event happened in.
fn card_id(evt: &Event) -> Option<String> {
    let target = evt.target()?.dyn_into::<Element>().ok()?;
    let card = target.closest(&format!(".{CARD_CLASS}")).ok()??;
    card.get_attribute(GAME_ID_ATTR)
}

fn launch_game(app: &Shared, id: &str) {
    let mut guard = app.borrow_mut();
    let App {
        controller, popups, ..
    } = &mut *guard;

    let id = GameId::from(id);
    let Some(game) = controller.catalog().and_then(|c| c.get(&id)).cloned() else {
        diag::console_warn!("No game with id {id}");
        return;
    };
    match launch(controller, popups, &game) {
        Ok(outcome) => {
            if let Some(warning) = launch_warning(outcome, &game.title) {
                diag::console_warn!("{warning}");
            }
        },
        Err(e) => diag::console_warn!("Could not open {}: {e}", game.title),
    }
}

fn wire_fullscreen(document: &Document, app: &Shared) -> Result<(), String> {
    let Some(button) = document.get_element_by_id("fullscreen-btn") else {
        return Ok(());
    };
    if !app.borrow().controller.config().features.fullscreen {
        set_hidden(&button, true);
        return Ok(());
    }

    let shared = Rc::clone(app);
    listen(&button, "click", move |_| {
        let mut guard = shared.borrow_mut();
        let App {
            coordinator,
            screen,
            ..
        } = &mut *guard;
        match coordinator.toggle(screen) {
            FullscreenToggle::Unsupported => {
                diag::console_warn!("Fullscreen is not supported in this browser");
            },
            FullscreenToggle::Refused => diag::console_warn!("Fullscreen request was refused"),
            FullscreenToggle::Entering | FullscreenToggle::Exiting => {},
        }
    })?;

    for event in FULLSCREEN_CHANGE_EVENTS {
        let shared = Rc::clone(app);
        let button = button.clone();
        listen(document, event, move |_| {
            let mut guard = shared.borrow_mut();
            let App {
                coordinator,
                screen,
                ..
            } = &mut *guard;
            let active = screen.is_fullscreen();
            coordinator.on_fullscreen_change(screen, active);
            let _ = button.class_list().toggle_with_force("active", active);
        })?;
    }
    Ok(())
}

fn wire_chat(document: &Document, app: &Shared) -> Result<(), String> {
    let toggle = document.get_element_by_id("chat-toggle");
    let (input, send) = {
        let guard = app.borrow();
        match &guard.chat_panel {
            Some(panel) => (panel.input().clone(), panel.send_button().clone()),
            None => {
                if let Some(toggle) = &toggle {
                    set_hidden(toggle, true);
                }
                return Ok(());
            },
        }
    };

    if let Some(toggle) = toggle {
        let shared = Rc::clone(app);
        listen(&toggle, "click", move |_| {
            let mut guard = shared.borrow_mut();
            let App {
                controller,
                chat,
                chat_panel,
                ..
            } = &mut *guard;
            if let Err(e) = controller.show_chat() {
                diag::console_warn!("{e}");
                return;
            }
            if let Some(panel) = chat_panel {
                panel.render(chat);
                let _ = panel.input().focus();
            }
        })?;
    }

    let shared = Rc::clone(app);
    listen(&send, "click", move |_| submit_chat(&shared))?;

    let shared = Rc::clone(app);
    listen(&input, "keydown", move |evt| {
        if evt
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Enter" && !key.shift_key())
        {
            evt.prevent_default();
            submit_chat(&shared);
        }
    })
}

fn submit_chat(app: &Shared) {
    let (request, endpoint) = {
        let mut guard = app.borrow_mut();
        let App {
            controller,
            chat,
            chat_panel,
            ..
        } = &mut *guard;
        let Some(panel) = chat_panel else {
            return;
        };
        let Some(message) = chat.submit(&panel.take_input()) else {
            return;
        };
        let config = controller.config();
        let request = ChatRequest {
            message,
            system_instruction: Some(build_system_prompt(
                &config.site_name,
                controller.catalog(),
            )),
        };
        if let Err(e) = request.validate() {
            chat.resolve(Err(e));
            panel.render(chat);
            return;
        }
        panel.render(chat);
        (request, config.chat_endpoint.clone())
    };

    let app = Rc::clone(app);
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch::post_chat(&endpoint, &request).await;
        if let Err(e) = &result {
            diag::console_warn!("Chat request failed: {e}");
        }
        let mut guard = app.borrow_mut();
        let App {
            chat, chat_panel, ..
        } = &mut *guard;
        chat.resolve(result);
        if let Some(panel) = chat_panel {
            panel.render(chat);
        }
    });
}
