use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlIFrameElement, HtmlImageElement, HtmlInputElement,
    ScrollBehavior, ScrollToOptions, Window,
};

use gamehub_core::catalog::GameDescriptor;
use gamehub_core::config::SiteConfig;
use gamehub_core::launch::BLANK_PAGE;
use gamehub_core::permissions::EmbedPolicy;
use gamehub_core::search::EMPTY_RESULTS_MESSAGE;
use gamehub_core::view::{Listing, ViewKind, ViewRegions};

use crate::diag;

pub const HIDDEN_CLASS: &str = "hidden";
pub const CARD_CLASS: &str = "game-card";
pub const GAME_ID_ATTR: &str = "data-game-id";

const LOADING_MESSAGE: &str = "Loading games…";
const FAILED_MESSAGE: &str = "Couldn't load the game library. Please refresh to try again.";
const NO_GAMES_MESSAGE: &str = "No games are available yet.";

pub fn element(document: &Document, id: &str) -> Result<Element, String> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("missing #{id}"))
}

pub fn typed<T: JsCast>(document: &Document, id: &str) -> Result<T, String> {
    element(document, id)?
        .dyn_into::<T>()
        .map_err(|_| format!("#{id} has the wrong element type"))
}

pub fn set_hidden(el: &Element, hidden: bool) {
    let classes = el.class_list();
    let result = if hidden {
        classes.add_1(HIDDEN_CLASS)
    } else {
        classes.remove_1(HIDDEN_CLASS)
    };
    if let Err(e) = result {
        diag::console_warn!("Failed to toggle visibility: {e:?}");
    }
}

/// Page regions bound once at startup.
pub struct DomRegions {
    window: Window,
    document: Document,
    library_view: Element,
    player_view: Element,
    chat_view: Option<Element>,
    search_input: Option<HtmlInputElement>,
    back_button: Element,
    frame: HtmlIFrameElement,
    player_title: Element,
    player_description: Option<Element>,
    open_link: Option<HtmlAnchorElement>,
    grid: Element,
    status: Element,
}

impl DomRegions {
    /// Look up every region and apply the embed policy to the game frame.
    pub fn bind(window: &Window, document: &Document, config: &SiteConfig) -> Result<Self, String> {
        let frame: HtmlIFrameElement = typed(document, "game-frame")?;
        let policy = EmbedPolicy::for_features(&config.features);
        for (name, value) in [
            ("allow", policy.allow.as_str()),
            ("sandbox", policy.sandbox.as_str()),
            ("allowfullscreen", ""),
        ] {
            frame
                .set_attribute(name, value)
                .map_err(|e| format!("failed to set frame {name}: {e:?}"))?;
        }

        let search_input = if config.features.search {
            Some(typed(document, "search-input")?)
        } else {
            if let Some(el) = document.get_element_by_id("search-input") {
                set_hidden(&el, true);
            }
            None
        };

        let open_link = match document.get_element_by_id("open-tab-link") {
            Some(el) if config.features.open_in_new_tab => el.dyn_into::<HtmlAnchorElement>().ok(),
            Some(el) => {
                set_hidden(&el, true);
                None
            },
            None => None,
        };

        let chat_view = if config.features.chat {
            Some(element(document, "chat-view")?)
        } else {
            None
        };

        Ok(Self {
            window: window.clone(),
            document: document.clone(),
            library_view: element(document, "library-view")?,
            player_view: element(document, "player-view")?,
            chat_view,
            search_input,
            back_button: element(document, "back-btn")?,
            frame,
            player_title: element(document, "current-game-title")?,
            player_description: document.get_element_by_id("current-game-description"),
            open_link,
            grid: element(document, "game-grid")?,
            status: element(document, "catalog-status")?,
        })
    }

    pub fn grid(&self) -> &Element {
        &self.grid
    }

    pub fn search_input(&self) -> Option<&HtmlInputElement> {
        self.search_input.as_ref()
    }

    fn set_status(&self, state: &str, text: Option<&str>) {
        match text {
            Some(text) => {
                self.status.set_text_content(Some(text));
                let _ = self.status.set_attribute("data-state", state);
                set_hidden(&self.status, false);
            },
            None => {
                self.status.set_text_content(None);
                set_hidden(&self.status, true);
            },
        }
    }
}

impl ViewRegions for DomRegions {
    fn show_view(&mut self, view: ViewKind) {
        set_hidden(&self.library_view, view != ViewKind::Library);
        set_hidden(&self.player_view, view != ViewKind::Player);
        if let Some(chat) = &self.chat_view {
            set_hidden(chat, view != ViewKind::Chat);
        }
    }

    fn set_search_visible(&mut self, visible: bool) {
        if let Some(input) = &self.search_input {
            set_hidden(input, !visible);
        }
    }

    fn set_search_text(&mut self, text: &str) {
        if let Some(input) = &self.search_input {
            input.set_value(text);
        }
    }

    fn set_back_visible(&mut self, visible: bool) {
        set_hidden(&self.back_button, !visible);
    }

    fn set_frame_source(&mut self, url: Option<&str>) {
        self.frame.set_src(url.unwrap_or(BLANK_PAGE));
    }

    fn set_player_header(&mut self, game: &GameDescriptor) {
        self.player_title.set_text_content(Some(&game.title));
        self.frame.set_title(&game.title);
        if let Some(description) = &self.player_description {
            description.set_text_content(Some(&game.description));
        }
        if let Some(link) = &self.open_link {
            link.set_href(&game.url);
        }
    }

    fn set_document_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn render_library(&mut self, listing: Listing<'_>) {
        self.grid.set_inner_html("");
        match listing {
            Listing::Loading => self.set_status("loading", Some(LOADING_MESSAGE)),
            Listing::Failed(_) => self.set_status("error", Some(FAILED_MESSAGE)),
            Listing::NoMatches => self.set_status("empty", Some(EMPTY_RESULTS_MESSAGE)),
            Listing::Games(games) => {
                for game in &games {
                    let appended = build_card(&self.document, game)
                        .and_then(|card| self.grid.append_child(&card));
                    if let Err(e) = appended {
                        diag::console_warn!("Failed to render card for {}: {e:?}", game.id);
                    }
                }
                if games.is_empty() {
                    self.set_status("empty", Some(NO_GAMES_MESSAGE));
                } else {
                    self.set_status("ready", None);
                }
            },
        }
    }
}

/// Build one library card. Text goes through `textContent`, never markup.
fn build_card(document: &Document, game: &GameDescriptor) -> Result<Element, JsValue> {
    let card = document.create_element("div")?;
    card.set_class_name(CARD_CLASS);
    card.set_attribute(GAME_ID_ATTR, game.id.as_str())?;
    card.set_attribute("role", "button")?;
    card.set_attribute("tabindex", "0")?;

    if !game.thumbnail.is_empty() {
        let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
        img.set_class_name("game-thumb");
        img.set_src(&game.thumbnail);
        img.set_alt(&game.title);
        img.set_attribute("referrerpolicy", "no-referrer")?;
        img.set_attribute("loading", "lazy")?;
        card.append_child(&img)?;
    }

    let title = document.create_element("h3")?;
    title.set_class_name("game-title");
    title.set_text_content(Some(&game.title));
    card.append_child(&title)?;

    if !game.description.is_empty() {
        let description = document.create_element("p")?;
        description.set_class_name("game-description");
        description.set_text_content(Some(&game.description));
        card.append_child(&description)?;
    }

    Ok(card)
}
