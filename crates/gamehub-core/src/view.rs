use std::fmt;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError, CatalogLoad, CatalogStatus, GameDescriptor, GameId};
use crate::config::SiteConfig;
use crate::search::{SearchQuery, filter};

/// Which panel is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Library,
    Player,
    Chat,
}

/// Application view state. Exactly one is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Library,
    /// Holds the catalog's shared descriptor.
    Player(Arc<GameDescriptor>),
    Chat,
}

impl ViewState {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Library => ViewKind::Library,
            Self::Player(_) => ViewKind::Player,
            Self::Chat => ViewKind::Chat,
        }
    }

    pub fn selected(&self) -> Option<&Arc<GameDescriptor>> {
        match self {
            Self::Player(game) => Some(game),
            _ => None,
        }
    }
}

/// What the library grid should show.
#[derive(Debug)]
pub enum Listing<'a> {
    Loading,
    Games(Vec<&'a Arc<GameDescriptor>>),
    /// Catalog loaded but the query matched nothing.
    NoMatches,
    Failed(&'a CatalogError),
}

/// The page regions the controller drives. Injected at construction so the
/// controller never looks anything up in a global document.
pub trait ViewRegions {
    /// Make `view` the only visible panel.
    fn show_view(&mut self, view: ViewKind);
    fn set_search_visible(&mut self, visible: bool);
    fn set_search_text(&mut self, text: &str);
    fn set_back_visible(&mut self, visible: bool);
    /// Point the game frame at `url`, or blank it with `None`.
    fn set_frame_source(&mut self, url: Option<&str>);
    fn set_player_header(&mut self, game: &GameDescriptor);
    fn set_document_title(&mut self, title: &str);
    fn scroll_to_top(&mut self);
    fn render_library(&mut self, listing: Listing<'_>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Nothing can be played until the catalog load has succeeded.
    CatalogNotReady,
    NotInCatalog(GameId),
    ChatDisabled,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogNotReady => write!(f, "catalog is not loaded"),
            Self::NotInCatalog(id) => write!(f, "game `{id}` is not in the catalog"),
            Self::ChatDisabled => write!(f, "chat is not enabled for this site"),
        }
    }
}

impl std::error::Error for ViewError {}

/// Switches between the library, the player, and the chat panel.
pub struct ViewController<R> {
    regions: R,
    config: SiteConfig,
    load: CatalogLoad,
    state: ViewState,
    query: SearchQuery,
}

impl<R: ViewRegions> ViewController<R> {
    /// Starts in the library with the catalog still loading.
    pub fn new(regions: R, config: SiteConfig) -> Self {
        let mut controller = Self {
            regions,
            config,
            load: CatalogLoad::Loading,
            state: ViewState::Library,
            query: SearchQuery::default(),
        };
        controller.enter_library();
        controller
    }

    /// Record the startup fetch and redraw the library. A failed load leaves
    /// an errored, empty library.
    pub fn catalog_loaded(&mut self, result: Result<Catalog, CatalogError>) {
        if self.load.settle(result).is_err() {
            return;
        }
        if self.state == ViewState::Library {
            self.render_listing();
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.load.catalog()
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        self.load.status()
    }

    pub fn regions(&self) -> &R {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut R {
        &mut self.regions
    }

    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    /// Games matching the current query; empty until the catalog is ready.
    pub fn visible_games(&self) -> Vec<&Arc<GameDescriptor>> {
        match self.load.catalog() {
            Some(catalog) => filter(catalog, self.query.as_str()),
            None => Vec::new(),
        }
    }

    /// Update the search query and redraw the grid when the library is up.
    pub fn set_query(&mut self, text: &str) {
        if !self.config.features.search {
            return;
        }
        if self.query.set(text) && self.state == ViewState::Library {
            self.render_listing();
        }
    }

    pub fn show_library(&mut self) {
        if self.config.reset_search_on_library && !self.query.is_empty() {
            self.query.clear();
            self.regions.set_search_text("");
        }
        self.enter_library();
    }

    /// Look `game` up in the loaded catalog and return the shared descriptor.
    pub fn resolve(&self, game: &GameDescriptor) -> Result<Arc<GameDescriptor>, ViewError> {
        let catalog = self.load.catalog().ok_or(ViewError::CatalogNotReady)?;
        catalog
            .resolve(game)
            .cloned()
            .ok_or_else(|| ViewError::NotInCatalog(game.id.clone()))
    }

    pub fn show_player(&mut self, game: &GameDescriptor) -> Result<(), ViewError> {
        let game = self.resolve(game).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected player transition");
        })?;
        self.enter_player(game);
        Ok(())
    }

    pub fn show_player_by_id(&mut self, id: &GameId) -> Result<(), ViewError> {
        let catalog = self.load.catalog().ok_or(ViewError::CatalogNotReady)?;
        let game = catalog
            .get(id)
            .cloned()
            .ok_or_else(|| ViewError::NotInCatalog(id.clone()))?;
        self.enter_player(game);
        Ok(())
    }

    pub fn show_chat(&mut self) -> Result<(), ViewError> {
        if !self.config.features.chat {
            return Err(ViewError::ChatDisabled);
        }
        self.regions.set_frame_source(None);
        self.state = ViewState::Chat;
        self.regions.show_view(ViewKind::Chat);
        self.regions.set_search_visible(false);
        self.regions.set_back_visible(true);
        let title = self.config.chat_title();
        self.regions.set_document_title(&title);
        Ok(())
    }

    fn enter_library(&mut self) {
        // Blank the frame so a hidden game stops running.
        self.regions.set_frame_source(None);
        self.state = ViewState::Library;
        self.regions.show_view(ViewKind::Library);
        self.regions
            .set_search_visible(self.config.features.search);
        self.regions.set_back_visible(false);
        self.regions.set_document_title(&self.config.site_name);
        self.render_listing();
    }

    fn enter_player(&mut self, game: Arc<GameDescriptor>) {
        self.regions.set_frame_source(None);
        self.regions.show_view(ViewKind::Player);
        self.regions.set_search_visible(false);
        self.regions.set_back_visible(true);
        self.regions.set_player_header(&game);
        self.regions.set_frame_source(Some(&game.url));
        let title = self.config.player_title(&game);
        self.regions.set_document_title(&title);
        self.regions.scroll_to_top();
        tracing::debug!(game = %game.id, "showing player");
        self.state = ViewState::Player(game);
    }

    fn render_listing(&mut self) {
        let listing = match &self.load {
            CatalogLoad::Loading => Listing::Loading,
            CatalogLoad::Failed(e) => Listing::Failed(e),
            CatalogLoad::Ready(catalog) => {
                let games = filter(catalog, self.query.as_str());
                if games.is_empty() && !catalog.is_empty() {
                    Listing::NoMatches
                } else {
                    Listing::Games(games)
                }
            },
        };
        self.regions.render_library(listing);
    }
}
