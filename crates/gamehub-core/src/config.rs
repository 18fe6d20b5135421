use serde::{Deserialize, Serialize};

use crate::catalog::GameDescriptor;

/// Optional pieces of the hub. Each one replaces what used to be a separate
/// copy of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Search box above the library grid.
    pub search: bool,
    /// Assistant panel as a third view.
    pub chat: bool,
    /// Fullscreen button in the player header.
    pub fullscreen: bool,
    /// Capture the pointer while the player is fullscreen.
    pub pointer_lock: bool,
    /// Direct link to the game URL in the player header.
    pub open_in_new_tab: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            search: true,
            chat: false,
            fullscreen: true,
            pointer_lock: false,
            open_in_new_tab: true,
        }
    }
}

/// Site-wide settings for the browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_name: String,
    pub tagline: String,
    /// Catalog resource, relative to the page.
    pub catalog_path: String,
    /// Append a timestamp parameter to the catalog request.
    pub cache_bust: bool,
    pub chat_endpoint: String,
    /// Clear the search box whenever the library is shown again.
    pub reset_search_on_library: bool,
    pub features: Features,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Unblocked Games".to_string(),
            tagline: "Hand-picked unblocked games for your enjoyment.".to_string(),
            catalog_path: "./games.json".to_string(),
            cache_bust: true,
            chat_endpoint: "/api/v1/chat".to_string(),
            reset_search_on_library: false,
            features: Features::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Document title while a game is open.
    pub fn player_title(&self, game: &GameDescriptor) -> String {
        format!("{} | {}", game.title, self.site_name)
    }

    pub fn chat_title(&self) -> String {
        format!("Chat | {}", self.site_name)
    }
}
