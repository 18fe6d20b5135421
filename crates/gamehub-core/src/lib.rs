pub mod catalog;
pub mod chat;
pub mod config;
pub mod fullscreen;
pub mod launch;
pub mod permissions;
pub mod search;
pub mod view;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::time::Duration;

    use crate::catalog::{Catalog, GameDescriptor, GameId, LaunchMode};
    use crate::fullscreen::FullscreenHost;
    use crate::launch::{LaunchError, PopupHost};
    use crate::view::{Listing, ViewKind, ViewRegions};

    /// Build an embeddable descriptor.
    pub fn make_descriptor(id: &str, title: &str, description: &str, url: &str) -> GameDescriptor {
        GameDescriptor {
            id: GameId::from(id),
            title: title.to_string(),
            description: description.to_string(),
            thumbnail: format!("https://games.test/{id}.png"),
            url: url.to_string(),
            launch_mode: LaunchMode::Embed,
        }
    }

    /// Catalog with sequential ids starting at "0" and URLs
    /// `https://games.test/{id}`.
    pub fn make_catalog(titles: &[&str]) -> Catalog {
        let games = titles
            .iter()
            .enumerate()
            .map(|(i, title)| make_descriptor(&i.to_string(), title, "", &format!("https://games.test/{i}")))
            .collect();
        Catalog::new(games).expect("generated catalog is valid")
    }

    /// The single-entry chess catalog used across scenarios.
    pub fn chess_catalog() -> Catalog {
        Catalog::new(vec![make_descriptor(
            "1",
            "Chess Master",
            "Classic strategy",
            "https://x/chess",
        )])
        .expect("chess catalog is valid")
    }

    /// Owned snapshot of the last [`Listing`].
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub enum RenderedListing {
        #[default]
        Loading,
        Games(Vec<String>),
        NoMatches,
        Failed(String),
    }

    /// Regions that record what the controller asked for.
    #[derive(Debug, Default)]
    pub struct RecordingRegions {
        pub view: Option<ViewKind>,
        pub search_visible: bool,
        pub search_text: String,
        pub back_visible: bool,
        pub frame_source: Option<String>,
        pub frame_history: Vec<Option<String>>,
        pub header: Option<GameId>,
        pub title: String,
        pub scrolls: usize,
        pub listing: RenderedListing,
    }

    impl ViewRegions for RecordingRegions {
        fn show_view(&mut self, view: ViewKind) {
            self.view = Some(view);
        }

        fn set_search_visible(&mut self, visible: bool) {
            self.search_visible = visible;
        }

        fn set_search_text(&mut self, text: &str) {
            self.search_text = text.to_string();
        }

        fn set_back_visible(&mut self, visible: bool) {
            self.back_visible = visible;
        }

        fn set_frame_source(&mut self, url: Option<&str>) {
            self.frame_source = url.map(String::from);
            self.frame_history.push(self.frame_source.clone());
        }

        fn set_player_header(&mut self, game: &GameDescriptor) {
            self.header = Some(game.id.clone());
        }

        fn set_document_title(&mut self, title: &str) {
            self.title = title.to_string();
        }

        fn scroll_to_top(&mut self) {
            self.scrolls += 1;
        }

        fn render_library(&mut self, listing: Listing<'_>) {
            self.listing = match listing {
                Listing::Loading => RenderedListing::Loading,
                Listing::Games(games) => {
                    RenderedListing::Games(games.iter().map(|g| g.id.to_string()).collect())
                },
                Listing::NoMatches => RenderedListing::NoMatches,
                Listing::Failed(e) => RenderedListing::Failed(e.to_string()),
            };
        }
    }

    /// Popup host with switchable failures. Windows are plain counters.
    #[derive(Debug, Default)]
    pub struct RecordingPopups {
        pub fail_document: bool,
        pub block_blank: bool,
        pub fail_redirect: bool,
        pub block_direct: bool,
        pub documents: Vec<String>,
        pub blank_opens: usize,
        pub redirects: Vec<String>,
        pub closed: usize,
        pub direct_opens: Vec<String>,
        pub revocations: Vec<(String, Duration)>,
    }

    impl PopupHost for RecordingPopups {
        type Window = usize;

        fn create_document_url(&mut self, html: &str) -> Result<String, LaunchError> {
            if self.fail_document {
                return Err(LaunchError::Document("blob unavailable".to_string()));
            }
            let url = format!("blob:test/{}", self.documents.len());
            self.documents.push(html.to_string());
            Ok(url)
        }

        fn open_blank(&mut self) -> Option<usize> {
            if self.block_blank {
                return None;
            }
            self.blank_opens += 1;
            Some(self.blank_opens)
        }

        fn redirect(&mut self, _window: &usize, url: &str) -> Result<(), LaunchError> {
            if self.fail_redirect {
                return Err(LaunchError::Redirect("cross-origin".to_string()));
            }
            self.redirects.push(url.to_string());
            Ok(())
        }

        fn close(&mut self, _window: &usize) {
            self.closed += 1;
        }

        fn open_direct(&mut self, url: &str) -> bool {
            self.direct_opens.push(url.to_string());
            !self.block_direct
        }

        fn revoke_later(&mut self, object_url: &str, delay: Duration) {
            self.revocations.push((object_url.to_string(), delay));
        }
    }

    /// In-memory fullscreen platform.
    #[derive(Debug)]
    pub struct FakeScreen {
        pub supported: bool,
        pub pointer_lock: bool,
        pub refuse: bool,
        pub active: bool,
        pub requests: usize,
        pub pointer_lock_delays: Vec<Duration>,
        pub attached: usize,
        pub detached: usize,
    }

    impl Default for FakeScreen {
        fn default() -> Self {
            Self {
                supported: true,
                pointer_lock: true,
                refuse: false,
                active: false,
                requests: 0,
                pointer_lock_delays: Vec::new(),
                attached: 0,
                detached: 0,
            }
        }
    }

    impl FullscreenHost for FakeScreen {
        fn fullscreen_supported(&self) -> bool {
            self.supported
        }

        fn is_fullscreen(&self) -> bool {
            self.active
        }

        fn request_fullscreen(&mut self) -> Result<(), String> {
            self.requests += 1;
            if self.refuse {
                return Err("not allowed".to_string());
            }
            self.active = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) {
            self.active = false;
        }

        fn pointer_lock_supported(&self) -> bool {
            self.pointer_lock
        }

        fn request_pointer_lock_after(&mut self, delay: Duration) {
            self.pointer_lock_delays.push(delay);
        }

        fn attach_capture_click(&mut self) {
            self.attached += 1;
        }

        fn detach_capture_click(&mut self) {
            self.detached += 1;
        }
    }
}
