use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable identifier of a game within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Hand-written catalogs use both `"id": "7"` and `"id": 7`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Ok(Self(s)),
            RawId::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

/// How a game is opened when its card is clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchMode {
    /// Sandboxed frame inside the player view.
    #[default]
    Embed,
    /// New top-level window routed through a blank page and an object URL.
    CloakedPopup,
}

/// One playable entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDescriptor {
    pub id: GameId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    /// Untrusted: loaded into a frame or a popped-out window.
    pub url: String,
    #[serde(rename = "type", default)]
    pub launch_mode: LaunchMode,
}

impl GameDescriptor {
    /// Case-insensitive match of an already lowercased needle against title
    /// and description.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The request never produced a response.
    Network(String),
    /// The catalog file could not be read from disk.
    Unreadable(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was not a JSON array of descriptors.
    Parse(String),
    /// A descriptor is missing a required value.
    MissingField { index: usize, field: &'static str },
    /// A descriptor link is neither `http(s):` nor relative.
    InvalidUrl { index: usize, field: &'static str },
    DuplicateId(GameId),
    /// The session catalog was already settled.
    AlreadyLoaded,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "catalog request failed: {e}"),
            Self::Unreadable(e) => write!(f, "catalog file could not be read: {e}"),
            Self::Status(code) => write!(f, "catalog request returned HTTP {code}"),
            Self::Parse(e) => write!(f, "catalog is not valid JSON: {e}"),
            Self::MissingField { index, field } => {
                write!(f, "game #{index} has an empty or missing `{field}`")
            },
            Self::InvalidUrl { index, field } => {
                write!(f, "game #{index} has an unsupported `{field}` scheme")
            },
            Self::DuplicateId(id) => write!(f, "duplicate game id `{id}`"),
            Self::AlreadyLoaded => write!(f, "catalog already loaded for this session"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered, validated, immutable list of games. Insertion order is display
/// order. Descriptors are shared, never copied, when handed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    games: Vec<Arc<GameDescriptor>>,
}

impl Catalog {
    /// Validate and wrap a list of descriptors. All-or-nothing.
    pub fn new(games: Vec<GameDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(games.len());
        for (index, game) in games.iter().enumerate() {
            if game.id.0.trim().is_empty() {
                return Err(CatalogError::MissingField { index, field: "id" });
            }
            if game.title.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    index,
                    field: "title",
                });
            }
            if game.url.trim().is_empty() {
                return Err(CatalogError::MissingField { index, field: "url" });
            }
            if !is_safe_url(&game.url) {
                return Err(CatalogError::InvalidUrl { index, field: "url" });
            }
            if !game.thumbnail.trim().is_empty() && !is_safe_url(&game.thumbnail) {
                return Err(CatalogError::InvalidUrl {
                    index,
                    field: "thumbnail",
                });
            }
            if !seen.insert(&game.id) {
                return Err(CatalogError::DuplicateId(game.id.clone()));
            }
        }
        Ok(Self {
            games: games.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog body (a JSON array of descriptors).
    pub fn from_json(body: &str) -> Result<Self, CatalogError> {
        let games: Vec<GameDescriptor> =
            serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(games)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn games(&self) -> &[Arc<GameDescriptor>] {
        &self.games
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<GameDescriptor>> {
        self.games.iter()
    }

    pub fn get(&self, id: &GameId) -> Option<&Arc<GameDescriptor>> {
        self.games.iter().find(|g| &g.id == id)
    }

    /// Resolve a descriptor to the catalog's own shared copy. Matches on id
    /// and content so a stale or forged descriptor is not accepted.
    pub fn resolve(&self, game: &GameDescriptor) -> Option<&Arc<GameDescriptor>> {
        self.get(&game.id).filter(|found| found.as_ref() == game)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.games.iter().map(|g| g.title.as_str())
    }
}

/// Whether `url` may be handed to a frame, link, or window: `http:`,
/// `https:`, or relative. Leading control characters and embedded tabs or
/// newlines are ignored the way browsers ignore them when parsing a scheme.
pub fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    match cleaned.find([':', '/', '?', '#']) {
        Some(end) if cleaned[end..].starts_with(':') => {
            let scheme = &cleaned[..end];
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        },
        _ => true,
    }
}

/// Interpret a finished catalog request.
pub fn parse_response(status: u16, body: &str) -> Result<Catalog, CatalogError> {
    if !(200..300).contains(&status) {
        return Err(CatalogError::Status(status));
    }
    Catalog::from_json(body)
}

/// Build the catalog request URL, optionally appending a `t=<millis>`
/// cache-busting parameter.
pub fn catalog_url(path: &str, cache_bust: Option<u64>) -> String {
    match cache_bust {
        Some(stamp) => {
            let sep = if path.contains('?') { '&' } else { '?' };
            format!("{path}{sep}t={stamp}")
        },
        None => path.to_string(),
    }
}

/// Coarse load status, used to gate launch affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    Failed,
}

/// The session's catalog slot. Settled exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogLoad {
    #[default]
    Loading,
    Ready(Catalog),
    Failed(CatalogError),
}

impl CatalogLoad {
    /// Record the outcome of the startup fetch. A second call is rejected and
    /// leaves the first outcome in place.
    pub fn settle(&mut self, result: Result<Catalog, CatalogError>) -> Result<(), CatalogError> {
        if !matches!(self, Self::Loading) {
            tracing::warn!("ignoring second catalog load");
            return Err(CatalogError::AlreadyLoaded);
        }
        *self = match result {
            Ok(catalog) => {
                tracing::info!(games = catalog.len(), "catalog loaded");
                Self::Ready(catalog)
            },
            Err(e) => {
                tracing::error!(error = %e, "catalog load failed");
                Self::Failed(e)
            },
        };
        Ok(())
    }

    pub fn status(&self) -> CatalogStatus {
        match self {
            Self::Loading => CatalogStatus::Loading,
            Self::Ready(_) => CatalogStatus::Ready,
            Self::Failed(_) => CatalogStatus::Failed,
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CatalogError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}
