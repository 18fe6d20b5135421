//! Opening a game, either in the embedded player or in a cloaked popup.
//!
//! The cloaked path opens `about:blank` first and then redirects it to an
//! object URL wrapping the game in a full-viewport frame, so the game URL is
//! never the new window's first navigation. It is best-effort only and offers
//! no isolation; popup blockers may defeat it, in which case the game URL is
//! opened directly.

use std::fmt;
use std::time::Duration;

use crate::catalog::{GameDescriptor, LaunchMode};
use crate::permissions::allow_attribute;
use crate::view::{ViewController, ViewError, ViewRegions};

/// Object URLs for cloak documents are revoked after this long.
pub const CLOAK_REVOKE_DELAY: Duration = Duration::from_secs(10);

/// Where the popup starts before being redirected.
pub const BLANK_PAGE: &str = "about:blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The in-memory document could not be created.
    Document(String),
    /// The popup refused the redirect.
    Redirect(String),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(e) => write!(f, "cloak document failed: {e}"),
            Self::Redirect(e) => write!(f, "popup redirect failed: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {}

/// How a launch ended up being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Shown in the player view.
    Embedded,
    /// Opened through the blank page and object URL.
    Cloaked,
    /// Cloaking failed; the game URL was opened directly.
    DirectFallback,
    /// Even the direct window was refused.
    Blocked,
}

/// Browser facilities used by the cloaked launch path.
pub trait PopupHost {
    type Window;

    /// Wrap `html` in a temporary object URL.
    fn create_document_url(&mut self, html: &str) -> Result<String, LaunchError>;
    /// Open a new top-level window at [`BLANK_PAGE`]. `None` when blocked.
    fn open_blank(&mut self) -> Option<Self::Window>;
    fn redirect(&mut self, window: &Self::Window, url: &str) -> Result<(), LaunchError>;
    fn close(&mut self, window: &Self::Window);
    /// Open `url` in a new window. Returns false when blocked.
    fn open_direct(&mut self, url: &str) -> bool;
    /// Revoke `object_url` once `delay` has passed.
    fn revoke_later(&mut self, object_url: &str, delay: Duration);
}

/// Launch `game` according to its mode. Only catalog games can be launched.
pub fn launch<R, P>(
    controller: &mut ViewController<R>,
    host: &mut P,
    game: &GameDescriptor,
) -> Result<LaunchOutcome, ViewError>
where
    R: ViewRegions,
    P: PopupHost,
{
    let outcome = match game.launch_mode {
        LaunchMode::Embed => {
            controller.show_player(game)?;
            LaunchOutcome::Embedded
        },
        LaunchMode::CloakedPopup => {
            let game = controller.resolve(game)?;
            open_cloaked(host, &game)
        },
    };
    tracing::info!(game = %game.id, ?outcome, "launched game");
    Ok(outcome)
}

/// Open `game` in a new window through a blank page and an object URL,
/// falling back to the plain URL exactly once.
pub fn open_cloaked<P: PopupHost>(host: &mut P, game: &GameDescriptor) -> LaunchOutcome {
    let html = cloak_document(game);
    let object_url = match host.create_document_url(&html) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(game = %game.id, error = %e, "falling back to direct launch");
            return open_direct(host, game);
        },
    };
    host.revoke_later(&object_url, CLOAK_REVOKE_DELAY);

    let Some(window) = host.open_blank() else {
        tracing::warn!(game = %game.id, "popup blocked, falling back to direct launch");
        return open_direct(host, game);
    };
    if let Err(e) = host.redirect(&window, &object_url) {
        tracing::warn!(game = %game.id, error = %e, "falling back to direct launch");
        host.close(&window);
        return open_direct(host, game);
    }
    LaunchOutcome::Cloaked
}

fn open_direct<P: PopupHost>(host: &mut P, game: &GameDescriptor) -> LaunchOutcome {
    if host.open_direct(&game.url) {
        LaunchOutcome::DirectFallback
    } else {
        tracing::warn!(game = %game.id, "direct launch blocked too");
        LaunchOutcome::Blocked
    }
}

/// Standalone page holding nothing but a full-viewport frame on the game.
pub fn cloak_document(game: &GameDescriptor) -> String {
    let title = escape_html(&game.title);
    let url = escape_html(&game.url);
    let allow = allow_attribute();
    format!(
        "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>{title}</title>\
<style>html,body{{margin:0;padding:0;width:100%;height:100%;overflow:hidden;background:#000}}\
iframe{{position:fixed;inset:0;width:100%;height:100%;border:none}}</style></head>\
<body><iframe src=\"{url}\" allow=\"{allow}\" allowfullscreen></iframe></body></html>"
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
