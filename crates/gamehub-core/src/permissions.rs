//! Capability grants for embedded games.
//!
//! Every embedded game gets the same broad allow-list and a sandbox that
//! keeps scripts and same-origin access. Games need these to run at all, so
//! isolation is traded for compatibility.

use crate::config::Features;

/// Permission-policy tokens for the frame's `allow` attribute.
pub const EMBED_PERMISSIONS: &[&str] = &[
    "accelerometer",
    "ambient-light-sensor",
    "autoplay",
    "battery",
    "camera",
    "clipboard-read",
    "clipboard-write",
    "display-capture",
    "document-domain",
    "encrypted-media",
    "fullscreen",
    "gamepad",
    "geolocation",
    "gyroscope",
    "magnetometer",
    "microphone",
    "midi",
    "payment",
    "picture-in-picture",
    "pointer-lock",
    "publickey-credentials-get",
    "screen-wake-lock",
    "storage-access",
    "usb",
    "vr",
    "web-share",
    "xr-spatial-tracking",
];

/// Sandbox tokens applied to every embedded frame.
pub const SANDBOX_FLAGS: &[&str] = &[
    "allow-downloads",
    "allow-forms",
    "allow-modals",
    "allow-popups",
    "allow-popups-to-escape-sandbox",
    "allow-same-origin",
    "allow-scripts",
    "allow-top-navigation-by-user-activation",
    "allow-storage-access-by-user-activation",
];

pub const POINTER_LOCK_FLAG: &str = "allow-pointer-lock";

/// Rendered `allow` and `sandbox` attribute values for the game frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedPolicy {
    pub allow: String,
    pub sandbox: String,
}

impl EmbedPolicy {
    pub fn for_features(features: &Features) -> Self {
        Self {
            allow: allow_attribute(),
            sandbox: sandbox_attribute(features.pointer_lock),
        }
    }
}

pub fn allow_attribute() -> String {
    EMBED_PERMISSIONS.join("; ")
}

pub fn sandbox_attribute(pointer_lock: bool) -> String {
    let mut flags = SANDBOX_FLAGS.to_vec();
    if pointer_lock {
        flags.push(POINTER_LOCK_FLAG);
    }
    flags.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_semicolon_separated() {
        let allow = allow_attribute();
        assert!(allow.starts_with("accelerometer; "));
        for token in ["camera", "microphone", "geolocation", "fullscreen", "pointer-lock"] {
            assert!(allow.split("; ").any(|t| t == token), "missing {token}");
        }
    }

    #[test]
    fn sandbox_keeps_scripts_and_same_origin() {
        let sandbox = sandbox_attribute(false);
        let flags: Vec<_> = sandbox.split(' ').collect();
        assert!(flags.contains(&"allow-scripts"));
        assert!(flags.contains(&"allow-same-origin"));
        assert!(flags.contains(&"allow-popups-to-escape-sandbox"));
        assert!(!flags.contains(&POINTER_LOCK_FLAG));
    }

    #[test]
    fn pointer_lock_flag_follows_feature() {
        let features = Features {
            pointer_lock: true,
            ..Features::default()
        };
        let policy = EmbedPolicy::for_features(&features);
        assert!(policy.sandbox.ends_with(POINTER_LOCK_FLAG));
    }
}
