use gamehub_core::config::SiteConfig;

/// Inline `<script type="application/json">` element holding the site config.
pub const CONFIG_ELEMENT_ID: &str = "hub-config";

/// Parse the page's inline config. Missing or invalid config falls back to
/// the defaults.
pub fn site_config_from(raw: Option<&str>) -> SiteConfig {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(raw) {
        Ok(config) => config,
        Err(e) => {
            crate::diag::console_warn!("Invalid #{CONFIG_ELEMENT_ID} config: {e}, using defaults");
            SiteConfig::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(site_config_from(None), SiteConfig::default());
        assert_eq!(site_config_from(Some("  \n ")), SiteConfig::default());
    }

    #[test]
    fn inline_config_overrides() {
        let cfg = site_config_from(Some(
            r#" {"site_name": "Arcade", "features": {"chat": true}} "#,
        ));
        assert_eq!(cfg.site_name, "Arcade");
        assert!(cfg.features.chat);
    }

    #[test]
    fn invalid_config_uses_defaults() {
        assert_eq!(site_config_from(Some("{site_name:")), SiteConfig::default());
    }
}
