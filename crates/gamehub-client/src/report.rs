use gamehub_core::launch::LaunchOutcome;

/// Console warning for a launch that did not go as planned, if any.
pub fn launch_warning(outcome: LaunchOutcome, title: &str) -> Option<String> {
    match outcome {
        LaunchOutcome::Embedded | LaunchOutcome::Cloaked => None,
        LaunchOutcome::DirectFallback => {
            Some(format!("Cloaked launch of {title} failed, opened it directly instead"))
        },
        LaunchOutcome::Blocked => Some(format!("Popup blocked while opening {title}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_launches_are_quiet() {
        assert_eq!(launch_warning(LaunchOutcome::Embedded, "Chess"), None);
        assert_eq!(launch_warning(LaunchOutcome::Cloaked, "Slope"), None);
    }

    #[test]
    fn direct_fallback_is_reported() {
        let warning = launch_warning(LaunchOutcome::DirectFallback, "Slope").unwrap();
        assert!(warning.contains("Slope"));
        assert!(warning.contains("directly"));
    }

    #[test]
    fn blocked_launch_is_reported() {
        let warning = launch_warning(LaunchOutcome::Blocked, "Slope").unwrap();
        assert!(warning.starts_with("Popup blocked"));
    }
}
