use std::time::Duration;

/// Pointer capture is requested this long after fullscreen is, so the
/// fullscreen transition has started first.
pub const POINTER_LOCK_DEFER: Duration = Duration::from_millis(100);

/// Fullscreen and pointer-lock facilities of the platform, behind a single
/// capability check each.
pub trait FullscreenHost {
    fn fullscreen_supported(&self) -> bool;
    fn is_fullscreen(&self) -> bool;
    /// Ask for fullscreen on the game container.
    fn request_fullscreen(&mut self) -> Result<(), String>;
    fn exit_fullscreen(&mut self);
    fn pointer_lock_supported(&self) -> bool;
    fn request_pointer_lock_after(&mut self, delay: Duration);
    /// Install the click handler that re-captures the pointer.
    fn attach_capture_click(&mut self);
    fn detach_capture_click(&mut self);
}

/// Result of pressing the fullscreen button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenToggle {
    /// No fullscreen capability; nothing happened.
    Unsupported,
    Entering,
    Exiting,
    /// The platform refused the request.
    Refused,
}

/// Ties the pointer-capture click handler to fullscreen-change notifications.
#[derive(Debug, Default)]
pub struct FullscreenCoordinator {
    pointer_lock: bool,
    capture_attached: bool,
}

impl FullscreenCoordinator {
    pub fn new(pointer_lock: bool) -> Self {
        Self {
            pointer_lock,
            capture_attached: false,
        }
    }

    pub fn capture_attached(&self) -> bool {
        self.capture_attached
    }

    pub fn toggle<H: FullscreenHost>(&mut self, host: &mut H) -> FullscreenToggle {
        if !host.fullscreen_supported() {
            return FullscreenToggle::Unsupported;
        }
        if host.is_fullscreen() {
            host.exit_fullscreen();
            return FullscreenToggle::Exiting;
        }
        if let Err(e) = host.request_fullscreen() {
            tracing::debug!(error = %e, "fullscreen request refused");
            return FullscreenToggle::Refused;
        }
        if self.pointer_lock && host.pointer_lock_supported() {
            host.request_pointer_lock_after(POINTER_LOCK_DEFER);
        }
        FullscreenToggle::Entering
    }

    /// Handle a fullscreen-change notification.
    pub fn on_fullscreen_change<H: FullscreenHost>(&mut self, host: &mut H, active: bool) {
        if active {
            if self.pointer_lock && host.pointer_lock_supported() && !self.capture_attached {
                host.attach_capture_click();
                self.capture_attached = true;
            }
        } else if self.capture_attached {
            host.detach_capture_click();
            self.capture_attached = false;
        }
    }
}
