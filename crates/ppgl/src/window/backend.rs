//! Windowing library abstraction
//!
//! This module defines the internal trait the window facade drives. It maps
//! one-to-one onto the calls the facade makes into the native windowing
//! library, so that [`WindowHandle`](super::WindowHandle) owns the lifecycle
//! and error translation while the backend only performs native calls.
//!
//! Failures are reported as the library's diagnostic string; the facade
//! decides which [`PpglError`](crate::PpglError) variant it becomes.

use super::hint::{MonitorSelection, WindowHint};

/// Internal trait for windowing library implementations
///
/// Implementations hold one reference on the process-wide library state and
/// at most one window. Window operations typically need to happen on the
/// main thread, so no `Send` bound is required.
pub(crate) trait WindowBackend {
    /// Apply a hint to the next window created
    fn set_hint(&mut self, hint: WindowHint) -> Result<(), String>;

    /// Create the window
    ///
    /// `share` is the backend of another open window whose context
    /// resources the new window shares.
    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
        monitor: Option<MonitorSelection>,
        share: Option<&dyn WindowBackend>,
    ) -> Result<(), String>;

    /// Whether a window currently exists
    fn has_window(&self) -> bool;

    /// Whether close was requested by the user or the application
    fn should_close(&self) -> bool;

    /// Set or clear the close request flag
    fn set_should_close(&mut self, should_close: bool);

    /// Process pending events, returning how many were drained
    fn poll_events(&mut self) -> Result<usize, String>;

    /// Window client area size in screen coordinates
    fn size(&self) -> Option<(u32, u32)>;

    /// Vulkan instance extensions the platform needs, or why Vulkan is unavailable
    fn vulkan_instance_extensions(&self) -> Result<Vec<String>, String>;

    /// Destroy the window and drop this backend's library reference
    ///
    /// Must be a no-op when already terminated.
    fn terminate(&mut self);

    /// Whether this backend still holds its library reference
    fn is_initialized(&self) -> bool;

    /// Get access to the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;
}
