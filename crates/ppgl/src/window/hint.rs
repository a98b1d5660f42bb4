//! Window creation hints and creation records

use serde::{Deserialize, Serialize};

use super::handle::WindowHandle;

/// Client API a window is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientApi {
    /// No context; the window is driven by Vulkan
    NoApi,
    /// OpenGL context
    OpenGl,
    /// OpenGL ES context
    OpenGlEs,
}

/// A key/value hint applied to the next window created
///
/// Hints must be set before [`WindowHandle::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowHint {
    /// Whether the user can resize the window
    Resizable(bool),
    /// Whether the window is initially visible
    Visible(bool),
    /// Whether the window has decorations (border, title bar)
    Decorated(bool),
    /// Whether the window gets input focus when created
    Focused(bool),
    /// Whether the window floats above other windows
    Floating(bool),
    /// Whether the window is maximized when created
    Maximized(bool),
    /// Client API the window is created for
    ClientApi(ClientApi),
    /// Multisample count, `None` for don't care
    Samples(Option<u32>),
    /// Refresh rate for full screen windows, `None` for don't care
    RefreshRate(Option<u32>),
}

impl WindowHint {
    /// Convert into the GLFW representation
    pub(crate) const fn to_glfw(self) -> glfw::WindowHint {
        match self {
            Self::Resizable(value) => glfw::WindowHint::Resizable(value),
            Self::Visible(value) => glfw::WindowHint::Visible(value),
            Self::Decorated(value) => glfw::WindowHint::Decorated(value),
            Self::Focused(value) => glfw::WindowHint::Focused(value),
            Self::Floating(value) => glfw::WindowHint::Floating(value),
            Self::Maximized(value) => glfw::WindowHint::Maximized(value),
            Self::ClientApi(ClientApi::NoApi) => glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi),
            Self::ClientApi(ClientApi::OpenGl) => glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl),
            Self::ClientApi(ClientApi::OpenGlEs) => glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGlEs),
            Self::Samples(value) => glfw::WindowHint::Samples(value),
            Self::RefreshRate(value) => glfw::WindowHint::RefreshRate(value),
        }
    }
}

/// Monitor a window is made full screen on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorSelection {
    /// The primary monitor
    Primary,
    /// A connected monitor by index; falls back to windowed mode when absent
    Index(usize),
}

/// Everything needed to create a window
///
/// `monitor` selects full screen mode (`None` for windowed), and `share` names
/// an open window whose context resources the new window shares.
#[derive(Clone, Copy)]
pub struct WindowSpec<'a> {
    /// Width in screen coordinates, must be greater than zero
    pub width: u32,
    /// Height in screen coordinates, must be greater than zero
    pub height: u32,
    /// UTF-8 window title
    pub title: &'a str,
    /// Monitor for full screen mode
    pub monitor: Option<MonitorSelection>,
    /// Window to share resources with
    pub share: Option<&'a WindowHandle>,
}

impl<'a> WindowSpec<'a> {
    /// Windowed-mode spec with no sharing
    pub const fn new(width: u32, height: u32, title: &'a str) -> Self {
        Self {
            width,
            height,
            title,
            monitor: None,
            share: None,
        }
    }

    /// Make the window full screen on the given monitor
    #[must_use]
    pub const fn with_monitor(mut self, monitor: MonitorSelection) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Share context resources with another open window
    #[must_use]
    pub const fn with_share(mut self, share: &'a WindowHandle) -> Self {
        self.share = Some(share);
        self
    }
}

impl std::fmt::Debug for WindowSpec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSpec")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("title", &self.title)
            .field("monitor", &self.monitor)
            .field("shared", &self.share.is_some())
            .finish()
    }
}
