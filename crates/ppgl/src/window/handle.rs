//! High-level window handle for applications
//!
//! [`WindowHandle`] owns one reference on the windowing library and at most
//! one native window. It tracks its lifecycle in [`WindowState`] and turns
//! every native failure into a [`PpglError`].
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► LibraryReady ──set_hint()──► HintsConfigured
//!                │                             │
//!                └────────────open()───────────┘
//!                               │
//!                               ▼
//!                          WindowOpen ──poll_and_check_open()──► Closed
//! ```
//!
//! Any native failure moves the handle to the terminal `Failed` state. The
//! window and the library reference are released right away, by the same
//! routine `Drop` uses, so teardown happens exactly once whichever path
//! reaches it first.

use crate::error::{PpglError, PpglResult};
use crate::graphics::VulkanPlatform;

use super::backend::WindowBackend;
use super::glfw_backend::GlfwBackend;
use super::hint::{ClientApi, WindowHint, WindowSpec};

/// Lifecycle state of a [`WindowHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// The library is initialized, no hint has been set
    LibraryReady,
    /// At least one hint was applied
    HintsConfigured,
    /// The window exists and has not been asked to close
    WindowOpen,
    /// Close was requested; the window still exists until drop
    Closed,
    /// A native call failed and everything was torn down
    Failed,
}

/// High-level window handle that abstracts windowing system details
pub struct WindowHandle {
    backend: Box<dyn WindowBackend>,
    state: WindowState,
}

impl WindowHandle {
    /// Initialize the windowing library
    ///
    /// The library is reference counted across handles; it stays initialized
    /// until the last handle is dropped or fails.
    ///
    /// # Errors
    /// Returns [`PpglError::Initialization`] with the library's diagnostic if
    /// it fails to initialize.
    pub fn new() -> PpglResult<Self> {
        Self::with_backend(|| {
            GlfwBackend::init().map(|backend| Box::new(backend) as Box<dyn WindowBackend>)
        })
    }

    /// Create a handle over a backend produced by `init`
    pub(crate) fn with_backend<F>(init: F) -> PpglResult<Self>
    where
        F: FnOnce() -> Result<Box<dyn WindowBackend>, String>,
    {
        let backend = init().map_err(|info| PpglError::Initialization {
            operation: "glfwInit",
            info,
        })?;

        log::debug!("Windowing library initialized");
        Ok(Self {
            backend,
            state: WindowState::LibraryReady,
        })
    }

    /// Current lifecycle state
    pub const fn state(&self) -> WindowState {
        self.state
    }

    /// Set a window hint; hints need to be set before [`open`](Self::open)
    ///
    /// # Errors
    /// - [`PpglError::Initialization`] if the library was torn down by an earlier failure
    /// - [`PpglError::Usage`] if a window was already created
    /// - [`PpglError::Configuration`] if the library rejects the hint; the
    ///   handle is torn down and cannot open a window afterward
    pub fn set_hint(&mut self, hint: WindowHint) -> PpglResult<()> {
        const OPERATION: &str = "glfwWindowHint";
        match self.state {
            WindowState::LibraryReady | WindowState::HintsConfigured => {}
            WindowState::Failed => return Err(Self::not_initialized(OPERATION)),
            WindowState::WindowOpen | WindowState::Closed => {
                return Err(PpglError::Usage {
                    operation: OPERATION,
                    info: "hints must be set before the window is opened".to_string(),
                })
            }
        }

        if let Err(info) = self.backend.set_hint(hint) {
            return Err(self.fail(PpglError::Configuration {
                operation: OPERATION,
                info,
            }));
        }

        log::debug!("Applied window hint {hint:?}");
        self.state = WindowState::HintsConfigured;
        Ok(())
    }

    /// Open a windowed-mode window without a client API context
    ///
    /// Applies [`WindowHint::ClientApi`]`(`[`ClientApi::NoApi`]`)` before creating the
    /// window, as Vulkan rendering requires.
    ///
    /// # Errors
    /// See [`set_hint`](Self::set_hint) and [`open_with`](Self::open_with).
    pub fn open(&mut self, width: u32, height: u32, title: &str) -> PpglResult<()> {
        self.set_hint(WindowHint::ClientApi(ClientApi::NoApi))?;
        self.open_with(&WindowSpec::new(width, height, title))
    }

    /// Open a window from a caller-supplied spec; no hint is applied implicitly
    ///
    /// # Errors
    /// - [`PpglError::Initialization`] if the library was torn down by an earlier failure
    /// - [`PpglError::Usage`] if a window was already opened
    /// - [`PpglError::WindowCreation`] if the size is zero or the native call
    ///   fails; the library reference is released and the handle is unusable
    pub fn open_with(&mut self, spec: &WindowSpec<'_>) -> PpglResult<()> {
        const OPERATION: &str = "glfwCreateWindow";
        match self.state {
            WindowState::LibraryReady | WindowState::HintsConfigured => {}
            WindowState::Failed => return Err(Self::not_initialized(OPERATION)),
            WindowState::WindowOpen | WindowState::Closed => {
                return Err(PpglError::Usage {
                    operation: OPERATION,
                    info: "the window is already open".to_string(),
                })
            }
        }

        if spec.width == 0 || spec.height == 0 {
            return Err(self.fail(PpglError::WindowCreation {
                operation: OPERATION,
                info: format!(
                    "width and height must be greater than zero, got {}x{}",
                    spec.width, spec.height
                ),
            }));
        }

        let share = match spec.share {
            Some(other) if other.state == WindowState::WindowOpen => Some(other.backend.as_ref()),
            Some(_) => {
                return Err(PpglError::Usage {
                    operation: OPERATION,
                    info: "the shared window must be open".to_string(),
                })
            }
            None => None,
        };

        let created = self
            .backend
            .create_window(spec.width, spec.height, spec.title, spec.monitor, share);
        if let Err(info) = created {
            return Err(self.fail(PpglError::WindowCreation {
                operation: OPERATION,
                info,
            }));
        }

        log::info!("Opened window '{}' ({}x{})", spec.title, spec.width, spec.height);
        self.state = WindowState::WindowOpen;
        Ok(())
    }

    /// Process pending events and report whether the window is still open
    ///
    /// Needs to be called as long as the window needs to process pending
    /// events, typically once per iteration of the main loop.
    ///
    /// Returns `true` while the window is open and `false` once close was
    /// requested by the user or through [`request_close`](Self::request_close).
    ///
    /// # Errors
    /// - [`PpglError::Usage`] if no window was ever opened
    /// - [`PpglError::Initialization`] if the library was torn down by an earlier failure
    /// - [`PpglError::EventPoll`] if the library reports an error while
    ///   processing events; the handle is torn down
    pub fn poll_and_check_open(&mut self) -> PpglResult<bool> {
        const OPERATION: &str = "glfwPollEvents";
        match self.state {
            WindowState::WindowOpen => {}
            WindowState::Closed => return Ok(false),
            WindowState::Failed => return Err(Self::not_initialized(OPERATION)),
            WindowState::LibraryReady | WindowState::HintsConfigured => {
                return Err(PpglError::Usage {
                    operation: OPERATION,
                    info: "window was never opened, call open before polling".to_string(),
                })
            }
        }

        if self.backend.should_close() {
            log::info!("Window close requested");
            self.state = WindowState::Closed;
            return Ok(false);
        }

        match self.backend.poll_events() {
            Ok(drained) => {
                if drained > 0 {
                    log::trace!("Processed {drained} window events");
                }
                Ok(true)
            }
            Err(info) => Err(self.fail(PpglError::EventPoll {
                operation: OPERATION,
                info,
            })),
        }
    }

    /// Ask the window to close; the next poll returns `false`
    pub fn request_close(&mut self) {
        if self.state == WindowState::WindowOpen {
            self.backend.set_should_close(true);
        }
    }

    /// Window client area size, if a window exists
    pub fn size(&self) -> Option<(u32, u32)> {
        self.backend.size()
    }

    fn not_initialized(operation: &'static str) -> PpglError {
        PpglError::Initialization {
            operation,
            info: "the windowing library was torn down after an earlier failure".to_string(),
        }
    }

    /// Enter the terminal state, releasing everything, and hand back `error`
    fn fail(&mut self, error: PpglError) -> PpglError {
        log::warn!("Window failure, tearing down: {error}");
        self.state = WindowState::Failed;
        self.release();
        error
    }

    /// Release the window and the library reference; safe to call repeatedly
    fn release(&mut self) {
        if self.backend.is_initialized() {
            self.backend.terminate();
            log::debug!("Window resources released");
        }
    }
}

impl VulkanPlatform for WindowHandle {
    fn vulkan_instance_extensions(&self) -> Result<Vec<String>, String> {
        if self.state == WindowState::Failed {
            return Err("the windowing library is not initialized".to_string());
        }
        self.backend.vulkan_instance_extensions()
    }
}

impl Drop for WindowHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHandle")
            .field("state", &self.state)
            .field("has_window", &self.backend.has_window())
            .finish()
    }
}
