//! Window backend using GLFW
//!
//! GLFW reports failures through an error callback rather than return values.
//! The callback stores the most recent description so each native call can be
//! followed by a last-error query, the same way `glfwGetError` is used.

use std::cell::RefCell;

use super::backend::WindowBackend;
use super::hint::{MonitorSelection, WindowHint};

/// Fallback diagnostic when GLFW reports nothing
const NO_INFO: &str = "no info";

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// GLFW error callback recording the description for the next query
fn record_error(error: glfw::Error, description: String) {
    log::debug!("GLFW error {error:?}: {description}");
    LAST_ERROR.with(|last| *last.borrow_mut() = Some(format!("{description} ({error:?})")));
}

/// Take the error reported since the last query, clearing it
fn take_last_error() -> Option<String> {
    LAST_ERROR.with(|last| last.borrow_mut().take())
}

type EventReceiver = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

/// GLFW window wrapper
///
/// Each backend owns one `Glfw` reference. The library is terminated when the
/// last reference in the process is dropped, so several backends can coexist
/// without one shutting the library down under another.
pub(crate) struct GlfwBackend {
    glfw: Option<glfw::Glfw>,
    window: Option<glfw::PWindow>,
    events: Option<EventReceiver>,
}

impl GlfwBackend {
    /// Initialize GLFW and take a reference on it
    pub(crate) fn init() -> Result<Self, String> {
        // Stale errors belong to whoever ran before us
        take_last_error();

        let glfw = glfw::init(record_error).map_err(|error| {
            take_last_error().unwrap_or_else(|| format!("{error:?}"))
        })?;

        Ok(Self {
            glfw: Some(glfw),
            window: None,
            events: None,
        })
    }

    fn glfw_mut(&mut self) -> Result<&mut glfw::Glfw, String> {
        self.glfw
            .as_mut()
            .ok_or_else(|| "GLFW is not initialized".to_string())
    }
}

/// Create a window, shared with `parent` when given
fn create_with_mode(
    library: &mut glfw::Glfw,
    parent: Option<&glfw::PWindow>,
    width: u32,
    height: u32,
    title: &str,
    mode: glfw::WindowMode<'_>,
) -> Option<(glfw::PWindow, EventReceiver)> {
    match parent {
        Some(parent) => parent.create_shared(width, height, title, mode),
        None => library.create_window(width, height, title, mode),
    }
}

impl WindowBackend for GlfwBackend {
    fn set_hint(&mut self, hint: WindowHint) -> Result<(), String> {
        self.glfw_mut()?.window_hint(hint.to_glfw());
        take_last_error().map_or(Ok(()), Err)
    }

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        title: &str,
        monitor: Option<MonitorSelection>,
        share: Option<&dyn WindowBackend>,
    ) -> Result<(), String> {
        let parent = match share {
            Some(share) => {
                let backend = share
                    .as_any()
                    .downcast_ref::<Self>()
                    .ok_or_else(|| "shared window belongs to a different backend".to_string())?;
                Some(backend.window.as_ref().ok_or_else(|| "shared window is not open".to_string())?)
            }
            None => None,
        };

        let library = self.glfw_mut()?;
        let created = match monitor {
            None => create_with_mode(library, parent, width, height, title, glfw::WindowMode::Windowed),
            Some(MonitorSelection::Primary) => library.with_primary_monitor(|library, monitor| {
                let mode = monitor.map_or(glfw::WindowMode::Windowed, |m| glfw::WindowMode::FullScreen(m));
                create_with_mode(library, parent, width, height, title, mode)
            }),
            Some(MonitorSelection::Index(index)) => library.with_connected_monitors(|library, monitors| {
                let mode = monitors
                    .get(index)
                    .map_or(glfw::WindowMode::Windowed, |m| glfw::WindowMode::FullScreen(m));
                create_with_mode(library, parent, width, height, title, mode)
            }),
        };

        let (mut window, events) =
            created.ok_or_else(|| take_last_error().unwrap_or_else(|| NO_INFO.to_string()))?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_size_polling(true);
        window.set_framebuffer_size_polling(true);

        self.window = Some(window);
        self.events = Some(events);
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.window.is_some()
    }

    fn should_close(&self) -> bool {
        self.window.as_ref().map_or(true, |window| window.should_close())
    }

    fn set_should_close(&mut self, should_close: bool) {
        if let Some(window) = self.window.as_mut() {
            window.set_should_close(should_close);
        }
    }

    fn poll_events(&mut self) -> Result<usize, String> {
        self.glfw_mut()?.poll_events();

        let mut drained = 0;
        if let Some(events) = self.events.as_ref() {
            for (_, event) in glfw::flush_messages(events) {
                log::trace!("Window event: {event:?}");
                drained += 1;
            }
        }

        take_last_error().map_or(Ok(drained), Err)
    }

    fn size(&self) -> Option<(u32, u32)> {
        self.window.as_ref().map(|window| {
            let (width, height) = window.get_size();
            (width.max(0) as u32, height.max(0) as u32)
        })
    }

    fn vulkan_instance_extensions(&self) -> Result<Vec<String>, String> {
        let library = self
            .glfw
            .as_ref()
            .ok_or_else(|| "GLFW is not initialized".to_string())?;

        if !library.vulkan_supported() {
            return Err(take_last_error().unwrap_or_else(|| "No vulkan support".to_string()));
        }

        library.get_required_instance_extensions().ok_or_else(|| {
            take_last_error().unwrap_or_else(|| "Failed to get required extensions".to_string())
        })
    }

    fn terminate(&mut self) {
        // The window holds its own library reference, so it goes first
        self.events = None;
        self.window = None;
        if self.glfw.take().is_some() {
            log::debug!("Released GLFW reference");
        }
    }

    fn is_initialized(&self) -> bool {
        self.glfw.is_some()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Drop for GlfwBackend {
    fn drop(&mut self) {
        self.terminate();
    }
}
