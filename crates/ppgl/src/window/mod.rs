//! Window management subsystem
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!        ┌──────▼───────┐
//!        │ WindowHandle │ ← Public API (handle.rs)
//!        └──────┬───────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ WindowBackend   │ ← Internal trait (backend.rs)
//!      └────────┬────────┘
//!               │ Implemented by
//!      ┌────────▼────────┐
//!      │ GlfwBackend     │ ← GLFW (glfw_backend.rs)
//!      └─────────────────┘
//! ```
//!
//! - **`handle`**: lifecycle, state tracking and error translation
//! - **`backend`**: the native calls the handle makes
//! - **`hint`**: window hints and creation records

pub mod handle;
pub mod hint;
mod backend;
mod glfw_backend;

pub use handle::{WindowHandle, WindowState};
pub use hint::{ClientApi, MonitorSelection, WindowHint, WindowSpec};

pub(crate) use backend::WindowBackend;
