//! # PPGL
//!
//! A small windowing and Vulkan bootstrap library.
//!
//! ## Features
//!
//! - **Window lifecycle**: open one native window and pump its events
//! - **Vulkan bring-up**: instance, physical device, graphics queue family and
//!   logical device created in a fixed order
//! - **Scoped cleanup**: every native resource is released exactly once, on
//!   failure or on drop
//! - **Configuration**: window and graphics settings from TOML or RON files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ppgl::prelude::*;
//!
//! fn main() -> Result<(), PpglError> {
//!     let mut window = WindowHandle::new()?;
//!     let mut graphics = GraphicsContext::new(&window)?;
//!
//!     window.open(600, 600, "test")?;
//!     graphics.initialize()?;
//!
//!     while window.poll_and_check_open()? {}
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod graphics;
pub mod window;

#[cfg(test)]
mod testing;

pub use error::{PpglError, PpglResult};
pub use graphics::{GraphicsContext, GraphicsState};
pub use window::{WindowHandle, WindowState};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, GraphicsConfig, PpglConfig, WindowConfig},
        foundation::logging,
        graphics::{
            ApplicationInfo, DeviceDescriptor, GraphicsContext, GraphicsState, InstanceDescriptor,
            PhysicalDeviceRecord, Version, VulkanPlatform,
        },
        window::{ClientApi, MonitorSelection, WindowHandle, WindowHint, WindowSpec, WindowState},
        PpglError, PpglResult,
    };
}
