//! # Graphics Context
//!
//! Vulkan bring-up for a window: instance, physical device, graphics queue
//! family and logical device, in that order.
//!
//! ## Architecture
//!
//! - **`context`**: [`GraphicsContext`], the lifecycle and selection rules
//! - **`descriptor`**: plain-data creation records for instance and device
//! - **`platform`**: the Vulkan support probe a window provides
//! - **`api`** / **`vulkan`**: the Vulkan calls, implemented with `ash`
//!
//! Only an instance and a logical device are created. Queues, surfaces and
//! swapchains are left to the caller.

pub mod context;
pub mod descriptor;
pub mod platform;
mod api;
mod vulkan;

pub use context::{
    select_graphics_queue_family, select_physical_device, GraphicsContext, GraphicsState,
    PhysicalDeviceRecord,
};
pub use descriptor::{ApplicationInfo, DeviceDescriptor, InstanceDescriptor, QueueDescriptor, Version};
pub use platform::VulkanPlatform;

pub(crate) use api::DeviceApi;
