//! Graphics API abstraction
//!
//! The calls [`GraphicsContext`](super::GraphicsContext) makes into Vulkan.
//! Status codes are handed back untouched so the context decides what counts
//! as failure.

use ash::vk;

use super::descriptor::{DeviceDescriptor, InstanceDescriptor};

/// Internal trait for graphics API implementations
///
/// An implementation owns at most one instance and one logical device.
pub(crate) trait DeviceApi {
    /// Create the instance
    fn create_instance(&mut self, descriptor: &InstanceDescriptor) -> Result<(), vk::Result>;

    /// Enumerate physical devices, returning the raw status with the handles written
    fn enumerate_physical_devices(&mut self) -> (vk::Result, Vec<vk::PhysicalDevice>);

    /// Properties of one physical device
    fn physical_device_properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties;

    /// Queue family properties of one physical device
    fn queue_family_properties(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;

    /// Create the logical device
    fn create_device(
        &mut self,
        physical_device: vk::PhysicalDevice,
        descriptor: &DeviceDescriptor,
    ) -> Result<(), vk::Result>;

    /// Destroy the logical device, then the instance
    ///
    /// Must be a no-op for anything never created or already destroyed.
    fn destroy(&mut self);

    /// Get access to the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;
}
