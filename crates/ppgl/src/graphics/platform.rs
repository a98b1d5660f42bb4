//! Platform capability probe used before any Vulkan call

/// Something that can tell whether the platform supports Vulkan
///
/// Implemented by [`WindowHandle`](crate::window::WindowHandle), whose
/// windowing library knows which surface extensions the platform needs.
pub trait VulkanPlatform {
    /// Instance extensions required to present on this platform
    ///
    /// # Errors
    /// Returns the platform's diagnostic when Vulkan is not supported.
    fn vulkan_instance_extensions(&self) -> Result<Vec<String>, String>;
}
