//! Error types shared by the window and graphics facades
//!
//! Every native failure is translated into one [`PpglError`] value carrying the
//! operation that failed and a diagnostic string. Nothing is printed here;
//! presentation is left to the caller.

use ash::vk;
use thiserror::Error;

/// PPGL errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PpglError {
    /// The windowing library could not be initialized, or is no longer initialized
    #[error("{operation}: windowing library initialization failed: {info}")]
    Initialization {
        /// Operation that failed
        operation: &'static str,
        /// Diagnostic reported by the library
        info: String,
    },

    /// A window hint was rejected, or a descriptor was supplied too late
    #[error("{operation}: configuration rejected: {info}")]
    Configuration {
        /// Operation that failed
        operation: &'static str,
        /// Diagnostic reported by the library
        info: String,
    },

    /// The native window could not be created
    #[error("{operation}: window creation failed: {info}")]
    WindowCreation {
        /// Operation that failed
        operation: &'static str,
        /// Diagnostic reported by the library
        info: String,
    },

    /// The library reported an error while pumping events
    #[error("{operation}: event polling failed: {info}")]
    EventPoll {
        /// Operation that failed
        operation: &'static str,
        /// Diagnostic reported by the library
        info: String,
    },

    /// The platform does not support Vulkan
    #[error("{operation}: no Vulkan support: {info}")]
    UnsupportedPlatform {
        /// Operation that failed
        operation: &'static str,
        /// Diagnostic reported by the platform
        info: String,
    },

    /// `vkCreateInstance` returned a non-success code
    #[error("{operation}: failed to create instance: VkResult {}", .result.as_raw())]
    InstanceCreation {
        /// Operation that failed
        operation: &'static str,
        /// Result code returned by Vulkan
        result: vk::Result,
    },

    /// Physical device enumeration failed or found no device
    #[error("{operation}: failed to enumerate physical devices: {info}")]
    DeviceEnumeration {
        /// Operation that failed
        operation: &'static str,
        /// Diagnostic, including the result code when there is one
        info: String,
    },

    /// The selected device exposes no graphics-capable queue family
    #[error("{operation}: no graphics queue family on device '{device}'")]
    QueueFamilyNotFound {
        /// Operation that failed
        operation: &'static str,
        /// Name of the device that was searched
        device: String,
    },

    /// `vkCreateDevice` returned a non-success code
    #[error("{operation}: failed to create logical device: VkResult {}", .result.as_raw())]
    LogicalDeviceCreation {
        /// Operation that failed
        operation: &'static str,
        /// Result code returned by Vulkan
        result: vk::Result,
    },

    /// An operation was called in the wrong lifecycle state
    #[error("{operation}: invalid usage: {info}")]
    Usage {
        /// Operation that was misused
        operation: &'static str,
        /// What the caller must do instead
        info: String,
    },
}

impl PpglError {
    /// Name of the operation that produced this error
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Initialization { operation, .. }
            | Self::Configuration { operation, .. }
            | Self::WindowCreation { operation, .. }
            | Self::EventPoll { operation, .. }
            | Self::UnsupportedPlatform { operation, .. }
            | Self::InstanceCreation { operation, .. }
            | Self::DeviceEnumeration { operation, .. }
            | Self::QueueFamilyNotFound { operation, .. }
            | Self::LogicalDeviceCreation { operation, .. }
            | Self::Usage { operation, .. } => *operation,
        }
    }

    /// Human-readable diagnostic without the operation prefix
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Initialization { info, .. }
            | Self::Configuration { info, .. }
            | Self::WindowCreation { info, .. }
            | Self::EventPoll { info, .. }
            | Self::UnsupportedPlatform { info, .. }
            | Self::DeviceEnumeration { info, .. }
            | Self::Usage { info, .. } => info.clone(),
            Self::InstanceCreation { result, .. } | Self::LogicalDeviceCreation { result, .. } => {
                vk_result_diagnostic(*result)
            }
            Self::QueueFamilyNotFound { device, .. } => {
                format!("no graphics queue family on device '{device}'")
            }
        }
    }
}

/// Format a Vulkan result code the way diagnostics report it
pub(crate) fn vk_result_diagnostic(result: vk::Result) -> String {
    format!("VkResult: {} ({result:?})", result.as_raw())
}

/// Result type for PPGL operations
pub type PpglResult<T> = Result<T, PpglError>;
