//! Owned descriptors for instance and logical device creation
//!
//! These are plain data; the Vulkan structures with their borrowed pointers
//! are only built for the duration of the native call.

use ash::vk;
use serde::{Deserialize, Serialize};

/// A `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Packed Vulkan representation
    pub const fn to_vk(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Application metadata passed to the Vulkan instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationInfo {
    /// Application name
    pub application_name: String,
    /// Application version
    pub application_version: Version,
    /// Engine name
    pub engine_name: String,
    /// Engine version
    pub engine_version: Version,
    /// Highest Vulkan API version the application uses
    pub api_version: Version,
}

impl Default for ApplicationInfo {
    fn default() -> Self {
        Self {
            application_name: "Test".to_string(),
            application_version: Version::new(1, 0, 0),
            engine_name: "No Engine".to_string(),
            engine_version: Version::new(1, 0, 0),
            api_version: Version::new(1, 0, 0),
        }
    }
}

/// Everything `vkCreateInstance` needs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    /// Application metadata
    pub application: ApplicationInfo,
    /// Instance extensions to enable
    pub enabled_extensions: Vec<String>,
    /// Instance layers to enable
    pub enabled_layers: Vec<String>,
}

/// Queues requested from one queue family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueDescriptor {
    /// Queue family the queues come from
    pub family_index: u32,
    /// One priority per queue, between 0.0 and 1.0
    pub priorities: Vec<f32>,
}

/// Everything `vkCreateDevice` needs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Queues to create with the device
    pub queues: Vec<QueueDescriptor>,
    /// Device extensions to enable
    pub enabled_extensions: Vec<String>,
}

impl DeviceDescriptor {
    /// One queue from `family_index` with the given priority
    pub fn single_queue(family_index: u32, priority: f32) -> Self {
        Self {
            queues: vec![QueueDescriptor {
                family_index,
                priorities: vec![priority],
            }],
            enabled_extensions: Vec::new(),
        }
    }
}
