//! Vulkan context management
//!
//! [`GraphicsContext`] walks the fixed chain instance → physical devices →
//! queue family → logical device. Each stage assumes the previous one
//! succeeded; the first failure makes the context terminal and releases what
//! was created so far.
//!
//! Resources are released by one routine, shared by failure paths and `Drop`:
//! the logical device first, then the instance.

use ash::vk;

use crate::config::GraphicsConfig;
use crate::error::{vk_result_diagnostic, PpglError, PpglResult};

use super::api::DeviceApi;
use super::descriptor::{DeviceDescriptor, InstanceDescriptor};
use super::platform::VulkanPlatform;
use super::vulkan::AshDeviceApi;

/// Lifecycle state of a [`GraphicsContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsState {
    /// Vulkan support was confirmed; nothing has been created yet
    PlatformVerified,
    /// The instance exists
    InstanceCreated,
    /// Physical devices were enumerated and one was selected
    DevicesEnumerated,
    /// A graphics-capable queue family was found
    QueueFamilySelected,
    /// The logical device exists
    DeviceReady,
    /// A step failed; the context cannot be reused
    Failed,
}

/// A physical device and the properties queried for it
#[derive(Debug, Clone, Copy)]
pub struct PhysicalDeviceRecord {
    /// Vulkan physical device handle
    pub handle: vk::PhysicalDevice,
    /// Device properties and limits
    pub properties: vk::PhysicalDeviceProperties,
}

impl PhysicalDeviceRecord {
    /// Device name as reported by the driver
    pub fn name(&self) -> String {
        let bytes: Vec<u8> = self
            .properties
            .device_name
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Pick the physical device to use
///
/// The first enumerated device wins; there is no ranking.
pub const fn select_physical_device(devices: &[PhysicalDeviceRecord]) -> Option<usize> {
    if devices.is_empty() {
        None
    } else {
        Some(0)
    }
}

/// Index of the graphics-capable queue family to use
///
/// The scan keeps the **last** family with `GRAPHICS` set, not the first.
pub fn select_graphics_queue_family(families: &[vk::QueueFamilyProperties]) -> Option<u32> {
    families
        .iter()
        .rposition(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .and_then(|index| u32::try_from(index).ok())
}

/// Main Vulkan context that owns the instance and logical device
pub struct GraphicsContext {
    api: Box<dyn DeviceApi>,
    state: GraphicsState,
    config: GraphicsConfig,
    platform_extensions: Vec<String>,
    custom_instance: Option<InstanceDescriptor>,
    custom_device: Option<DeviceDescriptor>,
    physical_devices: Vec<PhysicalDeviceRecord>,
    selected_device: usize,
    queue_family_index: Option<u32>,
}

impl GraphicsContext {
    /// Check for Vulkan support and load Vulkan, using the default descriptors
    ///
    /// # Errors
    /// Returns [`PpglError::UnsupportedPlatform`] if the platform lacks Vulkan
    /// support or the Vulkan library cannot be loaded.
    pub fn new<P: VulkanPlatform + ?Sized>(platform: &P) -> PpglResult<Self> {
        Self::with_config(platform, &GraphicsConfig::default())
    }

    /// Like [`new`](Self::new), taking application info, layers and queue
    /// priority from `config`
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn with_config<P: VulkanPlatform + ?Sized>(
        platform: &P,
        config: &GraphicsConfig,
    ) -> PpglResult<Self> {
        Self::with_api(platform, config, || {
            AshDeviceApi::load().map(|api| Box::new(api) as Box<dyn DeviceApi>)
        })
    }

    /// Create a context over an API produced by `load` once the platform check passed
    pub(crate) fn with_api<P, F>(platform: &P, config: &GraphicsConfig, load: F) -> PpglResult<Self>
    where
        P: VulkanPlatform + ?Sized,
        F: FnOnce() -> Result<Box<dyn DeviceApi>, String>,
    {
        let platform_extensions = platform
            .vulkan_instance_extensions()
            .map_err(|info| PpglError::UnsupportedPlatform {
                operation: "glfwVulkanSupported",
                info,
            })?;

        let api = load().map_err(|info| PpglError::UnsupportedPlatform {
            operation: "vkGetInstanceProcAddr",
            info,
        })?;

        log::debug!("Vulkan supported, platform extensions: {platform_extensions:?}");
        Ok(Self {
            api,
            state: GraphicsState::PlatformVerified,
            config: config.clone(),
            platform_extensions,
            custom_instance: None,
            custom_device: None,
            physical_devices: Vec::new(),
            selected_device: 0,
            queue_family_index: None,
        })
    }

    /// Replace the default instance descriptor; has to be called before
    /// [`initialize`](Self::initialize)
    ///
    /// The descriptor is used as given, including its extension list.
    ///
    /// # Errors
    /// Returns [`PpglError::Usage`] once initialization has started.
    pub fn set_custom_app_info(&mut self, descriptor: InstanceDescriptor) -> PpglResult<()> {
        self.ensure_not_initialized("set_custom_app_info")?;
        self.custom_instance = Some(descriptor);
        Ok(())
    }

    /// Replace the default device descriptor; has to be called before
    /// [`initialize`](Self::initialize)
    ///
    /// # Errors
    /// Returns [`PpglError::Usage`] once initialization has started.
    pub fn set_custom_device_create_info(&mut self, descriptor: DeviceDescriptor) -> PpglResult<()> {
        self.ensure_not_initialized("set_custom_device_create_info")?;
        self.custom_device = Some(descriptor);
        Ok(())
    }

    /// Create the instance, pick a physical device and queue family, and
    /// create the logical device
    ///
    /// # Errors
    /// - [`PpglError::Usage`] if called more than once
    /// - [`PpglError::InstanceCreation`], [`PpglError::DeviceEnumeration`],
    ///   [`PpglError::QueueFamilyNotFound`] or [`PpglError::LogicalDeviceCreation`]
    ///   for the step that failed; the context is then unusable
    pub fn initialize(&mut self) -> PpglResult<()> {
        self.ensure_not_initialized("initialize")?;

        self.create_instance()?;
        self.enumerate_physical_devices()?;
        let queue_family = self.select_queue_family()?;
        self.create_logical_device(queue_family)
    }

    fn create_instance(&mut self) -> PpglResult<()> {
        let descriptor = self.custom_instance.clone().unwrap_or_else(|| InstanceDescriptor {
            application: self.config.application.clone(),
            enabled_extensions: self.platform_extensions.clone(),
            enabled_layers: self.config.enabled_layers.clone(),
        });

        if let Err(result) = self.api.create_instance(&descriptor) {
            return Err(self.fail(PpglError::InstanceCreation {
                operation: "vkCreateInstance",
                result,
            }));
        }

        log::info!(
            "Created Vulkan instance for '{}' {}",
            descriptor.application.application_name,
            descriptor.application.application_version
        );
        self.state = GraphicsState::InstanceCreated;
        Ok(())
    }

    fn enumerate_physical_devices(&mut self) -> PpglResult<()> {
        const OPERATION: &str = "vkEnumeratePhysicalDevices";

        let (status, handles) = self.api.enumerate_physical_devices();
        match status {
            vk::Result::SUCCESS => {}
            vk::Result::INCOMPLETE => {
                log::debug!("More physical devices than returned, using {}", handles.len());
            }
            other => {
                return Err(self.fail(PpglError::DeviceEnumeration {
                    operation: OPERATION,
                    info: vk_result_diagnostic(other),
                }))
            }
        }

        let records: Vec<PhysicalDeviceRecord> = handles
            .into_iter()
            .map(|handle| PhysicalDeviceRecord {
                handle,
                properties: self.api.physical_device_properties(handle),
            })
            .collect();

        let Some(selected) = select_physical_device(&records) else {
            return Err(self.fail(PpglError::DeviceEnumeration {
                operation: OPERATION,
                info: "no physical devices available".to_string(),
            }));
        };

        for (index, record) in records.iter().enumerate() {
            log::debug!("Physical device {index}: {}", record.name());
        }
        log::info!("Selected GPU: {}", records[selected].name());

        self.physical_devices = records;
        self.selected_device = selected;
        self.state = GraphicsState::DevicesEnumerated;
        Ok(())
    }

    fn select_queue_family(&mut self) -> PpglResult<u32> {
        let device = self.physical_devices[self.selected_device];
        let families = self.api.queue_family_properties(device.handle);

        let Some(index) = select_graphics_queue_family(&families) else {
            return Err(self.fail(PpglError::QueueFamilyNotFound {
                operation: "vkGetPhysicalDeviceQueueFamilyProperties",
                device: device.name(),
            }));
        };

        log::debug!("Using queue family {index} of {}", families.len());
        self.queue_family_index = Some(index);
        self.state = GraphicsState::QueueFamilySelected;
        Ok(index)
    }

    fn create_logical_device(&mut self, queue_family: u32) -> PpglResult<()> {
        let descriptor = self
            .custom_device
            .clone()
            .unwrap_or_else(|| DeviceDescriptor::single_queue(queue_family, self.config.queue_priority));

        let physical_device = self.physical_devices[self.selected_device].handle;
        if let Err(result) = self.api.create_device(physical_device, &descriptor) {
            return Err(self.fail(PpglError::LogicalDeviceCreation {
                operation: "vkCreateDevice",
                result,
            }));
        }

        log::info!("Created logical device");
        self.state = GraphicsState::DeviceReady;
        Ok(())
    }

    /// Current lifecycle state
    pub const fn state(&self) -> GraphicsState {
        self.state
    }

    /// Every enumerated physical device, in enumeration order
    pub fn physical_devices(&self) -> &[PhysicalDeviceRecord] {
        &self.physical_devices
    }

    /// The physical device in use, once enumerated
    pub fn selected_device(&self) -> Option<&PhysicalDeviceRecord> {
        self.physical_devices.get(self.selected_device)
    }

    /// The graphics queue family in use, once selected
    pub const fn queue_family_index(&self) -> Option<u32> {
        self.queue_family_index
    }

    /// The logical device, once created
    pub fn device(&self) -> Option<&ash::Device> {
        self.api
            .as_any()
            .downcast_ref::<AshDeviceApi>()
            .and_then(AshDeviceApi::device)
    }

    fn ensure_not_initialized(&self, operation: &'static str) -> PpglResult<()> {
        if self.state == GraphicsState::PlatformVerified {
            Ok(())
        } else {
            Err(PpglError::Usage {
                operation,
                info: format!("context is already past initialization ({:?})", self.state),
            })
        }
    }

    /// Enter the terminal state, releasing everything, and hand back `error`
    fn fail(&mut self, error: PpglError) -> PpglError {
        log::warn!("Graphics initialization failed: {error}");
        self.state = GraphicsState::Failed;
        self.release();
        error
    }

    /// Destroy the logical device then the instance; safe to call repeatedly
    fn release(&mut self) {
        self.api.destroy();
    }
}

impl Drop for GraphicsContext {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("state", &self.state)
            .field("physical_devices", &self.physical_devices.len())
            .field("selected_device", &self.selected_device)
            .field("queue_family_index", &self.queue_family_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{device_properties, MockDevice, MockDeviceApi, MockPlatform};

    const GRAPHICS: vk::QueueFlags = vk::QueueFlags::GRAPHICS;
    const COMPUTE: vk::QueueFlags = vk::QueueFlags::COMPUTE;
    const TRANSFER: vk::QueueFlags = vk::QueueFlags::TRANSFER;

    fn context_with(api: MockDeviceApi) -> GraphicsContext {
        let api: Box<dyn DeviceApi> = Box::new(api);
        GraphicsContext::with_api(&MockPlatform::supported(), &GraphicsConfig::default(), move || Ok(api))
            .unwrap()
    }

    fn families(flags: &[vk::QueueFlags]) -> Vec<vk::QueueFamilyProperties> {
        flags
            .iter()
            .map(|&queue_flags| vk::QueueFamilyProperties {
                queue_flags,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_queue_family_scan_keeps_last_graphics_match() {
        assert_eq!(
            select_graphics_queue_family(&families(&[TRANSFER, GRAPHICS, GRAPHICS])),
            Some(2)
        );
        assert_eq!(
            select_graphics_queue_family(&families(&[GRAPHICS | COMPUTE, TRANSFER])),
            Some(0)
        );
        assert_eq!(select_graphics_queue_family(&families(&[COMPUTE, TRANSFER])), None);
        assert_eq!(select_graphics_queue_family(&[]), None);
    }

    #[test]
    fn test_first_device_is_selected() {
        let records = [
            PhysicalDeviceRecord {
                handle: vk::PhysicalDevice::null(),
                properties: device_properties("integrated"),
            },
            PhysicalDeviceRecord {
                handle: vk::PhysicalDevice::null(),
                properties: device_properties("discrete"),
            },
        ];
        assert_eq!(select_physical_device(&records), Some(0));
        assert_eq!(select_physical_device(&[]), None);
        assert_eq!(records[1].name(), "discrete");
    }

    #[test]
    fn test_initialize_builds_the_full_chain() {
        let (api, probe) = MockDeviceApi::new(vec![
            MockDevice::new("GPU 0", &[TRANSFER, GRAPHICS, GRAPHICS]),
            MockDevice::new("GPU 1", &[GRAPHICS]),
        ]);
        let mut context = context_with(api);
        context.initialize().unwrap();

        assert_eq!(context.state(), GraphicsState::DeviceReady);
        assert_eq!(context.physical_devices().len(), 2);
        assert_eq!(context.selected_device().unwrap().name(), "GPU 0");
        assert_eq!(context.queue_family_index(), Some(2));
        assert!(context.device().is_none());

        let log = probe.borrow();
        let instance = log.instance_descriptor.as_ref().unwrap();
        assert_eq!(instance.application.application_name, "Test");
        assert_eq!(instance.enabled_extensions, vec!["VK_KHR_surface".to_string()]);
        assert_eq!(
            log.device_descriptor.as_ref().unwrap(),
            &DeviceDescriptor::single_queue(2, 0.0)
        );
        assert_eq!(log.device_created_from, Some(context.physical_devices()[0].handle));
    }

    #[test]
    fn test_incomplete_enumeration_is_accepted() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        probe.borrow_mut().enumerate_status = Some(vk::Result::INCOMPLETE);
        let mut context = context_with(api);

        context.initialize().unwrap();
        assert_eq!(context.physical_devices().len(), 1);
        assert_eq!(context.state(), GraphicsState::DeviceReady);
    }

    #[test]
    fn test_enumeration_failure_is_terminal() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        probe.borrow_mut().enumerate_status = Some(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        let mut context = context_with(api);

        let error = context.initialize().unwrap_err();
        assert!(matches!(error, PpglError::DeviceEnumeration { .. }));
        assert!(error.diagnostic().contains("-1"));
        assert_eq!(context.state(), GraphicsState::Failed);
        assert_eq!(probe.borrow().instances_destroyed, 1);

        assert!(matches!(context.initialize(), Err(PpglError::Usage { .. })));
    }

    #[test]
    fn test_no_devices_is_an_enumeration_error() {
        let (api, _probe) = MockDeviceApi::new(Vec::new());
        let mut context = context_with(api);

        let error = context.initialize().unwrap_err();
        assert_eq!(
            error,
            PpglError::DeviceEnumeration {
                operation: "vkEnumeratePhysicalDevices",
                info: "no physical devices available".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_graphics_queue_family() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("Compute only", &[COMPUTE, TRANSFER])]);
        let mut context = context_with(api);

        let error = context.initialize().unwrap_err();
        assert_eq!(
            error,
            PpglError::QueueFamilyNotFound {
                operation: "vkGetPhysicalDeviceQueueFamilyProperties",
                device: "Compute only".to_string(),
            }
        );
        assert!(probe.borrow().device_descriptor.is_none());
    }

    #[test]
    fn test_instance_creation_failure_carries_result_code() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        probe.borrow_mut().instance_result = Some(vk::Result::ERROR_INCOMPATIBLE_DRIVER);
        let mut context = context_with(api);

        let error = context.initialize().unwrap_err();
        assert_eq!(
            error,
            PpglError::InstanceCreation {
                operation: "vkCreateInstance",
                result: vk::Result::ERROR_INCOMPATIBLE_DRIVER,
            }
        );
        assert!(context.physical_devices().is_empty());
    }

    #[test]
    fn test_logical_device_failure_carries_result_code() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        probe.borrow_mut().device_result = Some(vk::Result::ERROR_DEVICE_LOST);
        let mut context = context_with(api);

        let error = context.initialize().unwrap_err();
        assert!(matches!(
            error,
            PpglError::LogicalDeviceCreation {
                result: vk::Result::ERROR_DEVICE_LOST,
                ..
            }
        ));
        assert_eq!(context.state(), GraphicsState::Failed);
    }

    #[test]
    fn test_unsupported_platform() {
        let platform = MockPlatform(Err("No vulkan support".to_string()));
        let result = GraphicsContext::with_api(&platform, &GraphicsConfig::default(), || {
            panic!("Vulkan must not be loaded on an unsupported platform")
        });

        assert_eq!(
            result.unwrap_err(),
            PpglError::UnsupportedPlatform {
                operation: "glfwVulkanSupported",
                info: "No vulkan support".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_descriptors_replace_defaults() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS, GRAPHICS])]);
        let mut context = context_with(api);

        let mut instance = InstanceDescriptor::default();
        instance.application.application_name = "Custom".to_string();
        let device = DeviceDescriptor::single_queue(0, 1.0);
        context.set_custom_app_info(instance.clone()).unwrap();
        context.set_custom_device_create_info(device.clone()).unwrap();
        context.initialize().unwrap();

        let log = probe.borrow();
        assert_eq!(log.instance_descriptor.as_ref(), Some(&instance));
        assert_eq!(log.device_descriptor.as_ref(), Some(&device));
        assert_eq!(context.queue_family_index(), Some(1));
    }

    #[test]
    fn test_custom_descriptors_rejected_after_initialize() {
        let (api, _probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        let mut context = context_with(api);
        context.initialize().unwrap();

        assert!(matches!(
            context.set_custom_app_info(InstanceDescriptor::default()),
            Err(PpglError::Usage { .. })
        ));
        assert!(matches!(
            context.set_custom_device_create_info(DeviceDescriptor::default()),
            Err(PpglError::Usage { .. })
        ));
    }

    #[test]
    fn test_config_feeds_default_descriptors() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        let mut config = GraphicsConfig::default();
        config.enabled_layers = vec!["VK_LAYER_KHRONOS_validation".to_string()];
        config.queue_priority = 0.5;
        let api: Box<dyn DeviceApi> = Box::new(api);
        let mut context =
            GraphicsContext::with_api(&MockPlatform::supported(), &config, move || Ok(api)).unwrap();
        context.initialize().unwrap();

        let log = probe.borrow();
        assert_eq!(
            log.instance_descriptor.as_ref().unwrap().enabled_layers,
            vec!["VK_LAYER_KHRONOS_validation".to_string()]
        );
        assert_eq!(
            log.device_descriptor.as_ref().unwrap().queues[0].priorities,
            vec![0.5]
        );
    }

    #[test]
    fn test_drop_destroys_device_before_instance() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        let mut context = context_with(api);
        context.initialize().unwrap();
        drop(context);

        let log = probe.borrow();
        assert_eq!(log.destroy_order, vec!["device", "instance"]);
        assert!(!log.device_alive);
        assert!(!log.instance_alive);
    }

    #[test]
    fn test_drop_without_initialize_does_not_crash() {
        let (api, probe) = MockDeviceApi::new(vec![MockDevice::new("GPU", &[GRAPHICS])]);
        let context = context_with(api);
        drop(context);

        let log = probe.borrow();
        assert_eq!(log.instances_destroyed, 0);
        assert_eq!(log.devices_destroyed, 0);
    }
}
