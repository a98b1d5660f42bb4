//! Vulkan calls through `ash`

use std::ffi::CString;
use std::os::raw::c_char;

use ash::{vk, Device, Entry, Instance};

use super::api::DeviceApi;
use super::descriptor::{DeviceDescriptor, InstanceDescriptor};

/// Convert names to C strings; interior NUL bytes are rejected
fn c_strings(names: &[String]) -> Result<Vec<CString>, vk::Result> {
    names
        .iter()
        .map(|name| CString::new(name.as_str()).map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED))
        .collect()
}

fn c_pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

/// Loaded Vulkan entry points plus the instance and device created from them
pub(crate) struct AshDeviceApi {
    entry: Entry,
    instance: Option<Instance>,
    device: Option<Device>,
}

impl AshDeviceApi {
    /// Load the Vulkan library
    pub(crate) fn load() -> Result<Self, String> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| format!("Failed to load Vulkan: {e}"))?;

        Ok(Self {
            entry,
            instance: None,
            device: None,
        })
    }

    /// The logical device, once created
    pub(crate) const fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }
}

impl DeviceApi for AshDeviceApi {
    fn create_instance(&mut self, descriptor: &InstanceDescriptor) -> Result<(), vk::Result> {
        let application = &descriptor.application;
        let app_name = CString::new(application.application_name.as_str())
            .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;
        let engine_name = CString::new(application.engine_name.as_str())
            .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(application.application_version.to_vk())
            .engine_name(&engine_name)
            .engine_version(application.engine_version.to_vk())
            .api_version(application.api_version.to_vk());

        let extensions = c_strings(&descriptor.enabled_extensions)?;
        let extension_ptrs = c_pointers(&extensions);
        let layers = c_strings(&descriptor.enabled_layers)?;
        let layer_ptrs = c_pointers(&layers);

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { self.entry.create_instance(&create_info, None)? };
        self.instance = Some(instance);
        Ok(())
    }

    fn enumerate_physical_devices(&mut self) -> (vk::Result, Vec<vk::PhysicalDevice>) {
        let Some(instance) = self.instance.as_ref() else {
            return (vk::Result::ERROR_INITIALIZATION_FAILED, Vec::new());
        };

        // Two-call idiom by hand: ash's wrapper retries on VK_INCOMPLETE, the
        // status is wanted as reported
        let enumerate = instance.fp_v1_0().enumerate_physical_devices;
        let mut count = 0u32;
        let status = unsafe { enumerate(instance.handle(), &mut count, std::ptr::null_mut()) };
        if status != vk::Result::SUCCESS {
            return (status, Vec::new());
        }

        let mut devices = vec![vk::PhysicalDevice::null(); count as usize];
        let status = unsafe { enumerate(instance.handle(), &mut count, devices.as_mut_ptr()) };
        devices.truncate(count as usize);
        (status, devices)
    }

    fn physical_device_properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        self.instance.as_ref().map_or_else(vk::PhysicalDeviceProperties::default, |instance| unsafe {
            instance.get_physical_device_properties(device)
        })
    }

    fn queue_family_properties(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        self.instance.as_ref().map_or_else(Vec::new, |instance| unsafe {
            instance.get_physical_device_queue_family_properties(device)
        })
    }

    fn create_device(
        &mut self,
        physical_device: vk::PhysicalDevice,
        descriptor: &DeviceDescriptor,
    ) -> Result<(), vk::Result> {
        let instance = self
            .instance
            .as_ref()
            .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)?;

        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = descriptor
            .queues
            .iter()
            .map(|queue| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue.family_index)
                    .queue_priorities(&queue.priorities)
                    .build()
            })
            .collect();

        let extensions = c_strings(&descriptor.enabled_extensions)?;
        let extension_ptrs = c_pointers(&extensions);

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs);

        let device = unsafe { instance.create_device(physical_device, &create_info, None)? };
        self.device = Some(device);
        Ok(())
    }

    fn destroy(&mut self) {
        unsafe {
            if let Some(device) = self.device.take() {
                device.destroy_device(None);
                log::debug!("Destroyed logical device");
            }
            if let Some(instance) = self.instance.take() {
                instance.destroy_instance(None);
                log::debug!("Destroyed Vulkan instance");
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Drop for AshDeviceApi {
    fn drop(&mut self) {
        self.destroy();
    }
}
