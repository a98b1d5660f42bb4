//! Mock backends for tests
//!
//! Both mocks share their call log with the test through an `Rc<RefCell<..>>`
//! probe, so the log stays readable after the facade owning the mock is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use ash::vk;
use ash::vk::Handle;

use crate::graphics::{DeviceApi, DeviceDescriptor, InstanceDescriptor, VulkanPlatform};
use crate::window::{MonitorSelection, WindowBackend, WindowHandle, WindowHint};

/// Behaviour knobs and recorded calls of a [`MockWindowBackend`]
#[derive(Debug)]
pub(crate) struct WindowLog {
    pub rejected_hint: Option<WindowHint>,
    pub fail_create: Option<String>,
    pub fail_poll: Option<String>,
    pub close_after_polls: Option<usize>,
    pub vulkan: Result<Vec<String>, String>,

    pub hints: Vec<WindowHint>,
    pub windows_created: usize,
    pub last_monitor: Option<MonitorSelection>,
    pub last_shared: bool,
    pub polls: usize,
    pub terminations: usize,
    pub library_initialized: bool,
    pub window_open: bool,
    pub should_close: bool,
    pub size: Option<(u32, u32)>,
}

impl Default for WindowLog {
    fn default() -> Self {
        Self {
            rejected_hint: None,
            fail_create: None,
            fail_poll: None,
            close_after_polls: None,
            vulkan: Ok(vec![
                "VK_KHR_surface".to_string(),
                "VK_KHR_xcb_surface".to_string(),
            ]),
            hints: Vec::new(),
            windows_created: 0,
            last_monitor: None,
            last_shared: false,
            polls: 0,
            terminations: 0,
            library_initialized: true,
            window_open: false,
            should_close: false,
            size: None,
        }
    }
}

pub(crate) type WindowProbe = Rc<RefCell<WindowLog>>;

/// Windowing library stand-in recording every call
pub(crate) struct MockWindowBackend {
    log: WindowProbe,
}

impl MockWindowBackend {
    pub fn new() -> (Self, WindowProbe) {
        let log = Rc::new(RefCell::new(WindowLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl WindowBackend for MockWindowBackend {
    fn set_hint(&mut self, hint: WindowHint) -> Result<(), String> {
        let mut log = self.log.borrow_mut();
        if log.rejected_hint == Some(hint) {
            return Err(format!("Invalid window hint {hint:?}"));
        }
        log.hints.push(hint);
        Ok(())
    }

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        _title: &str,
        monitor: Option<MonitorSelection>,
        share: Option<&dyn WindowBackend>,
    ) -> Result<(), String> {
        let mut log = self.log.borrow_mut();
        if let Some(info) = log.fail_create.clone() {
            return Err(info);
        }
        log.windows_created += 1;
        log.window_open = true;
        log.last_monitor = monitor;
        log.last_shared = share.is_some_and(|share| share.has_window());
        log.size = Some((width, height));
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.log.borrow().window_open
    }

    fn should_close(&self) -> bool {
        let log = self.log.borrow();
        !log.window_open || log.should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.log.borrow_mut().should_close = should_close;
    }

    fn poll_events(&mut self) -> Result<usize, String> {
        let mut log = self.log.borrow_mut();
        if let Some(info) = log.fail_poll.clone() {
            return Err(info);
        }
        log.polls += 1;
        if log.close_after_polls == Some(log.polls) {
            log.should_close = true;
        }
        Ok(1)
    }

    fn size(&self) -> Option<(u32, u32)> {
        let log = self.log.borrow();
        if log.window_open {
            log.size
        } else {
            None
        }
    }

    fn vulkan_instance_extensions(&self) -> Result<Vec<String>, String> {
        self.log.borrow().vulkan.clone()
    }

    fn terminate(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.library_initialized {
            log.terminations += 1;
            log.library_initialized = false;
            log.window_open = false;
        }
    }

    fn is_initialized(&self) -> bool {
        self.log.borrow().library_initialized
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Window handle over a fresh mock backend
pub(crate) fn mock_window() -> (WindowHandle, WindowProbe) {
    let (backend, probe) = MockWindowBackend::new();
    let backend: Box<dyn WindowBackend> = Box::new(backend);
    let window = WindowHandle::with_backend(move || Ok(backend))
        .expect("mock backend always initializes");
    (window, probe)
}

/// Platform probe with a fixed answer
pub(crate) struct MockPlatform(pub Result<Vec<String>, String>);

impl MockPlatform {
    pub fn supported() -> Self {
        Self(Ok(vec!["VK_KHR_surface".to_string()]))
    }
}

impl VulkanPlatform for MockPlatform {
    fn vulkan_instance_extensions(&self) -> Result<Vec<String>, String> {
        self.0.clone()
    }
}

/// A synthetic physical device
#[derive(Debug, Clone)]
pub(crate) struct MockDevice {
    pub name: String,
    pub queue_families: Vec<vk::QueueFlags>,
}

impl MockDevice {
    pub fn new(name: &str, queue_families: &[vk::QueueFlags]) -> Self {
        Self {
            name: name.to_string(),
            queue_families: queue_families.to_vec(),
        }
    }
}

/// Behaviour knobs and recorded calls of a [`MockDeviceApi`]
#[derive(Debug, Default)]
pub(crate) struct DeviceLog {
    pub instance_result: Option<vk::Result>,
    pub enumerate_status: Option<vk::Result>,
    pub device_result: Option<vk::Result>,
    pub devices: Vec<MockDevice>,

    pub instance_descriptor: Option<InstanceDescriptor>,
    pub device_descriptor: Option<DeviceDescriptor>,
    pub device_created_from: Option<vk::PhysicalDevice>,
    pub instance_alive: bool,
    pub device_alive: bool,
    pub instances_destroyed: usize,
    pub devices_destroyed: usize,
    pub destroy_order: Vec<&'static str>,
}

pub(crate) type DeviceProbe = Rc<RefCell<DeviceLog>>;

/// Graphics API stand-in exposing synthetic devices
pub(crate) struct MockDeviceApi {
    log: DeviceProbe,
}

impl MockDeviceApi {
    pub fn new(devices: Vec<MockDevice>) -> (Self, DeviceProbe) {
        let log = Rc::new(RefCell::new(DeviceLog {
            devices,
            ..DeviceLog::default()
        }));
        (Self { log: Rc::clone(&log) }, log)
    }

    fn device_index(device: vk::PhysicalDevice) -> usize {
        (device.as_raw() - 1) as usize
    }
}

/// Properties record whose `device_name` holds `name`
pub(crate) fn device_properties(name: &str) -> vk::PhysicalDeviceProperties {
    let mut properties = vk::PhysicalDeviceProperties::default();
    for (dst, src) in properties.device_name.iter_mut().zip(name.bytes()) {
        *dst = src as std::os::raw::c_char;
    }
    properties
}

impl DeviceApi for MockDeviceApi {
    fn create_instance(&mut self, descriptor: &InstanceDescriptor) -> Result<(), vk::Result> {
        let mut log = self.log.borrow_mut();
        log.instance_descriptor = Some(descriptor.clone());
        if let Some(result) = log.instance_result {
            return Err(result);
        }
        log.instance_alive = true;
        Ok(())
    }

    fn enumerate_physical_devices(&mut self) -> (vk::Result, Vec<vk::PhysicalDevice>) {
        let log = self.log.borrow();
        let handles = (1..=log.devices.len() as u64)
            .map(vk::PhysicalDevice::from_raw)
            .collect();
        (log.enumerate_status.unwrap_or(vk::Result::SUCCESS), handles)
    }

    fn physical_device_properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        let log = self.log.borrow();
        device_properties(&log.devices[Self::device_index(device)].name)
    }

    fn queue_family_properties(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        let log = self.log.borrow();
        log.devices[Self::device_index(device)]
            .queue_families
            .iter()
            .map(|&queue_flags| vk::QueueFamilyProperties {
                queue_flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect()
    }

    fn create_device(
        &mut self,
        physical_device: vk::PhysicalDevice,
        descriptor: &DeviceDescriptor,
    ) -> Result<(), vk::Result> {
        let mut log = self.log.borrow_mut();
        log.device_descriptor = Some(descriptor.clone());
        log.device_created_from = Some(physical_device);
        if let Some(result) = log.device_result {
            return Err(result);
        }
        log.device_alive = true;
        Ok(())
    }

    fn destroy(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.device_alive {
            log.device_alive = false;
            log.devices_destroyed += 1;
            log.destroy_order.push("device");
        }
        if log.instance_alive {
            log.instance_alive = false;
            log.instances_destroyed += 1;
            log.destroy_order.push("instance");
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
