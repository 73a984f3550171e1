use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};

use ash::{extensions::ext::DebugUtils, prelude::VkResult, vk, Entry, Instance};
use log::{debug, error, info, trace, warn, Level};
use surface_platform::{apis::vulkan as surfaces, WindowingSurface};

use crate::backends::{BackendFeatures, FunctionLoader, VulkanFunctionTable};
use crate::{bridge, config::LoaderConfig, LOADER_NAME};

const VALIDATION_LAYER: &[u8] = b"VK_LAYER_KHRONOS_validation\0";

/// The Vulkan loader library, opened at runtime. Nothing in this crate links
/// against `vulkan-1`/`libvulkan` directly.
pub struct VulkanLoader {
    entry: Entry,
}

impl VulkanLoader {
    /// # Safety
    ///
    /// Runs the loader library's initialisation routines; see [`Entry::load`].
    pub unsafe fn load() -> Result<Self, ash::LoadingError> {
        let entry = Entry::load()?;
        debug!("Vulkan loader library opened");
        Ok(Self { entry })
    }

    pub fn from_entry(entry: Entry) -> Self {
        Self { entry }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn get_instance_proc_addr(&self) -> vk::PFN_vkGetInstanceProcAddr {
        self.entry.static_fn().get_instance_proc_addr
    }

    /// Creates an instance that can present to the surface matching the
    /// current session.
    ///
    /// # Safety
    ///
    /// The returned instance must be dropped before any object created from
    /// it is used again.
    pub unsafe fn create_instance(
        &self,
        config: &LoaderConfig,
        application_name: &str,
    ) -> VkResult<VulkanInstance> {
        let surface = WindowingSurface::select(config.session_type.as_deref()).ok_or_else(|| {
            error!(
                "Unsupported window manager {:?} (compiled surfaces: {:?})",
                config.session_type,
                surface_platform::enabled_surfaces()
            );
            vk::Result::ERROR_INITIALIZATION_FAILED
        })?;

        let available_extensions = self.entry.enumerate_instance_extension_properties(None)?;
        let available_extensions = available_extensions
            .iter()
            .map(|extension| CStr::from_ptr(extension.extension_name.as_ptr()))
            .collect::<Vec<_>>();

        let extensions =
            select_instance_extensions(surface, &available_extensions, config.validation)?;
        let extensions_raw = extensions
            .iter()
            .map(|name| name.as_ptr())
            .collect::<Vec<*const c_char>>();

        let validation_layer = CStr::from_bytes_with_nul_unchecked(VALIDATION_LAYER);
        let layers_raw = if config.validation && self.has_layer(validation_layer)? {
            vec![validation_layer.as_ptr()]
        } else {
            if config.validation {
                warn!("{} requested but not installed", validation_layer.to_string_lossy());
            }
            Vec::new()
        };

        let application_name = CString::new(application_name).map_err(|err| {
            error!("Invalid application name: {}", err);
            vk::Result::ERROR_INITIALIZATION_FAILED
        })?;
        let engine_name = CString::new(LOADER_NAME).map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&application_name)
            .engine_name(&engine_name)
            .api_version(vk::make_api_version(0, 1, 3, 0));

        // Also covers messages from vkCreateInstance and vkDestroyInstance.
        let debug_utils = extensions.contains(&DebugUtils::name());
        let mut debug_info = debug_messenger_info().build();

        let instance_info = instance_create_info(
            &app_info,
            &extensions_raw,
            &layers_raw,
            if debug_utils { Some(&mut debug_info) } else { None },
        );

        let instance = self.entry.create_instance(&instance_info, None)?;

        let debug = if debug_utils {
            match create_debug_callback(&self.entry, &instance) {
                Ok(debug) => Some(debug),
                Err(err) => {
                    warn!("Could not create debug messenger: {}", err);
                    None
                }
            }
        } else {
            None
        };

        info!(
            "Vulkan instance created for `{}` with {:?} surface",
            application_name.to_string_lossy(),
            surface
        );

        Ok(VulkanInstance {
            entry: self.entry.clone(),
            instance,
            surface,
            debug,
        })
    }

    /// Fills the GUI backend's function table from `instance` and turns a
    /// failed load into `ERROR_INITIALIZATION_FAILED`.
    ///
    /// # Safety
    ///
    /// `instance` must be a live instance created through this loader.
    pub unsafe fn init_imgui_functions<L>(&self, instance: vk::Instance, backend: &mut L) -> VkResult<()>
    where
        L: FunctionLoader + ?Sized,
    {
        load_backend_functions(backend, self.get_instance_proc_addr(), instance)
            .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)
    }

    unsafe fn has_layer(&self, name: &CStr) -> VkResult<bool> {
        Ok(self
            .entry
            .enumerate_instance_layer_properties()?
            .iter()
            .any(|layer| CStr::from_ptr(layer.layer_name.as_ptr()) == name))
    }
}

/// Runs `backend`'s loading routine through the bridge.
///
/// The backend only reports a bare `false`, so on failure the same resolver
/// and instance are run through a [`VulkanFunctionTable`] and the required
/// entry points that came back null are logged and returned.
///
/// # Safety
///
/// See [`bridge::load_functions`].
pub unsafe fn load_backend_functions<L>(
    backend: &mut L,
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    instance: vk::Instance,
) -> Result<(), Vec<&'static str>>
where
    L: FunctionLoader + ?Sized,
{
    if bridge::load_functions(backend, get_instance_proc_addr, instance) {
        return Ok(());
    }

    let mut table = VulkanFunctionTable::new(BackendFeatures::default());
    bridge::load_functions(&mut table, get_instance_proc_addr, instance);
    let missing = table.missing().collect::<Vec<_>>();

    if missing.is_empty() {
        error!("GUI backend could not load its Vulkan functions, though every required entry point resolves");
    } else {
        error!(
            "GUI backend could not load its Vulkan functions, unresolved: {}",
            missing.join(", ")
        );
    }

    Err(missing)
}

/// Instance extensions to enable for `surface`: the surface pair is required,
/// `VK_EXT_debug_utils` is added when validation is on and it is available.
pub fn select_instance_extensions(
    surface: WindowingSurface,
    available: &[&CStr],
    validation: bool,
) -> VkResult<Vec<&'static CStr>> {
    let mut extensions = Vec::with_capacity(3);

    for required in surfaces::required_instance_extensions(surface) {
        if !available.contains(&required) {
            error!("Required extension {} not found", required.to_string_lossy());
            return Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT);
        }
        extensions.push(required);
    }

    if validation {
        if available.contains(&DebugUtils::name()) {
            extensions.push(DebugUtils::name());
        } else {
            warn!("{} not available", DebugUtils::name().to_string_lossy());
        }
    }

    Ok(extensions)
}

pub struct VulkanInstance {
    pub instance: Instance,
    pub surface: WindowingSurface,
    debug: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
    // Keeps the loader library open until the instance is gone.
    entry: Entry,
}

impl VulkanInstance {
    pub fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some((debug_utils, messenger)) = self.debug.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
        debug!("Vulkan instance destroyed");
    }
}

fn severity_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> Level {
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        Level::Error
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        Level::Warn
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        Level::Info
    } else {
        Level::Trace
    }
}

unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }
    let callback_data = *p_callback_data;

    let message_id_name = if callback_data.p_message_id_name.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr(callback_data.p_message_id_name).to_string_lossy()
    };

    let message = if callback_data.p_message.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr(callback_data.p_message).to_string_lossy()
    };

    log::log!(
        target: "vulkan",
        severity_level(message_severity),
        "{:?} [{} ({})] : {}",
        message_type,
        message_id_name,
        callback_data.message_id_number,
        message,
    );

    vk::FALSE
}

fn debug_messenger_info<'a>() -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'a> {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(vulkan_debug_callback))
}

/// `debug_info`, when given, is chained into `p_next`.
fn instance_create_info<'a>(
    app_info: &'a vk::ApplicationInfo,
    extensions: &'a [*const c_char],
    layers: &'a [*const c_char],
    debug_info: Option<&'a mut vk::DebugUtilsMessengerCreateInfoEXT>,
) -> vk::InstanceCreateInfoBuilder<'a> {
    let instance_info = vk::InstanceCreateInfo::builder()
        .application_info(app_info)
        .enabled_extension_names(extensions)
        .enabled_layer_names(layers);

    match debug_info {
        Some(debug_info) => instance_info.push_next(debug_info),
        None => instance_info,
    }
}

unsafe fn create_debug_callback(
    entry: &Entry,
    instance: &Instance,
) -> VkResult<(DebugUtils, vk::DebugUtilsMessengerEXT)> {
    let debug_info = debug_messenger_info();

    let debug_utils_loader = DebugUtils::new(entry, instance);
    let messenger = debug_utils_loader.create_debug_utils_messenger(&debug_info, None)?;
    trace!("Debug messenger {:?} created", messenger);
    Ok((debug_utils_loader, messenger))
}
