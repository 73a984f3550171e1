use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};

use ash::{prelude::VkResult, vk};
use loader_core::{loader_interfaces::FnIgLoadVkFunctions, FunctionLoader, ImGuiVulkan, LoaderConfig};
use log::{debug, error, info, warn};
use simplelog::*;

static LOGGER_LOADED: AtomicBool = AtomicBool::new(false);

const _: FnIgLoadVkFunctions = ig_load_vk_functions;

fn init_logging(config: &LoaderConfig) {
    if LOGGER_LOADED.swap(true, Ordering::Relaxed) {
        return;
    }

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Trace, Config::default(), file)),
            Err(err) => eprintln!(
                "{}: cannot create log file {}: {}",
                loader_core::LOADER_NAME,
                path.display(),
                err
            ),
        }
    }

    // The host may already have installed its own logger; keep using that one.
    let _ = CombinedLogger::init(loggers);
}

/// Loads the Dear ImGui Vulkan backend's function table through
/// `get_instance_proc_addr` and `instance`.
///
/// Failures are logged; the GUI backend reports them again on its first use.
///
/// # Safety
///
/// `get_instance_proc_addr` must be a valid resolver for the live `instance`.
#[no_mangle]
pub unsafe extern "C" fn ig_load_vk_functions(
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    instance: vk::Instance,
) {
    let config = LoaderConfig::from_env();
    init_logging(&config);
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    match std::panic::catch_unwind(|| load_vk_functions(&config, get_instance_proc_addr, instance)) {
        Ok(Ok(())) => info!("ImGui Vulkan functions loaded"),
        Ok(Err(err)) => error!("Loading ImGui Vulkan functions failed: {}", err),
        Err(_) => error!("Loading ImGui Vulkan functions panicked"),
    }
}

/// # Safety
///
/// See [`ig_load_vk_functions`].
pub unsafe fn load_vk_functions(
    config: &LoaderConfig,
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    instance: vk::Instance,
) -> VkResult<()> {
    let backend = match &config.imgui_library {
        Some(path) => ImGuiVulkan::open(path),
        None => ImGuiVulkan::from_process(),
    };

    let mut backend = backend.map_err(|err| {
        error!("ImGui_ImplVulkan_LoadFunctions not found: {}", err);
        vk::Result::ERROR_INITIALIZATION_FAILED
    })?;

    debug!("ImGui Vulkan backend found");

    load_vk_functions_into(&mut backend, get_instance_proc_addr, instance)
}

/// Runs `backend`'s loader through the bridge. A refused load has its
/// unresolved entry points logged before it fails.
///
/// # Safety
///
/// See [`ig_load_vk_functions`].
pub unsafe fn load_vk_functions_into<L>(
    backend: &mut L,
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    instance: vk::Instance,
) -> VkResult<()>
where
    L: FunctionLoader + ?Sized,
{
    loader_core::load_backend_functions(backend, get_instance_proc_addr, instance)
        .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)
}
