pub mod backends;
pub mod bridge;
pub mod config;
pub mod loader_interfaces;
pub mod vulkan;

use ash::{prelude::VkResult, vk};

pub use backends::{BackendFeatures, FunctionLoader, ImGuiVulkan, ImGuiVulkanFns, VulkanFunctionTable};
pub use bridge::{load_functions, load_functions_with};
pub use config::LoaderConfig;
pub use vulkan::{load_backend_functions, VulkanInstance, VulkanLoader};

pub const LOADER_NAME: &str = "imgui_vk_loader";

/// Turns a status reported by a foreign library into a `VkResult`.
pub trait ToResult {
    fn result(self) -> VkResult<()>
    where
        Self: Sized,
    {
        ToResult::result2(self, ())
    }

    fn result2<T>(self, ok: T) -> VkResult<T>
    where
        Self: Sized;
}

impl ToResult for bool {
    fn result2<T>(self, ok: T) -> VkResult<T> {
        if self {
            Ok(ok)
        } else {
            Err(vk::Result::ERROR_INITIALIZATION_FAILED)
        }
    }
}
