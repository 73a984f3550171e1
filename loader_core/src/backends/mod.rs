mod imgui;
mod table;

use std::ffi::c_void;

use bitflags::bitflags;

use crate::loader_interfaces::FnLoaderFunc;

pub use imgui::{ImGuiVulkan, ImGuiVulkanFns};
pub use table::{FunctionSlot, VulkanFunctionTable};

/// A library routine that fills its internal function table by calling
/// `loader` once per entry point it needs.
pub trait FunctionLoader {
    /// Returns the library's own verdict on whether every entry point it
    /// requires was resolved.
    ///
    /// # Safety
    ///
    /// `user_data` must be valid for `loader` for the whole call.
    unsafe fn load_functions(&mut self, loader: FnLoaderFunc, user_data: *mut c_void) -> bool;
}

bitflags! {
    /// Compile-time options of the GUI backend that change which entry
    /// points it requests.
    pub struct BackendFeatures: u8 {
        const DYNAMIC_RENDERING = 0b00000001;
    }
}

impl Default for BackendFeatures {
    fn default() -> Self {
        BackendFeatures::DYNAMIC_RENDERING
    }
}
