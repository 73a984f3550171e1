use std::ffi::c_void;
use std::fmt;
use std::os::raw::c_char;

use ash::vk;
use log::{debug, warn};

use super::{BackendFeatures, FunctionLoader};
use crate::loader_interfaces::FnLoaderFunc;

/// Entry points the Dear ImGui Vulkan backend cannot run without.
const REQUIRED_FUNCTIONS: &[&str] = &[
    "vkAllocateCommandBuffers\0",
    "vkAllocateDescriptorSets\0",
    "vkAllocateMemory\0",
    "vkBindBufferMemory\0",
    "vkBindImageMemory\0",
    "vkCmdBindDescriptorSets\0",
    "vkCmdBindIndexBuffer\0",
    "vkCmdBindPipeline\0",
    "vkCmdBindVertexBuffers\0",
    "vkCmdCopyBufferToImage\0",
    "vkCmdDrawIndexed\0",
    "vkCmdPipelineBarrier\0",
    "vkCmdPushConstants\0",
    "vkCmdSetScissor\0",
    "vkCmdSetViewport\0",
    "vkCreateBuffer\0",
    "vkCreateCommandPool\0",
    "vkCreateDescriptorSetLayout\0",
    "vkCreateFence\0",
    "vkCreateFramebuffer\0",
    "vkCreateGraphicsPipelines\0",
    "vkCreateImage\0",
    "vkCreateImageView\0",
    "vkCreatePipelineLayout\0",
    "vkCreateRenderPass\0",
    "vkCreateSampler\0",
    "vkCreateSemaphore\0",
    "vkCreateShaderModule\0",
    "vkCreateSwapchainKHR\0",
    "vkDestroyBuffer\0",
    "vkDestroyCommandPool\0",
    "vkDestroyDescriptorSetLayout\0",
    "vkDestroyFence\0",
    "vkDestroyFramebuffer\0",
    "vkDestroyImage\0",
    "vkDestroyImageView\0",
    "vkDestroyPipeline\0",
    "vkDestroyPipelineLayout\0",
    "vkDestroyRenderPass\0",
    "vkDestroySampler\0",
    "vkDestroySemaphore\0",
    "vkDestroyShaderModule\0",
    "vkDestroySurfaceKHR\0",
    "vkDestroySwapchainKHR\0",
    "vkDeviceWaitIdle\0",
    "vkEnumeratePhysicalDevices\0",
    "vkFlushMappedMemoryRanges\0",
    "vkFreeCommandBuffers\0",
    "vkFreeDescriptorSets\0",
    "vkFreeMemory\0",
    "vkGetBufferMemoryRequirements\0",
    "vkGetImageMemoryRequirements\0",
    "vkGetPhysicalDeviceProperties\0",
    "vkGetPhysicalDeviceMemoryProperties\0",
    "vkGetPhysicalDeviceQueueFamilyProperties\0",
    "vkGetPhysicalDeviceSurfaceCapabilitiesKHR\0",
    "vkGetPhysicalDeviceSurfaceFormatsKHR\0",
    "vkGetPhysicalDeviceSurfacePresentModesKHR\0",
    "vkGetSwapchainImagesKHR\0",
    "vkMapMemory\0",
    "vkUnmapMemory\0",
    "vkUpdateDescriptorSets\0",
    "vkCmdBeginRenderPass\0",
    "vkCmdEndRenderPass\0",
    "vkQueuePresentKHR\0",
    "vkBeginCommandBuffer\0",
    "vkEndCommandBuffer\0",
    "vkWaitForFences\0",
    "vkCreateDescriptorPool\0",
    "vkDestroyDescriptorPool\0",
    "vkResetFences\0",
    "vkResetCommandPool\0",
    "vkAcquireNextImageKHR\0",
    "vkQueueSubmit\0",
    "vkQueueWaitIdle\0",
];

/// Loaded by the backend but allowed to be null.
const DYNAMIC_RENDERING_FUNCTIONS: &[&str] = &["vkCmdBeginRenderingKHR\0", "vkCmdEndRenderingKHR\0"];

#[derive(Clone, Copy)]
pub struct FunctionSlot {
    name: &'static str,
    pub required: bool,
    pub function: vk::PFN_vkVoidFunction,
}

impl FunctionSlot {
    fn new(name: &'static str, required: bool) -> Self {
        Self {
            name,
            required,
            function: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }

    fn name_ptr(&self) -> *const c_char {
        self.name.as_ptr() as *const c_char
    }
}

impl fmt::Debug for FunctionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSlot")
            .field("name", &self.name())
            .field("required", &self.required)
            .field("function", &self.function.map(|function| function as *const c_void))
            .finish()
    }
}

/// The Vulkan function table of the Dear ImGui backend, kept on the Rust side.
///
/// It requests the same entry points in the same order. Unlike the C++
/// backend it keeps going after a missing entry point, so every gap is
/// reported in one pass.
#[derive(Debug, Clone)]
pub struct VulkanFunctionTable {
    features: BackendFeatures,
    slots: Vec<FunctionSlot>,
}

impl VulkanFunctionTable {
    pub fn new(features: BackendFeatures) -> Self {
        let mut slots = REQUIRED_FUNCTIONS
            .iter()
            .map(|name| FunctionSlot::new(*name, true))
            .collect::<Vec<_>>();

        if features.contains(BackendFeatures::DYNAMIC_RENDERING) {
            slots.extend(
                DYNAMIC_RENDERING_FUNCTIONS
                    .iter()
                    .map(|name| FunctionSlot::new(*name, false)),
            );
        }

        Self { features, slots }
    }

    pub fn features(&self) -> BackendFeatures {
        self.features
    }

    pub fn slots(&self) -> &[FunctionSlot] {
        &self.slots
    }

    pub fn requested_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(FunctionSlot::name)
    }

    /// The resolved pointer for `name`; `None` if it resolved to null or is
    /// not an entry point of this table.
    pub fn get(&self, name: &str) -> vk::PFN_vkVoidFunction {
        self.slots
            .iter()
            .find(|slot| slot.name() == name)
            .and_then(|slot| slot.function)
    }

    /// Required entry points that resolved to null on the last load.
    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.required && slot.function.is_none())
            .map(FunctionSlot::name)
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }
}

impl Default for VulkanFunctionTable {
    fn default() -> Self {
        Self::new(BackendFeatures::default())
    }
}

impl FunctionLoader for VulkanFunctionTable {
    unsafe fn load_functions(&mut self, loader: FnLoaderFunc, user_data: *mut c_void) -> bool {
        debug!("Loading {} Vulkan entry points", self.slots.len());

        for slot in self.slots.iter_mut() {
            slot.function = loader(slot.name_ptr(), user_data);

            if slot.function.is_none() && slot.required {
                warn!("Vulkan entry point `{}` could not be resolved", slot.name());
            }
        }

        let complete = self.is_complete();
        debug!(
            "Vulkan function table {}",
            if complete { "complete" } else { "incomplete" }
        );
        complete
    }
}
