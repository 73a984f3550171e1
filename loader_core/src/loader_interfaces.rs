use std::ffi::c_void;
use std::os::raw::c_char;

use ash::vk;

pub const IMGUI_IMPL_VULKAN_LOAD_FUNCTIONS: &[u8] = b"ImGui_ImplVulkan_LoadFunctions\0";

/// `PFN_vkVoidFunction (*loader_func)(const char* function_name, void* user_data)`
pub type FnLoaderFunc = unsafe extern "C" fn(
    function_name: *const c_char,
    user_data: *mut c_void,
) -> vk::PFN_vkVoidFunction;

/// `bool ImGui_ImplVulkan_LoadFunctions(loader_func, void* user_data)`
pub type FnImGuiImplVulkanLoadFunctions =
    unsafe extern "C" fn(loader_func: FnLoaderFunc, user_data: *mut c_void) -> bool;

/// `void ig_load_vk_functions(PFN_vkGetInstanceProcAddr, VkInstance)`
pub type FnIgLoadVkFunctions =
    unsafe extern "C" fn(get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr, instance: vk::Instance);

pub const IMGUI_IMPL_VULKAN_INIT: &[u8] = b"ImGui_ImplVulkan_Init\0";
pub const IMGUI_IMPL_VULKAN_SHUTDOWN: &[u8] = b"ImGui_ImplVulkan_Shutdown\0";
pub const IMGUI_IMPL_VULKAN_NEW_FRAME: &[u8] = b"ImGui_ImplVulkan_NewFrame\0";
pub const IMGUI_IMPL_VULKAN_RENDER_DRAW_DATA: &[u8] = b"ImGui_ImplVulkan_RenderDrawData\0";
pub const IMGUI_IMPL_VULKAN_CREATE_FONTS_TEXTURE: &[u8] = b"ImGui_ImplVulkan_CreateFontsTexture\0";
pub const IMGUI_IMPL_VULKAN_DESTROY_FONTS_TEXTURE: &[u8] = b"ImGui_ImplVulkan_DestroyFontsTexture\0";
pub const IMGUI_IMPL_VULKAN_SET_MIN_IMAGE_COUNT: &[u8] = b"ImGui_ImplVulkan_SetMinImageCount\0";

/// Opaque `ImDrawData`, owned by the ImGui context.
#[repr(C)]
pub struct ImDrawData {
    _private: [u8; 0],
}

/// `ImGui_ImplVulkan_InitInfo`
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ImGuiVulkanInitInfo {
    pub instance: vk::Instance,
    pub physical_device: vk::PhysicalDevice,
    pub device: vk::Device,
    pub queue_family: u32,
    pub queue: vk::Queue,
    pub descriptor_pool: vk::DescriptorPool,
    /// Ignored with dynamic rendering.
    pub render_pass: vk::RenderPass,
    /// >= 2
    pub min_image_count: u32,
    /// >= `min_image_count`
    pub image_count: u32,
    /// Empty means `TYPE_1`.
    pub msaa_samples: vk::SampleCountFlags,

    pub pipeline_cache: vk::PipelineCache,
    pub subpass: u32,

    /// Needs `VK_KHR_dynamic_rendering` enabled on the device, even on 1.3.
    pub use_dynamic_rendering: bool,
    pub pipeline_rendering_create_info: vk::PipelineRenderingCreateInfo,

    pub allocator: *const vk::AllocationCallbacks,
    pub check_vk_result_fn: Option<unsafe extern "C" fn(err: vk::Result)>,
    pub min_allocation_size: vk::DeviceSize,
}

impl Default for ImGuiVulkanInitInfo {
    fn default() -> Self {
        Self {
            instance: vk::Instance::null(),
            physical_device: vk::PhysicalDevice::null(),
            device: vk::Device::null(),
            queue_family: 0,
            queue: vk::Queue::null(),
            descriptor_pool: vk::DescriptorPool::null(),
            render_pass: vk::RenderPass::null(),
            min_image_count: 2,
            image_count: 2,
            msaa_samples: vk::SampleCountFlags::empty(),
            pipeline_cache: vk::PipelineCache::null(),
            subpass: 0,
            use_dynamic_rendering: false,
            pipeline_rendering_create_info: vk::PipelineRenderingCreateInfo::default(),
            allocator: std::ptr::null(),
            check_vk_result_fn: None,
            min_allocation_size: 0,
        }
    }
}

/// `bool ImGui_ImplVulkan_Init(ImGui_ImplVulkan_InitInfo* info)`
pub type FnImGuiImplVulkanInit = unsafe extern "C" fn(info: *mut ImGuiVulkanInitInfo) -> bool;

/// `void ImGui_ImplVulkan_Shutdown()`
pub type FnImGuiImplVulkanShutdown = unsafe extern "C" fn();

/// `void ImGui_ImplVulkan_NewFrame()`
pub type FnImGuiImplVulkanNewFrame = unsafe extern "C" fn();

/// `void ImGui_ImplVulkan_RenderDrawData(ImDrawData*, VkCommandBuffer, VkPipeline)`
pub type FnImGuiImplVulkanRenderDrawData = unsafe extern "C" fn(
    draw_data: *const ImDrawData,
    command_buffer: vk::CommandBuffer,
    pipeline: vk::Pipeline,
);

/// `bool ImGui_ImplVulkan_CreateFontsTexture()`
pub type FnImGuiImplVulkanCreateFontsTexture = unsafe extern "C" fn() -> bool;

/// `void ImGui_ImplVulkan_DestroyFontsTexture()`
pub type FnImGuiImplVulkanDestroyFontsTexture = unsafe extern "C" fn();

/// `void ImGui_ImplVulkan_SetMinImageCount(uint32_t)`
pub type FnImGuiImplVulkanSetMinImageCount = unsafe extern "C" fn(min_image_count: u32);
