use std::ffi::{c_void, OsStr};

use ash::{prelude::VkResult, vk};
use libloading::Library;
use log::{debug, error};

use super::FunctionLoader;
use crate::loader_interfaces::*;
use crate::ToResult;

/// The Dear ImGui Vulkan backend entry points.
#[derive(Clone, Copy)]
pub struct ImGuiVulkanFns {
    pub load_functions: FnImGuiImplVulkanLoadFunctions,
    pub init: FnImGuiImplVulkanInit,
    pub shutdown: FnImGuiImplVulkanShutdown,
    pub new_frame: FnImGuiImplVulkanNewFrame,
    pub render_draw_data: FnImGuiImplVulkanRenderDrawData,
    pub create_fonts_texture: FnImGuiImplVulkanCreateFontsTexture,
    pub destroy_fonts_texture: FnImGuiImplVulkanDestroyFontsTexture,
    pub set_min_image_count: FnImGuiImplVulkanSetMinImageCount,
}

impl ImGuiVulkanFns {
    unsafe fn load(library: &Library) -> Result<Self, libloading::Error> {
        Ok(Self {
            load_functions: *library
                .get::<FnImGuiImplVulkanLoadFunctions>(IMGUI_IMPL_VULKAN_LOAD_FUNCTIONS)?,
            init: *library.get::<FnImGuiImplVulkanInit>(IMGUI_IMPL_VULKAN_INIT)?,
            shutdown: *library.get::<FnImGuiImplVulkanShutdown>(IMGUI_IMPL_VULKAN_SHUTDOWN)?,
            new_frame: *library.get::<FnImGuiImplVulkanNewFrame>(IMGUI_IMPL_VULKAN_NEW_FRAME)?,
            render_draw_data: *library
                .get::<FnImGuiImplVulkanRenderDrawData>(IMGUI_IMPL_VULKAN_RENDER_DRAW_DATA)?,
            create_fonts_texture: *library
                .get::<FnImGuiImplVulkanCreateFontsTexture>(IMGUI_IMPL_VULKAN_CREATE_FONTS_TEXTURE)?,
            destroy_fonts_texture: *library
                .get::<FnImGuiImplVulkanDestroyFontsTexture>(IMGUI_IMPL_VULKAN_DESTROY_FONTS_TEXTURE)?,
            set_min_image_count: *library
                .get::<FnImGuiImplVulkanSetMinImageCount>(IMGUI_IMPL_VULKAN_SET_MIN_IMAGE_COUNT)?,
        })
    }
}

/// The ImGui Vulkan backend resolved at runtime, so it does not have to be
/// link-time bound to this crate.
pub struct ImGuiVulkan {
    fns: ImGuiVulkanFns,
    _library: Option<Library>,
}

impl ImGuiVulkan {
    /// Finds the backend among the symbols already loaded into this process.
    ///
    /// # Safety
    ///
    /// The exported `ImGui_ImplVulkan_*` symbols must have the Dear ImGui
    /// signatures.
    pub unsafe fn from_process() -> Result<Self, libloading::Error> {
        #[cfg(unix)]
        let library: Library = libloading::os::unix::Library::this().into();
        #[cfg(windows)]
        let library: Library = libloading::os::windows::Library::this()?.into();

        Self::from_library(library)
    }

    /// Loads the shared library at `path` and finds the backend in it.
    ///
    /// # Safety
    ///
    /// Runs the library's initialisation routines; see [`Library::new`].
    pub unsafe fn open<P: AsRef<OsStr>>(path: P) -> Result<Self, libloading::Error> {
        let path = path.as_ref();
        debug!("Opening ImGui backend library {:?}", path);
        Self::from_library(Library::new(path)?)
    }

    /// Wraps entry points the host already has, e.g. from a statically
    /// linked backend that exports nothing.
    ///
    /// # Safety
    ///
    /// Every pointer in `fns` must stay callable for the lifetime of the
    /// returned value.
    pub unsafe fn from_fns(fns: ImGuiVulkanFns) -> Self {
        Self {
            fns,
            _library: None,
        }
    }

    unsafe fn from_library(library: Library) -> Result<Self, libloading::Error> {
        let fns = ImGuiVulkanFns::load(&library)?;

        Ok(Self {
            fns,
            _library: Some(library),
        })
    }

    pub fn fns(&self) -> &ImGuiVulkanFns {
        &self.fns
    }

    /// # Safety
    ///
    /// An ImGui context must be current, and the handles in `info` must be
    /// live. The function table must have been loaded first.
    pub unsafe fn init(&self, info: &mut ImGuiVulkanInitInfo) -> VkResult<()> {
        (self.fns.init)(info).result().map_err(|err| {
            error!("ImGui_ImplVulkan_Init failed");
            err
        })
    }

    /// # Safety
    ///
    /// Only after a successful [`init`](Self::init).
    pub unsafe fn shutdown(&self) {
        (self.fns.shutdown)()
    }

    /// # Safety
    ///
    /// Only after a successful [`init`](Self::init).
    pub unsafe fn new_frame(&self) {
        (self.fns.new_frame)()
    }

    /// Records `draw_data` into `command_buffer`. A null `pipeline` uses the
    /// backend's own.
    ///
    /// # Safety
    ///
    /// `draw_data` must come from the current ImGui context and
    /// `command_buffer` must be recording inside a compatible render pass.
    pub unsafe fn render_draw_data(
        &self,
        draw_data: *const ImDrawData,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    ) {
        (self.fns.render_draw_data)(draw_data, command_buffer, pipeline)
    }

    /// # Safety
    ///
    /// Only after a successful [`init`](Self::init).
    pub unsafe fn create_fonts_texture(&self) -> VkResult<()> {
        (self.fns.create_fonts_texture)().result()
    }

    /// # Safety
    ///
    /// The device must be idle with respect to the fonts texture.
    pub unsafe fn destroy_fonts_texture(&self) {
        (self.fns.destroy_fonts_texture)()
    }

    /// Overrides `min_image_count` after the swapchain is recreated.
    ///
    /// # Safety
    ///
    /// Only after a successful [`init`](Self::init).
    pub unsafe fn set_min_image_count(&self, min_image_count: u32) {
        (self.fns.set_min_image_count)(min_image_count)
    }
}

impl FunctionLoader for ImGuiVulkan {
    unsafe fn load_functions(&mut self, loader: FnLoaderFunc, user_data: *mut c_void) -> bool {
        (self.fns.load_functions)(loader, user_data)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::ffi::CStr;
    use std::os::raw::c_char;

    use ash::vk::Handle;

    use super::*;
    use crate::bridge::load_functions;

    const BACKEND_NAMES: [&str; 3] = [
        "vkCreateDevice\0",
        "vkDestroyDevice\0",
        "vkCmdBeginRenderingKHR\0",
    ];

    thread_local! {
        static RESOLVED: RefCell<Vec<(String, Option<usize>)>> = RefCell::new(Vec::new());
        static RESOLVER_CALLS: RefCell<Vec<(u64, String)>> = RefCell::new(Vec::new());
        static BACKEND_CALLS: RefCell<Vec<String>> = RefCell::new(Vec::new());
    }

    fn record_backend_call(call: String) {
        BACKEND_CALLS.with(|calls| calls.borrow_mut().push(call));
    }

    fn take_backend_calls() -> Vec<String> {
        BACKEND_CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
    }

    unsafe extern "system" fn recording_resolver(
        instance: vk::Instance,
        name: *const c_char,
    ) -> vk::PFN_vkVoidFunction {
        let name = CStr::from_ptr(name).to_string_lossy().into_owned();
        let address = match name.as_str() {
            "vkCreateDevice" => 0x1000,
            "vkDestroyDevice" => 0x2000,
            _ => 0,
        };
        RESOLVER_CALLS.with(|calls| calls.borrow_mut().push((instance.as_raw(), name)));
        std::mem::transmute::<usize, vk::PFN_vkVoidFunction>(address)
    }

    /// Asks for each backend name, the way `ImGui_ImplVulkan_LoadFunctions`
    /// does, and succeeds when the two device functions resolved.
    unsafe extern "C" fn backend_load_functions(loader: FnLoaderFunc, user_data: *mut c_void) -> bool {
        let mut complete = true;
        for name in BACKEND_NAMES {
            let function = loader(name.as_ptr() as *const c_char, user_data);
            if !name.contains("Rendering") {
                complete &= function.is_some();
            }
            RESOLVED.with(|resolved| {
                resolved.borrow_mut().push((
                    name.trim_end_matches('\0').to_owned(),
                    function.map(|f| f as usize),
                ))
            });
        }
        complete
    }

    unsafe extern "C" fn backend_init(info: *mut ImGuiVulkanInitInfo) -> bool {
        let info = &*info;
        record_backend_call(format!("init {}/{}", info.min_image_count, info.image_count));
        info.min_image_count >= 2 && info.image_count >= info.min_image_count
    }

    unsafe extern "C" fn backend_shutdown() {
        record_backend_call("shutdown".to_owned());
    }

    unsafe extern "C" fn backend_new_frame() {
        record_backend_call("new_frame".to_owned());
    }

    unsafe extern "C" fn backend_render_draw_data(
        draw_data: *const ImDrawData,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    ) {
        record_backend_call(format!(
            "render {} {:#x} {:#x}",
            draw_data.is_null(),
            command_buffer.as_raw(),
            pipeline.as_raw()
        ));
    }

    unsafe extern "C" fn backend_create_fonts_texture() -> bool {
        record_backend_call("create_fonts_texture".to_owned());
        false
    }

    unsafe extern "C" fn backend_destroy_fonts_texture() {
        record_backend_call("destroy_fonts_texture".to_owned());
    }

    unsafe extern "C" fn backend_set_min_image_count(min_image_count: u32) {
        record_backend_call(format!("set_min_image_count {}", min_image_count));
    }

    fn backend() -> ImGuiVulkan {
        unsafe {
            ImGuiVulkan::from_fns(ImGuiVulkanFns {
                load_functions: backend_load_functions,
                init: backend_init,
                shutdown: backend_shutdown,
                new_frame: backend_new_frame,
                render_draw_data: backend_render_draw_data,
                create_fonts_texture: backend_create_fonts_texture,
                destroy_fonts_texture: backend_destroy_fonts_texture,
                set_min_image_count: backend_set_min_image_count,
            })
        }
    }

    #[test]
    fn missing_library_is_an_error() {
        let result = unsafe { ImGuiVulkan::open("libimgui_vk_loader_does_not_exist.so") };
        assert!(result.is_err());
    }

    #[test]
    fn test_binary_does_not_export_the_backend() {
        let result = unsafe { ImGuiVulkan::from_process() };
        assert!(result.is_err());
    }

    #[test]
    fn backend_loader_resolves_through_the_bridge() {
        RESOLVED.with(|resolved| resolved.borrow_mut().clear());
        RESOLVER_CALLS.with(|calls| calls.borrow_mut().clear());
        let mut backend = backend();

        let loaded =
            unsafe { load_functions(&mut backend, recording_resolver, vk::Instance::from_raw(0x77)) };

        assert!(loaded);
        let resolved = RESOLVED.with(|resolved| resolved.borrow().clone());
        assert_eq!(
            resolved,
            vec![
                ("vkCreateDevice".to_owned(), Some(0x1000)),
                ("vkDestroyDevice".to_owned(), Some(0x2000)),
                ("vkCmdBeginRenderingKHR".to_owned(), None),
            ]
        );
        let calls = RESOLVER_CALLS.with(|calls| calls.borrow().clone());
        assert_eq!(calls.len(), BACKEND_NAMES.len());
        assert!(calls.iter().all(|(instance, _)| *instance == 0x77));
    }

    #[test]
    fn init_status_becomes_a_result() {
        take_backend_calls();
        let backend = backend();

        let mut info = ImGuiVulkanInitInfo::default();
        assert_eq!(unsafe { backend.init(&mut info) }, Ok(()));

        info.image_count = 1;
        assert_eq!(
            unsafe { backend.init(&mut info) },
            Err(vk::Result::ERROR_INITIALIZATION_FAILED)
        );
        assert_eq!(take_backend_calls(), vec!["init 2/2", "init 2/1"]);
    }

    #[test]
    fn frame_calls_reach_the_backend() {
        take_backend_calls();
        let backend = backend();

        unsafe {
            backend.new_frame();
            backend.render_draw_data(
                std::ptr::null(),
                vk::CommandBuffer::from_raw(0xC0),
                vk::Pipeline::null(),
            );
            backend.set_min_image_count(3);
            assert_eq!(
                backend.create_fonts_texture(),
                Err(vk::Result::ERROR_INITIALIZATION_FAILED)
            );
            backend.destroy_fonts_texture();
            backend.shutdown();
        }

        assert_eq!(
            take_backend_calls(),
            vec![
                "new_frame",
                "render true 0xc0 0x0",
                "set_min_image_count 3",
                "create_fonts_texture",
                "destroy_fonts_texture",
                "shutdown",
            ]
        );
    }

    #[test]
    fn init_info_starts_with_null_handles() {
        let info = ImGuiVulkanInitInfo::default();
        assert_eq!(info.device, vk::Device::null());
        assert!(info.allocator.is_null());
        assert!(info.check_vk_result_fn.is_none());
        assert_eq!(
            info.pipeline_rendering_create_info.s_type,
            vk::StructureType::PIPELINE_RENDERING_CREATE_INFO
        );
    }
}
