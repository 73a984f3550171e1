use std::ffi::CStr;

use ash::vk;

use crate::WindowingSurface;

lazy_static::lazy_static! {
    static ref SURFACE_EXTENSIONS: bimap::BiHashMap<WindowingSurface, &'static CStr> = {
        [
            (WindowingSurface::Wayland, vk::KhrWaylandSurfaceFn::name()),
            (WindowingSurface::Xcb, vk::KhrXcbSurfaceFn::name()),
            (WindowingSurface::Xlib, vk::KhrXlibSurfaceFn::name()),
            (WindowingSurface::Win32, vk::KhrWin32SurfaceFn::name()),
        ]
        .into_iter()
        .collect::<bimap::BiHashMap<_, _>>()
    };
}

impl WindowingSurface {
    /// The instance extension that exposes this surface, e.g. `VK_KHR_xlib_surface`.
    pub fn extension_name(self) -> &'static CStr {
        *SURFACE_EXTENSIONS.get_by_left(&self).unwrap()
    }

    pub fn from_extension_name(name: &CStr) -> Option<Self> {
        SURFACE_EXTENSIONS.get_by_right(name).copied()
    }
}

pub fn surface_extension_name() -> &'static CStr {
    vk::KhrSurfaceFn::name()
}

/// Instance extensions needed to present to `surface`: `VK_KHR_surface`
/// followed by the platform surface extension.
pub fn required_instance_extensions(surface: WindowingSurface) -> [&'static CStr; 2] {
    [surface_extension_name(), surface.extension_name()]
}
