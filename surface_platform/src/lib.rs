pub mod apis;

/// Window-system integration surfaces a Vulkan instance can present to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowingSurface {
    Wayland,
    Xcb,
    Xlib,
    Win32,
}

/// Every surface this build was compiled with, in order of preference.
pub fn enabled_surfaces() -> &'static [WindowingSurface] {
    &[
        #[cfg(surface = "wayland")]
        WindowingSurface::Wayland,
        #[cfg(surface = "xlib")]
        WindowingSurface::Xlib,
        #[cfg(surface = "xcb")]
        WindowingSurface::Xcb,
        #[cfg(surface = "win32")]
        WindowingSurface::Win32,
    ]
}

impl WindowingSurface {
    pub fn is_enabled(self) -> bool {
        enabled_surfaces().contains(&self)
    }

    /// Picks the surface for the running desktop session.
    ///
    /// `session_type` is the value of `XDG_SESSION_TYPE` on Linux and is
    /// ignored on Windows. Returns `None` when the session is not one this
    /// build can present to.
    pub fn select(session_type: Option<&str>) -> Option<Self> {
        let surface = if cfg!(surface = "win32") {
            WindowingSurface::Win32
        } else {
            match session_type? {
                "x11" => WindowingSurface::Xlib,
                "wayland" => WindowingSurface::Wayland,
                _ => return None,
            }
        };

        surface.is_enabled().then(|| surface)
    }
}
