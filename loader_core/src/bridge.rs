//! Partial application of `vkGetInstanceProcAddr` for loaders that only pass
//! a function name and an opaque user-data pointer.

use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use ash::vk;
use log::{debug, error, trace};

use crate::backends::FunctionLoader;

/// Runs `backend`'s loading routine, resolving each name it asks for with
/// `get_instance_proc_addr(instance, name)`.
///
/// Whatever the resolver returns is handed back untouched, null included.
/// The return value is the backend's own status.
///
/// # Safety
///
/// `get_instance_proc_addr` must be callable with `instance` for the whole
/// call, and `backend` must not keep or call the loader it is given after
/// returning.
pub unsafe fn load_functions<L>(
    backend: &mut L,
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    instance: vk::Instance,
) -> bool
where
    L: FunctionLoader + ?Sized,
{
    debug!("Loading backend functions for instance {:?}", instance);

    let loaded = load_functions_with(backend, |name| {
        get_instance_proc_addr(instance, name.as_ptr())
    });

    debug!("Backend reported load status `{}`", loaded);
    loaded
}

/// Runs `backend`'s loading routine with `resolve` as the per-name loader.
///
/// `resolve` lives on this stack frame and is only reachable through the
/// user-data pointer for the duration of the call.
///
/// # Safety
///
/// `backend` must not keep or call the loader it is given after returning.
pub unsafe fn load_functions_with<L, F>(backend: &mut L, mut resolve: F) -> bool
where
    L: FunctionLoader + ?Sized,
    F: FnMut(&CStr) -> vk::PFN_vkVoidFunction,
{
    let user_data = &mut resolve as *mut F as *mut c_void;
    backend.load_functions(loader_trampoline::<F>, user_data)
}

unsafe extern "C" fn loader_trampoline<F>(
    function_name: *const c_char,
    user_data: *mut c_void,
) -> vk::PFN_vkVoidFunction
where
    F: FnMut(&CStr) -> vk::PFN_vkVoidFunction,
{
    let resolve = &mut *(user_data as *mut F);
    let name = CStr::from_ptr(function_name);

    match catch_unwind(AssertUnwindSafe(|| resolve(name))) {
        Ok(function) => {
            trace!(
                "{} -> {:?}",
                name.to_string_lossy(),
                function.map(|f| f as *const c_void)
            );
            function
        }
        Err(_) => {
            error!("Resolver panicked on `{}`", name.to_string_lossy());
            None
        }
    }
}
