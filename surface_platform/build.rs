use std::env;

/// Windowing surfaces compiled in for each supported target OS.
const PLATFORMS: &[(&str, &[&str])] = &[
    ("linux", &["wayland", "xcb", "xlib"]),
    ("windows", &["win32"]),
];

const ALL_SURFACES: &[&str] = &["wayland", "xcb", "xlib", "win32"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let check_values = ALL_SURFACES
        .iter()
        .map(|surface| format!("\"{}\"", surface))
        .collect::<Vec<_>>()
        .join(", ");
    println!("cargo:rustc-check-cfg=cfg(surface, values({}))", check_values);

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap();

    let surfaces = match PLATFORMS.iter().find(|(os, _)| *os == target_os) {
        Some((_, surfaces)) => *surfaces,
        None => panic!(
            "Unsupported platform for vulkan bindings: `{}` (supported: {})",
            target_os,
            PLATFORMS
                .iter()
                .map(|(os, _)| *os)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    for surface in surfaces {
        println!("cargo:rustc-cfg=surface=\"{}\"", surface);
    }
}
