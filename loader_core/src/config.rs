use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

pub const LOG_LEVEL_VAR: &str = "IMGUI_VK_LOADER_LOG";
pub const LOG_FILE_VAR: &str = "IMGUI_VK_LOADER_LOG_FILE";
pub const VALIDATION_VAR: &str = "IMGUI_VK_LOADER_VALIDATION";
pub const IMGUI_LIBRARY_VAR: &str = "IMGUI_VK_LOADER_IMGUI_LIB";
pub const SESSION_TYPE_VAR: &str = "XDG_SESSION_TYPE";

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    /// Enables `VK_LAYER_KHRONOS_validation` and a debug messenger.
    pub validation: bool,
    /// Library exporting the ImGui Vulkan backend; the running process when unset.
    pub imgui_library: Option<PathBuf>,
    pub session_type: Option<String>,
    /// Values that could not be parsed, to be logged once a logger is installed.
    pub warnings: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            log_file: None,
            validation: false,
            imgui_library: None,
            session_type: None,
            warnings: Vec::new(),
        }
    }
}

impl LoaderConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        let mut warnings = Vec::new();

        let log_level = match non_empty(LOG_LEVEL_VAR) {
            Some(level) => LevelFilter::from_str(level.trim()).unwrap_or_else(|_| {
                warnings.push(format!("Ignoring unknown {} `{}`", LOG_LEVEL_VAR, level));
                LevelFilter::Info
            }),
            None => LevelFilter::Info,
        };

        Self {
            log_level,
            log_file: non_empty(LOG_FILE_VAR).map(PathBuf::from),
            validation: non_empty(VALIDATION_VAR).map_or(false, |value| is_truthy(&value)),
            imgui_library: non_empty(IMGUI_LIBRARY_VAR).map(PathBuf::from),
            session_type: non_empty(SESSION_TYPE_VAR).map(|value| value.trim().to_lowercase()),
            warnings,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
