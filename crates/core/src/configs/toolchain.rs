use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{PipelineError, PipelineResult};

pub const DEFAULT_OPENMVG_BIN: &str = "/opt/openmvg/bin";
pub const DEFAULT_OPENMVS_BIN: &str = "/opt/openmvs/bin/OpenMVS";
pub const DEFAULT_CAMERA_SENSORS_DB: &str =
    "/opt/openmvg/share/openMVG/sensor_width_camera_database.txt";

/// Where the external photogrammetry tools are installed.
///
/// Every key is optional in the YAML file; missing keys keep the default
/// install locations.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ToolchainConfig {
    /// Directory holding the `openMVG_main_*` executables
    pub openmvg_bin: PathBuf,
    /// Directory holding the OpenMVS executables
    pub openmvs_bin: PathBuf,
    /// Camera sensor width database passed to image listing
    pub camera_sensors_db: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            openmvg_bin: PathBuf::from(DEFAULT_OPENMVG_BIN),
            openmvs_bin: PathBuf::from(DEFAULT_OPENMVS_BIN),
            camera_sensors_db: PathBuf::from(DEFAULT_CAMERA_SENSORS_DB),
        }
    }
}

/// The tool suite a program belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    OpenMvg,
    OpenMvs,
}

impl ToolchainConfig {
    pub fn openmvg(&self, tool: &str) -> PathBuf {
        self.openmvg_bin.join(tool)
    }

    pub fn openmvs(&self, tool: &str) -> PathBuf {
        self.openmvs_bin.join(tool)
    }
}

pub fn parse_toolchain_config(yaml_str: &str) -> PipelineResult<ToolchainConfig> {
    // An empty document is not a mapping, so serde_yaml would reject it
    if yaml_str.trim().is_empty() {
        return Ok(ToolchainConfig::default());
    }
    let config: ToolchainConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

pub fn load_toolchain_config(path: &Path) -> PipelineResult<ToolchainConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!(
            "Failed to read toolchain config {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_toolchain_config(&content).map_err(|e| {
        PipelineError::Config(format!(
            "Failed to parse toolchain config {}: {}",
            path.display(),
            e
        ))
    })
}
