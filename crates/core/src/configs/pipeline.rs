use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::configs::toolchain::ToolchainConfig;
use crate::types::PipelineError;

/// Image describer configuration passed to feature computation (`-p`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriberPreset {
    Normal,
    High,
    Ultra,
}

impl DescriberPreset {
    pub const ALL: [DescriberPreset; 3] = [Self::Normal, Self::High, Self::Ultra];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Ultra => "ULTRA",
        }
    }
}

impl fmt::Display for DescriberPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriberPreset {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == normalized)
            .ok_or_else(|| {
                PipelineError::Config(format!(
                    "Unknown describer preset '{}' (expected NORMAL, HIGH or ULTRA)",
                    s
                ))
            })
    }
}

/// Geometric model used to filter putative matches (`-g`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometricModel {
    /// Fundamental matrix filtering, the matcher's own default
    #[default]
    Fundamental,
    /// Essential matrix filtering
    Essential,
    /// Homography matrix filtering
    Homography,
}

impl GeometricModel {
    pub const ALL: [GeometricModel; 3] = [Self::Fundamental, Self::Essential, Self::Homography];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fundamental => "f",
            Self::Essential => "e",
            Self::Homography => "h",
        }
    }

    /// Name of the match file the matcher writes for this model
    pub fn matches_file_name(self) -> String {
        format!("matches.{}.bin", self.as_str())
    }
}

impl fmt::Display for GeometricModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometricModel {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| {
                PipelineError::Config(format!(
                    "Unknown geometric model '{}' (expected f, e or h)",
                    s
                ))
            })
    }
}

/// Everything the planner needs to lay out a run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub focal_length: Option<f64>,
    pub describer_preset: Option<DescriberPreset>,
    pub geometric_model: Option<GeometricModel>,
    pub toolchain: ToolchainConfig,
}

impl PipelineConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            focal_length: None,
            describer_preset: None,
            geometric_model: None,
            toolchain: ToolchainConfig::default(),
        }
    }

    pub fn with_focal_length(mut self, focal_length: Option<f64>) -> Self {
        self.focal_length = focal_length;
        self
    }

    pub fn with_describer_preset(mut self, preset: Option<DescriberPreset>) -> Self {
        self.describer_preset = preset;
        self
    }

    pub fn with_geometric_model(mut self, model: Option<GeometricModel>) -> Self {
        self.geometric_model = model;
        self
    }

    pub fn with_toolchain(mut self, toolchain: ToolchainConfig) -> Self {
        self.toolchain = toolchain;
        self
    }
}
