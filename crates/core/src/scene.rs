//! OpenMVS scene files
//!
//! Every densify/mesh/refine/texture stage reads the scene written by the stage
//! before it and writes a new one whose name appends its own suffix.

/// A stage of the OpenMVS chain, identified by the scene file it writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MvsScene {
    Scene,
    Dense,
    Mesh,
    Refine,
    Texture,
}

impl MvsScene {
    pub const CHAIN: [MvsScene; 5] = [
        Self::Scene,
        Self::Dense,
        Self::Mesh,
        Self::Refine,
        Self::Texture,
    ];

    fn token(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Dense => "dense",
            Self::Mesh => "mesh",
            Self::Refine => "refine",
            Self::Texture => "texture",
        }
    }

    /// Scene the given stage reads, `None` for the converted project itself
    pub fn previous(self) -> Option<MvsScene> {
        Self::CHAIN
            .iter()
            .position(|stage| *stage == self)
            .and_then(|i| i.checked_sub(1))
            .map(|i| Self::CHAIN[i])
    }

    /// `scene`, `scene_dense`, `scene_dense_mesh`, ...
    pub fn stem(self) -> String {
        Self::CHAIN
            .iter()
            .filter(|stage| **stage <= self)
            .map(|stage| stage.token())
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn file_name(self) -> String {
        format!("{}.mvs", self.stem())
    }

    pub fn ply_name(self) -> String {
        format!("{}.ply", self.stem())
    }

    /// Files left behind by this stage once the textured mesh exists
    pub fn intermediates(self) -> Vec<String> {
        match self {
            Self::Dense | Self::Mesh | Self::Refine => vec![self.file_name(), self.ply_name()],
            Self::Scene | Self::Texture => vec![self.file_name()],
        }
    }
}
