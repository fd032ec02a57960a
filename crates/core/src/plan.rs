//! Pipeline planning
//!
//! Turns a [`PipelineConfig`] into the fixed, ordered list of [`Step`]s that
//! takes a folder of images to a textured mesh. Planning is pure: it never
//! touches the filesystem, and the same configuration always yields the same
//! plan.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use petgraph::Graph;

use crate::configs::pipeline::PipelineConfig;
use crate::configs::toolchain::Suite;
use crate::execution::dependencies::{dependency_graph, verify_chain};
use crate::scene::MvsScene;
use crate::step::Step;
use crate::types::PipelineResult;

pub const MATCHES_DIR: &str = "matches";
pub const RECONSTRUCTION_DIR: &str = "reconstruction_global";
pub const MVS_DIR: &str = "omvs";

/// Patterns pruned from `omvs` besides the intermediate scenes
const CLEANUP_PATTERNS: &[&str] = &["*.logs", "*.dmap"];

/// Directories derived from the output path
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub output: PathBuf,
    pub matches: PathBuf,
    pub reconstruction: PathBuf,
    pub mvs: PathBuf,
}

impl OutputLayout {
    pub fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            matches: output.join(MATCHES_DIR),
            reconstruction: output.join(RECONSTRUCTION_DIR),
            mvs: output.join(MVS_DIR),
        }
    }

    /// OpenMVS tools run inside `omvs` wherever they are installed,
    /// everything else in the output root
    pub fn working_dir_for(&self, suite: Suite) -> &Path {
        match suite {
            Suite::OpenMvs => &self.mvs,
            Suite::OpenMvg => &self.output,
        }
    }
}

/// An ordered pipeline ready to run
#[derive(Debug, Clone)]
pub struct Plan {
    pub layout: OutputLayout,
    pub steps: Vec<Step>,
    /// Artifacts the pipeline expects to exist before it starts
    pub external_inputs: Vec<PathBuf>,
}

impl Plan {
    /// Check that every step only reads what an earlier step wrote
    pub fn verify(&self) -> PipelineResult<()> {
        verify_chain(&self.steps, &self.external_inputs)
    }

    pub fn dependency_graph(&self) -> Graph<String, PathBuf> {
        dependency_graph(&self.steps)
    }

    #[cfg(test)]
    pub(crate) fn titles(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.title.as_str()).collect()
    }
}

pub fn listing_options(config: &PipelineConfig) -> Vec<String> {
    let mut options = vec!["-c".to_string(), "2".to_string()];
    if let Some(focal_length) = config.focal_length {
        options.push("-f".to_string());
        options.push(focal_length.to_string());
    }
    options
}

pub fn feature_options(config: &PipelineConfig) -> Vec<String> {
    let mut options = vec!["-f".to_string(), "1".to_string()];
    if let Some(preset) = config.describer_preset {
        options.push("-p".to_string());
        options.push(preset.to_string());
    }
    options
}

pub fn match_options(config: &PipelineConfig) -> Vec<String> {
    let mut options = vec!["-f".to_string(), "1".to_string()];
    if let Some(model) = config.geometric_model {
        options.push("-g".to_string());
        options.push(model.to_string());
    }
    options
}

fn args(tokens: &[&dyn AsRef<OsStr>]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| token.as_ref().to_string_lossy().into_owned())
        .collect()
}

/// Build the full pipeline for a configuration
pub fn plan_pipeline(config: &PipelineConfig) -> Plan {
    let layout = OutputLayout::new(&config.output_dir);
    let toolchain = &config.toolchain;

    let sfm_data_json = layout.matches.join("sfm_data.json");
    let describer = layout.matches.join("image_describer.json");
    let matches_file = layout
        .matches
        .join(config.geometric_model.unwrap_or_default().matches_file_name());
    let sfm_data_bin = layout.reconstruction.join("sfm_data.bin");

    let mut steps = Vec::with_capacity(13);

    let program = toolchain.openmvg("openMVG_main_SfMInit_ImageListing");
    let mut listing = args(&[
        &"-i",
        &config.input_dir,
        &"-o",
        &layout.matches,
        &"-d",
        &toolchain.camera_sensors_db,
    ]);
    listing.extend(listing_options(config));
    steps.push(
        Step::exec("Intrinsics analysis", program.clone(), listing, layout.working_dir_for(Suite::OpenMvg))
            .reads(&config.input_dir)
            .reads(&toolchain.camera_sensors_db)
            .writes(&sfm_data_json),
    );

    let program = toolchain.openmvg("openMVG_main_ComputeFeatures");
    let mut features = args(&[&"-i", &sfm_data_json, &"-o", &layout.matches, &"-m", &"SIFT"]);
    features.extend(feature_options(config));
    steps.push(
        Step::exec("Compute features", program.clone(), features, layout.working_dir_for(Suite::OpenMvg))
            .reads(&sfm_data_json)
            .writes(&describer),
    );

    let program = toolchain.openmvg("openMVG_main_ComputeMatches");
    let mut matching = args(&[&"-i", &sfm_data_json, &"-o", &layout.matches]);
    matching.extend(match_options(config));
    steps.push(
        Step::exec("Compute matches", program.clone(), matching, layout.working_dir_for(Suite::OpenMvg))
            .reads(&sfm_data_json)
            .reads(&describer)
            .writes(&matches_file),
    );

    let program = toolchain.openmvg("openMVG_main_GlobalSfM");
    let global = args(&[
        &"-i",
        &sfm_data_json,
        &"-m",
        &layout.matches,
        &"-o",
        &layout.reconstruction,
    ]);
    steps.push(
        Step::exec("Do Global reconstruction", program.clone(), global, layout.working_dir_for(Suite::OpenMvg))
            .reads(&sfm_data_json)
            .reads(&matches_file)
            .writes(&sfm_data_bin),
    );

    let program = toolchain.openmvg("openMVG_main_openMVG2openMVS");
    let scene = layout.mvs.join(MvsScene::Scene.file_name());
    let convert = args(&[&"-i", &sfm_data_bin, &"-o", &scene, &"-d", &layout.mvs]);
    steps.push(
        Step::exec(
            "Convert OpenMVG project to OpenMVS",
            program.clone(),
            convert,
            layout.working_dir_for(Suite::OpenMvg),
        )
        .reads(&sfm_data_bin)
        .writes(&scene),
    );

    for (title, tool, stage) in [
        ("Densify point cloud", "DensifyPointCloud", MvsScene::Dense),
        ("Reconstruct mesh", "ReconstructMesh", MvsScene::Mesh),
        ("Refine mesh", "RefineMesh", MvsScene::Refine),
        ("Texture mesh", "TextureMesh", MvsScene::Texture),
    ] {
        steps.push(mvs_step(title, &toolchain.openmvs(tool), stage, &layout));
    }

    steps.push(Step::remove(
        "Remove matches",
        vec![MATCHES_DIR.to_string()],
        &layout.output,
    ));
    steps.push(Step::remove(
        "Remove reconstruction",
        vec![RECONSTRUCTION_DIR.to_string()],
        &layout.output,
    ));

    // The directory change is carried by the working directory of the cleanup
    steps.push(Step::enter_directory("Change directory", &layout.mvs));

    let mut targets: Vec<String> = CLEANUP_PATTERNS.iter().map(|p| p.to_string()).collect();
    targets.extend(MvsScene::CHAIN.iter().flat_map(|stage| stage.intermediates()));
    steps.push(Step::remove("Cleanup mvs", targets, &layout.mvs));

    let external_inputs = vec![
        config.input_dir.clone(),
        toolchain.camera_sensors_db.clone(),
    ];

    Plan {
        layout,
        steps,
        external_inputs,
    }
}

/// A stage of the OpenMVS chain: reads the previous scene, writes its own
fn mvs_step(title: &str, program: &Path, stage: MvsScene, layout: &OutputLayout) -> Step {
    let input = stage.previous().unwrap_or(MvsScene::Scene).file_name();
    let step = Step::exec(
        title,
        program.to_path_buf(),
        vec![input.clone(), "-v".to_string(), "0".to_string()],
        layout.working_dir_for(Suite::OpenMvs),
    );
    step.reads(layout.mvs.join(input))
        .writes(layout.mvs.join(stage.file_name()))
}
