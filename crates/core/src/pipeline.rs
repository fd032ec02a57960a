//! High-level pipeline interface
//!
//! [`Pipeline`] is the entry point used by the CLI. It plans the run from a
//! [`PipelineConfig`], verifies the artifact chain once, and then either runs
//! the plan or hands it out for display.
//!
//! ## Example
//!
//! ```rust,no_run
//! use photopipe_core::configs::pipeline::PipelineConfig;
//! use photopipe_core::pipeline::Pipeline;
//!
//! # async fn example() -> photopipe_core::types::PipelineResult<()> {
//! let pipeline = Pipeline::new(PipelineConfig::new("./imgs", "./out"))?;
//!
//! for step in &pipeline.plan().steps {
//!     println!("{}", step.title);
//! }
//!
//! let report = pipeline.run().await?;
//! println!("took {}", report.elapsed_hms());
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::configs::pipeline::PipelineConfig;
use crate::execution::runner::{PipelineRunner, RunReport};
use crate::plan::{plan_pipeline, Plan};
use crate::types::PipelineResult;

/// A planned and verified photogrammetry run
pub struct Pipeline {
    config: PipelineConfig,
    plan: Plan,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let plan = plan_pipeline(&config);
        plan.verify()?;
        debug!(steps = plan.steps.len(), "planned pipeline");
        Ok(Self { config, plan })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Run every step with real processes
    pub async fn run(&self) -> PipelineResult<RunReport> {
        PipelineRunner::new().run(&self.plan).await
    }
}
