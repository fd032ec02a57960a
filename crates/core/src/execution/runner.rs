//! Sequential pipeline runner
//!
//! Steps run strictly one after another because each stage reads what the
//! previous ones wrote. The first failure ends the run; nothing already done
//! is rolled back.

use std::io;
use std::time::{Duration, Instant};

use colored::*;
use tracing::{debug, info};

use crate::execution::cleanup::remove_targets;
use crate::execution::command::{Launcher, ProcessLauncher};
use crate::plan::Plan;
use crate::step::{Action, Step};
use crate::types::{PipelineError, PipelineResult, StepFailure};

const SEPARATOR: &str =
    "=========================================================================";

/// Outcome of a run in which every step succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub steps_run: usize,
    pub elapsed: Duration,
}

impl RunReport {
    /// Elapsed wall-clock time as `HH:MM:SS`
    pub fn elapsed_hms(&self) -> String {
        format_elapsed(self.elapsed.as_secs())
    }
}

/// Format whole seconds as zero-padded `HH:MM:SS`. Hours keep growing past 99.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Runs a [`Plan`] step by step
pub struct PipelineRunner<L = ProcessLauncher> {
    launcher: L,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self {
            launcher: ProcessLauncher,
        }
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Launcher> PipelineRunner<L> {
    pub fn with_launcher(launcher: L) -> Self {
        Self { launcher }
    }

    #[cfg(test)]
    pub(crate) fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Execute every step in order, stopping at the first failure
    pub async fn run(&self, plan: &Plan) -> PipelineResult<RunReport> {
        let started = Instant::now();
        info!(steps = plan.steps.len(), output = %plan.layout.output.display(), "starting pipeline");

        tokio::fs::create_dir_all(&plan.layout.output).await?;

        for (index, step) in plan.steps.iter().enumerate() {
            print_step_header(step);

            self.run_step(step)
                .await
                .map_err(|failure| PipelineError::Step {
                    index,
                    title: step.title.clone(),
                    command: step.command_line(),
                    failure,
                })?;
        }

        let report = RunReport {
            steps_run: plan.steps.len(),
            elapsed: started.elapsed(),
        };
        info!(elapsed = %report.elapsed_hms(), "pipeline finished");
        Ok(report)
    }

    async fn run_step(&self, step: &Step) -> Result<(), StepFailure> {
        // Checked up front so a missing directory is never reported as a missing program
        if !step.working_dir.is_dir() {
            return Err(StepFailure::MissingWorkingDirectory(step.working_dir.clone()));
        }

        match &step.action {
            Action::Exec { program, args } => {
                let outcome = self.launcher.launch(program, args, &step.working_dir).await;
                debug!(step = %step.title, ?outcome, "process exited");
                match outcome {
                    Ok(Some(0)) => Ok(()),
                    Ok(code) => Err(StepFailure::ExitCode(code.unwrap_or(-1))),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        Err(StepFailure::MissingExecutable(program.clone()))
                    }
                    Err(source) => Err(StepFailure::Launch {
                        program: program.clone(),
                        source,
                    }),
                }
            }
            Action::Remove { targets } => remove_targets(&step.working_dir, targets).map(|_| ()),
            Action::EnterDirectory => {
                debug!(dir = %step.working_dir.display(), "entering directory");
                Ok(())
            }
        }
    }
}

fn print_step_header(step: &Step) {
    println!("{}", step.title.bold());
    println!("{}", SEPARATOR.dimmed());
    println!("{}", step.command_line());
    println!();
}
