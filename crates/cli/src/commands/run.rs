use anyhow::Result;
use colored::*;
use photopipe_core::{Pipeline, PipelineError};

pub async fn execute(pipeline: &Pipeline) -> Result<()> {
    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(PipelineError::Step {
            command, failure, ..
        }) => {
            println!("{}", "Failed while executing:".red().bold());
            println!("{}", command);
            return Err(anyhow::anyhow!("Pipeline stopped: {}", failure));
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to run pipeline: {}", e)),
    };

    println!();
    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        format!(
            "Finished without errors - Used time: {}",
            report.elapsed_hms()
        )
        .green()
        .bold()
    );

    Ok(())
}
