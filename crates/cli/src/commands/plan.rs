use anyhow::Result;
use colored::*;
use petgraph::Direction;
use photopipe_core::Pipeline;

pub fn execute(pipeline: &Pipeline) -> Result<()> {
    let plan = pipeline.plan();
    let graph = plan.dependency_graph();

    println!(
        "{} {}",
        "Execution plan for".bold(),
        plan.layout.output.display().to_string().cyan()
    );

    for (i, (step, node)) in plan.steps.iter().zip(graph.node_indices()).enumerate() {
        println!();
        println!("  {}. {}", i + 1, step.title.bold());
        println!("     {}", step.command_line());
        println!(
            "     {} {}",
            "in".bright_black(),
            step.working_dir.display()
        );

        let mut after: Vec<&str> = graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| graph[n].as_str())
            .collect();
        if !after.is_empty() {
            // neighbors are yielded newest edge first
            after.reverse();
            after.dedup();
            println!("     {} {}", "after".bright_black(), after.join(", "));
        }
    }

    Ok(())
}
