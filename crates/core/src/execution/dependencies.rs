//! Artifact dependencies between steps
//!
//! Each step declares the files it reads and writes. This module checks that the
//! plan order satisfies those declarations and exposes the resulting graph.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::Graph;

use crate::step::Step;
use crate::types::{PipelineError, PipelineResult};

/// Ensure every declared input is external or written by an earlier step
pub fn verify_chain(steps: &[Step], external: &[PathBuf]) -> PipelineResult<()> {
    let mut available: HashSet<&Path> = external.iter().map(PathBuf::as_path).collect();

    for step in steps {
        if let Some(missing) = step.inputs.iter().find(|input| !available.contains(input.as_path())) {
            return Err(PipelineError::Chain {
                step: step.title.clone(),
                artifact: missing.clone(),
            });
        }
        available.extend(step.outputs.iter().map(PathBuf::as_path));
    }

    Ok(())
}

/// Build a graph with one node per step and an edge from the step that last
/// wrote an artifact to each step reading it
pub fn dependency_graph(steps: &[Step]) -> Graph<String, PathBuf> {
    let mut graph = Graph::new();
    let nodes: Vec<_> = steps
        .iter()
        .map(|step| graph.add_node(step.title.clone()))
        .collect();

    let mut producers = HashMap::new();
    for (step, &node) in steps.iter().zip(&nodes) {
        for input in &step.inputs {
            if let Some(&producer) = producers.get(input) {
                graph.add_edge(producer, node, input.clone());
            }
        }
        for output in &step.outputs {
            producers.insert(output.clone(), node);
        }
    }

    graph
}
