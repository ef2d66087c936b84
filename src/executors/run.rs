//! Run command executor

use miette::{IntoDiagnostic, Result, WrapErr};

use crate::classifier::ResourceClassifier;
use crate::config::{GraphInput, RunConfig};
use crate::dot_parser;
use crate::error::TerramaidError;
use crate::executors::CommandExecutor;
use crate::graph::{FlowchartOptions, FlowchartRenderer};
use crate::progress::ProgressReporter;
use crate::terraform::{GraphFile, GraphSource, TerraformCli, find_terraform_binary};
use crate::utils::string::pluralize;

pub struct RunExecutor;

impl RunExecutor {
    fn graph_source(
        input: &GraphInput,
        progress: &ProgressReporter,
    ) -> Result<Box<dyn GraphSource>, TerramaidError> {
        match input {
            GraphInput::File(path) => {
                progress.verbose(format!("Reading graph from {}", path.display()));
                Ok(Box::new(GraphFile::new(path)))
            }
            GraphInput::Terraform {
                working_dir,
                binary,
                plan_file,
                timeout,
            } => {
                let binary = match binary {
                    Some(binary) => binary.clone(),
                    None => find_terraform_binary()?,
                };
                progress.verbose(format!("Using Terraform binary {}", binary.display()));
                progress.verbose(format!("Working directory: {}", working_dir.display()));
                if let Some(plan) = plan_file {
                    progress.verbose(format!("Plan file: {}", plan.display()));
                }
                if let Some(timeout) = timeout {
                    progress.verbose(format!("Timeout: {}s", timeout.as_secs()));
                }

                Ok(Box::new(
                    TerraformCli::new(working_dir, binary)
                        .with_plan_file(plan_file.clone())
                        .with_timeout(*timeout),
                ))
            }
        }
    }
}

impl CommandExecutor for RunExecutor {
    type Config = RunConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let mut progress = ProgressReporter::new(config.verbose);

        progress.verbose(format!("Output file: {}", config.output.display()));
        progress.verbose(format!("Direction: {}", config.direction));
        progress.verbose(format!("Subgraph name: {:?}", config.subgraph_name));
        progress.verbose(format!("Chart type: {}", config.chart_type));
        progress.verbose(format!("Resources only: {}", config.resources_only));

        let source = Self::graph_source(&config.input, &progress)
            .wrap_err("Failed to prepare the graph source")?;

        progress.start_generation();
        let raw = source.raw_graph();
        progress.finish_generation();
        let raw = raw.wrap_err("Failed to obtain the Terraform graph")?;

        if raw.trim().is_empty() {
            return Err(TerramaidError::EmptyGraph.into());
        }

        let graph = dot_parser::parse(&source.name(), &raw)?;
        if graph.is_empty() {
            return Err(TerramaidError::EmptyGraph.into());
        }
        progress.verbose(format!(
            "Parsed {} {} and {} {}",
            graph.nodes().len(),
            pluralize("node", graph.nodes().len()),
            graph.edges().len(),
            pluralize("edge", graph.edges().len())
        ));

        let classifier = ResourceClassifier::new(&config.classifier);
        if let Some(regex) = &config.classifier.custom_regex
            && !classifier.has_custom_pattern()
        {
            progress.verbose(format!(
                "Ignoring invalid resource regex {regex:?}, falling back to prefix detection"
            ));
        }
        progress.verbose(format!(
            "Classification strategies: {}",
            classifier.strategy_names().join(", ")
        ));

        let options = FlowchartOptions::new(config.direction)
            .with_subgraph_name(config.subgraph_name)
            .with_resources_only(config.resources_only)
            .with_filter(config.filter);
        let renderer = FlowchartRenderer::new(options, classifier);
        let flowchart = renderer
            .render_flowchart(&graph)
            .wrap_err("Failed to generate Mermaid diagram")?;

        progress.verbose(format!(
            "Rendered {} {} and {} {}",
            flowchart.node_count,
            pluralize("node", flowchart.node_count),
            flowchart.edge_count,
            pluralize("edge", flowchart.edge_count)
        ));

        std::fs::write(&config.output, flowchart.text)
            .into_diagnostic()
            .wrap_err_with(|| {
                format!("Failed to write output file '{}'", config.output.display())
            })?;

        progress.diagram_written(&config.output);

        Ok(())
    }
}
