//! # Terramaid - Mermaid Diagrams from Terraform Configurations
//!
//! Terramaid reads the dependency graph Terraform reports for a configuration
//! (`terraform graph`, in Graphviz DOT form) and renders it as a Mermaid
//! flowchart that can be embedded in Markdown.
//!
//! ## Main Components
//!
//! - **dot_parser**: reads DOT text into a [`graph::TerraformGraph`]
//! - **graph**: identifier sanitizing and flowchart rendering
//! - **classifier**: label cleanup and resource classification
//! - **resource_filter**: include/exclude rules by type, provider and module
//! - **terraform**: runs the Terraform CLI or reads an exported graph
//!
//! ## Usage
//!
//! ### Example: Rendering an Exported Graph
//!
//! ```
//! use terramaid::classifier::ResourceClassifier;
//! use terramaid::dot_parser;
//! use terramaid::graph::{FlowchartOptions, FlowchartRenderer};
//!
//! # fn main() -> miette::Result<()> {
//! let dot = r#"digraph {
//!     "[root] aws_instance.web (expand)" [label = "aws_instance.web"]
//!     "[root] aws_s3_bucket.log (expand)" [label = "aws_s3_bucket.log"]
//!     "[root] aws_instance.web (expand)" -> "[root] aws_s3_bucket.log (expand)"
//! }"#;
//!
//! let graph = dot_parser::parse("graph.dot", dot)?;
//! let renderer = FlowchartRenderer::new(
//!     FlowchartOptions::new("LR").with_subgraph_name("Terraform"),
//!     ResourceClassifier::default(),
//! );
//!
//! let diagram = renderer.render(&graph)?;
//! assert!(diagram.contains("        aws_instance_web[\"aws_instance.web\"]\n"));
//! assert!(diagram.contains("    aws_instance_web --> aws_s3_bucket_log\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Example: Restricting the Diagram to Resources
//!
//! ```
//! use terramaid::classifier::{ClassifierConfig, ResourceClassifier};
//! use terramaid::graph::{FlowchartOptions, FlowchartRenderer, RawNode, TerraformGraph};
//! use terramaid::resource_filter::FilterConfig;
//!
//! # fn main() -> miette::Result<()> {
//! let graph: TerraformGraph = [
//!     RawNode::new("aws_instance.web").with_attribute("label", "aws_instance.web"),
//!     RawNode::new("var.region").with_attribute("label", "var.region"),
//!     RawNode::new("corp_thing.x").with_attribute("label", "corp_thing.x"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let classifier = ResourceClassifier::new(&ClassifierConfig::new(
//!     None,
//!     ClassifierConfig::parse_prefixes("corp_"),
//! ));
//! let filter = FilterConfig {
//!     exclude_types: vec!["corp_*".to_string()],
//!     ..FilterConfig::default()
//! };
//!
//! let diagram = FlowchartRenderer::new(
//!     FlowchartOptions::new("TD")
//!         .with_resources_only(true)
//!         .with_filter(filter),
//!     classifier,
//! )
//! .render(&graph)?;
//!
//! assert!(diagram.contains("aws_instance_web"));
//! assert!(!diagram.contains("var_region"));
//! assert!(!diagram.contains("corp_thing_x"));
//! # Ok(())
//! # }
//! ```

// Private modules
mod constants;
mod progress;
mod utils;

// Public modules
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod dot_parser;
pub mod error;
pub mod executors;
pub mod graph;
pub mod resource_filter;
pub mod terraform;

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::Cli;
    use crate::commands::execute_command;

    let cli = Cli::parse();

    execute_command(cli.command)
}
