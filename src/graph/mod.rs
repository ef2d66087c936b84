//! # Graph Model and Flowchart Rendering Module
//!
//! This module holds the in-memory Terraform graph and turns it into a
//! Mermaid flowchart.
//!
//! ## Components
//!
//! ### Graph Model
//! - **TerraformGraph**: ordered nodes and edges as produced by the DOT parser
//! - **RawNode** / **RawEdge**: graph elements before any cleanup
//!
//! ### Rendering
//! - **clean_id**: maps raw names onto Mermaid-safe identifiers
//! - **FlowchartRenderer**: writes the fenced `flowchart` block, applying the
//!   resource classifier and the include/exclude filter
//!
//! ## Example
//!
//! ```
//! use terramaid::classifier::ResourceClassifier;
//! use terramaid::graph::{FlowchartOptions, FlowchartRenderer, RawEdge, RawNode, TerraformGraph};
//!
//! # fn main() -> miette::Result<()> {
//! let mut graph = TerraformGraph::new();
//! graph.add_node(RawNode::new("aws_instance.web").with_attribute("label", "aws_instance.web"));
//! graph.add_node(RawNode::new("aws_s3_bucket.log").with_attribute("label", "aws_s3_bucket.log"));
//! graph.add_edge(RawEdge::new("aws_instance.web", "aws_s3_bucket.log"));
//!
//! let renderer = FlowchartRenderer::new(
//!     FlowchartOptions::new("TD").with_subgraph_name("Terraform"),
//!     ResourceClassifier::default(),
//! );
//! let diagram = renderer.render(&graph)?;
//!
//! assert!(diagram.starts_with("```mermaid\nflowchart TD\n"));
//! assert!(diagram.contains("    aws_instance_web --> aws_s3_bucket_log\n"));
//! # Ok(())
//! # }
//! ```

mod renderer;
pub mod sanitizer;
mod types;

pub use renderer::{Direction, Flowchart, FlowchartOptions, FlowchartRenderer};
pub use sanitizer::clean_id;
pub use types::{LABEL_ATTRIBUTE, RawEdge, RawNode, TerraformGraph};
