//! # Configuration Module
//!
//! Configuration structures for terramaid commands, each with a builder that
//! reports missing fields as configuration errors.
//!
//! ## Example
//!
//! ```
//! use std::path::PathBuf;
//!
//! use terramaid::common::ConfigBuilder;
//! use terramaid::config::{GraphInput, RunConfig};
//!
//! let config = RunConfig::builder()
//!     .with_input(GraphInput::File(PathBuf::from("graph.dot")))
//!     .with_output(PathBuf::from("Terramaid.md"))
//!     .with_direction("LR".to_string())
//!     .with_subgraph_name("Terraform".to_string())
//!     .with_chart_type("flowchart".to_string())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.direction, "LR");
//! ```

pub mod run;

pub use run::{GraphInput, RunConfig, RunConfigBuilder};
