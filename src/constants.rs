//! Configuration constants for terramaid
//!
//! Defaults shared between the CLI definition and the run configuration.
//! Every default can be overridden with a flag or a `TERRAMAID_*`
//! environment variable.

use std::time::Duration;

/// Progress spinner configuration
pub mod progress {
    use super::*;

    /// Duration between spinner updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    pub const SPINNER_MESSAGE: &str = "Generating Terramaid Diagrams";
}

/// Terraform process supervision
pub mod terraform {
    use super::*;

    /// How often a child process is checked against its deadline
    pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);
}

/// Run command defaults
pub mod run {
    pub const DEFAULT_OUTPUT: &str = "Terramaid.md";
    pub const DEFAULT_DIRECTION: &str = "TD";
    pub const DEFAULT_SUBGRAPH_NAME: &str = "Terraform";
    pub const DEFAULT_CHART_TYPE: &str = "flowchart";
    pub const DEFAULT_WORKING_DIR: &str = ".";

    /// Chart types the renderer knows how to produce
    pub const SUPPORTED_CHART_TYPES: &[&str] = &[DEFAULT_CHART_TYPE];
}
