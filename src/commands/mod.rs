//! Command implementations for the terramaid CLI
//!
//! - run: generate a Mermaid diagram from a Terraform configuration
//! - version: print the terramaid version

pub mod run;
pub mod version;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Run { .. } => run::execute_run_command(command),
        Commands::Version => version::execute_version_command(),
    }
}
