//! Run command implementation

use std::time::Duration;

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{GraphInput, RunConfig};
use crate::error::TerramaidError;

impl FromCommand for RunConfig {
    fn from_command(command: Commands) -> Result<Self, TerramaidError> {
        match command {
            Commands::Run {
                output,
                direction,
                subgraph_name,
                chart_type,
                tf_plan,
                tf_binary,
                timeout,
                working_dir,
                graph_file,
                resources_only,
                filter,
                classifier,
                verbose,
            } => {
                let input = match graph_file {
                    Some(path) => GraphInput::File(path),
                    None => GraphInput::Terraform {
                        working_dir,
                        binary: tf_binary,
                        plan_file: tf_plan,
                        timeout: timeout.map(Duration::from_secs),
                    },
                };

                RunConfig::builder()
                    .with_input(input)
                    .with_output(output)
                    .with_direction(direction)
                    .with_subgraph_name(subgraph_name)
                    .with_chart_type(chart_type)
                    .with_resources_only(resources_only)
                    .with_filter(filter.into())
                    .with_classifier(classifier.into())
                    .with_verbose(verbose)
                    .build()
            }
            _ => Err(TerramaidError::ConfigurationError {
                message: "Invalid command type for RunConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(RunConfig);

/// Execute the run command for generating a Mermaid diagram
pub fn execute_run_command(command: Commands) -> Result<()> {
    let config =
        RunConfig::from_command(command).wrap_err("Failed to parse run command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::run::RunExecutor;
    RunExecutor::execute(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn command(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_graph_file_selects_file_input() {
        let config =
            RunConfig::try_from(command(&["terramaid", "run", "--graph-file", "g.dot"])).unwrap();
        assert_eq!(config.input, GraphInput::File(PathBuf::from("g.dot")));
    }

    #[test]
    fn test_default_input_runs_terraform() {
        let config = RunConfig::try_from(command(&[
            "terramaid",
            "run",
            "-w",
            "infra",
            "-p",
            "plan.out",
            "-t",
            "120",
            "--exclude-modules",
            "legacy*",
        ]))
        .unwrap();

        assert_eq!(
            config.input,
            GraphInput::Terraform {
                working_dir: PathBuf::from("infra"),
                binary: None,
                plan_file: Some(PathBuf::from("plan.out")),
                timeout: Some(Duration::from_secs(120)),
            }
        );
        assert_eq!(config.filter.exclude_modules, vec!["legacy*"]);
    }

    #[test]
    fn test_version_is_not_a_run_config() {
        assert!(RunConfig::try_from(Commands::Version).is_err());
    }
}
