use std::path::PathBuf;
use std::time::Duration;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid DOT syntax in '{name}': {message}")]
#[diagnostic(
    code(terramaid::dot_parse_error),
    help("Check the graph output near the highlighted position")
)]
pub struct DotParseError {
    pub name: String,
    pub message: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("unexpected input here")]
    pub span: Option<SourceSpan>,
}

#[derive(Error, Debug, Diagnostic)]
pub enum TerramaidError {
    #[error("Failed to read file '{}'", .path.display())]
    #[diagnostic(
        code(terramaid::io_error),
        help("Check if the file exists and you have read permissions")
    )]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    DotParseError(Box<DotParseError>),

    #[error("invalid direction {direction}: valid options are TB, TD, BT, RL, LR")]
    #[diagnostic(
        code(terramaid::invalid_direction),
        help("Pass one of TB, TD, BT, RL or LR to --direction")
    )]
    InvalidDirection { direction: String },

    #[error("Unable to find a Terraform binary on PATH")]
    #[diagnostic(
        code(terramaid::terraform_not_found),
        help("Install Terraform or point --tf-binary at an existing binary")
    )]
    TerraformNotFound,

    #[error("`{command}` exited with {status}")]
    #[diagnostic(
        code(terramaid::terraform_command_failed),
        help("Terraform reported:\n{stderr}")
    )]
    TerraformCommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` did not finish within {}s", .timeout.as_secs_f64())]
    #[diagnostic(
        code(terramaid::terraform_timeout),
        help("Raise --timeout, or check whether Terraform is waiting on a state lock or a download")
    )]
    TerraformTimeout { command: String, timeout: Duration },

    #[error("Terraform files do not exist in directory \"{}\"", .dir.display())]
    #[diagnostic(
        code(terramaid::no_terraform_files),
        help("Run terramaid from a Terraform configuration or pass --working-dir")
    )]
    NoTerraformFiles { dir: PathBuf },

    #[error("Terraform directory \"{}\" does not exist", .dir.display())]
    #[diagnostic(
        code(terramaid::directory_not_found),
        help("Check the --working-dir argument")
    )]
    DirectoryNotFound { dir: PathBuf },

    #[error("No output from terraform graph")]
    #[diagnostic(
        code(terramaid::empty_graph),
        help("The configuration does not contain any resources; try passing a plan file")
    )]
    EmptyGraph,

    #[error("String formatting error")]
    #[diagnostic(
        code(terramaid::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("IO error")]
    #[diagnostic(
        code(terramaid::io_error),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(terramaid::config_error),
        help("Check your command arguments and TERRAMAID_* environment variables")
    )]
    ConfigurationError { message: String },
}
