//! Common functionality shared across commands

use clap::Args;

use crate::classifier::ClassifierConfig;
use crate::resource_filter::FilterConfig;

/// Include/exclude rules applied to resource labels
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only include these resource types (comma separated globs)
    #[arg(long, value_delimiter = ',', env = "TERRAMAID_INCLUDE_TYPES")]
    pub include_types: Vec<String>,

    /// Exclude these resource types (comma separated globs)
    #[arg(long, value_delimiter = ',', env = "TERRAMAID_EXCLUDE_TYPES")]
    pub exclude_types: Vec<String>,

    /// Only include resources of these providers (comma separated)
    #[arg(long, value_delimiter = ',', env = "TERRAMAID_INCLUDE_PROVIDERS")]
    pub include_providers: Vec<String>,

    /// Exclude resources inside these modules (comma separated globs)
    #[arg(long, value_delimiter = ',', env = "TERRAMAID_EXCLUDE_MODULES")]
    pub exclude_modules: Vec<String>,
}

/// Resource classification overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ClassifierArgs {
    /// Regular expression marking labels as resources
    #[arg(long, env = "TERRAMAID_RESOURCE_REGEX")]
    pub resource_regex: Option<String>,

    /// Additional resource type prefixes (comma separated)
    #[arg(long, env = "TERRAMAID_RESOURCE_PREFIXES")]
    pub resource_prefixes: Option<String>,
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

impl From<FilterArgs> for FilterConfig {
    fn from(args: FilterArgs) -> Self {
        FilterConfig::new(
            non_blank(args.include_types),
            non_blank(args.exclude_types),
            non_blank(args.include_providers),
            non_blank(args.exclude_modules),
        )
    }
}

impl From<ClassifierArgs> for ClassifierConfig {
    fn from(args: ClassifierArgs) -> Self {
        ClassifierConfig::new(
            args.resource_regex.filter(|regex| !regex.is_empty()),
            args.resource_prefixes
                .as_deref()
                .map(ClassifierConfig::parse_prefixes)
                .unwrap_or_default(),
        )
    }
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, crate::error::TerramaidError>;
}

/// Trait for configurations that can be created from CLI commands
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, crate::error::TerramaidError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::TerramaidError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}
