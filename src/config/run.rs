//! Run command configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::classifier::ClassifierConfig;
use crate::constants::run::SUPPORTED_CHART_TYPES;
use crate::error::TerramaidError;
use crate::resource_filter::FilterConfig;

/// Where the DOT graph comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphInput {
    /// Run Terraform in `working_dir`
    Terraform {
        working_dir: PathBuf,
        binary: Option<PathBuf>,
        plan_file: Option<PathBuf>,
        timeout: Option<Duration>,
    },
    /// Read an exported graph, `-` for stdin
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: GraphInput,
    pub output: PathBuf,
    pub direction: String,
    pub subgraph_name: String,
    pub chart_type: String,
    pub resources_only: bool,
    pub filter: FilterConfig,
    pub classifier: ClassifierConfig,
    pub verbose: bool,
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct RunConfigBuilder {
    input: Option<GraphInput>,
    output: Option<PathBuf>,
    direction: Option<String>,
    subgraph_name: Option<String>,
    chart_type: Option<String>,
    resources_only: Option<bool>,
    filter: Option<FilterConfig>,
    classifier: Option<ClassifierConfig>,
    verbose: Option<bool>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: GraphInput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_direction(mut self, direction: String) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_subgraph_name(mut self, subgraph_name: String) -> Self {
        self.subgraph_name = Some(subgraph_name);
        self
    }

    pub fn with_chart_type(mut self, chart_type: String) -> Self {
        self.chart_type = Some(chart_type);
        self
    }

    pub fn with_resources_only(mut self, resources_only: bool) -> Self {
        self.resources_only = Some(resources_only);
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
}

fn missing(field: &str) -> TerramaidError {
    TerramaidError::ConfigurationError {
        message: format!("Missing required field: {field}"),
    }
}

impl crate::common::ConfigBuilder for RunConfigBuilder {
    type Config = RunConfig;

    fn build(self) -> Result<Self::Config, TerramaidError> {
        let chart_type = self.chart_type.ok_or_else(|| missing("chart_type"))?;
        if !SUPPORTED_CHART_TYPES.contains(&chart_type.as_str()) {
            return Err(TerramaidError::ConfigurationError {
                message: format!(
                    "unsupported chart type '{chart_type}', supported: {}",
                    SUPPORTED_CHART_TYPES.join(", ")
                ),
            });
        }

        Ok(RunConfig {
            input: self.input.ok_or_else(|| missing("input"))?,
            output: self.output.ok_or_else(|| missing("output"))?,
            direction: self.direction.ok_or_else(|| missing("direction"))?,
            subgraph_name: self.subgraph_name.ok_or_else(|| missing("subgraph_name"))?,
            chart_type,
            resources_only: self.resources_only.unwrap_or(false),
            filter: self.filter.unwrap_or_default(),
            classifier: self.classifier.unwrap_or_default(),
            verbose: self.verbose.unwrap_or(false),
        })
    }
}
