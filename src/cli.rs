use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::common::{ClassifierArgs, FilterArgs};
use crate::constants::run::{
    DEFAULT_CHART_TYPE, DEFAULT_DIRECTION, DEFAULT_OUTPUT, DEFAULT_SUBGRAPH_NAME,
    DEFAULT_WORKING_DIR,
};

#[derive(Parser)]
#[command(
    name = "terramaid",
    about = "Generate Mermaid diagrams from Terraform configurations",
    long_about = "Terramaid turns the dependency graph Terraform reports for a configuration \
                  into a Mermaid flowchart, ready to be embedded in Markdown documentation, \
                  pull requests and wikis.",
    subcommand_required = true,
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a Mermaid diagram of a Terraform configuration
    ///
    /// Runs `terraform init` and `terraform graph` in the working directory,
    /// or reads an exported graph, and writes the resulting flowchart.
    #[command(
        long_about = "Generate a Mermaid flowchart from the dependency graph of a Terraform \
                      configuration. By default Terraform is initialized and asked for its \
                      graph in the working directory; --graph-file reads a previously exported \
                      DOT graph instead. Nodes can be restricted to real resources with \
                      --resources-only and filtered by type, provider or module."
    )]
    Run {
        /// Output file for the Mermaid diagram
        #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "TERRAMAID_OUTPUT")]
        output: PathBuf,

        /// Flowchart direction (TB, TD, BT, RL, LR)
        #[arg(short = 'r', long, default_value = DEFAULT_DIRECTION, env = "TERRAMAID_DIRECTION")]
        direction: String,

        /// Name of the subgraph wrapping the nodes, empty for none
        #[arg(
            short,
            long,
            default_value = DEFAULT_SUBGRAPH_NAME,
            env = "TERRAMAID_SUBGRAPH_NAME"
        )]
        subgraph_name: String,

        /// Type of Mermaid chart to generate
        #[arg(short, long, default_value = DEFAULT_CHART_TYPE, env = "TERRAMAID_CHART_TYPE")]
        chart_type: String,

        /// Path to a Terraform plan file to graph
        #[arg(short = 'p', long, env = "TERRAMAID_TF_PLAN")]
        tf_plan: Option<PathBuf>,

        /// Path to the Terraform binary (searched on PATH by default)
        #[arg(short = 'b', long, env = "TERRAMAID_TF_BINARY")]
        tf_binary: Option<PathBuf>,

        /// Seconds Terraform may take to initialize and produce the graph,
        /// unlimited when unset
        #[arg(
            short = 't',
            long,
            value_name = "SECONDS",
            value_parser = clap::value_parser!(u64).range(1..),
            env = "TERRAMAID_TIMEOUT"
        )]
        timeout: Option<u64>,

        /// Working directory of the Terraform configuration
        #[arg(
            short,
            long,
            default_value = DEFAULT_WORKING_DIR,
            env = "TERRAMAID_WORKING_DIR"
        )]
        working_dir: PathBuf,

        /// Read the DOT graph from a file instead of running Terraform (`-`
        /// for stdin)
        #[arg(short, long, env = "TERRAMAID_GRAPH_FILE")]
        graph_file: Option<PathBuf>,

        /// Only draw nodes that are real resources
        #[arg(long, env = "TERRAMAID_RESOURCES_ONLY")]
        resources_only: bool,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        classifier: ClassifierArgs,

        /// Print detailed progress information
        #[arg(short, long, env = "TERRAMAID_VERBOSE")]
        verbose: bool,
    },

    /// Print the terramaid version
    Version,
}
