use std::collections::HashSet;
use std::fmt::{self, Write};
use std::str::FromStr;

use crate::classifier::{ResourceClassifier, clean_label, is_provider_label};
use crate::error::TerramaidError;
use crate::graph::TerraformGraph;
use crate::graph::sanitizer::clean_id;
use crate::resource_filter::FilterConfig;

const NODE_INDENT: &str = "        ";
const BLOCK_INDENT: &str = "    ";

// Helper macro for write operations that converts formatting errors
macro_rules! writeln_out {
    ($dst:expr, $($arg:tt)*) => {
        writeln!($dst, $($arg)*).map_err(TerramaidError::from)
    };
}

/// Flowchart layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    TopBottom,
    TopDown,
    BottomTop,
    RightLeft,
    LeftRight,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::TopBottom,
        Direction::TopDown,
        Direction::BottomTop,
        Direction::RightLeft,
        Direction::LeftRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::TopDown => "TD",
            Direction::BottomTop => "BT",
            Direction::RightLeft => "RL",
            Direction::LeftRight => "LR",
        }
    }
}

impl FromStr for Direction {
    type Err = TerramaidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| TerramaidError::InvalidDirection {
                direction: s.to_string(),
            })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single flowchart rendering
#[derive(Debug, Clone)]
pub struct FlowchartOptions {
    /// One of `TB`, `TD`, `BT`, `RL`, `LR`; checked when rendering
    pub direction: String,
    /// Name of the subgraph wrapping node declarations, empty for none
    pub subgraph_name: String,
    /// Only draw nodes classified as resources
    pub resources_only: bool,
    pub filter: FilterConfig,
}

impl Default for FlowchartOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopDown.as_str().to_string(),
            subgraph_name: String::new(),
            resources_only: false,
            filter: FilterConfig::default(),
        }
    }
}

impl FlowchartOptions {
    pub fn new(direction: impl Into<String>) -> Self {
        Self {
            direction: direction.into(),
            ..Self::default()
        }
    }

    pub fn with_subgraph_name(mut self, subgraph_name: impl Into<String>) -> Self {
        self.subgraph_name = subgraph_name.into();
        self
    }

    pub fn with_resources_only(mut self, resources_only: bool) -> Self {
        self.resources_only = resources_only;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }
}

/// Identifiers already written during one render call
#[derive(Default)]
struct RenderState {
    nodes: HashSet<String>,
    providers: HashSet<String>,
    edges: usize,
}

/// One side of an edge, resolved against the node table
struct Endpoint {
    id: String,
    label: String,
    included: bool,
}

/// Renders a [`TerraformGraph`] as a fenced Mermaid flowchart
pub struct FlowchartRenderer {
    options: FlowchartOptions,
    classifier: ResourceClassifier,
}

/// Output of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flowchart {
    pub text: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl FlowchartRenderer {
    pub fn new(options: FlowchartOptions, classifier: ResourceClassifier) -> Self {
        Self {
            options,
            classifier,
        }
    }

    pub fn options(&self) -> &FlowchartOptions {
        &self.options
    }

    /// Render the graph, returning only the diagram text
    pub fn render(&self, graph: &TerraformGraph) -> Result<String, TerramaidError> {
        self.render_flowchart(graph).map(|flowchart| flowchart.text)
    }

    /// Render the graph along with counts of what was drawn
    ///
    /// Fails only on an invalid direction, before any text is produced.
    /// Empty labels, dangling edges and filtered nodes are skipped.
    pub fn render_flowchart(&self, graph: &TerraformGraph) -> Result<Flowchart, TerramaidError> {
        let direction: Direction = self.options.direction.parse()?;
        let subgraph = !self.options.subgraph_name.is_empty();

        let mut output = String::new();
        let mut state = RenderState::default();

        writeln_out!(output, "```mermaid")?;
        writeln_out!(output, "flowchart {direction}")?;

        if subgraph {
            writeln_out!(
                output,
                "{BLOCK_INDENT}subgraph {}",
                self.options.subgraph_name
            )?;
        }

        for node in graph.nodes() {
            let id = clean_id(node.name());
            let label = clean_label(node.label());

            if label.is_empty() {
                continue;
            }

            if is_provider_label(&label) && !state.providers.insert(id.clone()) {
                continue;
            }

            if !self.is_included(&label) {
                continue;
            }

            if !state.nodes.contains(&id) {
                write_node(&mut output, &id, &label)?;
                state.nodes.insert(id);
            }
        }

        // Edges are drawn outside the subgraph block
        if subgraph {
            writeln_out!(output, "{BLOCK_INDENT}end")?;
        }

        for edge in graph.edges() {
            let from = self.endpoint(graph, &edge.src);
            let to = self.endpoint(graph, &edge.dst);

            for endpoint in [&from, &to] {
                if endpoint.included && !state.nodes.contains(&endpoint.id) {
                    write_node(&mut output, &endpoint.id, &endpoint.label)?;
                    state.nodes.insert(endpoint.id.clone());
                }
            }

            if !(from.included && to.included) {
                continue;
            }

            writeln_out!(output, "{BLOCK_INDENT}{} --> {}", from.id, to.id)?;
            state.edges += 1;
        }

        writeln_out!(output, "```")?;

        Ok(Flowchart {
            text: output,
            node_count: state.nodes.len(),
            edge_count: state.edges,
        })
    }

    /// Node-pass inclusion checks, shared with edge endpoints
    fn is_included(&self, label: &str) -> bool {
        if self.options.resources_only && !self.classifier.is_resource_label(label) {
            return false;
        }
        self.options.filter.should_include(label)
    }

    fn endpoint(&self, graph: &TerraformGraph, name: &str) -> Endpoint {
        let label = clean_label(graph.label_of(name));
        let included = !label.is_empty() && self.is_included(&label);
        Endpoint {
            id: clean_id(name),
            label,
            included,
        }
    }
}

fn write_node(output: &mut String, id: &str, label: &str) -> Result<(), TerramaidError> {
    writeln_out!(output, "{NODE_INDENT}{id}[\"{label}\"]")
}
