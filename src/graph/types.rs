//! Core graph types
//!
//! This module contains the node and edge structures handed from the DOT
//! parser to the flowchart renderer.

use std::collections::HashMap;

/// Attribute carrying a node's human readable description
pub const LABEL_ATTRIBUTE: &str = "label";

/// A node exactly as it appeared in the graph export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub name: String,
    pub attributes: HashMap<String, String>,
}

impl RawNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw `label` attribute, or an empty string when the node has none
    pub fn label(&self) -> &str {
        self.attributes
            .get(LABEL_ATTRIBUTE)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// A directed relationship between two node names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub src: String,
    pub dst: String,
}

impl RawEdge {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }
}

/// Ordered node and edge collections of a Terraform dependency graph
///
/// Nodes keep their first-declaration order and edges keep source order, so
/// rendering the same input twice produces the same text. Edges may
/// reference names that were never declared as nodes.
#[derive(Debug, Clone, Default)]
pub struct TerraformGraph {
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    index: HashMap<String, usize>,
}

impl TerraformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, merging attributes into an existing node of the same name
    pub fn add_node(&mut self, node: RawNode) {
        match self.index.get(&node.name) {
            Some(&position) => self.nodes[position].attributes.extend(node.attributes),
            None => {
                self.index.insert(node.name.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub fn add_edge(&mut self, edge: RawEdge) {
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> &[RawNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RawEdge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&RawNode> {
        self.index.get(name).map(|&position| &self.nodes[position])
    }

    /// Label of the named node, empty for dangling references
    pub fn label_of(&self, name: &str) -> &str {
        self.node(name).map(RawNode::label).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<RawNode> for TerraformGraph {
    fn from_iter<I: IntoIterator<Item = RawNode>>(iter: I) -> Self {
        let mut graph = Self::new();
        for node in iter {
            graph.add_node(node);
        }
        graph
    }
}

impl Extend<RawEdge> for TerraformGraph {
    fn extend<I: IntoIterator<Item = RawEdge>>(&mut self, iter: I) {
        self.edges.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_keep_declaration_order() {
        let graph: TerraformGraph = ["b", "a", "c"].into_iter().map(RawNode::new).collect();

        let names: Vec<&str> = graph.nodes().iter().map(RawNode::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_redeclared_node_merges_attributes() {
        let mut graph = TerraformGraph::new();
        graph.add_node(RawNode::new("web").with_attribute("shape", "box"));
        graph.add_node(RawNode::new("other"));
        graph.add_node(RawNode::new("web").with_attribute("label", "aws_instance.web"));

        assert_eq!(graph.nodes().len(), 2);
        let web = graph.node("web").unwrap();
        assert_eq!(web.label(), "aws_instance.web");
        assert_eq!(web.attributes.get("shape").map(String::as_str), Some("box"));
    }

    #[test]
    fn test_dangling_reference_has_empty_label() {
        let mut graph = TerraformGraph::new();
        graph.add_edge(RawEdge::new("a", "missing"));

        assert!(graph.node("missing").is_none());
        assert_eq!(graph.label_of("missing"), "");
        assert!(graph.is_empty());
    }
}
