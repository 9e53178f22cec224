use crate::prelude::*;
use std::collections::HashMap;

/// Owns the ordered element list and the node-name directory.
///
/// Node `"0"` is reserved for ground and always present at index 0.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub elements: Vec<Element>,
    nodes: Vec<String>,
    node_index: HashMap<String, usize>,
    pub has_nonlinear: bool,
}

impl Circuit {
    pub fn new() -> Self {
        let mut node_index = HashMap::new();
        node_index.insert("0".to_string(), 0);
        Circuit {
            elements: Vec::new(),
            nodes: vec!["0".to_string()],
            node_index,
            has_nonlinear: false,
        }
    }

    /// Idempotent node allocation: the first use of a name claims the next
    /// free index.
    pub fn node(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    /// Appends an element, registering any node names it mentions for the
    /// first time, and ORs its nonlinearity into the circuit-wide flag.
    pub fn add(&mut self, element: Element) {
        for name in element.nodes() {
            self.node(name);
        }
        self.has_nonlinear |= element.is_nonlinear();
        self.elements.push(element);
    }

    /// Node count, excluding ground.
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn node_name(&self, index: usize) -> &str {
        &self.nodes[index]
    }

    pub fn node_names(&self) -> &[String] {
        &self.nodes[1..]
    }

    pub fn node_index(&self) -> &HashMap<String, usize> {
        &self.node_index
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}
