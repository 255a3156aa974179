//! In-memory graph storage
//!
//! Arena-backed property graph with adjacency lists in both directions, a
//! label index and a per-label name index. Person→Place walks use the
//! outgoing lists, Place→Person walks use the incoming lists.

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, Label, NodeId};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    #[error("{label} named '{name}' already exists")]
    DuplicateName { label: Label, name: String },

    #[error("Property '{key}' of node {node} is immutable")]
    ImmutableProperty { node: NodeId, key: String },

    #[error("Write to node {0} failed")]
    WriteFailed(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// In-memory graph storage
///
/// - nodes: NodeId -> Node (arena, `None` once cleared)
/// - edges: EdgeId -> Edge
/// - outgoing / incoming: NodeId -> Vec<EdgeId>
/// - label_index: Label -> ordered set of NodeId
/// - name_index: (Label, name) -> NodeId
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Option<Node>>,

    edges: Vec<Option<Edge>>,

    outgoing: Vec<Vec<EdgeId>>,

    incoming: Vec<Vec<EdgeId>>,

    label_index: HashMap<Label, BTreeSet<NodeId>>,

    name_index: HashMap<(Label, String), NodeId>,

    /// Remaining property writes before an injected failure
    write_budget: Option<usize>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with a single label and no properties
    pub fn create_node(&mut self, label: impl Into<Label>) -> NodeId {
        let node_id = NodeId::new(self.nodes.len() as u64);
        let label = label.into();

        self.label_index
            .entry(label.clone())
            .or_default()
            .insert(node_id);

        self.nodes.push(Some(Node::new(node_id, label)));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        node_id
    }

    /// Create a node with a label and properties
    ///
    /// A `name` property must be unique among nodes sharing the label.
    pub fn create_node_with_properties(
        &mut self,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> GraphResult<NodeId> {
        let label = label.into();
        let name = properties
            .get("name")
            .and_then(PropertyValue::as_string)
            .map(str::to_string);

        if let Some(name) = &name {
            if self.name_index.contains_key(&(label.clone(), name.clone())) {
                return Err(GraphError::DuplicateName { label, name: name.clone() });
            }
        }

        let node_id = self.create_node(label.clone());
        if let Some(slot) = self.nodes.get_mut(node_id.index()) {
            *slot = Some(Node::new_with_properties(node_id, label.clone(), properties));
        }
        if let Some(name) = name {
            self.name_index.insert((label, name), node_id);
        }
        Ok(node_id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Look a node up by label and unique name
    pub fn find_node_by_name(&self, label: &Label, name: &str) -> Option<&Node> {
        self.name_index
            .get(&(label.clone(), name.to_string()))
            .and_then(|id| self.get_node(*id))
    }

    /// Set a property on a node
    ///
    /// `name` can be assigned once and never changed afterwards.
    pub fn set_node_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let key = key.into();
        let value = value.into();

        if let Some(budget) = self.write_budget.as_mut() {
            if *budget == 0 {
                return Err(GraphError::WriteFailed(node_id));
            }
            *budget -= 1;
        }

        let node = self
            .nodes
            .get_mut(node_id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::NodeNotFound(node_id))?;

        if key == "name" {
            if node.name().is_some() {
                return Err(GraphError::ImmutableProperty { node: node_id, key });
            }
            let Some(name) = value.as_string() else {
                return Err(GraphError::ImmutableProperty { node: node_id, key });
            };
            for label in &node.labels {
                if self.name_index.contains_key(&(label.clone(), name.to_string())) {
                    return Err(GraphError::DuplicateName {
                        label: label.clone(),
                        name: name.to_string(),
                    });
                }
            }
            for label in &node.labels {
                self.name_index.insert((label.clone(), name.to_string()), node_id);
            }
        }

        Ok(node.set_property(key, value))
    }

    /// Restore a property to a previous state, bypassing injected failures
    ///
    /// Used when undoing a failed transaction.
    pub(crate) fn restore_node_property(
        &mut self,
        node_id: NodeId,
        key: &str,
        previous: Option<PropertyValue>,
    ) {
        if let Some(node) = self.nodes.get_mut(node_id.index()).and_then(Option::as_mut) {
            match previous {
                Some(value) => {
                    node.set_property(key, value);
                }
                None => {
                    node.remove_property(key);
                }
            }
        }
    }

    /// Create a directed edge with properties
    pub fn create_edge_with_properties(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }

        let edge_id = EdgeId::new(self.edges.len() as u64);
        let edge_type = edge_type.into();

        self.outgoing[source.index()].push(edge_id);
        self.incoming[target.index()].push(edge_id);

        self.edges.push(Some(Edge::new_with_properties(
            edge_id, source, target, edge_type, properties,
        )));
        Ok(edge_id)
    }

    /// Create a directed edge without properties
    pub fn create_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
    ) -> GraphResult<EdgeId> {
        self.create_edge_with_properties(source, target, edge_type, PropertyMap::new())
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    /// Outgoing edges of a node, in insertion order
    pub fn outgoing_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(node_id.index())
            .into_iter()
            .flatten()
            .filter_map(|id| self.get_edge(*id))
    }

    /// Incoming edges of a node, in insertion order
    pub fn incoming_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming
            .get(node_id.index())
            .into_iter()
            .flatten()
            .filter_map(|id| self.get_edge(*id))
    }

    /// Nodes carrying a label, ordered by id
    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.get_node(*id)).collect())
            .unwrap_or_default()
    }

    /// Labels carried by at least one node, ascending
    pub fn labels(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = self
            .label_index
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(label, _)| label)
            .collect();
        labels.sort();
        labels
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Make property writes fail once `writes` more have succeeded
    ///
    /// Simulates a store that drops out in the middle of a batch.
    pub fn fail_writes_after(&mut self, writes: usize) {
        self.write_budget = Some(writes);
    }

    pub fn clear_write_faults(&mut self) {
        self.write_budget = None;
    }
}
