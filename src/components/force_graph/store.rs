//! Attributed directed graph storage.
//!
//! Nodes and edges keep insertion order, which is the iteration order for
//! every scan (search, filter, layout, export). Each ordered `(source, target)`
//! pair carries at most one edge.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::warn;
use serde_json::Value;
use thiserror::Error;

use super::types::{
	Attributes, BoundingBox, EdgeId, GraphStats, NodeId, NodeMatch, NodeStats, Point, attr,
};

/// Rejected store mutations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	#[error("node not found: {0}")]
	UnknownNode(NodeId),
	#[error("node already exists: {0}")]
	DuplicateNode(NodeId),
	#[error("edge already exists: {from} -> {to}")]
	DuplicateEdge { from: NodeId, to: NodeId },
	#[error("edge id already in use: {0}")]
	DuplicateEdgeId(EdgeId),
	#[error("attribute key is reserved for export records: {0}")]
	ReservedAttribute(String),
}

/// First attribute key that would collide with an export record field.
fn reserved_key<'a>(attributes: &'a Attributes, reserved: &[&str]) -> Option<&'a String> {
	attributes.keys().find(|k| reserved.contains(&k.as_str()))
}

#[derive(Clone, Debug, Default)]
struct NodeEntry {
	attributes: Attributes,
	out_edges: IndexSet<EdgeId>,
	in_edges: IndexSet<EdgeId>,
}

#[derive(Clone, Debug)]
struct EdgeEntry {
	source: NodeId,
	target: NodeId,
	attributes: Attributes,
}

/// Mutable attributed graph. Owns no rendering state.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: IndexMap<NodeId, NodeEntry>,
	edges: IndexMap<EdgeId, EdgeEntry>,
	pairs: HashMap<(NodeId, NodeId), EdgeId>,
	next_edge: usize,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of nodes.
	pub fn order(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn size(&self) -> usize {
		self.edges.len()
	}

	pub fn has_node(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	/// Whether a directed edge `source -> target` exists.
	pub fn has_edge(&self, source: &str, target: &str) -> bool {
		self.edge_between(source, target).is_some()
	}

	pub fn has_edge_id(&self, edge: &str) -> bool {
		self.edges.contains_key(edge)
	}

	pub fn add_node(&mut self, id: impl Into<NodeId>, attributes: Attributes) -> Result<(), GraphError> {
		let id = id.into();
		if self.nodes.contains_key(&id) {
			return Err(GraphError::DuplicateNode(id));
		}
		if let Some(key) = reserved_key(&attributes, attr::NODE_RESERVED) {
			return Err(GraphError::ReservedAttribute(key.clone()));
		}
		self.nodes.insert(
			id,
			NodeEntry {
				attributes,
				..NodeEntry::default()
			},
		);
		Ok(())
	}

	/// Adds the node if absent, otherwise merges `attributes` into it.
	/// Reserved keys are dropped.
	pub fn merge_node(&mut self, id: impl Into<NodeId>, mut attributes: Attributes) {
		attributes.retain(|key, _| {
			let reserved = attr::NODE_RESERVED.contains(&key.as_str());
			if reserved {
				warn!("dropping reserved node attribute {key}");
			}
			!reserved
		});
		self.nodes
			.entry(id.into())
			.or_default()
			.attributes
			.extend(attributes);
	}

	/// Adds a directed edge with a generated id.
	pub fn add_edge(
		&mut self,
		source: &str,
		target: &str,
		attributes: Attributes,
	) -> Result<EdgeId, GraphError> {
		let id = self.fresh_edge_id(|_| false);
		self.add_edge_with_id(id, source, target, attributes)
	}

	pub fn add_edge_with_id(
		&mut self,
		id: impl Into<EdgeId>,
		source: &str,
		target: &str,
		attributes: Attributes,
	) -> Result<EdgeId, GraphError> {
		let id = id.into();
		for endpoint in [source, target] {
			if !self.has_node(endpoint) {
				return Err(GraphError::UnknownNode(endpoint.to_string()));
			}
		}
		if self.has_edge(source, target) {
			return Err(GraphError::DuplicateEdge {
				from: source.to_string(),
				to: target.to_string(),
			});
		}
		if self.edges.contains_key(&id) {
			return Err(GraphError::DuplicateEdgeId(id));
		}
		if let Some(key) = reserved_key(&attributes, attr::EDGE_RESERVED) {
			return Err(GraphError::ReservedAttribute(key.clone()));
		}

		if let Some(entry) = self.nodes.get_mut(source) {
			entry.out_edges.insert(id.clone());
		}
		if let Some(entry) = self.nodes.get_mut(target) {
			entry.in_edges.insert(id.clone());
		}
		self.pairs
			.insert((source.to_string(), target.to_string()), id.clone());
		self.edges.insert(
			id.clone(),
			EdgeEntry {
				source: source.to_string(),
				target: target.to_string(),
				attributes,
			},
		);
		Ok(id)
	}

	/// Next `e{n}` id that is neither in use nor `taken`.
	pub(super) fn fresh_edge_id(&mut self, taken: impl Fn(&str) -> bool) -> EdgeId {
		loop {
			let id = format!("e{}", self.next_edge);
			self.next_edge += 1;
			if !self.edges.contains_key(&id) && !taken(&id) {
				return id;
			}
		}
	}

	/// Removes a node and every edge touching it.
	pub fn drop_node(&mut self, id: &str) -> bool {
		let Some(entry) = self.nodes.get(id) else {
			return false;
		};
		let incident: Vec<EdgeId> = entry
			.out_edges
			.iter()
			.chain(entry.in_edges.iter())
			.cloned()
			.collect();
		for edge in incident {
			self.drop_edge_id(&edge);
		}
		self.nodes.shift_remove(id);
		true
	}

	pub fn drop_edge(&mut self, source: &str, target: &str) -> bool {
		match self.edge_between(source, target).cloned() {
			Some(edge) => self.drop_edge_id(&edge),
			None => false,
		}
	}

	pub fn drop_edge_id(&mut self, edge: &str) -> bool {
		let Some(entry) = self.edges.shift_remove(edge) else {
			return false;
		};
		self.pairs
			.remove(&(entry.source.clone(), entry.target.clone()));
		if let Some(node) = self.nodes.get_mut(&entry.source) {
			node.out_edges.shift_remove(edge);
		}
		if let Some(node) = self.nodes.get_mut(&entry.target) {
			node.in_edges.shift_remove(edge);
		}
		true
	}

	/// Removes every node and edge.
	pub fn clear(&mut self) {
		*self = Self::default();
	}

	pub fn node_attributes(&self, id: &str) -> Option<&Attributes> {
		self.nodes.get(id).map(|n| &n.attributes)
	}

	pub fn node_attribute(&self, id: &str, key: &str) -> Option<&Value> {
		self.node_attributes(id)?.get(key)
	}

	/// Sets an attribute; returns `false` when the node does not exist or
	/// the key is reserved.
	pub fn set_node_attribute(&mut self, id: &str, key: &str, value: impl Into<Value>) -> bool {
		if attr::NODE_RESERVED.contains(&key) {
			warn!("refusing reserved node attribute {key} on {id}");
			return false;
		}
		match self.nodes.get_mut(id) {
			Some(entry) => {
				entry.attributes.insert(key.to_string(), value.into());
				true
			}
			None => false,
		}
	}

	pub fn remove_node_attribute(&mut self, id: &str, key: &str) -> Option<Value> {
		self.nodes.get_mut(id)?.attributes.shift_remove(key)
	}

	pub fn edge_attributes(&self, edge: &str) -> Option<&Attributes> {
		self.edges.get(edge).map(|e| &e.attributes)
	}

	pub fn edge_attribute(&self, edge: &str, key: &str) -> Option<&Value> {
		self.edge_attributes(edge)?.get(key)
	}

	pub fn set_edge_attribute(&mut self, edge: &str, key: &str, value: impl Into<Value>) -> bool {
		if attr::EDGE_RESERVED.contains(&key) {
			warn!("refusing reserved edge attribute {key} on {edge}");
			return false;
		}
		match self.edges.get_mut(edge) {
			Some(entry) => {
				entry.attributes.insert(key.to_string(), value.into());
				true
			}
			None => false,
		}
	}

	/// `(source, target)` of an edge.
	pub fn edge_endpoints(&self, edge: &str) -> Option<(&str, &str)> {
		self.edges
			.get(edge)
			.map(|e| (e.source.as_str(), e.target.as_str()))
	}

	pub fn edge_between(&self, source: &str, target: &str) -> Option<&EdgeId> {
		self.pairs.get(&(source.to_string(), target.to_string()))
	}

	/// In- and out-neighbors, de-duplicated in first-seen order. A self-loop
	/// does not make a node its own neighbor.
	pub fn neighbors(&self, id: &str) -> Vec<NodeId> {
		let Some(entry) = self.nodes.get(id) else {
			return Vec::new();
		};
		let mut seen = IndexSet::new();
		for edge in &entry.out_edges {
			if let Some(e) = self.edges.get(edge) {
				seen.insert(e.target.as_str());
			}
		}
		for edge in &entry.in_edges {
			if let Some(e) = self.edges.get(edge) {
				seen.insert(e.source.as_str());
			}
		}
		seen.shift_remove(id);
		seen.into_iter().map(str::to_string).collect()
	}

	pub fn in_degree(&self, id: &str) -> usize {
		self.nodes.get(id).map_or(0, |n| n.in_edges.len())
	}

	pub fn out_degree(&self, id: &str) -> usize {
		self.nodes.get(id).map_or(0, |n| n.out_edges.len())
	}

	pub fn degree(&self, id: &str) -> usize {
		self.in_degree(id) + self.out_degree(id)
	}

	pub fn node_ids(&self) -> impl Iterator<Item = &str> {
		self.nodes.keys().map(String::as_str)
	}

	pub fn nodes(&self) -> impl Iterator<Item = (&str, &Attributes)> {
		self.nodes
			.iter()
			.map(|(id, entry)| (id.as_str(), &entry.attributes))
	}

	/// `(id, source, target, attributes)` for every edge.
	pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str, &Attributes)> {
		self.edges.iter().map(|(id, e)| {
			(
				id.as_str(),
				e.source.as_str(),
				e.target.as_str(),
				&e.attributes,
			)
		})
	}

	pub fn position(&self, id: &str) -> Option<Point> {
		let attrs = self.node_attributes(id)?;
		Some(Point::new(
			attrs.get(attr::X)?.as_f64()?,
			attrs.get(attr::Y)?.as_f64()?,
		))
	}

	pub fn set_position(&mut self, id: &str, point: Point) -> bool {
		let Some(entry) = self.nodes.get_mut(id) else {
			return false;
		};
		entry.attributes.insert(attr::X.into(), point.x.into());
		entry.attributes.insert(attr::Y.into(), point.y.into());
		true
	}

	fn flag(&self, id: &str, key: &str) -> bool {
		self.node_attribute(id, key)
			.and_then(Value::as_bool)
			.unwrap_or(false)
	}

	pub fn is_hidden(&self, id: &str) -> bool {
		self.flag(id, attr::HIDDEN)
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		self.flag(id, attr::HIGHLIGHTED)
	}

	pub fn is_dragging(&self, id: &str) -> bool {
		self.flag(id, attr::DRAGGING)
	}

	/// Extent of all visible, positioned nodes.
	pub fn bounding_box(&self) -> Option<BoundingBox> {
		BoundingBox::from_points(
			self.node_ids()
				.filter(|id| !self.is_hidden(id))
				.filter_map(|id| self.position(id)),
		)
	}

	pub fn hide_node(&mut self, id: &str) -> bool {
		self.set_node_attribute(id, attr::HIDDEN, true)
	}

	pub fn show_node(&mut self, id: &str) -> bool {
		self.set_node_attribute(id, attr::HIDDEN, false)
	}

	/// Nodes whose `label` contains `query`, ignoring case.
	pub fn search_nodes(&self, query: &str) -> Vec<NodeMatch<'_>> {
		let query = query.to_lowercase();
		self.nodes()
			.filter(|(_, attrs)| {
				attrs
					.get(attr::LABEL)
					.and_then(Value::as_str)
					.is_some_and(|label| label.to_lowercase().contains(&query))
			})
			.map(|(id, attributes)| NodeMatch { id, attributes })
			.collect()
	}

	/// Nodes whose attribute `key` equals `value` exactly.
	pub fn filter_nodes_by_attribute(&self, key: &str, value: &Value) -> Vec<NodeMatch<'_>> {
		self.nodes()
			.filter(|(_, attrs)| attrs.get(key) == Some(value))
			.map(|(id, attributes)| NodeMatch { id, attributes })
			.collect()
	}

	pub fn stats(&self) -> GraphStats {
		let (order, size) = (self.order() as f64, self.size() as f64);
		GraphStats {
			node_count: self.order(),
			edge_count: self.size(),
			density: if self.order() > 1 {
				2.0 * size / (order * (order - 1.0))
			} else {
				0.0
			},
			average_degree: if self.order() > 0 {
				2.0 * size / order
			} else {
				0.0
			},
		}
	}

	pub fn node_stats(&self, id: &str) -> Option<NodeStats> {
		if !self.has_node(id) {
			return None;
		}
		Some(NodeStats {
			degree: self.degree(id),
			in_degree: self.in_degree(id),
			out_degree: self.out_degree(id),
			neighbors: self.neighbors(id),
		})
	}
}

/// Builds an attribute map from `(key, value)` pairs.
pub fn attributes<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Attributes
where
	K: Into<String>,
	V: Into<Value>,
{
	pairs
		.into_iter()
		.map(|(k, v)| (k.into(), v.into()))
		.collect()
}
