//! JSON export and import of the whole graph.
//!
//! Import has clear-then-rebuild semantics but is atomic: the payload is fully
//! validated into a fresh store before the current contents are replaced.

use std::collections::HashSet;

use thiserror::Error;

use super::store::{GraphError, GraphStore};
use super::types::{EdgeId, EdgeRecord, GraphExport, NodeId, NodeRecord};

/// Reasons an import payload is refused. The store is unchanged in every case.
#[derive(Debug, Error)]
pub enum ImportError {
	#[error("malformed graph JSON: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("duplicate node id: {0}")]
	DuplicateNode(NodeId),
	#[error("duplicate edge: {from} -> {to}")]
	DuplicateEdge { from: NodeId, to: NodeId },
	#[error("duplicate edge id: {0}")]
	DuplicateEdgeId(EdgeId),
	#[error("reserved attribute key: {0}")]
	ReservedAttribute(String),
	#[error("edge {edge} references missing node {node}")]
	MissingEndpoint { edge: String, node: NodeId },
	#[error("cannot import while a node is being dragged")]
	DragInProgress,
}

impl GraphStore {
	/// Snapshot of every node and edge in insertion order.
	pub fn export(&self) -> GraphExport {
		GraphExport {
			nodes: self
				.nodes()
				.map(|(id, attributes)| NodeRecord {
					id: id.to_string(),
					attributes: attributes.clone(),
				})
				.collect(),
			edges: self
				.edges()
				.map(|(id, source, target, attributes)| EdgeRecord {
					id: Some(id.to_string()),
					source: source.to_string(),
					target: target.to_string(),
					attributes: attributes.clone(),
				})
				.collect(),
		}
	}

	pub fn export_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(&self.export())
	}

	/// Replaces the current contents with `data`.
	pub fn import(&mut self, data: GraphExport) -> Result<(), ImportError> {
		*self = Self::build(data)?;
		Ok(())
	}

	pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
		let data: GraphExport = serde_json::from_str(json)?;
		self.import(data)
	}

	fn build(data: GraphExport) -> Result<Self, ImportError> {
		let mut graph = GraphStore::new();
		for node in data.nodes {
			graph.add_node(node.id, node.attributes)?;
		}

		// Explicit ids are reserved up front so generated ids never take one.
		let mut reserved = HashSet::new();
		for edge in &data.edges {
			if let Some(id) = &edge.id {
				if !reserved.insert(id.clone()) {
					return Err(ImportError::DuplicateEdgeId(id.clone()));
				}
			}
		}

		for edge in data.edges {
			let id = match &edge.id {
				Some(id) => id.clone(),
				None => graph.fresh_edge_id(|id| reserved.contains(id)),
			};
			add_record(&mut graph, id, edge)?;
		}
		Ok(graph)
	}
}

fn add_record(graph: &mut GraphStore, id: EdgeId, edge: EdgeRecord) -> Result<(), ImportError> {
	let label = edge
		.id
		.clone()
		.unwrap_or_else(|| format!("{} -> {}", edge.source, edge.target));
	graph
		.add_edge_with_id(id, &edge.source, &edge.target, edge.attributes)
		.map_err(|e| match e {
			GraphError::UnknownNode(node) => ImportError::MissingEndpoint { edge: label, node },
			other => ImportError::from(other),
		})?;
	Ok(())
}

impl From<GraphError> for ImportError {
	fn from(err: GraphError) -> Self {
		match err {
			GraphError::DuplicateNode(id) => ImportError::DuplicateNode(id),
			GraphError::DuplicateEdge { from, to } => ImportError::DuplicateEdge { from, to },
			GraphError::DuplicateEdgeId(id) => ImportError::DuplicateEdgeId(id),
			GraphError::ReservedAttribute(key) => ImportError::ReservedAttribute(key),
			GraphError::UnknownNode(node) => ImportError::MissingEndpoint {
				edge: String::new(),
				node,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;

	use super::super::layout::{LayoutEngine, RandomLayout, pseudo_random};
	use super::super::store::attributes;
	use super::super::types::Attributes;
	use super::*;

	fn weight(i: usize) -> f64 {
		pseudo_random(i as f64 * 3.3 + 0.7)
	}

	fn graph_with(n: usize) -> GraphStore {
		let mut g = GraphStore::new();
		for i in 0..n {
			g.add_node(
				format!("node-{i}"),
				attributes([
					("label", json!(format!("Node {i}"))),
					("x", json!(pseudo_random(i as f64 + 0.1))),
					("y", json!(pseudo_random(i as f64 + 0.2))),
					("color", json!("#3388ff")),
				]),
			)
			.unwrap();
		}
		for i in 1..n {
			g.add_edge(
				&format!("node-{i}"),
				&format!("node-{}", i - 1),
				attributes([("weight", json!(weight(i)))]),
			)
			.unwrap();
		}
		g
	}

	#[rstest]
	#[case(0)]
	#[case(1)]
	#[case(5)]
	fn export_then_import_reproduces_graph(#[case] n: usize) {
		let original = graph_with(n);
		let json = original.export_json().unwrap();

		let mut restored = GraphStore::new();
		restored.import_json(&json).unwrap();

		assert_eq!(restored.export(), original.export());
		assert_eq!(restored.order(), n);
		assert_eq!(restored.size(), n.saturating_sub(1));
	}

	#[test]
	fn laid_out_positions_survive_json_exactly() {
		let mut original = GraphStore::new();
		for i in 0..500 {
			original.add_node(format!("n{i}"), Attributes::new()).unwrap();
		}
		RandomLayout { seed: 11 }.assign(&mut original);

		let mut restored = GraphStore::new();
		restored
			.import_json(&original.export_json().unwrap())
			.unwrap();

		for id in original.node_ids() {
			let (a, b) = (original.position(id).unwrap(), restored.position(id).unwrap());
			assert_eq!(a.x.to_bits(), b.x.to_bits(), "x of {id}");
			assert_eq!(a.y.to_bits(), b.y.to_bits(), "y of {id}");
		}
	}

	#[test]
	fn reserved_keys_never_reach_the_export() {
		let mut g = GraphStore::new();
		assert_eq!(
			g.add_node("a", attributes([("id", "legacy")])),
			Err(GraphError::ReservedAttribute("id".into()))
		);
		g.merge_node("a", attributes([("id", json!("legacy")), ("label", json!("A"))]));
		g.merge_node("b", Attributes::new());
		assert!(!g.set_node_attribute("a", "id", "legacy"));
		let edge = g.add_edge("a", "b", Attributes::new()).unwrap();
		assert!(!g.set_edge_attribute(&edge, "source", "z"));
		assert!(g.add_edge("b", "a", attributes([("target", "z")])).is_err());

		let mut restored = GraphStore::new();
		restored.import_json(&g.export_json().unwrap()).unwrap();
		assert_eq!(restored.export(), g.export());
		assert_eq!(restored.node_attribute("a", "label"), Some(&json!("A")));
		assert!(restored.node_attribute("a", "id").is_none());
	}

	#[test]
	fn mixed_edge_ids_keep_payload_order() {
		let mut g = GraphStore::new();
		g.import_json(
			r#"{"nodes":[{"id":"a"},{"id":"b"},{"id":"c"}],
			   "edges":[{"source":"a","target":"b"},
			            {"id":"e0","source":"b","target":"c"},
			            {"source":"c","target":"a"}]}"#,
		)
		.unwrap();

		let order: Vec<(&str, &str, &str)> = g.edges().map(|(id, s, t, _)| (id, s, t)).collect();
		assert_eq!(
			order,
			vec![("e1", "a", "b"), ("e0", "b", "c"), ("e2", "c", "a")]
		);
	}

	#[test]
	fn export_flattens_attributes() {
		let g = graph_with(2);
		let value = serde_json::to_value(g.export()).unwrap();
		assert_eq!(value["nodes"][0]["id"], json!("node-0"));
		assert_eq!(value["nodes"][0]["label"], json!("Node 0"));
		assert_eq!(value["edges"][0]["source"], json!("node-1"));
		assert_eq!(value["edges"][0]["weight"], json!(weight(1)));
	}

	#[test]
	fn import_replaces_rather_than_merges() {
		let mut g = graph_with(4);
		g.import_json(r#"{"nodes":[{"id":"solo","color":"red"}],"edges":[]}"#)
			.unwrap();
		assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["solo"]);
		assert_eq!(g.size(), 0);
	}

	#[test]
	fn edges_without_ids_get_generated_ones() {
		let mut g = GraphStore::new();
		g.import_json(
			r#"{"nodes":[{"id":"a"},{"id":"b"}],
			   "edges":[{"source":"a","target":"b"},{"id":"e0","source":"b","target":"a"}]}"#,
		)
		.unwrap();
		assert_eq!(g.edge_endpoints("e0"), Some(("b", "a")));
		assert!(g.has_edge("a", "b"));
		assert_eq!(g.size(), 2);
	}

	#[rstest]
	#[case::not_json("{nodes: oops")]
	#[case::wrong_shape(r#"{"nodes": 3, "edges": []}"#)]
	#[case::missing_endpoint(r#"{"nodes":[{"id":"a"}],"edges":[{"source":"a","target":"ghost"}]}"#)]
	#[case::duplicate_node(r#"{"nodes":[{"id":"a"},{"id":"a"}],"edges":[]}"#)]
	#[case::duplicate_pair(
		r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"source":"a","target":"b"},{"source":"a","target":"b"}]}"#
	)]
	#[case::duplicate_edge_id(
		r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"id":"x","source":"a","target":"b"},{"id":"x","source":"b","target":"a"}]}"#
	)]
	fn rejected_import_leaves_store_untouched(#[case] payload: &str) {
		let mut g = graph_with(3);
		let before = g.export();

		assert!(g.import_json(payload).is_err());

		assert_eq!(g.export(), before);
	}

	#[test]
	fn missing_endpoint_names_the_node() {
		let mut g = GraphStore::new();
		let err = g
			.import_json(r#"{"nodes":[{"id":"a"}],"edges":[{"id":"e9","source":"a","target":"ghost"}]}"#)
			.unwrap_err();
		match err {
			ImportError::MissingEndpoint { edge, node } => {
				assert_eq!(edge, "e9");
				assert_eq!(node, "ghost");
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
