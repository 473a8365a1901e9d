//! Random demo data.

use serde_json::json;

use super::layout::pseudo_random;
use super::store::{GraphStore, attributes};

/// Node categories and their colors.
pub const CATEGORIES: [(&str, &str); 4] = [
	("A", "#ff6b6b"),
	("B", "#4ecdc4"),
	("C", "#45b7d1"),
	("D", "#96ceb4"),
];

/// Small deterministic generator over [`pseudo_random`].
struct Draw {
	seed: f64,
	counter: f64,
}

impl Draw {
	fn new(seed: u32) -> Self {
		Self {
			seed: seed as f64 * 7919.0 + 1.0,
			counter: 0.0,
		}
	}

	fn next(&mut self) -> f64 {
		self.counter += 1.0;
		pseudo_random(self.seed + self.counter * 0.618)
	}

	fn below(&mut self, n: usize) -> usize {
		((self.next() * n as f64) as usize).min(n.saturating_sub(1))
	}
}

/// Adds `node_count` categorized nodes `node-0..` and a few weighted edges
/// from each node but the last. Self-loops and existing pairs are skipped.
/// Deterministic for a given `seed`.
pub fn generate_sample_graph(graph: &mut GraphStore, node_count: usize, seed: u32) {
	let mut draw = Draw::new(seed);

	for i in 0..node_count {
		let (category, color) = CATEGORIES[draw.below(CATEGORIES.len())];
		graph.merge_node(
			format!("node-{i}"),
			attributes([
				("label", json!(format!("Node {i}"))),
				("size", json!(draw.next() * 10.0 + 5.0)),
				("color", json!(color)),
				("category", json!(category)),
				("x", json!(draw.next())),
				("y", json!(draw.next())),
			]),
		);
	}

	for i in 0..node_count.saturating_sub(1) {
		let connections = draw.below(3) + 1;
		for _ in 0..connections {
			let target = draw.below(node_count);
			let (source, target) = (format!("node-{i}"), format!("node-{target}"));
			if source == target || graph.has_edge(&source, &target) {
				continue;
			}
			let weight = draw.next();
			let _ = graph.add_edge(
				&source,
				&target,
				attributes([
					("label", json!(format!("{weight:.2}"))),
					("weight", json!(weight)),
					("size", json!(weight * 3.0)),
					("color", json!(format!("rgba(200, 200, 200, {weight})"))),
				]),
			);
		}
	}
}
