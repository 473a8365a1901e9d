//! On-demand layout algorithms.
//!
//! Every engine writes `x`/`y` into the unit square, so a viewport frame
//! pinned during an earlier interaction stays meaningful after re-layout.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::store::GraphStore;
use super::types::{BoundingBox, Point};

/// Assigns positions to every node of a graph.
pub trait LayoutEngine {
	fn name(&self) -> &str;
	fn assign(&self, graph: &mut GraphStore);
}

/// Deterministic hash-based pseudo-random value in `[0, 1)`.
pub fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// Nodes evenly spaced on a circle in insertion order.
#[derive(Clone, Debug)]
pub struct CircularLayout {
	pub center: Point,
	pub radius: f64,
}

impl Default for CircularLayout {
	fn default() -> Self {
		Self {
			center: Point::new(0.5, 0.5),
			radius: 0.5,
		}
	}
}

impl LayoutEngine for CircularLayout {
	fn name(&self) -> &str {
		"circular"
	}

	fn assign(&self, graph: &mut GraphStore) {
		let ids: Vec<String> = graph.node_ids().map(str::to_string).collect();
		let n = ids.len() as f64;
		for (i, id) in ids.iter().enumerate() {
			let angle = i as f64 * 2.0 * PI / n;
			graph.set_position(
				id,
				Point::new(
					self.center.x + self.radius * angle.cos(),
					self.center.y + self.radius * angle.sin(),
				),
			);
		}
	}
}

/// Uniformly scattered positions, reproducible for a given seed.
#[derive(Clone, Debug, Default)]
pub struct RandomLayout {
	pub seed: u32,
}

impl LayoutEngine for RandomLayout {
	fn name(&self) -> &str {
		"random"
	}

	fn assign(&self, graph: &mut GraphStore) {
		let ids: Vec<String> = graph.node_ids().map(str::to_string).collect();
		let offset = self.seed as f64 * 101.0;
		for (i, id) in ids.iter().enumerate() {
			let seed = offset + i as f64 + 1.0;
			graph.set_position(
				id,
				Point::new(pseudo_random(seed * 1.1), pseudo_random(seed * 2.3)),
			);
		}
	}
}

/// Physics settings handed to the `force_graph` simulation.
#[derive(Clone, Debug)]
pub struct ForceSettings {
	pub charge: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
}

impl Default for ForceSettings {
	fn default() -> Self {
		Self {
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
		}
	}
}

impl ForceSettings {
	fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.charge,
			force_spring: self.spring,
			force_max: self.max_force,
			node_speed: self.node_speed,
			damping_factor: self.damping,
		}
	}
}

/// Runs the `force_graph` simulation for a fixed number of steps, seeded from
/// current positions, then rescales the result into the unit square.
#[derive(Clone, Debug)]
pub struct ForceLayout {
	pub iterations: usize,
	/// Seconds of simulated time per step.
	pub step: f32,
	pub settings: ForceSettings,
}

impl Default for ForceLayout {
	fn default() -> Self {
		Self {
			iterations: 500,
			step: 0.016,
			settings: ForceSettings::default(),
		}
	}
}

/// Span of simulation coordinates the unit square is seeded into.
const SEED_SPREAD: f64 = 400.0;

impl LayoutEngine for ForceLayout {
	fn name(&self) -> &str {
		"force"
	}

	fn assign(&self, graph: &mut GraphStore) {
		if graph.order() == 0 {
			return;
		}
		let ids: Vec<String> = graph.node_ids().map(str::to_string).collect();
		let mut sim: ForceGraph<usize, ()> = ForceGraph::new(self.settings.parameters());
		let mut index = HashMap::new();

		for (i, id) in ids.iter().enumerate() {
			// Jitter avoids coincident nodes, which the charge force cannot separate.
			let seed = i as f64 + 1.0;
			let start = graph.position(id).unwrap_or_else(|| {
				Point::new(pseudo_random(seed * 1.1), pseudo_random(seed * 2.3))
			});
			let jitter = (pseudo_random(seed * 3.7) - 0.5) * 1e-3;
			let idx = sim.add_node(NodeData {
				x: ((start.x + jitter) * SEED_SPREAD) as f32,
				y: ((start.y - jitter) * SEED_SPREAD) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			});
			index.insert(id.as_str(), idx);
		}
		for (_, source, target, _) in graph.edges() {
			if source == target {
				continue;
			}
			if let (Some(&s), Some(&t)) = (index.get(source), index.get(target)) {
				sim.add_edge(s, t, EdgeData::default());
			}
		}

		for _ in 0..self.iterations {
			sim.update(self.step);
		}

		let mut positions = vec![Point::default(); ids.len()];
		sim.visit_nodes(|node| {
			positions[node.data.user_data] = Point::new(node.x() as f64, node.y() as f64);
		});
		let bbox = BoundingBox::from_points(positions.iter().copied())
			.filter(|b| b.width().is_finite() && b.height().is_finite());
		let Some(bbox) = bbox else {
			return;
		};
		// Uniform scale keeps the simulated aspect ratio.
		let extent = bbox.width().max(bbox.height());
		for (id, p) in ids.iter().zip(positions) {
			let unit = if extent > f64::EPSILON {
				Point::new(
					0.5 + (p.x - bbox.center().x) / extent,
					0.5 + (p.y - bbox.center().y) / extent,
				)
			} else {
				Point::new(0.5, 0.5)
			};
			graph.set_position(id, unit);
		}
	}
}
