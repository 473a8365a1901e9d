//! Canvas view state: camera, framing, hit testing and render scheduling.
//!
//! Graph coordinates are first fitted into the canvas through a frame
//! bounding box (the pinned custom box once an interaction has started,
//! otherwise the live extent of the graph), then the camera pan/zoom is
//! applied. [`CanvasSurface::graph_to_viewport`] and
//! [`ViewSurface::viewport_to_graph`] are exact inverses for a given frame.

use std::cell::Cell;

use super::controller::{Cursor, ViewSurface};
use super::scale::{MAX_ZOOM, MIN_ZOOM, ScaleConfig};
use super::store::GraphStore;
use super::types::{BoundingBox, EdgeId, NodeId, Point, attr};

/// Fraction of the shorter canvas side kept free around the graph.
const FRAME_PADDING: f64 = 0.1;

/// Pan and zoom transform applied on top of the fitted frame.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to MIN_ZOOM..=MAX_ZOOM).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Tracks an in-progress camera pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What lies under a viewport position.
#[derive(Clone, Debug, PartialEq)]
pub enum Pick {
	Node(NodeId),
	Edge(EdgeId),
	Stage,
}

/// [`ViewSurface`] backed by a 2D canvas.
#[derive(Debug)]
pub struct CanvasSurface {
	pub transform: ViewTransform,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub hovered: Option<NodeId>,
	pub cursor: Cursor,
	custom_frame: Option<BoundingBox>,
	auto_frame: Cell<BoundingBox>,
	dirty: bool,
}

impl CanvasSurface {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::default(),
			pan: PanState::default(),
			width,
			height,
			hovered: None,
			cursor: Cursor::Default,
			custom_frame: None,
			auto_frame: Cell::new(BoundingBox::UNIT),
			dirty: true,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.dirty = true;
	}

	/// Recomputes the automatic frame from the graph. Has no visible effect
	/// once a custom frame is pinned.
	pub fn sync_frame(&self, graph: &GraphStore) {
		self.auto_frame.set(frame_of(graph));
	}

	fn frame(&self) -> BoundingBox {
		self.custom_frame.unwrap_or_else(|| self.auto_frame.get())
	}

	/// Uniform graph-to-pixel ratio and the pixel offset of the frame center.
	fn fit(&self) -> (f64, f64, f64, Point) {
		let frame = self.frame();
		let padding = self.width.min(self.height) * FRAME_PADDING;
		let avail_w = (self.width - 2.0 * padding).max(1.0);
		let avail_h = (self.height - 2.0 * padding).max(1.0);
		let ratio = (avail_w / frame.width().max(f64::EPSILON))
			.min(avail_h / frame.height().max(f64::EPSILON));
		(ratio, self.width / 2.0, self.height / 2.0, frame.center())
	}

	pub fn graph_to_viewport(&self, p: Point) -> Point {
		let (ratio, cx, cy, center) = self.fit();
		let fitted = Point::new(
			cx + (p.x - center.x) * ratio,
			cy + (p.y - center.y) * ratio,
		);
		Point::new(
			fitted.x * self.transform.k + self.transform.x,
			fitted.y * self.transform.k + self.transform.y,
		)
	}

	/// Zooms by `factor` keeping the viewport point `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = anchor.x - (anchor.x - self.transform.x) * ratio;
		self.transform.y = anchor.y - (anchor.y - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.dirty = true;
	}

	pub fn begin_pan(&mut self, at: Point) {
		self.pan = PanState {
			active: true,
			start_x: at.x,
			start_y: at.y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Moves the camera while a pan is active; returns whether it did.
	pub fn pan_to(&mut self, at: Point) -> bool {
		if !self.pan.active {
			return false;
		}
		self.transform.x = self.pan.transform_start_x + (at.x - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (at.y - self.pan.start_y);
		self.dirty = true;
		true
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Takes the pending render request, if any.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// Classifies a viewport position. Nodes drawn last are on top and win;
	/// nodes win over edges. Hidden nodes and their edges are ignored.
	pub fn pick(&self, graph: &GraphStore, at: Point, scale: &ScaleConfig) -> Pick {
		self.sync_frame(graph);
		let k = self.transform.k;

		let mut hit = None;
		for (id, attrs) in graph.nodes() {
			if graph.is_hidden(id) {
				continue;
			}
			let Some(pos) = graph.position(id) else {
				continue;
			};
			let size = attrs.get(attr::SIZE).and_then(|v| v.as_f64());
			if self.graph_to_viewport(pos).distance(at) <= scale.hit_radius(size, k) {
				hit = Some(id);
			}
		}
		if let Some(id) = hit {
			return Pick::Node(id.to_string());
		}

		let mut best: Option<(f64, &str)> = None;
		for (id, source, target, attrs) in graph.edges() {
			if graph.is_hidden(source) || graph.is_hidden(target) {
				continue;
			}
			let (Some(a), Some(b)) = (graph.position(source), graph.position(target)) else {
				continue;
			};
			let size = attrs.get(attr::SIZE).and_then(|v| v.as_f64());
			let tolerance = scale.edge_width(size, k) / 2.0 + scale.edge.hit_tolerance;
			let d = segment_distance(at, self.graph_to_viewport(a), self.graph_to_viewport(b));
			if d <= tolerance && best.is_none_or(|(best_d, _)| d < best_d) {
				best = Some((d, id));
			}
		}
		match best {
			Some((_, id)) => Pick::Edge(id.to_string()),
			None => Pick::Stage,
		}
	}
}

impl ViewSurface for CanvasSurface {
	fn viewport_to_graph(&self, position: Point) -> Point {
		let (ratio, cx, cy, center) = self.fit();
		let fitted = Point::new(
			(position.x - self.transform.x) / self.transform.k,
			(position.y - self.transform.y) / self.transform.k,
		);
		Point::new(
			center.x + (fitted.x - cx) / ratio,
			center.y + (fitted.y - cy) / ratio,
		)
	}

	fn refresh(&mut self) {
		self.dirty = true;
	}

	fn current_bounding_box(&self, graph: &GraphStore) -> BoundingBox {
		frame_of(graph)
	}

	fn custom_bounding_box(&self) -> Option<BoundingBox> {
		self.custom_frame
	}

	fn set_custom_bounding_box(&mut self, bbox: BoundingBox) {
		self.custom_frame = Some(bbox);
	}

	fn set_cursor(&mut self, cursor: Cursor) {
		self.cursor = cursor;
	}
}

/// Graph extent, or the unit square for an empty graph. Degenerate extents
/// (single node, collinear nodes) are widened to a unit span.
fn frame_of(graph: &GraphStore) -> BoundingBox {
	let Some(mut bbox) = graph.bounding_box() else {
		return BoundingBox::UNIT;
	};
	if bbox.width() <= f64::EPSILON {
		bbox.x = (bbox.x.0 - 0.5, bbox.x.1 + 0.5);
	}
	if bbox.height() <= f64::EPSILON {
		bbox.y = (bbox.y.0 - 0.5, bbox.y.1 + 0.5);
	}
	bbox
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq <= f64::EPSILON {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::super::store::attributes;
	use super::*;

	fn graph() -> GraphStore {
		let mut g = GraphStore::new();
		for (id, x, y) in [("a", 0.0, 0.0), ("b", 1.0, 0.0), ("c", 1.0, 1.0)] {
			g.add_node(
				id,
				attributes([("x", json!(x)), ("y", json!(y)), ("size", json!(10.0))]),
			)
			.unwrap();
		}
		g.add_edge("a", "b", attributes([("size", json!(2.0))]))
			.unwrap();
		g
	}

	fn surface(g: &GraphStore) -> CanvasSurface {
		let s = CanvasSurface::new(1000.0, 1000.0);
		s.sync_frame(g);
		s
	}

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-9
	}

	#[test]
	fn graph_and_viewport_coordinates_are_inverse() {
		let g = graph();
		let mut s = surface(&g);
		s.zoom_at(Point::new(300.0, 200.0), 1.7);
		s.transform.x += 42.0;

		for p in [Point::new(0.0, 0.0), Point::new(0.3, 0.9), Point::new(-2.0, 5.0)] {
			assert!(close(s.viewport_to_graph(s.graph_to_viewport(p)), p));
		}
	}

	#[test]
	fn frame_fits_graph_with_padding() {
		let g = graph();
		let s = surface(&g);
		assert!(close(s.graph_to_viewport(Point::new(0.0, 0.0)), Point::new(100.0, 100.0)));
		assert!(close(s.graph_to_viewport(Point::new(1.0, 1.0)), Point::new(900.0, 900.0)));
	}

	#[test]
	fn pinned_frame_ignores_graph_growth() {
		let mut g = graph();
		let mut s = surface(&g);
		s.set_custom_bounding_box(s.current_bounding_box(&g));
		let before = s.graph_to_viewport(Point::new(1.0, 1.0));

		g.set_position("c", Point::new(10.0, 10.0));
		s.sync_frame(&g);

		assert!(close(s.graph_to_viewport(Point::new(1.0, 1.0)), before));
	}

	#[test]
	fn pick_prefers_nodes_then_edges_then_stage() {
		let g = graph();
		let s = surface(&g);
		let scale = ScaleConfig::default();

		assert_eq!(s.pick(&g, Point::new(102.0, 98.0), &scale), Pick::Node("a".into()));
		assert_eq!(s.pick(&g, Point::new(500.0, 102.0), &scale), Pick::Edge("e0".into()));
		assert_eq!(s.pick(&g, Point::new(500.0, 500.0), &scale), Pick::Stage);
	}

	#[test]
	fn hidden_nodes_are_not_pickable() {
		let mut g = graph();
		g.hide_node("a");
		let s = surface(&g);
		let scale = ScaleConfig::default();
		assert_eq!(s.pick(&g, Point::new(100.0, 100.0), &scale), Pick::Stage);
	}

	#[test]
	fn zoom_is_clamped() {
		let g = graph();
		let mut s = surface(&g);
		for _ in 0..100 {
			s.zoom_at(Point::new(0.0, 0.0), 1.5);
		}
		assert_eq!(s.transform.k, MAX_ZOOM);
		for _ in 0..100 {
			s.zoom_at(Point::new(0.0, 0.0), 0.5);
		}
		assert_eq!(s.transform.k, MIN_ZOOM);
	}

	#[test]
	fn refresh_requests_coalesce() {
		let g = graph();
		let mut s = surface(&g);
		assert!(s.take_dirty());
		s.refresh();
		s.refresh();
		assert!(s.take_dirty());
		assert!(!s.take_dirty());
	}

	#[test]
	fn pan_moves_camera_only_while_active() {
		let g = graph();
		let mut s = surface(&g);
		assert!(!s.pan_to(Point::new(10.0, 10.0)));
		s.begin_pan(Point::new(0.0, 0.0));
		assert!(s.pan_to(Point::new(15.0, -5.0)));
		assert_eq!((s.transform.x, s.transform.y), (15.0, -5.0));
		s.end_pan();
		assert!(!s.pan_to(Point::new(0.0, 0.0)));
	}
}
