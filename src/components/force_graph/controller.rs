//! Pointer interaction and highlight policy.
//!
//! The surface classifies raw input (what is under the pointer) and hands the
//! result to [`InteractionController::dispatch`]. The controller mutates the
//! graph under a fixed policy and asks the surface for a re-render once per
//! observable change:
//!
//! - click on a node selects it: previous highlights are restored, the node
//!   gets the primary color and its neighbors the secondary color;
//! - click on the stage clears every highlight;
//! - pointer-down on a node starts a drag, moves update its `x`/`y` and are
//!   consumed so the surface does not pan, pointer-up ends it.
//!
//! Selection highlight (`highlighted` + `originalColor`) and drag feedback
//! (`dragging`) are separate attributes, so ending a drag never disturbs a
//! selection on the same node.

use log::{debug, info, warn};
use serde_json::Value;

use super::layout::{LayoutEngine, pseudo_random};
use super::persist::ImportError;
use super::store::{GraphStore, attributes};
use super::types::{
	Attributes, BoundingBox, EdgeId, GraphExport, GraphStats, NodeId, NodeMatch, NodeStats, Point,
	attr,
};

/// Pointer cursor shown by the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
	#[default]
	Default,
	Pointer,
}

/// What the controller needs from a renderer.
pub trait ViewSurface {
	/// Converts a viewport (pixel) position into graph coordinates.
	fn viewport_to_graph(&self, position: Point) -> Point;
	/// Requests a re-render. Fire-and-forget; the surface may coalesce.
	fn refresh(&mut self);
	/// The frame the surface would currently fit the graph into.
	fn current_bounding_box(&self, graph: &GraphStore) -> BoundingBox;
	fn custom_bounding_box(&self) -> Option<BoundingBox>;
	/// Pins the frame so moving nodes no longer rescales the view.
	fn set_custom_bounding_box(&mut self, bbox: BoundingBox);
	fn set_cursor(&mut self, cursor: Cursor);
}

/// Classified input events.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
	PointerDownOnNode(NodeId),
	PointerDownOnEdge(EdgeId),
	PointerDownOnStage,
	/// Raw viewport position.
	PointerMove(Point),
	PointerUp,
	ClickNode(NodeId),
	ClickEdge(EdgeId),
	ClickStage,
	HoverEnterNode(NodeId),
	HoverLeaveNode(NodeId),
}

/// Whether the surface should run its default reaction (pan/zoom) for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
	Continue,
	Consumed,
}

/// An in-progress node reposition.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
	pub node: NodeId,
	pub active: bool,
}

/// Colors and defaults applied by the controller.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
	pub primary_color: String,
	pub secondary_color: String,
	pub default_node_color: String,
	pub default_node_size: f64,
	pub default_edge_color: String,
	pub default_edge_size: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			primary_color: "#ff0000".into(),
			secondary_color: "#ffa500".into(),
			default_node_color: "#3388ff".into(),
			default_node_size: 10.0,
			default_edge_color: "#cccccc".into(),
			default_edge_size: 2.0,
		}
	}
}

/// Mediates between surface input and graph mutation.
pub struct InteractionController<S: ViewSurface> {
	graph: GraphStore,
	surface: S,
	config: InteractionConfig,
	drag: Option<DragSession>,
	placements: u64,
}

impl<S: ViewSurface> InteractionController<S> {
	pub fn new(graph: GraphStore, surface: S, config: InteractionConfig) -> Self {
		Self {
			graph,
			surface,
			config,
			drag: None,
			placements: 0,
		}
	}

	pub fn graph(&self) -> &GraphStore {
		&self.graph
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}

	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	pub fn drag_session(&self) -> Option<&DragSession> {
		self.drag.as_ref()
	}

	/// Routes one classified event to its handler.
	pub fn dispatch(&mut self, event: InteractionEvent) -> Propagation {
		match event {
			InteractionEvent::PointerDownOnNode(node) => {
				self.set_base_viewport();
				self.begin_drag(&node);
				Propagation::Continue
			}
			InteractionEvent::PointerDownOnEdge(_) | InteractionEvent::PointerDownOnStage => {
				self.set_base_viewport();
				Propagation::Continue
			}
			InteractionEvent::PointerMove(raw) => {
				if self.drag.is_none() {
					return Propagation::Continue;
				}
				let position = self.surface.viewport_to_graph(raw);
				self.update_drag(position)
			}
			InteractionEvent::PointerUp => {
				self.end_drag();
				Propagation::Continue
			}
			InteractionEvent::ClickNode(node) => {
				self.handle_node_click(&node);
				Propagation::Continue
			}
			InteractionEvent::ClickEdge(edge) => {
				self.handle_edge_click(&edge);
				Propagation::Continue
			}
			InteractionEvent::ClickStage => {
				self.handle_stage_click();
				Propagation::Continue
			}
			InteractionEvent::HoverEnterNode(_) => {
				self.surface.set_cursor(Cursor::Pointer);
				Propagation::Continue
			}
			InteractionEvent::HoverLeaveNode(_) => {
				self.surface.set_cursor(Cursor::Default);
				Propagation::Continue
			}
		}
	}

	/// Selects `node`: clears previous highlights, then highlights the node
	/// and its neighbors. Renders once.
	pub fn handle_node_click(&mut self, node: &str) {
		if !self.graph.has_node(node) {
			warn!("click on unknown node {node}");
			return;
		}
		let neighbors = self.graph.neighbors(node);
		info!("clicked node {node}, neighbors: {neighbors:?}");

		self.clear_highlights_silently();
		let primary = self.config.primary_color.clone();
		let secondary = self.config.secondary_color.clone();
		self.apply_highlight(node, &primary);
		for neighbor in &neighbors {
			self.apply_highlight(neighbor, &secondary);
		}
		self.surface.refresh();
	}

	/// Returns the edge attributes for inspection. Read-only.
	pub fn handle_edge_click(&self, edge: &str) -> Option<Attributes> {
		match self.graph.edge_attributes(edge) {
			Some(attrs) => {
				info!("clicked edge {edge}, attributes: {}", Value::Object(attrs.clone()));
				Some(attrs.clone())
			}
			None => {
				warn!("click on unknown edge {edge}");
				None
			}
		}
	}

	/// Clears every highlight; renders only if something was highlighted.
	pub fn handle_stage_click(&mut self) {
		debug!("clicked stage");
		self.clear_highlights();
	}

	pub fn clear_highlights(&mut self) {
		if self.clear_highlights_silently() > 0 {
			self.surface.refresh();
		}
	}

	fn clear_highlights_silently(&mut self) -> usize {
		let highlighted = self.highlighted_nodes();
		for node in &highlighted {
			self.restore_highlight(node);
		}
		highlighted.len()
	}

	/// Ids of selection-highlighted nodes, in graph order.
	pub fn highlighted_nodes(&self) -> Vec<NodeId> {
		self.graph
			.node_ids()
			.filter(|id| self.graph.is_highlighted(id))
			.map(str::to_string)
			.collect()
	}

	pub fn highlight_node(&mut self, node: &str, color: &str) {
		if self.apply_highlight(node, color) {
			self.surface.refresh();
		}
	}

	/// Highlights every node in `path` with `color`. Renders once.
	pub fn highlight_path<I, T>(&mut self, path: I, color: &str)
	where
		I: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut changed = false;
		for node in path {
			changed |= self.apply_highlight(node.as_ref(), color);
		}
		if changed {
			self.surface.refresh();
		}
	}

	/// The first captured `originalColor` survives repeated highlighting;
	/// re-highlighting only changes the visible color.
	fn apply_highlight(&mut self, node: &str, color: &str) -> bool {
		if !self.graph.has_node(node) {
			return false;
		}
		if !self.graph.is_highlighted(node) {
			let original = self
				.graph
				.node_attribute(node, attr::COLOR)
				.cloned()
				.unwrap_or(Value::Null);
			self.graph
				.set_node_attribute(node, attr::ORIGINAL_COLOR, original);
			self.graph.set_node_attribute(node, attr::HIGHLIGHTED, true);
		}
		self.graph.set_node_attribute(node, attr::COLOR, color);
		true
	}

	pub fn unhighlight_node(&mut self, node: &str) {
		if self.restore_highlight(node) {
			self.surface.refresh();
		}
	}

	fn restore_highlight(&mut self, node: &str) -> bool {
		if !self.graph.is_highlighted(node) {
			return false;
		}
		match self.graph.remove_node_attribute(node, attr::ORIGINAL_COLOR) {
			Some(Value::Null) | None => {
				self.graph.remove_node_attribute(node, attr::COLOR);
			}
			Some(original) => {
				self.graph.set_node_attribute(node, attr::COLOR, original);
			}
		}
		self.graph.set_node_attribute(node, attr::HIGHLIGHTED, false);
		true
	}

	/// Starts dragging `node`. A still-active session is superseded.
	pub fn begin_drag(&mut self, node: &str) {
		if !self.graph.has_node(node) {
			warn!("drag start on unknown node {node}");
			return;
		}
		if let Some(previous) = self.drag.take() {
			warn!(
				"drag of {} superseded by drag of {node} without pointer-up",
				previous.node
			);
			self.graph
				.remove_node_attribute(&previous.node, attr::DRAGGING);
		}
		self.graph.set_node_attribute(node, attr::DRAGGING, true);
		self.drag = Some(DragSession {
			node: node.to_string(),
			active: true,
		});
		self.surface.refresh();
	}

	/// Moves the dragged node to `position` (graph space).
	pub fn update_drag(&mut self, position: Point) -> Propagation {
		let Some(session) = self.drag.as_ref().filter(|s| s.active) else {
			return Propagation::Continue;
		};
		if !self.graph.set_position(&session.node, position) {
			// Node vanished mid-drag (removed or re-imported).
			self.drag = None;
			return Propagation::Continue;
		}
		self.surface.refresh();
		Propagation::Consumed
	}

	pub fn end_drag(&mut self) {
		let Some(session) = self.drag.take() else {
			return;
		};
		self.graph.remove_node_attribute(&session.node, attr::DRAGGING);
		self.surface.refresh();
	}

	/// Pins the surface's current frame the first time it is called.
	pub fn set_base_viewport(&mut self) {
		if self.surface.custom_bounding_box().is_none() {
			let bbox = self.surface.current_bounding_box(&self.graph);
			debug!("fixing base viewport to {bbox:?}");
			self.surface.set_custom_bounding_box(bbox);
		}
	}

	/// Adds a node with default label, size, color and a pseudo-random
	/// position; `attrs` override the defaults. No-op if the id exists.
	pub fn add_node(&mut self, id: &str, attrs: Attributes) -> bool {
		if self.graph.has_node(id) {
			return false;
		}
		self.placements += 1;
		let seed = self.placements as f64;
		let mut merged = attributes([
			(attr::LABEL, Value::from(id)),
			(attr::SIZE, Value::from(self.config.default_node_size)),
			(attr::COLOR, Value::from(self.config.default_node_color.as_str())),
			(attr::X, Value::from(pseudo_random(seed * 1.1))),
			(attr::Y, Value::from(pseudo_random(seed * 2.3))),
		]);
		merged.extend(attrs);
		if let Err(e) = self.graph.add_node(id, merged) {
			warn!("node rejected: {e}");
			return false;
		}
		self.surface.refresh();
		true
	}

	pub fn remove_node(&mut self, id: &str) -> bool {
		if self.drag.as_ref().is_some_and(|s| s.node == id) {
			self.drag = None;
		}
		let removed = self.graph.drop_node(id);
		if removed {
			self.surface.refresh();
		}
		removed
	}

	/// Adds `source -> target` with default color and size. Duplicates and
	/// missing endpoints are logged and yield `None`.
	pub fn add_edge(&mut self, source: &str, target: &str, attrs: Attributes) -> Option<EdgeId> {
		let mut merged = attributes([
			(attr::COLOR, Value::from(self.config.default_edge_color.as_str())),
			(attr::SIZE, Value::from(self.config.default_edge_size)),
		]);
		merged.extend(attrs);
		match self.graph.add_edge(source, target, merged) {
			Ok(edge) => {
				self.surface.refresh();
				Some(edge)
			}
			Err(e) => {
				warn!("edge rejected: {e}");
				None
			}
		}
	}

	pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
		let removed = self.graph.drop_edge(source, target);
		if removed {
			self.surface.refresh();
		}
		removed
	}

	pub fn hide_node(&mut self, id: &str) -> bool {
		let found = self.graph.hide_node(id);
		if found {
			self.surface.refresh();
		}
		found
	}

	pub fn show_node(&mut self, id: &str) -> bool {
		let found = self.graph.show_node(id);
		if found {
			self.surface.refresh();
		}
		found
	}

	pub fn neighbors(&self, id: &str) -> Vec<NodeId> {
		self.graph.neighbors(id)
	}

	pub fn degree(&self, id: &str) -> usize {
		self.graph.degree(id)
	}

	pub fn stats(&self) -> GraphStats {
		self.graph.stats()
	}

	pub fn node_stats(&self, id: &str) -> Option<NodeStats> {
		self.graph.node_stats(id)
	}

	pub fn search_nodes(&self, query: &str) -> Vec<NodeMatch<'_>> {
		self.graph.search_nodes(query)
	}

	pub fn filter_nodes_by_attribute(&self, key: &str, value: &Value) -> Vec<NodeMatch<'_>> {
		self.graph.filter_nodes_by_attribute(key, value)
	}

	/// Runs `layout` once over the graph and renders.
	pub fn apply_layout(&mut self, layout: &dyn LayoutEngine) {
		info!("applying {} layout", layout.name());
		layout.assign(&mut self.graph);
		self.surface.refresh();
	}

	pub fn export_data(&self) -> GraphExport {
		self.graph.export()
	}

	pub fn export_json(&self) -> Result<String, serde_json::Error> {
		self.graph.export_json()
	}

	/// Replaces the graph. Refused while a drag is in progress; every
	/// failure is logged and leaves the graph unchanged.
	pub fn import_data(&mut self, data: GraphExport) -> Result<(), ImportError> {
		if self.drag.is_some() {
			warn!("import rejected: {}", ImportError::DragInProgress);
			return Err(ImportError::DragInProgress);
		}
		if let Err(e) = self.graph.import(data) {
			warn!("import rejected: {e}");
			return Err(e);
		}
		info!(
			"imported {} nodes, {} edges",
			self.graph.order(),
			self.graph.size()
		);
		self.surface.refresh();
		Ok(())
	}

	/// Parses `json` and hands it to [`Self::import_data`].
	pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
		let data = serde_json::from_str::<GraphExport>(json).map_err(|e| {
			warn!("import rejected: malformed graph JSON: {e}");
			ImportError::from(e)
		})?;
		self.import_data(data)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	/// Fake surface: viewport is graph space scaled by 100, counts refreshes.
	#[derive(Default)]
	struct RecordingSurface {
		refreshes: usize,
		custom: Option<BoundingBox>,
		frame_pins: usize,
		cursor: Cursor,
	}

	impl ViewSurface for RecordingSurface {
		fn viewport_to_graph(&self, position: Point) -> Point {
			Point::new(position.x / 100.0, position.y / 100.0)
		}

		fn refresh(&mut self) {
			self.refreshes += 1;
		}

		fn current_bounding_box(&self, graph: &GraphStore) -> BoundingBox {
			graph.bounding_box().unwrap_or(BoundingBox::UNIT)
		}

		fn custom_bounding_box(&self) -> Option<BoundingBox> {
			self.custom
		}

		fn set_custom_bounding_box(&mut self, bbox: BoundingBox) {
			self.frame_pins += 1;
			self.custom = Some(bbox);
		}

		fn set_cursor(&mut self, cursor: Cursor) {
			self.cursor = cursor;
		}
	}

	fn node(color: &str, x: f64, y: f64) -> Attributes {
		attributes([
			("color", json!(color)),
			("x", json!(x)),
			("y", json!(y)),
		])
	}

	/// hub -> a, b -> hub, d -> c.
	fn controller() -> InteractionController<RecordingSurface> {
		let mut g = GraphStore::new();
		g.add_node("hub", node("#111111", 0.0, 0.0)).unwrap();
		g.add_node("a", node("#aaaaaa", 1.0, 1.0)).unwrap();
		g.add_node("b", node("#bbbbbb", 2.0, 0.0)).unwrap();
		g.add_node("c", node("#cccccc", 3.0, 3.0)).unwrap();
		g.add_node("d", node("#dddddd", 4.0, 4.0)).unwrap();
		g.add_edge("hub", "a", Attributes::new()).unwrap();
		g.add_edge("b", "hub", Attributes::new()).unwrap();
		g.add_edge("d", "c", Attributes::new()).unwrap();
		InteractionController::new(g, RecordingSurface::default(), InteractionConfig::default())
	}

	fn color(c: &InteractionController<RecordingSurface>, id: &str) -> Value {
		c.graph().node_attribute(id, "color").cloned().unwrap()
	}

	fn assert_clean(c: &InteractionController<RecordingSurface>, id: &str) {
		assert!(!c.graph().is_highlighted(id));
		assert!(c.graph().node_attribute(id, "originalColor").is_none());
	}

	#[test]
	fn unhighlight_restores_original_color() {
		let mut c = controller();
		c.highlight_node("a", "#ff0000");
		assert_eq!(color(&c, "a"), json!("#ff0000"));
		assert_eq!(
			c.graph().node_attribute("a", "originalColor"),
			Some(&json!("#aaaaaa"))
		);

		c.unhighlight_node("a");

		assert_eq!(color(&c, "a"), json!("#aaaaaa"));
		assert_clean(&c, "a");
	}

	#[test]
	fn repeated_highlight_keeps_first_original() {
		let mut c = controller();
		c.highlight_node("a", "#ff0000");
		c.highlight_node("a", "#00ff00");
		assert_eq!(color(&c, "a"), json!("#00ff00"));

		c.unhighlight_node("a");

		assert_eq!(color(&c, "a"), json!("#aaaaaa"));
		assert_clean(&c, "a");
	}

	#[test]
	fn highlight_of_colorless_node_restores_to_no_color() {
		let mut c = controller();
		c.graph.add_node("plain", Attributes::new()).unwrap();
		c.highlight_node("plain", "#ff0000");
		c.unhighlight_node("plain");
		assert!(c.graph().node_attribute("plain", "color").is_none());
		assert_clean(&c, "plain");
	}

	#[test]
	fn node_click_selects_node_and_neighbors_exclusively() {
		let mut c = controller();
		c.highlight_node("c", "#123456");
		c.surface_mut().refreshes = 0;

		c.dispatch(InteractionEvent::ClickNode("hub".into()));

		assert_eq!(c.highlighted_nodes(), vec!["hub", "a", "b"]);
		assert_eq!(color(&c, "hub"), json!("#ff0000"));
		assert_eq!(color(&c, "a"), json!("#ffa500"));
		assert_eq!(color(&c, "b"), json!("#ffa500"));
		assert_eq!(color(&c, "c"), json!("#cccccc"));
		assert_clean(&c, "c");
		assert_eq!(c.surface().refreshes, 1);
	}

	#[test]
	fn reselecting_overlapping_node_restores_true_colors() {
		let mut c = controller();
		c.handle_node_click("hub");
		c.handle_node_click("a");

		assert_eq!(c.highlighted_nodes(), vec!["hub", "a"]);
		assert_eq!(
			c.graph().node_attribute("hub", "originalColor"),
			Some(&json!("#111111"))
		);

		c.handle_stage_click();
		for (id, original) in [("hub", "#111111"), ("a", "#aaaaaa"), ("b", "#bbbbbb")] {
			assert_eq!(color(&c, id), json!(original));
		}
	}

	#[test]
	fn isolated_node_click_highlights_only_itself() {
		let mut c = controller();
		c.graph.add_node("lonely", node("#000000", 9.0, 9.0)).unwrap();
		c.handle_node_click("lonely");
		assert_eq!(c.highlighted_nodes(), vec!["lonely"]);
	}

	#[test]
	fn click_on_unknown_node_is_noop() {
		let mut c = controller();
		c.handle_node_click("hub");
		c.surface_mut().refreshes = 0;

		c.handle_node_click("ghost");

		assert_eq!(c.highlighted_nodes(), vec!["hub", "a", "b"]);
		assert_eq!(c.surface().refreshes, 0);
	}

	#[test]
	fn stage_click_clears_everything() {
		let mut c = controller();
		c.handle_node_click("hub");
		c.highlight_path(["c", "d"], "#00ff00");
		c.surface_mut().refreshes = 0;

		c.dispatch(InteractionEvent::ClickStage);

		assert!(c.highlighted_nodes().is_empty());
		for id in ["hub", "a", "b", "c", "d"] {
			assert_clean(&c, id);
		}
		assert_eq!(c.surface().refreshes, 1);
	}

	#[test]
	fn stage_click_without_highlights_does_not_render() {
		let mut c = controller();
		c.handle_stage_click();
		assert_eq!(c.surface().refreshes, 0);
	}

	#[test]
	fn highlight_path_renders_once() {
		let mut c = controller();
		c.highlight_path(vec!["a".to_string(), "b".to_string(), "ghost".to_string()], "#00ff00");
		assert_eq!(c.highlighted_nodes(), vec!["a", "b"]);
		assert_eq!(c.surface().refreshes, 1);
	}

	#[test]
	fn edge_click_is_read_only() {
		let mut c = controller();
		c.graph
			.set_edge_attribute("e0", "weight", json!(0.5));
		let before = c.export_data();

		let attrs = c.handle_edge_click("e0").unwrap();

		assert_eq!(attrs.get("weight"), Some(&json!(0.5)));
		assert_eq!(c.export_data(), before);
		assert_eq!(c.surface().refreshes, 0);
		assert!(c.handle_edge_click("missing").is_none());
	}

	#[test]
	fn drag_moves_only_the_dragged_node() {
		let mut c = controller();

		c.dispatch(InteractionEvent::PointerDownOnNode("hub".into()));
		let propagation = c.dispatch(InteractionEvent::PointerMove(Point::new(500.0, 500.0)));
		c.dispatch(InteractionEvent::PointerUp);

		assert_eq!(propagation, Propagation::Consumed);
		assert_eq!(c.graph().position("hub"), Some(Point::new(5.0, 5.0)));
		assert_eq!(c.graph().position("a"), Some(Point::new(1.0, 1.0)));
		assert!(c.drag_session().is_none());
		assert!(!c.graph().is_dragging("hub"));
	}

	#[test]
	fn drag_flag_is_set_only_while_dragging() {
		let mut c = controller();
		c.begin_drag("a");
		assert!(c.graph().is_dragging("a"));
		assert_eq!(
			c.drag_session(),
			Some(&DragSession {
				node: "a".into(),
				active: true
			})
		);
		c.end_drag();
		assert!(c.graph().node_attribute("a", "dragging").is_none());
	}

	#[test]
	fn ending_drag_keeps_selection_highlight() {
		let mut c = controller();
		c.handle_node_click("hub");

		c.begin_drag("hub");
		c.update_drag(Point::new(0.5, 0.5));
		c.end_drag();

		assert!(c.graph().is_highlighted("hub"));
		assert_eq!(color(&c, "hub"), json!("#ff0000"));
		c.handle_stage_click();
		assert_eq!(color(&c, "hub"), json!("#111111"));
	}

	#[test]
	fn move_without_drag_is_not_consumed() {
		let mut c = controller();
		let propagation = c.dispatch(InteractionEvent::PointerMove(Point::new(1.0, 1.0)));
		assert_eq!(propagation, Propagation::Continue);
		assert_eq!(c.update_drag(Point::new(7.0, 7.0)), Propagation::Continue);
		assert_eq!(c.graph().position("hub"), Some(Point::new(0.0, 0.0)));
		assert_eq!(c.surface().refreshes, 0);
	}

	#[test]
	fn each_move_requests_a_render() {
		let mut c = controller();
		c.begin_drag("a");
		c.surface_mut().refreshes = 0;
		for i in 0..3 {
			c.update_drag(Point::new(i as f64, 0.0));
		}
		assert_eq!(c.surface().refreshes, 3);
	}

	#[test]
	fn new_drag_supersedes_stale_session() {
		let mut c = controller();
		c.begin_drag("a");
		c.begin_drag("b");
		assert!(!c.graph().is_dragging("a"));
		assert!(c.graph().is_dragging("b"));
		assert_eq!(c.drag_session().map(|s| s.node.as_str()), Some("b"));
	}

	#[test]
	fn pointer_up_without_drag_is_noop() {
		let mut c = controller();
		c.dispatch(InteractionEvent::PointerUp);
		assert_eq!(c.surface().refreshes, 0);
	}

	#[test]
	fn removing_dragged_node_ends_session() {
		let mut c = controller();
		c.begin_drag("a");
		c.remove_node("a");
		assert!(c.drag_session().is_none());
		assert_eq!(c.update_drag(Point::new(1.0, 1.0)), Propagation::Continue);
	}

	#[test]
	fn base_viewport_is_captured_once() {
		let mut c = controller();
		c.dispatch(InteractionEvent::PointerDownOnStage);
		let first = c.surface().custom_bounding_box();
		assert_eq!(
			first,
			Some(BoundingBox {
				x: (0.0, 4.0),
				y: (0.0, 4.0)
			})
		);

		c.dispatch(InteractionEvent::PointerDownOnNode("d".into()));
		c.dispatch(InteractionEvent::PointerMove(Point::new(2000.0, 2000.0)));
		c.dispatch(InteractionEvent::PointerUp);
		c.dispatch(InteractionEvent::PointerDownOnEdge("e0".into()));

		assert_eq!(c.surface().custom_bounding_box(), first);
		assert_eq!(c.surface().frame_pins, 1);
	}

	#[test]
	fn hover_toggles_cursor() {
		let mut c = controller();
		c.dispatch(InteractionEvent::HoverEnterNode("a".into()));
		assert_eq!(c.surface().cursor, Cursor::Pointer);
		c.dispatch(InteractionEvent::HoverLeaveNode("a".into()));
		assert_eq!(c.surface().cursor, Cursor::Default);
	}

	#[test]
	fn add_node_applies_defaults_and_overrides() {
		let mut c = controller();
		assert!(c.add_node("new", attributes([("color", "#010203")])));
		let attrs = c.graph().node_attributes("new").unwrap();
		assert_eq!(attrs.get("label"), Some(&json!("new")));
		assert_eq!(attrs.get("size"), Some(&json!(10.0)));
		assert_eq!(attrs.get("color"), Some(&json!("#010203")));
		assert!(c.graph().position("new").is_some());
		assert!(!c.add_node("new", Attributes::new()));
	}

	#[test]
	fn duplicate_edge_through_controller_is_rejected() {
		let mut c = controller();
		let edge = c.add_edge("a", "b", attributes([("weight", 1)])).unwrap();
		assert_eq!(c.graph().edge_attribute(&edge, "color"), Some(&json!("#cccccc")));

		assert!(c.add_edge("a", "b", attributes([("weight", 2)])).is_none());
		assert_eq!(c.graph().edge_attribute(&edge, "weight"), Some(&json!(1)));
		assert!(c.add_edge("a", "ghost", Attributes::new()).is_none());
	}

	#[test]
	fn import_is_refused_during_drag() {
		let mut c = controller();
		let snapshot = c.export_json().unwrap();
		c.begin_drag("a");

		let result = c.import_json(&snapshot);

		assert!(matches!(result, Err(ImportError::DragInProgress)));
		assert!(matches!(
			c.import_data(GraphExport::default()),
			Err(ImportError::DragInProgress)
		));
		c.end_drag();
		assert!(c.import_json(&snapshot).is_ok());
	}

	#[test]
	fn malformed_import_keeps_graph() {
		let mut c = controller();
		let before = c.export_data();
		assert!(c.import_json("not json").is_err());
		assert_eq!(c.export_data(), before);
	}

	#[test]
	fn rejected_structured_import_keeps_graph_and_view() {
		let mut c = controller();
		let before = c.export_data();
		let refreshes = c.surface().refreshes;

		let mut dangling = before.clone();
		dangling.edges[0].target = "ghost".into();
		let result = c.import_data(dangling);

		assert!(matches!(
			result,
			Err(ImportError::MissingEndpoint { ref node, .. }) if node == "ghost"
		));
		assert_eq!(c.export_data(), before);
		assert_eq!(c.surface().refreshes, refreshes);
	}

	#[test]
	fn visibility_and_removal_render_only_on_change() {
		let mut c = controller();
		assert!(c.hide_node("a"));
		assert!(c.show_node("a"));
		assert!(!c.hide_node("ghost"));
		assert!(c.remove_edge("hub", "a"));
		assert!(!c.remove_edge("hub", "a"));
		assert_eq!(c.surface().refreshes, 3);
	}
}
