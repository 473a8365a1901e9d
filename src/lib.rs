//! graph-explorer: interactive attributed-graph explorer.
//!
//! This crate provides a WASM-based canvas view over an attributed directed
//! graph with click-to-highlight, node dragging, pan/zoom, on-demand layouts
//! and JSON export/import.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::force_graph::{
	CanvasSurface, ForceGraphCanvas, ForceLayout, GraphStore, InteractionConfig,
	InteractionController, SharedController, generate_sample_graph,
};
pub use components::toolbar::Toolbar;

/// Nodes in the generated demo graph.
const SAMPLE_NODES: usize = 20;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-explorer: logging initialized");
}

/// Builds the controller over a freshly generated demo graph laid out by
/// the force simulation.
fn sample_controller() -> SharedController {
	let mut graph = GraphStore::new();
	generate_sample_graph(&mut graph, SAMPLE_NODES, 0);

	let mut controller = InteractionController::new(
		graph,
		CanvasSurface::new(800.0, 600.0),
		InteractionConfig::default(),
	);
	controller.apply_layout(&ForceLayout::default());

	let stats = controller.stats();
	info!(
		"graph-explorer: {} nodes, {} edges, density {:.3}, avg degree {:.2}",
		stats.node_count, stats.edge_count, stats.density, stats.average_degree
	);
	Rc::new(RefCell::new(controller))
}

/// Main application component.
/// Generates the demo graph and renders the canvas with its toolbar.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let controller = sample_controller();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas controller=controller.clone() fullscreen=true />
			<div class="graph-overlay">
				<h1>"Graph Explorer"</h1>
				<p class="subtitle">
					"Click a node to highlight its neighbors. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
				</p>
				<Toolbar controller=controller />
			</div>
		</div>
	}
}
