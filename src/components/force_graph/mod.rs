//! Interactive attributed-graph view.
//!
//! An [`InteractionController`] owns the [`GraphStore`] and a [`ViewSurface`].
//! The canvas component classifies pointer input into [`InteractionEvent`]s,
//! the controller applies the drag/highlight policy to node attributes, and
//! the renderer draws whatever the attributes say:
//! - Click a node to highlight it and its neighbors, click the stage to clear
//! - Drag nodes to reposition them, drag the background to pan, scroll to zoom
//! - Circular, random and force-directed layouts into a unit frame
//! - JSON export/import of the full attribute graph
//!
//! # Example
//!
//! ```ignore
//! use std::{cell::RefCell, rc::Rc};
//! use graph_explorer::components::force_graph::*;
//!
//! let mut graph = GraphStore::new();
//! generate_sample_graph(&mut graph, 20, 0);
//! let mut controller =
//!     InteractionController::new(graph, CanvasSurface::new(800.0, 600.0), InteractionConfig::default());
//! controller.apply_layout(&ForceLayout::default());
//!
//! view! { <ForceGraphCanvas controller=Rc::new(RefCell::new(controller)) fullscreen=true /> }
//! ```

mod component;
mod controller;
mod layout;
mod persist;
mod render;
mod sample;
pub mod scale;
mod state;
mod store;
pub mod theme;
mod types;

pub use component::{ForceGraphCanvas, SharedController};
pub use controller::{
	Cursor, DragSession, InteractionConfig, InteractionController, InteractionEvent, Propagation,
	ViewSurface,
};
pub use layout::{CircularLayout, ForceLayout, ForceSettings, LayoutEngine, RandomLayout};
pub use persist::ImportError;
pub use sample::generate_sample_graph;
pub use state::{CanvasSurface, Pick};
pub use store::{GraphError, GraphStore, attributes};
pub use theme::Theme;
pub use types::{
	Attributes, BoundingBox, EdgeId, EdgeRecord, GraphExport, GraphStats, NodeId, NodeMatch,
	NodeRecord, NodeStats, Point, attr,
};
