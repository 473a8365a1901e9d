//! Zoom-dependent sizing for graph visuals.
//!
//! Drawing happens in screen space: node positions are fitted into the canvas
//! and then run through the camera transform. Sizes, by contrast, are stored on
//! the graph in "display units" (the `size` attribute) and each visual decides
//! here how it reacts to the camera zoom `k`:
//!
//! - [`ScaleBehavior::World`]: grows and shrinks with zoom (`base * k`).
//! - [`ScaleBehavior::Screen`]: constant pixel size regardless of zoom.
//! - [`ScaleBehavior::Clamped`]: zooms like `World`, but bounded in pixels.

/// Camera zoom limits.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World/Screen variants complete the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	World,
	Screen,
	/// `base * k`, clamped to `min_screen..=max_screen` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Pixel size for a base size at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base * k,
			ScaleBehavior::Screen => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => (base * k).clamp(*min_screen, *max_screen),
		}
	}
}

/// Node sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Size used when a node has no numeric `size` attribute.
	pub fallback_size: f64,
	/// Multiplier from the `size` attribute to a base radius in pixels.
	pub size_ratio: f64,
	pub radius_behavior: ScaleBehavior,
	/// Extra pick tolerance around the drawn radius, in pixels.
	pub hit_slop: f64,
	/// Label font size in pixels.
	pub label_size: f64,
	/// Labels are only drawn for nodes rendered at least this radius.
	pub label_threshold: f64,
}

/// Edge sizing.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	pub fallback_size: f64,
	pub width_behavior: ScaleBehavior,
	/// Pick tolerance around the edge line, in pixels.
	pub hit_tolerance: f64,
	pub label_size: f64,
	pub arrow_size: f64,
}

/// Complete scale configuration.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	/// Drag ring stroke width in pixels.
	pub ring_width: f64,
	/// Drag ring offset from the node edge in pixels.
	pub ring_offset: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				fallback_size: 10.0,
				size_ratio: 1.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 2.0,
					max_screen: 60.0,
				},
				hit_slop: 3.0,
				label_size: 12.0,
				label_threshold: 8.0,
			},
			edge: EdgeScaleConfig {
				fallback_size: 2.0,
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 0.5,
					max_screen: 12.0,
				},
				hit_tolerance: 4.0,
				label_size: 10.0,
				arrow_size: 7.0,
			},
			ring_width: 2.0,
			ring_offset: 3.0,
		}
	}
}

impl ScaleConfig {
	/// Drawn radius in pixels for a node `size` attribute at zoom `k`.
	pub fn node_radius(&self, size: Option<f64>, k: f64) -> f64 {
		let base = size.unwrap_or(self.node.fallback_size) * self.node.size_ratio;
		self.node.radius_behavior.apply(base, k)
	}

	pub fn hit_radius(&self, size: Option<f64>, k: f64) -> f64 {
		self.node_radius(size, k) + self.node.hit_slop
	}

	/// Stroke width in pixels for an edge `size` attribute at zoom `k`.
	pub fn edge_width(&self, size: Option<f64>, k: f64) -> f64 {
		let base = size.unwrap_or(self.edge.fallback_size);
		self.edge.width_behavior.apply(base, k)
	}

	pub fn shows_label(&self, radius: f64) -> bool {
		radius >= self.node.label_threshold
	}

	pub fn label_font(&self, weight: &str) -> String {
		format!("{} {}px sans-serif", weight, self.node.label_size)
	}

	pub fn edge_label_font(&self) -> String {
		format!("{}px sans-serif", self.edge.label_size)
	}
}
