//! Shared value types: ids, attribute maps, geometry and the persistence shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node identifier.
pub type NodeId = String;
/// Edge identifier.
pub type EdgeId = String;
/// Mutable key-value attributes attached to nodes and edges.
pub type Attributes = Map<String, Value>;

/// Well-known attribute keys.
pub mod attr {
	pub const COLOR: &str = "color";
	pub const HIGHLIGHTED: &str = "highlighted";
	pub const ORIGINAL_COLOR: &str = "originalColor";
	pub const DRAGGING: &str = "dragging";
	pub const HIDDEN: &str = "hidden";
	pub const LABEL: &str = "label";
	pub const SIZE: &str = "size";
	pub const X: &str = "x";
	pub const Y: &str = "y";

	/// Keys taken by the record fields of an exported node.
	pub const NODE_RESERVED: &[&str] = &["id"];
	/// Keys taken by the record fields of an exported edge.
	pub const EDGE_RESERVED: &[&str] = &["id", "source", "target"];
}

/// A point, either in graph space or viewport (pixel) space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Axis-aligned extent of node positions in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	pub x: (f64, f64),
	pub y: (f64, f64),
}

impl BoundingBox {
	/// The unit square every bundled layout writes into.
	pub const UNIT: BoundingBox = BoundingBox {
		x: (0.0, 1.0),
		y: (0.0, 1.0),
	};

	pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
		let mut points = points.into_iter();
		let first = points.next()?;
		let mut bbox = BoundingBox {
			x: (first.x, first.x),
			y: (first.y, first.y),
		};
		for p in points {
			bbox.x = (bbox.x.0.min(p.x), bbox.x.1.max(p.x));
			bbox.y = (bbox.y.0.min(p.y), bbox.y.1.max(p.y));
		}
		Some(bbox)
	}

	pub fn width(&self) -> f64 {
		self.x.1 - self.x.0
	}

	pub fn height(&self) -> f64 {
		self.y.1 - self.y.0
	}

	pub fn center(&self) -> Point {
		Point::new((self.x.0 + self.x.1) / 2.0, (self.y.0 + self.y.1) / 2.0)
	}
}

/// Whole-graph statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
	pub node_count: usize,
	pub edge_count: usize,
	pub density: f64,
	pub average_degree: f64,
}

/// Per-node statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStats {
	pub degree: usize,
	pub in_degree: usize,
	pub out_degree: usize,
	pub neighbors: Vec<NodeId>,
}

/// A node returned by search and filter scans.
#[derive(Clone, Copy, Debug)]
pub struct NodeMatch<'a> {
	pub id: &'a str,
	pub attributes: &'a Attributes,
}

/// Exported node: its id plus flattened attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
	pub id: NodeId,
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Exported edge: id, endpoints and flattened attributes.
/// The id is optional on import; missing ids are generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<EdgeId>,
	pub source: NodeId,
	pub target: NodeId,
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Complete graph snapshot used by export and import.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<EdgeRecord>,
}
