//! Visual theming for the graph canvas.
//!
//! Node and edge colors live in the graph attributes; the theme only covers
//! what the attributes do not: background, labels, selection and drag rings.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#rgb`, `#rrggbb`, `rgb(..)` and `rgba(..)`.
	/// Anything else yields `None`.
	pub fn parse(css: &str) -> Option<Self> {
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#') {
			if !hex.is_ascii() {
				return None;
			}
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			return match hex.len() {
				3 => {
					let mut c = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
					Some(Color::rgb(c.next()??, c.next()??, c.next()??))
				}
				6 => Some(Color::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				_ => None,
			};
		}
		let body = css
			.strip_prefix("rgba(")
			.or_else(|| css.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = body.split(',').map(str::trim).collect();
		if !(3..=4).contains(&parts.len()) {
			return None;
		}
		let a = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(
			parts[0].parse().ok()?,
			parts[1].parse().ok()?,
			parts[2].parse().ok()?,
			a,
		))
	}

	/// Like [`Color::parse`], falling back to mid gray.
	pub fn parse_or_gray(css: &str) -> Self {
		Self::parse(css).unwrap_or(Color::rgb(128, 128, 128))
	}
}

/// Node label style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	/// CSS font weight, e.g. "bold".
	pub weight: &'static str,
}

/// Node decoration style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width in pixels (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Outline drawn around selection-highlighted nodes
	pub highlight_ring: Color,
	/// Ring drawn around the node being dragged
	pub drag_ring: Color,
}

/// Edge decoration style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Fallback for edges without a `color` attribute
	pub fallback_color: Color,
	pub render_labels: bool,
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub label: LabelStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
}

impl Theme {
	/// Light theme with black bold labels and edge labels on (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: Color::rgb(255, 255, 255),
			label: LabelStyle {
				color: Color::rgb(0, 0, 0),
				weight: "bold",
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 0.0,
				border_color: Color::rgba(0, 0, 0, 0.0),
				highlight_ring: Color::rgba(0, 0, 0, 0.6),
				drag_ring: Color::rgb(255, 140, 0),
			},
			edge: EdgeStyle {
				fallback_color: Color::rgb(204, 204, 204),
				render_labels: true,
				label_color: Color::rgb(85, 85, 85),
			},
		}
	}

	/// Dark theme with gradient-shaded nodes
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: Color::rgb(18, 20, 28),
			label: LabelStyle {
				color: Color::rgba(255, 255, 255, 0.85),
				weight: "normal",
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 1.0,
				border_color: Color::rgba(255, 255, 255, 0.2),
				highlight_ring: Color::rgba(255, 255, 255, 0.8),
				drag_ring: Color::rgb(255, 200, 80),
			},
			edge: EdgeStyle {
				fallback_color: Color::rgba(100, 120, 150, 0.45),
				render_labels: false,
				label_color: Color::rgba(200, 210, 225, 0.7),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("#ff0000", Some(Color::rgb(255, 0, 0)))]
	#[case("#3388FF", Some(Color::rgb(0x33, 0x88, 0xff)))]
	#[case("#fa0", Some(Color::rgb(255, 170, 0)))]
	#[case("rgb(1, 2, 3)", Some(Color::rgb(1, 2, 3)))]
	#[case("rgba(200, 200, 200, 0.5)", Some(Color::rgba(200, 200, 200, 0.5)))]
	#[case("#12345", None)]
	#[case("tomato", None)]
	#[case("rgb(1, 2)", None)]
	fn parses_css_colors(#[case] css: &str, #[case] expected: Option<Color>) {
		assert_eq!(Color::parse(css), expected);
	}

	#[test]
	fn css_output_drops_alpha_when_opaque() {
		assert_eq!(Color::rgb(255, 165, 0).to_css(), "#ffa500");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}
}
