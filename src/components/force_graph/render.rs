//! Canvas rendering for the graph.
//!
//! Everything is drawn in screen space from the current graph attributes.
//! Passes, bottom to top:
//! 1. Background
//! 2. Edge lines and arrow heads, then edge labels
//! 3. Nodes in insertion order, with selection outline and dashed drag ring
//! 4. Node labels above the rendered-size threshold

use std::f64::consts::PI;

use serde_json::Value;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::ScaleConfig;
use super::state::CanvasSurface;
use super::store::GraphStore;
use super::theme::{Color, Theme};
use super::types::{Attributes, Point, attr};

fn number(attrs: &Attributes, key: &str) -> Option<f64> {
	attrs.get(key).and_then(Value::as_f64)
}

fn text<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a str> {
	attrs.get(key).and_then(Value::as_str)
}

/// Renders the complete graph to the canvas.
pub fn render(
	graph: &GraphStore,
	surface: &CanvasSurface,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	surface.sync_frame(graph);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, surface.width, surface.height);

	draw_edges(graph, surface, ctx, config, theme);
	draw_nodes(graph, surface, ctx, config, theme);
}

fn draw_edges(
	graph: &GraphStore,
	surface: &CanvasSurface,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let k = surface.transform.k;
	let mut labels = Vec::new();

	for (_, source, target, attrs) in graph.edges() {
		if graph.is_hidden(source) || graph.is_hidden(target) || source == target {
			continue;
		}
		let (Some(a), Some(b)) = (graph.position(source), graph.position(target)) else {
			continue;
		};
		let (a, b) = (surface.graph_to_viewport(a), surface.graph_to_viewport(b));
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let color = text(attrs, attr::COLOR)
			.and_then(Color::parse)
			.unwrap_or(theme.edge.fallback_color);
		let width = config.edge_width(number(attrs, attr::SIZE), k);
		let target_radius = graph
			.node_attributes(target)
			.map(|t| config.node_radius(number(t, attr::SIZE), k))
			.unwrap_or(0.0);
		let arrow = config.edge.arrow_size.max(width * 2.0);

		let tip = Point::new(b.x - ux * target_radius, b.y - uy * target_radius);
		let back = Point::new(tip.x - ux * arrow, tip.y - uy * arrow);

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(back.x, back.y);
		ctx.stroke();

		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
		ctx.set_fill_style_str(&color.to_css());
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(back.x + px, back.y + py);
		ctx.line_to(back.x - px, back.y - py);
		ctx.close_path();
		ctx.fill();

		if theme.edge.render_labels {
			if let Some(label) = text(attrs, attr::LABEL) {
				labels.push((label, Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)));
			}
		}
	}

	if !labels.is_empty() {
		ctx.set_fill_style_str(&theme.edge.label_color.to_css());
		ctx.set_font(&config.edge_label_font());
		for (label, at) in labels {
			let _ = ctx.fill_text(label, at.x + 2.0, at.y - 2.0);
		}
	}
}

fn draw_nodes(
	graph: &GraphStore,
	surface: &CanvasSurface,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let k = surface.transform.k;
	let mut labels = Vec::new();

	for (id, attrs) in graph.nodes() {
		if graph.is_hidden(id) {
			continue;
		}
		let Some(pos) = graph.position(id) else {
			continue;
		};
		let at = surface.graph_to_viewport(pos);
		let radius = config.node_radius(number(attrs, attr::SIZE), k);
		let color = Color::parse_or_gray(text(attrs, attr::COLOR).unwrap_or_default());

		draw_node(ctx, at, radius, color, theme);

		if graph.is_highlighted(id) {
			ctx.begin_path();
			let _ = ctx.arc(at.x, at.y, radius + 1.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.highlight_ring.to_css());
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if graph.is_dragging(id) {
			ctx.begin_path();
			let _ = ctx.arc(at.x, at.y, radius + config.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.drag_ring.to_css());
			ctx.set_line_width(config.ring_width);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(3.0),
			));
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		if config.shows_label(radius) {
			if let Some(label) = text(attrs, attr::LABEL) {
				labels.push((label, at, radius));
			}
		}
	}

	// Labels go last so no node covers them.
	ctx.set_fill_style_str(&theme.label.color.to_css());
	ctx.set_font(&config.label_font(theme.label.weight));
	for (label, at, radius) in labels {
		let _ = ctx.fill_text(label, at.x + radius + 4.0, at.y + 4.0);
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, at: Point, radius: f64, color: Color, theme: &Theme) {
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				at.x - radius * 0.3,
				at.y - radius * 0.3,
				0.0,
				at.x,
				at.y,
				radius,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &color.to_css());
			let _ = gradient.add_color_stop(1.0, &color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&color.to_css()),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width);
		ctx.stroke();
	}
}

