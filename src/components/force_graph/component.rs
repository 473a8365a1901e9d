//! Leptos component wrapping the graph canvas.
//!
//! The component creates an HTML canvas element, classifies mouse input with
//! [`CanvasSurface::pick`] and feeds the resulting [`InteractionEvent`]s to the
//! shared controller. Panning and zooming stay on the surface and only happen
//! when the controller lets the event through. A `requestAnimationFrame` loop
//! redraws whenever the surface has a pending refresh.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent, Window,
};

use super::controller::{Cursor, InteractionController, InteractionEvent, Propagation};
use super::render;
use super::scale::ScaleConfig;
use super::state::{CanvasSurface, Pick};
use super::theme::Theme;
use super::types::{NodeId, Point};

/// Controller shared between the canvas and any surrounding controls.
pub type SharedController = Rc<RefCell<InteractionController<CanvasSurface>>>;

/// Pointer travel (px) under which a press-release counts as a click.
const CLICK_TOLERANCE: f64 = 3.0;

/// Visual configuration (scaling, theme) for the canvas.
struct Visuals {
	scale: ScaleConfig,
	theme: Theme,
}

/// Where the pointer went down and what it hit.
struct Press {
	at: Point,
	pick: Pick,
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// CSS `cursor` value for a surface cursor.
fn cursor_css(cursor: Cursor) -> &'static str {
	match cursor {
		Cursor::Default => "grab",
		Cursor::Pointer => "pointer",
	}
}

fn apply_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: Cursor) {
	let Some(canvas) = canvas_ref.get() else {
		return;
	};
	let canvas: HtmlCanvasElement = canvas.into();
	// The leptos prelude shadows `style()` with its builder method.
	let _ = HtmlElement::style(&canvas).set_property("cursor", cursor_css(cursor));
}

/// Updates hover state from a pick, emitting leave/enter events on change.
fn update_hover(
	controller: &mut InteractionController<CanvasSurface>,
	hovered: Option<NodeId>,
) {
	let previous = controller.surface().hovered.clone();
	if hovered == previous {
		return;
	}
	if let Some(prev) = previous {
		controller.dispatch(InteractionEvent::HoverLeaveNode(prev));
	}
	if let Some(id) = hovered.clone() {
		controller.dispatch(InteractionEvent::HoverEnterNode(id));
	}
	controller.surface_mut().hovered = hovered;
}

/// Renders an interactive graph on a canvas element.
///
/// The canvas sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize automatically with the
/// window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	controller: SharedController,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = Theme::default())] theme: Theme,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let visuals = Rc::new(Visuals {
		scale: ScaleConfig::default(),
		theme,
	});
	let press: Rc<RefCell<Option<Press>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (controller_init, visuals_init, animate_init, resize_cb_init) = (
		controller.clone(),
		visuals.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window, canvas not started");
			return;
		};

		let (w, h) = match (fullscreen, window_size(&window)) {
			(true, Some(size)) => size,
			_ => (
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			),
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		controller_init.borrow_mut().surface_mut().resize(w, h);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("2d canvas context unavailable");
			return;
		};
		debug!("canvas {w}x{h} using {} theme", visuals_init.theme.name);

		if fullscreen {
			let (controller_resize, canvas_resize) = (controller_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				controller_resize.borrow_mut().surface_mut().resize(nw, nh);
				debug!("canvas resized to {nw}x{nh}");
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (controller_anim, visuals_anim, animate_inner) = (
			controller_init.clone(),
			visuals_init.clone(),
			animate_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut c = controller_anim.borrow_mut();
				if c.surface_mut().take_dirty() {
					render::render(
						c.graph(),
						c.surface(),
						&ctx,
						&visuals_anim.scale,
						&visuals_anim.theme,
					);
				}
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (controller_md, visuals_md, press_md) = (controller.clone(), visuals.clone(), press.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = canvas_position(canvas_ref, &ev) else {
			return;
		};
		let mut c = controller_md.borrow_mut();
		let pick = c.surface().pick(c.graph(), at, &visuals_md.scale);

		let event = match &pick {
			Pick::Node(id) => InteractionEvent::PointerDownOnNode(id.clone()),
			Pick::Edge(id) => InteractionEvent::PointerDownOnEdge(id.clone()),
			Pick::Stage => InteractionEvent::PointerDownOnStage,
		};
		c.dispatch(event);
		if !matches!(pick, Pick::Node(_)) {
			c.surface_mut().begin_pan(at);
		}
		*press_md.borrow_mut() = Some(Press { at, pick });
	};

	let (controller_mm, visuals_mm) = (controller.clone(), visuals.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(at) = canvas_position(canvas_ref, &ev) else {
			return;
		};
		let mut c = controller_mm.borrow_mut();

		if c.drag_session().is_none() && !c.surface().pan.active {
			let hovered = match c.surface().pick(c.graph(), at, &visuals_mm.scale) {
				Pick::Node(id) => Some(id),
				_ => None,
			};
			update_hover(&mut c, hovered);
		}

		match c.dispatch(InteractionEvent::PointerMove(at)) {
			Propagation::Consumed => {
				ev.prevent_default();
				ev.stop_propagation();
			}
			Propagation::Continue => {
				c.surface_mut().pan_to(at);
			}
		}
		apply_cursor(canvas_ref, c.surface().cursor);
	};

	let (controller_mu, press_mu) = (controller.clone(), press.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let mut c = controller_mu.borrow_mut();
		c.dispatch(InteractionEvent::PointerUp);
		c.surface_mut().end_pan();

		let (Some(down), Some(at)) = (press_mu.borrow_mut().take(), canvas_position(canvas_ref, &ev))
		else {
			return;
		};
		if down.at.distance(at) > CLICK_TOLERANCE {
			return;
		}
		let click = match down.pick {
			Pick::Node(id) => InteractionEvent::ClickNode(id),
			Pick::Edge(id) => InteractionEvent::ClickEdge(id),
			Pick::Stage => InteractionEvent::ClickStage,
		};
		c.dispatch(click);
	};

	let (controller_ml, press_ml) = (controller.clone(), press.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let mut c = controller_ml.borrow_mut();
		c.dispatch(InteractionEvent::PointerUp);
		c.surface_mut().end_pan();
		update_hover(&mut c, None);
		*press_ml.borrow_mut() = None;
		apply_cursor(canvas_ref, c.surface().cursor);
	};

	let controller_wh = controller.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(at) = canvas_position(canvas_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		controller_wh.borrow_mut().surface_mut().zoom_at(at, factor);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
