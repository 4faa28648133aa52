use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::hit::{CONNECTION_WIDTH, SELECTED_CONNECTION_WIDTH, TARGET_MARKER_RADIUS, connection_curve};
use super::state::ConceptMapState;
use super::types::Node;

const BACKGROUND: &str = "#f8fafc";
const CONNECTION_COLOR: &str = "#94a3b8";
const SELECTED_CONNECTION_COLOR: &str = "#ef4444";
const MARKER_COLOR: &str = "#e6edf3";
const CONNECT_RING_COLOR: &str = "#6366f1";
const LABEL_FONT: &str = "600 12px sans-serif";
const LABEL_LINE_HEIGHT: f64 = 15.0;
const LABEL_PADDING: f64 = 8.0;

pub fn render(state: &ConceptMapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let [a, b, c, d, e, f] = state.transform.affine().as_coeffs();
	let _ = ctx.transform(a, b, c, d, e, f);
	draw_connections(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_connections(state: &ConceptMapState, ctx: &CanvasRenderingContext2d) {
	let selected = state.interaction.selection.connection();
	ctx.set_line_cap("round");

	for (i, from, to) in state.graph.resolved_connections() {
		let curve = connection_curve(from.position(), to.position());
		let (color, width) = if selected == Some(i) {
			(SELECTED_CONNECTION_COLOR, SELECTED_CONNECTION_WIDTH)
		} else {
			(CONNECTION_COLOR, CONNECTION_WIDTH)
		};
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(curve.p0.x, curve.p0.y);
		ctx.bezier_curve_to(curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y, curve.p3.x, curve.p3.y);
		ctx.stroke();

		ctx.set_fill_style_str(MARKER_COLOR);
		ctx.begin_path();
		let _ = ctx.arc(to.x, to.y, TARGET_MARKER_RADIUS, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_nodes(state: &ConceptMapState, ctx: &CanvasRenderingContext2d) {
	let pending = state.interaction.selection.connect_from();
	let k = state.transform.k;

	for node in state.graph.nodes() {
		let style = node.kind.style();

		ctx.set_shadow_color("rgba(0, 0, 0, 0.2)");
		ctx.set_shadow_blur(10.0 * k);
		ctx.set_shadow_offset_y(6.0 * k);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, style.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(style.fill);
		ctx.fill();
		ctx.set_shadow_color("transparent");

		if pending == Some(node.id.as_str()) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
			ctx.set_stroke_style_str(CONNECT_RING_COLOR);
			ctx.set_line_width(3.0);
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, style.radius + 5.0, 0.0, 2.0 * PI);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		draw_label(ctx, node, style.radius, style.text_color);
	}
}

/// Centered label, word-wrapped to the circle's width.
fn draw_label(ctx: &CanvasRenderingContext2d, node: &Node, radius: f64, color: &str) {
	ctx.set_font(LABEL_FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(color);

	let max_width = radius * 2.0 - LABEL_PADDING * 2.0;
	let lines = wrap(&node.text, max_width, |s| {
		ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
	});
	let top = node.y - (lines.len() as f64 - 1.0) * LABEL_LINE_HEIGHT / 2.0;
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, node.x, top + i as f64 * LABEL_LINE_HEIGHT);
	}
}

fn wrap(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
	let mut lines: Vec<String> = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		let candidate = if current.is_empty() {
			word.to_owned()
		} else {
			format!("{current} {word}")
		};
		if measure(&candidate) > max_width && !current.is_empty() {
			lines.push(std::mem::replace(&mut current, word.to_owned()));
		} else {
			current = candidate;
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}
