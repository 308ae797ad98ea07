use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{Point, closest_boundary_point};
use super::state::EditorSession;
use super::types::Selection;

const BACKGROUND: &str = "#1a1a2e";
const DEFAULT_STROKE: &str = "white";
const HIGHLIGHT_STROKE: &str = "aqua";
const LINE_WIDTH: f64 = 2.0;
const FONT: &str = "16px sans-serif";
const CARET_HEIGHT: f64 = 16.0;

/// Paint the whole scene. Reads the session only.
pub fn render(session: &EditorSession, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.set_line_width(LINE_WIDTH);
	ctx.set_font(FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	draw_temp_edge(session, ctx);
	draw_edges(session, ctx);
	draw_vertices(session, ctx);
}

fn stroke_for(session: &EditorSession, sel: Selection) -> &'static str {
	if session.selection() == Some(sel) {
		HIGHLIGHT_STROKE
	} else {
		DEFAULT_STROKE
	}
}

fn draw_temp_edge(session: &EditorSession, ctx: &CanvasRenderingContext2d) {
	let Some(temp) = session.visible_temp_edge() else {
		return;
	};
	let Some(source) = session.graph().vertex(temp.source) else {
		return;
	};
	let start = closest_boundary_point(source.center, session.graph().radius(), temp.free_end);
	ctx.set_stroke_style_str(HIGHLIGHT_STROKE);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0),
		&JsValue::from_f64(4.0),
	));
	line(ctx, start, temp.free_end);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(session: &EditorSession, ctx: &CanvasRenderingContext2d) {
	for (id, edge) in session.graph().edges() {
		let stroke = stroke_for(session, Selection::Edge(id));
		ctx.set_stroke_style_str(stroke);
		line(ctx, edge.anchor_a, edge.anchor_b);

		let mid = edge.midpoint();
		// Offset the weight to the left of the line's direction.
		let (dx, dy) = (edge.anchor_b.x - edge.anchor_a.x, edge.anchor_b.y - edge.anchor_a.y);
		let len = (dx * dx + dy * dy).sqrt().max(1.0);
		let at = Point::new(mid.x + dy / len * 14.0, mid.y - dx / len * 14.0);
		let text = edge.weight.map(|w| w.to_string()).unwrap_or_default();
		ctx.set_fill_style_str(stroke);
		let _ = ctx.fill_text(&text, at.x, at.y);
		if edge.cursor_visible {
			draw_caret(ctx, &text, at);
		}
	}
}

fn draw_vertices(session: &EditorSession, ctx: &CanvasRenderingContext2d) {
	let radius = session.graph().radius();
	for (id, vertex) in session.graph().vertices() {
		let stroke = stroke_for(session, Selection::Vertex(id));
		let c = vertex.center;
		ctx.begin_path();
		let _ = ctx.arc(c.x, c.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill();
		ctx.set_stroke_style_str(stroke);
		ctx.stroke();

		let text = vertex.label.map(String::from).unwrap_or_default();
		ctx.set_fill_style_str(stroke);
		let _ = ctx.fill_text(&text, c.x, c.y);
		if vertex.cursor_visible {
			draw_caret(ctx, &text, c);
		}
	}
}

/// Text cursor just after `text` centred on `at`.
fn draw_caret(ctx: &CanvasRenderingContext2d, text: &str, at: Point) {
	let width = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
	let x = at.x + width / 2.0 + 1.0;
	line(
		ctx,
		Point::new(x, at.y - CARET_HEIGHT / 2.0),
		Point::new(x, at.y + CARET_HEIGHT / 2.0),
	);
}

fn line(ctx: &CanvasRenderingContext2d, from: Point, to: Point) {
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(to.x, to.y);
	ctx.stroke();
}
