use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::blink::IntervalBlink;
use super::geometry::Point;
use super::render;
use super::state::EditorSession;
use super::types::{EditorConfig, Key, Repaint};

/// A session bound to the canvas it paints on.
struct Surface {
	session: EditorSession,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl Surface {
	fn paint(&self) {
		render::render(&self.session, &self.ctx, self.width, self.height);
	}

	fn apply(&mut self, handler: impl FnOnce(&mut EditorSession) -> Repaint) {
		if handler(&mut self.session).is_needed() {
			self.paint();
		}
	}
}

type SharedSurface = Rc<RefCell<Option<Surface>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Translate a mouse event into canvas-local coordinates. `None` when the
/// canvas is not mounted.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Run `handler` on the mounted session and repaint if it asks to.
fn dispatch(surface: &SharedSurface, handler: impl FnOnce(&mut EditorSession) -> Repaint) {
	if let Ok(mut guard) = surface.try_borrow_mut() {
		if let Some(ref mut s) = *guard {
			s.apply(handler);
		}
	}
}

fn blink_timer(surface: Weak<RefCell<Option<Surface>>>) -> IntervalBlink {
	IntervalBlink::new(move || {
		if let Some(surface) = surface.upgrade() {
			dispatch(&surface, EditorSession::blink_tick);
		}
	})
}

/// Canvas on which vertices are double-clicked into existence, dragged,
/// shift-dragged into edges, labelled with letters and weighted with digits.
#[component]
pub fn GraphEditorCanvas(
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: EditorConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let surface: SharedSurface = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (surface_init, resize_cb_init) = (surface.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			log::warn!("no window, graph editor disabled");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
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
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			log::warn!("canvas has no 2d context, graph editor disabled");
			return;
		};
		let blink = blink_timer(Rc::downgrade(&surface_init));
		let mounted = Surface {
			session: EditorSession::new(config.clone(), Box::new(blink)),
			ctx,
			width: w,
			height: h,
		};
		mounted.paint();
		*surface_init.borrow_mut() = Some(mounted);

		if fullscreen {
			let (surface_resize, canvas_resize) = (surface_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Ok(mut guard) = surface_resize.try_borrow_mut() {
					if let Some(ref mut s) = *guard {
						s.width = nw;
						s.height = nh;
						s.paint();
					}
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let surface_dc = surface.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		dispatch(&surface_dc, |s| s.on_double_click(p));
	};

	let surface_md = surface.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		dispatch(&surface_md, |s| s.on_pointer_down(p));
	};

	let surface_mm = surface.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		dispatch(&surface_mm, |s| s.on_pointer_move(p));
	};

	let surface_mu = surface.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(p) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		dispatch(&surface_mu, |s| s.on_pointer_up(p));
	};

	let surface_kd = surface.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let key = Key::from_key_name(&ev.key());
		if key == Key::Backspace {
			ev.prevent_default();
		}
		dispatch(&surface_kd, |s| s.on_key_down(&key));
	};

	let surface_ku = surface.clone();
	let on_keyup = move |ev: KeyboardEvent| {
		let key = Key::from_key_name(&ev.key());
		dispatch(&surface_ku, |s| s.on_key_up(&key));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-editor-canvas"
			tabindex="0"
			on:dblclick=on_dblclick
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:keydown=on_keydown
			on:keyup=on_keyup
			style="display: block; outline: none; cursor: crosshair;"
		/>
	}
}
