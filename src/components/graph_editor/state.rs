use log::debug;

use super::blink::BlinkTimer;
use super::geometry::Point;
use super::graph::{Graph, TempEdge};
use super::labels::{LabelEdit, TakenLetters, encode_label, encode_weight};
use super::types::{EdgeId, EditorConfig, Key, Repaint, Selection, VertexId};

/// What the pointer is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Mode {
	#[default]
	Idle,
	/// A vertex follows the pointer. `origin` is where it was picked up;
	/// `moved` records whether the pointer actually moved since.
	Dragging {
		vertex: VertexId,
		origin: Point,
		moved: bool,
	},
	/// An edge is being drawn out of a vertex.
	DrawingEdge(TempEdge),
}

/// One editing surface: the graph, the selection, the pointer mode and the
/// cursor blink timer. Every input handler runs to completion and reports
/// whether the canvas must be repainted.
pub struct EditorSession {
	config: EditorConfig,
	graph: Graph,
	taken: TakenLetters,
	selection: Option<Selection>,
	mode: Mode,
	shift_held: bool,
	blink: Box<dyn BlinkTimer>,
}

impl EditorSession {
	pub fn new(config: EditorConfig, blink: Box<dyn BlinkTimer>) -> Self {
		Self {
			graph: Graph::new(config.vertex_radius),
			config,
			taken: TakenLetters::default(),
			selection: None,
			mode: Mode::Idle,
			shift_held: false,
			blink,
		}
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn selection(&self) -> Option<Selection> {
		self.selection
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	pub fn taken_letters(&self) -> TakenLetters {
		self.taken
	}

	pub fn shift_held(&self) -> bool {
		self.shift_held
	}

	pub fn temp_edge(&self) -> Option<TempEdge> {
		match self.mode {
			Mode::DrawingEdge(temp) => Some(temp),
			_ => None,
		}
	}

	/// The temp edge worth drawing: only once its free end has left the
	/// source vertex.
	pub fn visible_temp_edge(&self) -> Option<TempEdge> {
		let temp = self.temp_edge()?;
		let source = self.graph.vertex(temp.source)?;
		(!self.graph.vertex_contains(source, temp.free_end)).then_some(temp)
	}

	pub fn on_double_click(&mut self, p: Point) -> Repaint {
		self.selection = self.select_object(p);
		if self.selection.is_none() {
			if self.graph.vertex_count() < self.config.vertex_cap() {
				let id = self.graph.add_vertex(p);
				self.set_cursor_visible(Selection::Vertex(id), true);
				self.selection = Some(Selection::Vertex(id));
				debug!("created vertex {:?} at ({}, {})", id, p.x, p.y);
			} else {
				debug!("vertex limit of {} reached", self.config.vertex_cap());
			}
		}
		self.pulse_cursor();
		Repaint::Needed
	}

	pub fn on_pointer_down(&mut self, p: Point) -> Repaint {
		self.selection = self.select_object(p);
		if let Some(Selection::Vertex(v)) = self.selection {
			if self.shift_held {
				self.mode = Mode::DrawingEdge(TempEdge {
					source: v,
					free_end: p,
				});
			} else if let Some(vertex) = self.graph.vertex(v) {
				self.mode = Mode::Dragging {
					vertex: v,
					origin: vertex.center,
					moved: false,
				};
			}
		}
		if self.selection.is_some() {
			self.pulse_cursor();
		}
		Repaint::Needed
	}

	pub fn on_pointer_move(&mut self, p: Point) -> Repaint {
		match self.mode {
			Mode::Idle => Repaint::Skip,
			Mode::DrawingEdge(temp) => {
				self.selection = self.select_object(p);
				let mut free_end = p;
				if let Some(Selection::Vertex(target)) = self.selection {
					if target != temp.source {
						let snapped = self.graph.vertex(temp.source).and_then(|source| {
							let mid = source.center.midpoint(self.graph.vertex(target)?.center);
							self.graph.closest_point(target, mid)
						});
						if let Some(snapped) = snapped {
							free_end = snapped;
						}
						self.suppress_cursor(Selection::Vertex(target));
					}
				}
				self.mode = Mode::DrawingEdge(TempEdge { free_end, ..temp });
				Repaint::Needed
			}
			Mode::Dragging { vertex, origin, .. } => {
				self.mode = Mode::Dragging {
					vertex,
					origin,
					moved: true,
				};
				if let Some(v) = self.graph.vertex_mut(vertex) {
					v.center = p;
				}
				self.suppress_cursor(Selection::Vertex(vertex));
				self.graph.relocate_edges(vertex);
				Repaint::Needed
			}
		}
	}

	pub fn on_pointer_up(&mut self, p: Point) -> Repaint {
		self.selection = self.select_object(p);
		match std::mem::take(&mut self.mode) {
			Mode::DrawingEdge(temp) => {
				if let Some(Selection::Vertex(target)) = self.selection {
					if target != temp.source {
						if let Some(edge) = self.graph.add_edge(temp.source, target) {
							debug!("created edge {:?} between {:?} and {:?}", edge, temp.source, target);
							self.select_new_edge(edge);
						}
					}
				}
			}
			Mode::Dragging {
				vertex,
				origin,
				moved: true,
			} => {
				self.drop_vertex(vertex, origin, p);
				self.graph.relocate_edges(vertex);
			}
			_ => {}
		}
		self.pulse_cursor();
		Repaint::Needed
	}

	/// Always asks for a repaint, even when the key changed nothing.
	pub fn on_key_down(&mut self, key: &Key) -> Repaint {
		match (key, self.selection) {
			(Key::Shift, _) => self.shift_held = true,
			(Key::Delete, Some(Selection::Edge(e))) => self.delete_edge(e),
			(_, Some(Selection::Edge(e))) => self.set_edge_weight(e, key),
			(Key::Delete, Some(Selection::Vertex(v))) => self.delete_vertex(v),
			(_, Some(Selection::Vertex(v))) => self.set_vertex_label(v, key),
			(_, None) => {}
		}
		Repaint::Needed
	}

	pub fn on_key_up(&mut self, key: &Key) -> Repaint {
		if *key == Key::Shift {
			self.shift_held = false;
		}
		Repaint::Skip
	}

	/// One period of the cursor blink: flip the selection's cursor.
	pub fn blink_tick(&mut self) -> Repaint {
		let Some(sel) = self.selection else {
			return Repaint::Skip;
		};
		let visible = self.cursor_visible(sel);
		self.set_cursor_visible(sel, !visible);
		Repaint::Needed
	}

	pub fn delete_edge(&mut self, id: EdgeId) {
		if self.graph.remove_edge(id).is_some() {
			debug!("deleted edge {:?}", id);
		}
		if self.selection == Some(Selection::Edge(id)) {
			self.selection = None;
		}
	}

	/// Delete incident edges first, then release the label and drop the
	/// vertex, so no edge ever points at a removed vertex.
	pub fn delete_vertex(&mut self, id: VertexId) {
		while let Some(&edge) = self.graph.vertex(id).and_then(|v| v.edges.first()) {
			self.delete_edge(edge);
		}
		if let Some(vertex) = self.graph.remove_vertex(id) {
			if let Some(label) = vertex.label {
				self.taken.release(label);
			}
			debug!("deleted vertex {:?}", id);
		}
		self.selection = None;
	}

	fn set_edge_weight(&mut self, id: EdgeId, key: &Key) {
		if let Some(edge) = self.graph.edge_mut(id) {
			let weight = encode_weight(edge.weight, key);
			if weight != edge.weight {
				debug!("edge {:?} weight {:?} -> {:?}", id, edge.weight, weight);
				edge.weight = weight;
			}
		}
	}

	fn set_vertex_label(&mut self, id: VertexId, key: &Key) {
		let Some(vertex) = self.graph.vertex_mut(id) else {
			return;
		};
		match encode_label(vertex.label, key, self.taken) {
			LabelEdit::Assign(letter) => {
				self.taken.take(letter);
				vertex.label = Some(letter);
				debug!("vertex {:?} labelled {}", id, letter);
			}
			LabelEdit::Clear => {
				if let Some(letter) = vertex.label.take() {
					self.taken.release(letter);
					debug!("vertex {:?} label {} cleared", id, letter);
				}
			}
			LabelEdit::Ignore => {}
		}
	}

	/// Commit a dragged vertex at `p`, or send it back to `origin` when `p`
	/// lands inside another vertex.
	fn drop_vertex(&mut self, id: VertexId, origin: Point, p: Point) {
		let blocked = self
			.graph
			.vertices()
			.any(|(other, v)| other != id && self.graph.vertex_contains(v, p));
		let Some(vertex) = self.graph.vertex_mut(id) else {
			return;
		};
		if blocked {
			debug!("drop of {:?} at ({}, {}) overlaps a vertex, rolling back", id, p.x, p.y);
			vertex.center = origin;
		} else {
			vertex.center = p;
		}
	}

	/// Hit-test `p`: vertices first, then edges unless an edge is being
	/// drawn. Hides the old selection's cursor and shows the hit's.
	fn select_object(&mut self, p: Point) -> Option<Selection> {
		if let Some(sel) = self.selection {
			self.set_cursor_visible(sel, false);
		}
		let hit = self
			.graph
			.vertices()
			.find(|(_, v)| self.graph.vertex_contains(v, p))
			.map(|(id, _)| Selection::Vertex(id))
			.or_else(|| {
				if self.temp_edge().is_some() {
					return None;
				}
				let tolerance = self.config.edge_hit_tolerance;
				self.graph
					.edges()
					.find(|(_, e)| self.graph.edge_near(e, p, tolerance))
					.map(|(id, _)| Selection::Edge(id))
			});
		if let Some(sel) = hit {
			self.set_cursor_visible(sel, true);
		}
		hit
	}

	fn select_new_edge(&mut self, edge: EdgeId) {
		if let Some(sel) = self.selection {
			self.set_cursor_visible(sel, false);
		}
		self.set_cursor_visible(Selection::Edge(edge), true);
		self.selection = Some(Selection::Edge(edge));
	}

	fn pulse_cursor(&mut self) {
		self.blink.restart(self.config.blink_period);
	}

	/// Stop the blink before forcing the cursor off so no pending tick can
	/// flip it back on.
	fn suppress_cursor(&mut self, sel: Selection) {
		self.blink.cancel();
		self.set_cursor_visible(sel, false);
	}

	fn cursor_visible(&self, sel: Selection) -> bool {
		match sel {
			Selection::Vertex(v) => self.graph.vertex(v).is_some_and(|v| v.cursor_visible),
			Selection::Edge(e) => self.graph.edge(e).is_some_and(|e| e.cursor_visible),
		}
	}

	fn set_cursor_visible(&mut self, sel: Selection, visible: bool) {
		match sel {
			Selection::Vertex(v) => {
				if let Some(v) = self.graph.vertex_mut(v) {
					v.cursor_visible = visible;
				}
			}
			Selection::Edge(e) => {
				if let Some(e) = self.graph.edge_mut(e) {
					e.cursor_visible = visible;
				}
			}
		}
	}
}

impl Drop for EditorSession {
	fn drop(&mut self) {
		self.blink.cancel();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;
	use std::time::Duration;

	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	enum Call {
		Restart(Duration),
		Cancel,
	}

	#[derive(Clone, Default)]
	struct Recorder(Rc<RefCell<Vec<Call>>>);

	impl BlinkTimer for Recorder {
		fn restart(&mut self, period: Duration) {
			self.0.borrow_mut().push(Call::Restart(period));
		}

		fn cancel(&mut self) {
			self.0.borrow_mut().push(Call::Cancel);
		}
	}

	fn session() -> (EditorSession, Recorder) {
		let recorder = Recorder::default();
		let s = EditorSession::new(EditorConfig::default(), Box::new(recorder.clone()));
		(s, recorder)
	}

	fn pt(x: f64, y: f64) -> Point {
		Point::new(x, y)
	}

	fn vertex_at(s: &mut EditorSession, x: f64, y: f64) -> VertexId {
		let _ = s.on_double_click(pt(x, y));
		match s.selection() {
			Some(Selection::Vertex(v)) => v,
			other => panic!("expected a vertex selection, got {other:?}"),
		}
	}

	fn connect(s: &mut EditorSession, a: Point, b: Point) -> EdgeId {
		let _ = s.on_key_down(&Key::Shift);
		let _ = s.on_pointer_down(a);
		let _ = s.on_pointer_move(b);
		let _ = s.on_pointer_up(b);
		let _ = s.on_key_up(&Key::Shift);
		match s.selection() {
			Some(Selection::Edge(e)) => e,
			other => panic!("expected an edge selection, got {other:?}"),
		}
	}

	#[test]
	fn double_click_on_empty_space_creates_and_selects_vertex() {
		let (mut s, rec) = session();
		let v = vertex_at(&mut s, 50.0, 50.0);
		assert_eq!(s.graph().vertex_count(), 1);
		assert!(s.graph().vertex(v).unwrap().cursor_visible);
		assert_eq!(rec.0.borrow().last(), Some(&Call::Restart(Duration::from_millis(500))));
	}

	#[test]
	fn double_click_on_vertex_selects_it_without_creating() {
		let (mut s, _) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		vertex_at(&mut s, 150.0, 50.0);
		let _ = s.on_double_click(pt(55.0, 45.0));
		assert_eq!(s.selection(), Some(Selection::Vertex(a)));
		assert_eq!(s.graph().vertex_count(), 2);
	}

	#[test]
	fn vertex_cap_stops_creation() {
		let config = EditorConfig {
			max_vertices: 2,
			..EditorConfig::default()
		};
		let mut s = EditorSession::new(config, Box::new(Recorder::default()));
		for i in 0..4 {
			let _ = s.on_double_click(pt(60.0 * f64::from(i), 0.0));
		}
		assert_eq!(s.graph().vertex_count(), 2);
		assert_eq!(s.selection(), None);
	}

	#[test]
	fn pointer_down_on_vertex_starts_drag_and_shift_starts_edge() {
		let (mut s, _) = session();
		let v = vertex_at(&mut s, 50.0, 50.0);
		let _ = s.on_pointer_down(pt(52.0, 50.0));
		assert_eq!(
			s.mode(),
			Mode::Dragging {
				vertex: v,
				origin: pt(50.0, 50.0),
				moved: false
			}
		);
		let _ = s.on_pointer_up(pt(52.0, 50.0));
		assert_eq!(s.mode(), Mode::Idle);
		assert_eq!(s.graph().vertex(v).unwrap().center, pt(50.0, 50.0));

		let _ = s.on_key_down(&Key::Shift);
		let _ = s.on_pointer_down(pt(52.0, 50.0));
		assert_eq!(s.temp_edge().map(|t| t.source), Some(v));
		assert!(s.visible_temp_edge().is_none());
	}

	#[test]
	fn pointer_down_on_empty_space_clears_selection() {
		let (mut s, _) = session();
		let v = vertex_at(&mut s, 50.0, 50.0);
		let _ = s.on_pointer_down(pt(300.0, 300.0));
		assert_eq!(s.selection(), None);
		assert!(!s.graph().vertex(v).unwrap().cursor_visible);
		assert_eq!(s.mode(), Mode::Idle);
	}

	#[test]
	fn idle_pointer_move_needs_no_repaint() {
		let (mut s, _) = session();
		vertex_at(&mut s, 50.0, 50.0);
		assert_eq!(s.on_pointer_move(pt(10.0, 10.0)), Repaint::Skip);
	}

	#[test]
	fn drawing_edge_follows_pointer_then_snaps_to_target() {
		let (mut s, rec) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		let b = vertex_at(&mut s, 150.0, 50.0);
		let _ = s.on_key_down(&Key::Shift);
		let _ = s.on_pointer_down(pt(50.0, 50.0));

		assert!(s.on_pointer_move(pt(100.0, 90.0)).is_needed());
		let temp = s.temp_edge().unwrap();
		assert_eq!(temp.free_end, pt(100.0, 90.0));
		assert_eq!(s.selection(), None);
		assert!(s.visible_temp_edge().is_some());

		rec.0.borrow_mut().clear();
		let _ = s.on_pointer_move(pt(155.0, 55.0));
		let temp = s.temp_edge().unwrap();
		assert_eq!(temp.source, a);
		assert_eq!(temp.free_end, pt(130.0, 50.0));
		assert!(!s.graph().vertex(b).unwrap().cursor_visible);
		assert_eq!(*rec.0.borrow(), vec![Call::Cancel]);
	}

	#[test]
	fn edges_cannot_be_picked_while_drawing() {
		let (mut s, _) = session();
		vertex_at(&mut s, 50.0, 50.0);
		vertex_at(&mut s, 150.0, 50.0);
		let c = vertex_at(&mut s, 100.0, 150.0);
		connect(&mut s, pt(50.0, 50.0), pt(150.0, 50.0));
		let _ = s.on_key_down(&Key::Shift);
		let _ = s.on_pointer_down(pt(100.0, 150.0));
		let _ = s.on_pointer_move(pt(100.0, 50.0));
		assert_eq!(s.selection(), None);
		let _ = s.on_pointer_up(pt(100.0, 50.0));
		assert_eq!(s.selection(), None);
		assert_eq!(s.graph().edge_count(), 1);
		assert!(s.graph().vertex(c).unwrap().edges.is_empty());
	}

	#[test]
	fn releasing_on_source_creates_no_edge() {
		let (mut s, _) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		let _ = s.on_key_down(&Key::Shift);
		let _ = s.on_pointer_down(pt(50.0, 50.0));
		let _ = s.on_pointer_move(pt(55.0, 50.0));
		let _ = s.on_pointer_up(pt(55.0, 50.0));
		assert_eq!(s.graph().edge_count(), 0);
		assert_eq!(s.selection(), Some(Selection::Vertex(a)));
		assert!(s.temp_edge().is_none());
	}

	#[test]
	fn new_edge_takes_over_the_cursor() {
		let (mut s, _) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		let b = vertex_at(&mut s, 150.0, 50.0);
		let e = connect(&mut s, pt(50.0, 50.0), pt(150.0, 50.0));
		let g = s.graph();
		assert!(g.edge(e).unwrap().cursor_visible);
		assert!(!g.vertex(b).unwrap().cursor_visible);
		assert!(g.edge(e).unwrap().connects(a, b));
		assert_eq!(g.edge_count(), 1);
	}

	#[test]
	fn drag_commits_on_free_space_and_rolls_back_on_overlap() {
		let (mut s, _) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		let b = vertex_at(&mut s, 150.0, 50.0);

		let _ = s.on_pointer_down(pt(50.0, 50.0));
		let _ = s.on_pointer_move(pt(70.0, 200.0));
		let _ = s.on_pointer_up(pt(70.0, 200.0));
		assert_eq!(s.graph().vertex(a).unwrap().center, pt(70.0, 200.0));

		let _ = s.on_pointer_down(pt(70.0, 200.0));
		let _ = s.on_pointer_move(pt(155.0, 50.0));
		let _ = s.on_pointer_up(pt(155.0, 50.0));
		assert_eq!(s.graph().vertex(a).unwrap().center, pt(70.0, 200.0));
		assert_eq!(s.graph().vertex(b).unwrap().center, pt(150.0, 50.0));
	}

	#[test]
	fn dragging_suppresses_blink_and_reanchors_edges() {
		let (mut s, rec) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		vertex_at(&mut s, 150.0, 50.0);
		let e = connect(&mut s, pt(50.0, 50.0), pt(150.0, 50.0));

		let _ = s.on_pointer_down(pt(50.0, 50.0));
		rec.0.borrow_mut().clear();
		let _ = s.on_pointer_move(pt(50.0, 150.0));
		assert_eq!(*rec.0.borrow(), vec![Call::Cancel]);
		assert!(!s.graph().vertex(a).unwrap().cursor_visible);

		let edge = s.graph().edge(e).unwrap();
		let center = pt(50.0, 150.0);
		assert!((center.distance(edge.anchor_a) - 20.0).abs() < 1e-9);
	}

	#[test]
	fn blink_tick_toggles_selection_only() {
		let (mut s, _) = session();
		let v = vertex_at(&mut s, 50.0, 50.0);
		assert!(s.blink_tick().is_needed());
		assert!(!s.graph().vertex(v).unwrap().cursor_visible);
		assert!(s.blink_tick().is_needed());
		assert!(s.graph().vertex(v).unwrap().cursor_visible);
		let _ = s.on_pointer_down(pt(400.0, 400.0));
		assert_eq!(s.blink_tick(), Repaint::Skip);
	}

	#[test]
	fn key_down_always_repaints_and_key_up_never_does() {
		let (mut s, _) = session();
		assert!(s.on_key_down(&Key::Char('x')).is_needed());
		assert!(s.on_key_down(&Key::Shift).is_needed());
		assert!(s.shift_held());
		assert_eq!(s.on_key_up(&Key::Char('x')), Repaint::Skip);
		assert!(s.shift_held());
		assert_eq!(s.on_key_up(&Key::Shift), Repaint::Skip);
		assert!(!s.shift_held());
	}

	#[test]
	fn weight_typing_on_selected_edge() {
		let (mut s, _) = session();
		vertex_at(&mut s, 50.0, 50.0);
		vertex_at(&mut s, 150.0, 50.0);
		let e = connect(&mut s, pt(50.0, 50.0), pt(150.0, 50.0));
		let weight = |s: &EditorSession| s.graph().edge(e).unwrap().weight;

		let _ = s.on_key_down(&Key::Char('7'));
		let _ = s.on_key_down(&Key::Char('7'));
		assert_eq!(weight(&s), Some(77));
		let _ = s.on_key_down(&Key::Backspace);
		assert_eq!(weight(&s), Some(7));
		let _ = s.on_key_down(&Key::Backspace);
		assert_eq!(weight(&s), None);
	}

	#[test]
	fn delete_key_removes_selected_edge() {
		let (mut s, _) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		vertex_at(&mut s, 150.0, 50.0);
		connect(&mut s, pt(50.0, 50.0), pt(150.0, 50.0));
		let _ = s.on_key_down(&Key::Delete);
		assert_eq!(s.graph().edge_count(), 0);
		assert_eq!(s.selection(), None);
		assert!(s.graph().vertex(a).unwrap().edges.is_empty());
	}

	#[test]
	fn delete_key_removes_vertex_edges_and_label() {
		let (mut s, _) = session();
		let a = vertex_at(&mut s, 50.0, 50.0);
		let b = vertex_at(&mut s, 150.0, 50.0);
		vertex_at(&mut s, 100.0, 150.0);
		connect(&mut s, pt(50.0, 50.0), pt(150.0, 50.0));
		connect(&mut s, pt(100.0, 150.0), pt(50.0, 50.0));
		connect(&mut s, pt(150.0, 50.0), pt(100.0, 150.0));

		let _ = s.on_pointer_down(pt(50.0, 50.0));
		let _ = s.on_pointer_up(pt(50.0, 50.0));
		let _ = s.on_key_down(&Key::Char('q'));
		assert!(s.taken_letters().contains('Q'));

		let _ = s.on_key_down(&Key::Delete);
		assert!(s.graph().vertex(a).is_none());
		assert_eq!(s.graph().edge_count(), 1);
		assert!(s.graph().edges().all(|(_, e)| !e.touches(a)));
		assert_eq!(s.graph().vertex(b).unwrap().edges.len(), 1);
		assert!(!s.taken_letters().contains('Q'));
		assert_eq!(s.selection(), None);
	}

	#[test]
	fn dropping_session_cancels_blink() {
		let (s, rec) = session();
		drop(s);
		assert_eq!(rec.0.borrow().last(), Some(&Call::Cancel));
	}
}
