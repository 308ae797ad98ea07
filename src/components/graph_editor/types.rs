use std::time::Duration;

/// Number of distinct single-letter vertex labels.
pub const LABEL_SPACE: usize = 26;

/// Stable handle of a vertex. Handles are never reused within a session, so
/// ordering by handle is insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub(crate) u32);

/// Stable handle of an edge, ordered by insertion like [`VertexId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) u32);

/// The element currently under the editing cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
	/// A vertex; typed letters label it.
	Vertex(VertexId),
	/// An edge; typed digits weight it.
	Edge(EdgeId),
}

/// Keys the editor distinguishes, parsed from `KeyboardEvent::key()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
	Shift,
	Delete,
	Backspace,
	/// Any key producing exactly one character.
	Char(char),
	Other(String),
}

impl Key {
	/// Parse a DOM key identifier such as `"Shift"`, `"a"` or `"7"`.
	pub fn from_key_name(name: &str) -> Self {
		match name {
			"Shift" => Key::Shift,
			"Delete" => Key::Delete,
			"Backspace" => Key::Backspace,
			_ => {
				let mut chars = name.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => Key::Char(c),
					_ => Key::Other(name.to_owned()),
				}
			}
		}
	}
}

/// Whether the host should repaint after a handler returns.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repaint {
	Needed,
	Skip,
}

impl Repaint {
	/// `true` for [`Repaint::Needed`].
	pub fn is_needed(self) -> bool {
		self == Repaint::Needed
	}
}

/// Tunables for an editor session.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// Radius of every vertex circle, in canvas pixels.
	pub vertex_radius: f64,
	/// How far from an edge line a pointer may land and still pick it.
	pub edge_hit_tolerance: f64,
	/// Double-click stops creating vertices at this count. Clamped to the
	/// label space.
	pub max_vertices: usize,
	/// Period of the selection cursor blink.
	pub blink_period: Duration,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			vertex_radius: 20.0,
			edge_hit_tolerance: 6.0,
			max_vertices: LABEL_SPACE,
			blink_period: Duration::from_millis(500),
		}
	}
}

impl EditorConfig {
	pub(crate) fn vertex_cap(&self) -> usize {
		self.max_vertices.min(LABEL_SPACE)
	}
}
