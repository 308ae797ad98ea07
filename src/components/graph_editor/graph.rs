//! Vertex/edge arena with boundary-anchored edges.

use std::collections::BTreeMap;

use super::geometry::{Point, circle_contains, closest_boundary_point, segment_distance};
use super::types::{EdgeId, VertexId};

/// A circular graph node.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub center: Point,
	pub label: Option<char>,
	/// Incident edges in attachment order.
	pub edges: Vec<EdgeId>,
	pub cursor_visible: bool,
}

impl Vertex {
	fn new(center: Point) -> Self {
		Self {
			center,
			label: None,
			edges: Vec::new(),
			cursor_visible: false,
		}
	}
}

/// A connection between two distinct vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub va: VertexId,
	pub vb: VertexId,
	pub weight: Option<u64>,
	/// Where the line meets `va`'s boundary.
	pub anchor_a: Point,
	/// Where the line meets `vb`'s boundary.
	pub anchor_b: Point,
	pub cursor_visible: bool,
}

impl Edge {
	/// Whether this edge joins `a` and `b`, in either order.
	pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
		(self.va == a && self.vb == b) || (self.va == b && self.vb == a)
	}

	/// Whether `v` is one of the endpoints.
	pub fn touches(&self, v: VertexId) -> bool {
		self.va == v || self.vb == v
	}

	/// Midpoint of the drawn line.
	pub fn midpoint(&self) -> Point {
		self.anchor_a.midpoint(self.anchor_b)
	}
}

/// An edge being drawn from `source` towards the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TempEdge {
	pub source: VertexId,
	pub free_end: Point,
}

/// Vertices and edges keyed by stable handles. Iteration follows insertion
/// order since handles only grow.
#[derive(Clone, Debug)]
pub struct Graph {
	radius: f64,
	vertices: BTreeMap<VertexId, Vertex>,
	edges: BTreeMap<EdgeId, Edge>,
	next_vertex: u32,
	next_edge: u32,
}

impl Graph {
	/// Empty graph whose vertices all have radius `radius`.
	pub fn new(radius: f64) -> Self {
		Self {
			radius,
			vertices: BTreeMap::new(),
			edges: BTreeMap::new(),
			next_vertex: 0,
			next_edge: 0,
		}
	}

	pub fn radius(&self) -> f64 {
		self.radius
	}

	pub fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
		self.vertices.get(&id)
	}

	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(&id)
	}

	pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
		self.vertices.get_mut(&id)
	}

	pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
		self.edges.get_mut(&id)
	}

	/// Vertices in insertion order.
	pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
		self.vertices.iter().map(|(id, v)| (*id, v))
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
		self.edges.iter().map(|(id, e)| (*id, e))
	}

	pub(crate) fn add_vertex(&mut self, center: Point) -> VertexId {
		let id = VertexId(self.next_vertex);
		self.next_vertex += 1;
		self.vertices.insert(id, Vertex::new(center));
		id
	}

	/// Connect two distinct live vertices, anchoring both ends. Returns `None`
	/// if either end is missing or they are the same vertex.
	pub(crate) fn add_edge(&mut self, va: VertexId, vb: VertexId) -> Option<EdgeId> {
		if va == vb || !self.vertices.contains_key(&va) || !self.vertices.contains_key(&vb) {
			return None;
		}
		let id = EdgeId(self.next_edge);
		self.next_edge += 1;
		self.edges.insert(
			id,
			Edge {
				va,
				vb,
				weight: None,
				anchor_a: Point::default(),
				anchor_b: Point::default(),
				cursor_visible: false,
			},
		);
		for v in [va, vb] {
			if let Some(vertex) = self.vertices.get_mut(&v) {
				vertex.edges.push(id);
			}
		}
		self.anchor_edge(id);
		Some(id)
	}

	/// Detach an edge from both endpoints and drop it.
	pub(crate) fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
		let edge = self.edges.remove(&id)?;
		for v in [edge.va, edge.vb] {
			if let Some(vertex) = self.vertices.get_mut(&v) {
				vertex.edges.retain(|e| *e != id);
			}
		}
		Some(edge)
	}

	/// Remove every incident edge, front first, then the vertex itself.
	pub(crate) fn remove_vertex(&mut self, id: VertexId) -> Option<Vertex> {
		while let Some(&edge) = self.vertices.get(&id)?.edges.first() {
			self.remove_edge(edge);
		}
		self.vertices.remove(&id)
	}

	/// Point on `id`'s boundary closest to `target`.
	pub fn closest_point(&self, id: VertexId, target: Point) -> Option<Point> {
		let v = self.vertices.get(&id)?;
		Some(closest_boundary_point(v.center, self.radius, target))
	}

	pub fn vertex_contains(&self, v: &Vertex, p: Point) -> bool {
		circle_contains(v.center, self.radius, p)
	}

	pub fn edge_near(&self, e: &Edge, p: Point, tolerance: f64) -> bool {
		segment_distance(e.anchor_a, e.anchor_b, p) <= tolerance
	}

	/// Re-seat both anchors of `id` on its endpoints' boundaries, facing the
	/// midpoint between the two centers.
	pub(crate) fn anchor_edge(&mut self, id: EdgeId) {
		let Some(edge) = self.edges.get(&id) else {
			return;
		};
		let (Some(a), Some(b)) = (self.vertices.get(&edge.va), self.vertices.get(&edge.vb)) else {
			return;
		};
		let mid = a.center.midpoint(b.center);
		let anchor_a = closest_boundary_point(a.center, self.radius, mid);
		let anchor_b = closest_boundary_point(b.center, self.radius, mid);
		if let Some(edge) = self.edges.get_mut(&id) {
			edge.anchor_a = anchor_a;
			edge.anchor_b = anchor_b;
		}
	}

	/// Re-anchor every edge incident to `id`.
	pub(crate) fn relocate_edges(&mut self, id: VertexId) {
		let incident = match self.vertices.get(&id) {
			Some(v) => v.edges.clone(),
			None => return,
		};
		for edge in incident {
			self.anchor_edge(edge);
		}
	}
}
