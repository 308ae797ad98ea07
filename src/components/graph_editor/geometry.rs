//! Circle and segment math used for hit-testing and edge anchoring.

/// A canvas-local point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal offset from the canvas' left edge.
	pub x: f64,
	/// Vertical offset from the canvas' top edge.
	pub y: f64,
}

impl Point {
	/// Build a point from its coordinates.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Point halfway between `self` and `other`.
	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Point on the circle `(center, radius)` closest to `target`.
///
/// A target sitting exactly on the center has no direction; the point
/// directly to the right of the center is returned so the result still lies
/// on the boundary.
pub fn closest_boundary_point(center: Point, radius: f64, target: Point) -> Point {
	let (dx, dy) = (target.x - center.x, target.y - center.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < f64::EPSILON {
		return Point::new(center.x + radius, center.y);
	}
	Point::new(center.x + dx / dist * radius, center.y + dy / dist * radius)
}

/// Whether `p` lies inside or on the circle `(center, radius)`.
pub fn circle_contains(center: Point, radius: f64, p: Point) -> bool {
	center.distance(p) <= radius
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
	let (vx, vy) = (b.x - a.x, b.y - a.y);
	let len2 = vx * vx + vy * vy;
	if len2 < f64::EPSILON {
		return a.distance(p);
	}
	let t = (((p.x - a.x) * vx + (p.y - a.y) * vy) / len2).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * vx, a.y + t * vy))
}
