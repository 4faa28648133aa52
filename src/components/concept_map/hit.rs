//! Pure hit testing against the graph, using only the stored view transform.

use kurbo::{CubicBez, ParamCurveNearest, Point};

use super::graph::ConceptGraph;
use super::viewport::ViewTransform;

/// Stroke width of an unselected connection, in world units.
pub const CONNECTION_WIDTH: f64 = 3.0;
/// Stroke width of the selected connection.
pub const SELECTED_CONNECTION_WIDTH: f64 = 5.0;
/// Radius of the marker disc drawn at a connection's target.
pub const TARGET_MARKER_RADIUS: f64 = 6.0;

const NEAREST_ACCURACY: f64 = 1e-3;

/// What lies under a screen point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	/// A node, by id.
	Node(String),
	/// A connection, by list index.
	Connection(usize),
}

/// The S-shaped curve joining two node centers, in world space.
pub fn connection_curve(from: Point, to: Point) -> CubicBez {
	let mid = (from.x + to.x) / 2.0;
	CubicBez::new(from, Point::new(mid, from.y), Point::new(mid, to.y), to)
}

/// Topmost node under `screen`. Later nodes are drawn above earlier ones.
pub fn node_at(graph: &ConceptGraph, view: &ViewTransform, screen: Point) -> Option<String> {
	let world = view.screen_to_world(screen);
	graph
		.nodes()
		.iter()
		.rev()
		.find(|node| node.position().distance(world) <= node.radius())
		.map(|node| node.id.clone())
}

/// Closest resolvable connection whose stroke (plus `tolerance` screen px) covers `screen`.
pub fn connection_at(
	graph: &ConceptGraph,
	view: &ViewTransform,
	screen: Point,
	tolerance: f64,
	selected: Option<usize>,
) -> Option<usize> {
	let world = view.screen_to_world(screen);
	let mut best: Option<(usize, f64)> = None;
	for (i, from, to) in graph.resolved_connections() {
		let width = if selected == Some(i) {
			SELECTED_CONNECTION_WIDTH
		} else {
			CONNECTION_WIDTH
		};
		let limit = width / 2.0 + tolerance / view.k;
		let curve = connection_curve(from.position(), to.position());
		let dist = curve.nearest(world, NEAREST_ACCURACY).distance_sq.sqrt();
		if dist <= limit && best.is_none_or(|(_, d)| dist < d) {
			best = Some((i, dist));
		}
	}
	best.map(|(i, _)| i)
}

/// Resolve a screen point: nodes win over connections.
pub fn hit_test(
	graph: &ConceptGraph,
	view: &ViewTransform,
	screen: Point,
	tolerance: f64,
	selected: Option<usize>,
) -> Option<Hit> {
	node_at(graph, view, screen)
		.map(Hit::Node)
		.or_else(|| connection_at(graph, view, screen, tolerance, selected).map(Hit::Connection))
}
