use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Style class of a node. Only affects radius and colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum NodeKind {
	/// The map's hub.
	Central,
	/// A primary concept.
	Concept,
	/// A topic branching from a concept.
	Topic,
	/// A leaf detail.
	Detail,
	/// Anything else, including user-added nodes.
	#[default]
	Default,
}

impl NodeKind {
	/// Tag used in persisted data.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Central => "central",
			Self::Concept => "concept",
			Self::Topic => "topic",
			Self::Detail => "detail",
			Self::Default => "default",
		}
	}

	/// Render parameters for this kind.
	pub fn style(self) -> NodeStyle {
		match self {
			Self::Central => NodeStyle::new(70.0, "#0ea5a4", "#fff"),
			Self::Concept => NodeStyle::new(56.0, "#2563eb", "#fff"),
			Self::Topic => NodeStyle::new(48.0, "#f59e0b", "#111"),
			Self::Detail => NodeStyle::new(40.0, "#94a3b8", "#111"),
			Self::Default => NodeStyle::new(44.0, "#e2e8f0", "#111"),
		}
	}
}

impl From<String> for NodeKind {
	fn from(tag: String) -> Self {
		match tag.as_str() {
			"central" => Self::Central,
			"concept" => Self::Concept,
			"topic" => Self::Topic,
			"detail" => Self::Detail,
			_ => Self::Default,
		}
	}
}

impl From<NodeKind> for &'static str {
	fn from(kind: NodeKind) -> Self {
		kind.as_str()
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	pub radius: f64,
	pub fill: &'static str,
	pub text_color: &'static str,
}

impl NodeStyle {
	const fn new(radius: f64, fill: &'static str, text_color: &'static str) -> Self {
		Self {
			radius,
			fill,
			text_color,
		}
	}
}

/// A labeled node placed in world space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique id within the map.
	pub id: String,
	/// Display label.
	pub text: String,
	/// World x.
	pub x: f64,
	/// World y.
	pub y: f64,
	/// Style class.
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
}

impl Node {
	/// Build a node at `pos`.
	pub fn new(id: impl Into<String>, text: impl Into<String>, pos: Point, kind: NodeKind) -> Self {
		Self {
			id: id.into(),
			text: text.into(),
			x: pos.x,
			y: pos.y,
			kind,
		}
	}

	/// Center in world units.
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Radius in world units, also used for hit testing.
	pub fn radius(&self) -> f64 {
		self.kind.style().radius
	}
}

/// Directed edge between two node ids. Duplicates and self-loops are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
}

impl Connection {
	/// Connect `from` to `to`.
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
		}
	}

	/// Whether either endpoint is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.from == id || self.to == id
	}
}

/// Built-in node set used on first start, on reset and when the store is unreadable.
pub fn seed_nodes() -> Vec<Node> {
	[
		("n1", "TIC", 140.0, 80.0, NodeKind::Concept),
		("n2", "Formación de usuarios", 360.0, 80.0, NodeKind::Central),
		("n3", "Fases del programa", 560.0, 140.0, NodeKind::Topic),
		("n4", "Herramientas Web 2.0", 560.0, 260.0, NodeKind::Topic),
		("n5", "Evaluación", 360.0, 260.0, NodeKind::Topic),
		("n6", "Alcances", 760.0, 180.0, NodeKind::Detail),
		("n7", "Limitaciones", 760.0, 300.0, NodeKind::Detail),
	]
	.into_iter()
	.map(|(id, text, x, y, kind)| Node::new(id, text, Point::new(x, y), kind))
	.collect()
}

/// Built-in connection set matching [`seed_nodes`].
pub fn seed_connections() -> Vec<Connection> {
	[
		("n1", "n2"),
		("n2", "n3"),
		("n2", "n4"),
		("n2", "n5"),
		("n4", "n6"),
		("n4", "n7"),
	]
	.into_iter()
	.map(|(from, to)| Connection::new(from, to))
	.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_json_uses_type_tag() {
		let node = Node::new("n9", "Hola", Point::new(1.5, 2.0), NodeKind::Topic);
		let json = serde_json::to_string(&node).unwrap();
		assert_eq!(json, r#"{"id":"n9","text":"Hola","x":1.5,"y":2.0,"type":"topic"}"#);
		let back: Node = serde_json::from_str(&json).unwrap();
		assert_eq!(back, node);
	}

	#[test]
	fn unknown_or_missing_kind_falls_back_to_default() {
		let odd: Node =
			serde_json::from_str(r#"{"id":"a","text":"t","x":0,"y":0,"type":"weird"}"#).unwrap();
		assert_eq!(odd.kind, NodeKind::Default);
		let bare: Node = serde_json::from_str(r#"{"id":"a","text":"t","x":0,"y":0}"#).unwrap();
		assert_eq!(bare.kind, NodeKind::Default);
	}

	#[test]
	fn seed_connections_reference_seed_nodes() {
		let nodes = seed_nodes();
		for c in seed_connections() {
			assert!(nodes.iter().any(|n| n.id == c.from));
			assert!(nodes.iter().any(|n| n.id == c.to));
		}
	}
}
