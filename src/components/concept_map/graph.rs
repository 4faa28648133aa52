use std::collections::HashMap;

use kurbo::Point;
use log::{debug, warn};

use super::types::{Connection, Node, NodeKind};
use crate::error::{Error, Result};

/// Nodes plus the ordered list of directed connections between them.
///
/// Nodes keep insertion order (later nodes draw on top) and are indexed by id.
/// Connections are addressed by list position, so indices shift after removals.
#[derive(Clone, Debug, Default)]
pub struct ConceptGraph {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	connections: Vec<Connection>,
	next_id: u64,
}

impl ConceptGraph {
	/// Build from loaded or seed data. Later duplicates of an id are dropped.
	pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
		let mut graph = Self {
			nodes: Vec::with_capacity(nodes.len()),
			index: HashMap::with_capacity(nodes.len()),
			connections,
			next_id: 0,
		};
		for node in nodes {
			if graph.index.contains_key(&node.id) {
				warn!("Dropping duplicate node id {}", node.id);
				continue;
			}
			graph.index.insert(node.id.clone(), graph.nodes.len());
			graph.nodes.push(node);
		}
		graph.next_id = graph.nodes.len() as u64 + 1;
		graph
	}

	/// Replace everything, as on reset.
	pub fn replace(&mut self, nodes: Vec<Node>, connections: Vec<Connection>) {
		*self = Self::new(nodes, connections);
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn connections(&self) -> &[Connection] {
		&self.connections
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Connections whose endpoints both resolve, with their list index.
	///
	/// Dangling connections are skipped: they are neither drawn nor selectable.
	pub fn resolved_connections(&self) -> impl Iterator<Item = (usize, &Node, &Node)> + '_ {
		self.connections
			.iter()
			.enumerate()
			.filter_map(|(i, c)| Some((i, self.node(&c.from)?, self.node(&c.to)?)))
	}

	fn fresh_id(&mut self) -> String {
		loop {
			let id = format!("n{}", self.next_id);
			self.next_id += 1;
			if !self.index.contains_key(&id) {
				return id;
			}
		}
	}

	/// Append a node under a fresh id.
	pub fn add_node(&mut self, text: impl Into<String>, pos: Point, kind: NodeKind) -> String {
		let id = self.fresh_id();
		self.index.insert(id.clone(), self.nodes.len());
		self.nodes.push(Node::new(id.clone(), text, pos, kind));
		debug!("Added node {id}");
		id
	}

	pub fn move_node(&mut self, id: &str, pos: Point) -> Result<()> {
		let node = self.node_mut(id)?;
		node.x = pos.x;
		node.y = pos.y;
		Ok(())
	}

	pub fn rename_node(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
		self.node_mut(id)?.text = text.into();
		debug!("Renamed node {id}");
		Ok(())
	}

	/// Remove a node and every connection touching it.
	///
	/// Returns the pre-removal indices of the purged connections, ascending.
	pub fn delete_node(&mut self, id: &str) -> Result<Vec<usize>> {
		let Some(pos) = self.index.remove(id) else {
			return Err(Error::NodeNotFound(id.into()));
		};
		self.nodes.remove(pos);
		for node in &self.nodes[pos..] {
			if let Some(i) = self.index.get_mut(&node.id) {
				*i -= 1;
			}
		}

		let mut removed = Vec::new();
		let mut i = 0;
		self.connections.retain(|c| {
			let keep = !c.touches(id);
			if !keep {
				removed.push(i);
			}
			i += 1;
			keep
		});
		debug!("Deleted node {id} and {} connection(s)", removed.len());
		Ok(removed)
	}

	/// Append a connection; returns its index.
	pub fn add_connection(&mut self, from: impl Into<String>, to: impl Into<String>) -> usize {
		let connection = Connection::new(from, to);
		debug!("Connected {} -> {}", connection.from, connection.to);
		self.connections.push(connection);
		self.connections.len() - 1
	}

	pub fn delete_connection_at(&mut self, index: usize) -> Result<Connection> {
		if index >= self.connections.len() {
			return Err(Error::ConnectionOutOfRange {
				index,
				len: self.connections.len(),
			});
		}
		let removed = self.connections.remove(index);
		debug!("Deleted connection #{index} {} -> {}", removed.from, removed.to);
		Ok(removed)
	}

	fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
		match self.index.get(id) {
			Some(&i) => Ok(&mut self.nodes[i]),
			None => Err(Error::NodeNotFound(id.into())),
		}
	}
}
