use kurbo::Point;
use log::{debug, info};

use super::graph::ConceptGraph;
use super::interaction::{self, Effect, Event, Interaction, Scene};
use super::types::{Connection, Node, NodeKind, seed_connections, seed_nodes};
use super::viewport::ViewTransform;
use crate::config::CanvasConfig;

const CONFIRM_DELETE_NODE: &str = "Eliminar nodo y sus conexiones?";
const CONFIRM_DELETE_CONNECTION: &str = "Eliminar conexión seleccionada?";
const CONFIRM_RESET: &str = "Restablecer mapa al diseño inicial?";
const PROMPT_EDIT_NODE: &str = "Editar texto del nodo:";

/// Blocking user dialogs the engine consults before destructive or editing actions.
pub trait Dialogs {
	/// Yes/no gate. Only `true` lets the action proceed.
	fn confirm(&mut self, message: &str) -> bool;
	/// Text prompt pre-filled with `current`. `None` means cancelled.
	fn prompt_text(&mut self, message: &str, current: &str) -> Option<String>;
}

/// Which parts of the model an event touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
	pub nodes: bool,
	pub connections: bool,
	pub view: bool,
	pub interaction: bool,
}

impl Changes {
	/// Whether any persisted slot needs writing.
	pub fn graph(&self) -> bool {
		self.nodes || self.connections
	}
}

/// Snapshot of selection and counts, for the overlay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Status {
	pub connect_from: Option<String>,
	pub selected_connection: Option<usize>,
	pub context_menu: Option<(String, f64, f64)>,
	pub node_count: usize,
	pub connection_count: usize,
}

/// Owns the graph, view transform and gesture state of one canvas.
pub struct ConceptMapState {
	pub graph: ConceptGraph,
	pub transform: ViewTransform,
	pub interaction: Interaction,
	pub config: CanvasConfig,
	pub width: f64,
	pub height: f64,
	jitter_seed: usize,
}

impl ConceptMapState {
	pub fn new(nodes: Vec<Node>, connections: Vec<Connection>, config: CanvasConfig) -> Self {
		Self {
			graph: ConceptGraph::new(nodes, connections),
			transform: ViewTransform::default(),
			interaction: Interaction::default(),
			config,
			width: 0.0,
			height: 0.0,
			jitter_seed: 0,
		}
	}

	/// Seed for the scatter of newly added nodes.
	pub fn with_jitter_seed(mut self, seed: usize) -> Self {
		self.jitter_seed = seed;
		self
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Run one input event to completion.
	pub fn dispatch(&mut self, event: Event, dialogs: &mut dyn Dialogs) -> Changes {
		let (next, effects) = interaction::transition(
			&self.interaction,
			&event,
			&Scene {
				graph: &self.graph,
				view: &self.transform,
				config: &self.config,
			},
		);
		let mut changes = Changes {
			interaction: next != self.interaction,
			..Changes::default()
		};
		self.interaction = next;
		for effect in effects {
			self.apply(effect, dialogs, &mut changes);
		}
		changes
	}

	fn apply(&mut self, effect: Effect, dialogs: &mut dyn Dialogs, changes: &mut Changes) {
		match effect {
			Effect::MoveNode { id, to } => match self.graph.move_node(&id, to) {
				Ok(()) => changes.nodes = true,
				Err(err) => debug!("Ignoring drag: {err}"),
			},
			Effect::Pan(delta) => {
				self.transform.pan(delta);
				changes.view = true;
			}
			Effect::ZoomAt { at, factor } => {
				changes.view |= self.transform.zoom_at(at, factor, self.config.zoom_limits);
			}
			Effect::AddConnection { from, to } => {
				self.graph.add_connection(from, to);
				changes.connections = true;
			}
			Effect::AddNode => {
				let pos = self.scatter_point();
				self.graph
					.add_node(self.config.new_node_text.clone(), pos, NodeKind::Default);
				changes.nodes = true;
			}
			Effect::EditNode { id } => {
				let Some(current) = self.graph.node(&id).map(|n| n.text.clone()) else {
					debug!("Ignoring edit of missing node {id}");
					return;
				};
				if let Some(text) = dialogs.prompt_text(PROMPT_EDIT_NODE, &current) {
					changes.nodes |= self.graph.rename_node(&id, text).is_ok();
				}
			}
			Effect::DeleteNode { id } => {
				if !self.graph.contains(&id) || !dialogs.confirm(CONFIRM_DELETE_NODE) {
					return;
				}
				if let Ok(removed) = self.graph.delete_node(&id) {
					self.interaction.node_removed(&id, &removed);
					changes.nodes = true;
					changes.connections |= !removed.is_empty();
					changes.interaction = true;
				}
			}
			Effect::DeleteConnection { index } => {
				if index >= self.graph.connections().len() || !dialogs.confirm(CONFIRM_DELETE_CONNECTION) {
					return;
				}
				if self.graph.delete_connection_at(index).is_ok() {
					self.interaction.connection_removed(index);
					changes.connections = true;
					changes.interaction = true;
				}
			}
			Effect::Reset => {
				if !dialogs.confirm(CONFIRM_RESET) {
					return;
				}
				self.graph.replace(seed_nodes(), seed_connections());
				self.interaction.clear();
				info!("Concept map reset to seed data");
				changes.nodes = true;
				changes.connections = true;
				changes.interaction = true;
			}
		}
	}

	/// Next pseudo-random spot inside the configured scatter box.
	fn scatter_point(&mut self) -> Point {
		let (ox, oy) = self.config.new_node_origin;
		let (sx, sy) = self.config.new_node_spread;
		let jx = rand_simple(self.jitter_seed);
		let jy = rand_simple(self.jitter_seed.wrapping_add(1));
		self.jitter_seed = self.jitter_seed.wrapping_add(2);
		Point::new(ox + jx * sx, oy + jy * sy)
	}

	pub fn status(&self) -> Status {
		let selection = &self.interaction.selection;
		Status {
			connect_from: selection.connect_from().map(str::to_owned),
			selected_connection: selection.connection(),
			context_menu: self
				.interaction
				.context_menu
				.as_ref()
				.map(|m| (m.node.clone(), m.at.x, m.at.y)),
			node_count: self.graph.nodes().len(),
			connection_count: self.graph.connections().len(),
		}
	}
}

/// Simple pseudo-random number in `[0, 1)` (deterministic per seed).
fn rand_simple(seed: usize) -> f64 {
	let x = (seed.wrapping_add(1).wrapping_mul(9301).wrapping_add(49297)) % 233280;
	(x as f64) / 233280.0
}
