//! Pointer gesture state machine.
//!
//! [`transition`] is pure: it reads the graph and view, and returns the next
//! [`Interaction`] plus the [`Effect`]s the owner should apply. Destructive
//! effects go through a confirmation gate when applied, so selection fixups
//! after a deletion happen in [`Interaction::node_removed`] and
//! [`Interaction::connection_removed`] rather than here.

use kurbo::{Point, Vec2};

use super::graph::ConceptGraph;
use super::hit::{self, Hit};
use super::viewport::ViewTransform;
use crate::config::{CanvasConfig, PointerButton};

/// Current gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
	#[default]
	Idle,
	/// A node follows the pointer, keeping the offset it was grabbed at.
	DraggingNode {
		id: String,
		grab_offset: Vec2,
		origin: Point,
		moved: bool,
	},
	/// The view follows the pointer.
	Panning { last: Point },
}

/// The two mutually exclusive selection kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	None,
	/// A node waiting to become the source of a new connection.
	ConnectFrom(String),
	/// A connection, by list index.
	Connection(usize),
}

impl Selection {
	pub fn connect_from(&self) -> Option<&str> {
		match self {
			Self::ConnectFrom(id) => Some(id),
			_ => None,
		}
	}

	pub fn connection(&self) -> Option<usize> {
		match self {
			Self::Connection(i) => Some(*i),
			_ => None,
		}
	}
}

/// Node context menu, anchored at a screen position.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenu {
	pub node: String,
	pub at: Point,
}

/// Entries of the node context menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextAction {
	Edit,
	ConnectFrom,
	Delete,
}

/// Everything the canvas remembers between input events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
	pub mode: Mode,
	pub selection: Selection,
	pub context_menu: Option<ContextMenu>,
	/// Set when a node drag ends, so the click the surface sends next is ignored.
	swallow_click: bool,
}

/// Input delivered to the state machine. Positions are in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
	PointerDown { at: Point, button: PointerButton },
	PointerMove { at: Point },
	PointerUp { at: Point },
	PointerLeave,
	Click { at: Point },
	DoubleClick { at: Point },
	SecondaryClick { at: Point },
	Wheel { at: Point, delta_y: f64 },
	ContextAction(ContextAction),
	CloseContextMenu,
	AddNode,
	DeleteSelectedConnection,
	Reset,
}

/// Model mutations requested by a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
	MoveNode { id: String, to: Point },
	Pan(Vec2),
	ZoomAt { at: Point, factor: f64 },
	AddConnection { from: String, to: String },
	AddNode,
	/// Ask for new text, then rename.
	EditNode { id: String },
	/// Confirm, then delete the node and its connections.
	DeleteNode { id: String },
	/// Confirm, then delete the connection.
	DeleteConnection { index: usize },
	/// Confirm, then restore seed data.
	Reset,
}

/// Read-only view of the model used to resolve hits.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
	pub graph: &'a ConceptGraph,
	pub view: &'a ViewTransform,
	pub config: &'a CanvasConfig,
}

impl Scene<'_> {
	fn hit(&self, at: Point, selection: &Selection) -> Option<Hit> {
		hit::hit_test(
			self.graph,
			self.view,
			at,
			self.config.connection_hit_tolerance,
			selection.connection(),
		)
	}
}

/// Compute the next interaction state and the effects of `event`.
pub fn transition(state: &Interaction, event: &Event, scene: &Scene<'_>) -> (Interaction, Vec<Effect>) {
	let mut next = state.clone();
	let mut effects = Vec::new();

	match event {
		Event::PointerDown { at, button } => {
			next.swallow_click = false;
			if *button == PointerButton::Secondary {
				return (next, effects);
			}
			if let Some(id) = hit::node_at(scene.graph, scene.view, *at) {
				if let Some(node) = scene.graph.node(&id) {
					let grab_offset = scene.view.screen_to_world(*at) - node.position();
					next.mode = Mode::DraggingNode {
						id,
						grab_offset,
						origin: *at,
						moved: false,
					};
				}
			} else if *button == scene.config.pan_button {
				next.mode = Mode::Panning { last: *at };
			}
		}
		Event::PointerMove { at } => match &mut next.mode {
			Mode::DraggingNode {
				id,
				grab_offset,
				origin,
				moved,
			} => {
				let to = scene.view.screen_to_world(*at) - *grab_offset;
				if origin.distance(*at) > scene.config.click_slop {
					*moved = true;
				}
				effects.push(Effect::MoveNode { id: id.clone(), to });
			}
			Mode::Panning { last } => {
				effects.push(Effect::Pan(*at - *last));
				*last = *at;
			}
			Mode::Idle => {}
		},
		Event::PointerUp { .. } => {
			if let Mode::DraggingNode { moved: true, .. } = next.mode {
				next.swallow_click = true;
			}
			next.mode = Mode::Idle;
		}
		Event::PointerLeave => next.mode = Mode::Idle,
		Event::Click { at } => {
			if next.swallow_click {
				next.swallow_click = false;
				return (next, effects);
			}
			match scene.hit(*at, &state.selection) {
				Some(Hit::Node(id)) => {
					next.selection = match &state.selection {
						Selection::ConnectFrom(from) if *from == id => Selection::None,
						Selection::ConnectFrom(from) => {
							effects.push(Effect::AddConnection {
								from: from.clone(),
								to: id,
							});
							Selection::None
						}
						_ => Selection::ConnectFrom(id),
					};
				}
				Some(Hit::Connection(index)) => next.selection = toggle_connection(&state.selection, index),
				None => {}
			}
		}
		Event::DoubleClick { at } => {
			if let Some(id) = hit::node_at(scene.graph, scene.view, *at) {
				effects.push(Effect::EditNode { id });
			}
		}
		Event::SecondaryClick { at } => match scene.hit(*at, &state.selection) {
			Some(Hit::Node(node)) => next.context_menu = Some(ContextMenu { node, at: *at }),
			Some(Hit::Connection(index)) => next.selection = toggle_connection(&state.selection, index),
			None => {}
		},
		Event::Wheel { at, delta_y } => {
			let step = scene.config.zoom_step;
			if *delta_y < 0.0 {
				effects.push(Effect::ZoomAt { at: *at, factor: step });
			} else if *delta_y > 0.0 {
				effects.push(Effect::ZoomAt {
					at: *at,
					factor: 1.0 / step,
				});
			}
		}
		Event::ContextAction(action) => {
			if let Some(menu) = next.context_menu.take() {
				match action {
					ContextAction::Edit => effects.push(Effect::EditNode { id: menu.node }),
					ContextAction::ConnectFrom => next.selection = Selection::ConnectFrom(menu.node),
					ContextAction::Delete => effects.push(Effect::DeleteNode { id: menu.node }),
				}
			}
		}
		Event::CloseContextMenu => next.context_menu = None,
		Event::AddNode => effects.push(Effect::AddNode),
		Event::DeleteSelectedConnection => {
			if let Selection::Connection(index) = state.selection {
				effects.push(Effect::DeleteConnection { index });
			}
		}
		Event::Reset => effects.push(Effect::Reset),
	}

	(next, effects)
}

fn toggle_connection(selection: &Selection, index: usize) -> Selection {
	if selection.connection() == Some(index) {
		Selection::None
	} else {
		Selection::Connection(index)
	}
}

impl Interaction {
	/// Drop every reference to a deleted node. `removed` holds the
	/// pre-deletion indices of the purged connections, ascending.
	pub fn node_removed(&mut self, id: &str, removed: &[usize]) {
		if matches!(&self.mode, Mode::DraggingNode { id: dragged, .. } if dragged == id) {
			self.mode = Mode::Idle;
		}
		if self.context_menu.as_ref().is_some_and(|m| m.node == id) {
			self.context_menu = None;
		}
		self.selection = match std::mem::take(&mut self.selection) {
			Selection::ConnectFrom(from) if from == id => Selection::None,
			Selection::Connection(i) if removed.contains(&i) => Selection::None,
			Selection::Connection(i) => Selection::Connection(i - removed.iter().filter(|&&r| r < i).count()),
			other => other,
		};
	}

	/// Keep the connection selection pointing at the same connection after `index` is removed.
	pub fn connection_removed(&mut self, index: usize) {
		if let Selection::Connection(i) = self.selection {
			self.selection = match i.cmp(&index) {
				std::cmp::Ordering::Less => Selection::Connection(i),
				std::cmp::Ordering::Equal => Selection::None,
				std::cmp::Ordering::Greater => Selection::Connection(i - 1),
			};
		}
	}

	/// Forget every gesture and selection, as after a reset.
	pub fn clear(&mut self) {
		*self = Self::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::concept_map::types::{Connection, Node, NodeKind};

	fn two_nodes() -> ConceptGraph {
		ConceptGraph::new(
			vec![
				Node::new("A", "a", Point::new(10.0, 10.0), NodeKind::Detail),
				Node::new("B", "b", Point::new(300.0, 10.0), NodeKind::Detail),
			],
			Vec::new(),
		)
	}

	fn step(state: &Interaction, graph: &ConceptGraph, event: Event) -> (Interaction, Vec<Effect>) {
		let view = ViewTransform::default();
		let config = CanvasConfig::default();
		transition(
			state,
			&event,
			&Scene {
				graph,
				view: &view,
				config: &config,
			},
		)
	}

	#[test]
	fn node_press_captures_grab_offset_and_drag_tracks_it() {
		let graph = two_nodes();
		let (state, effects) = step(
			&Interaction::default(),
			&graph,
			Event::PointerDown {
				at: Point::new(12.0, 11.0),
				button: PointerButton::Primary,
			},
		);
		assert!(effects.is_empty());
		assert!(matches!(&state.mode, Mode::DraggingNode { id, grab_offset, .. }
			if id == "A" && *grab_offset == Vec2::new(2.0, 1.0)));

		let (state, effects) = step(&state, &graph, Event::PointerMove { at: Point::new(52.0, 71.0) });
		assert_eq!(
			effects,
			vec![Effect::MoveNode {
				id: "A".into(),
				to: Point::new(50.0, 70.0)
			}]
		);

		let (state, _) = step(&state, &graph, Event::PointerUp { at: Point::new(52.0, 71.0) });
		assert_eq!(state.mode, Mode::Idle);

		// the click that trails a real drag does not start a connection
		let (state, _) = step(&state, &graph, Event::Click { at: Point::new(52.0, 71.0) });
		assert_eq!(state.selection, Selection::None);
	}

	#[test]
	fn press_without_travel_still_clicks() {
		let graph = two_nodes();
		let at = Point::new(10.0, 10.0);
		let (state, _) = step(
			&Interaction::default(),
			&graph,
			Event::PointerDown {
				at,
				button: PointerButton::Primary,
			},
		);
		let (state, _) = step(&state, &graph, Event::PointerMove { at: at + Vec2::new(1.0, 1.0) });
		let (state, _) = step(&state, &graph, Event::PointerUp { at });
		let (state, _) = step(&state, &graph, Event::Click { at });
		assert_eq!(state.selection, Selection::ConnectFrom("A".into()));
	}

	#[test]
	fn panning_reports_screen_deltas() {
		let graph = two_nodes();
		let (state, _) = step(
			&Interaction::default(),
			&graph,
			Event::PointerDown {
				at: Point::new(150.0, 200.0),
				button: PointerButton::Middle,
			},
		);
		assert_eq!(
			state.mode,
			Mode::Panning {
				last: Point::new(150.0, 200.0)
			}
		);
		let (state, effects) = step(&state, &graph, Event::PointerMove { at: Point::new(160.0, 195.0) });
		assert_eq!(effects, vec![Effect::Pan(Vec2::new(10.0, -5.0))]);
		let (state, effects) = step(&state, &graph, Event::PointerMove { at: Point::new(161.0, 195.0) });
		assert_eq!(effects, vec![Effect::Pan(Vec2::new(1.0, 0.0))]);
		let (state, _) = step(&state, &graph, Event::PointerLeave);
		assert_eq!(state.mode, Mode::Idle);
	}

	#[test]
	fn primary_press_on_empty_canvas_does_not_pan() {
		let graph = two_nodes();
		let (state, _) = step(
			&Interaction::default(),
			&graph,
			Event::PointerDown {
				at: Point::new(150.0, 200.0),
				button: PointerButton::Primary,
			},
		);
		assert_eq!(state.mode, Mode::Idle);
	}

	#[test]
	fn click_click_connects_and_same_node_cancels() {
		let graph = two_nodes();
		let a = Point::new(10.0, 10.0);
		let b = Point::new(300.0, 10.0);

		let (state, _) = step(&Interaction::default(), &graph, Event::Click { at: a });
		assert_eq!(state.selection.connect_from(), Some("A"));
		let (state, effects) = step(&state, &graph, Event::Click { at: b });
		assert_eq!(
			effects,
			vec![Effect::AddConnection {
				from: "A".into(),
				to: "B".into()
			}]
		);
		assert_eq!(state.selection, Selection::None);

		let (state, _) = step(&state, &graph, Event::Click { at: a });
		let (state, effects) = step(&state, &graph, Event::Click { at: a });
		assert!(effects.is_empty());
		assert_eq!(state.selection, Selection::None);
	}

	#[test]
	fn connection_click_toggles_and_clears_pending_source() {
		let graph = ConceptGraph::new(two_nodes().nodes().to_vec(), vec![Connection::new("A", "B")]);
		let on_path = Point::new(155.0, 10.0);

		let (state, _) = step(&Interaction::default(), &graph, Event::Click { at: Point::new(10.0, 10.0) });
		let (state, _) = step(&state, &graph, Event::Click { at: on_path });
		assert_eq!(state.selection, Selection::Connection(0));
		let (state, _) = step(&state, &graph, Event::Click { at: on_path });
		assert_eq!(state.selection, Selection::None);
		let (state, _) = step(&state, &graph, Event::SecondaryClick { at: on_path });
		assert_eq!(state.selection, Selection::Connection(0));

		let (state, _) = step(&state, &graph, Event::Click { at: Point::new(300.0, 10.0) });
		assert_eq!(state.selection, Selection::ConnectFrom("B".into()));
	}

	#[test]
	fn delete_selected_connection_only_when_selected() {
		let graph = two_nodes();
		let (_, effects) = step(&Interaction::default(), &graph, Event::DeleteSelectedConnection);
		assert!(effects.is_empty());

		let selected = Interaction {
			selection: Selection::Connection(3),
			..Interaction::default()
		};
		let (_, effects) = step(&selected, &graph, Event::DeleteSelectedConnection);
		assert_eq!(effects, vec![Effect::DeleteConnection { index: 3 }]);
	}

	#[test]
	fn wheel_zooms_without_touching_state() {
		let graph = two_nodes();
		let at = Point::new(40.0, 40.0);
		let idle = Interaction::default();
		let (state, effects) = step(&idle, &graph, Event::Wheel { at, delta_y: -100.0 });
		assert_eq!(state, idle);
		assert_eq!(effects, vec![Effect::ZoomAt { at, factor: 1.08 }]);
		let (_, effects) = step(&idle, &graph, Event::Wheel { at, delta_y: 3.0 });
		assert_eq!(effects, vec![Effect::ZoomAt { at, factor: 1.0 / 1.08 }]);
		let (_, effects) = step(&idle, &graph, Event::Wheel { at, delta_y: 0.0 });
		assert!(effects.is_empty());
	}

	#[test]
	fn context_menu_dispatches_and_closes() {
		let graph = two_nodes();
		let at = Point::new(300.0, 10.0);
		let (state, _) = step(&Interaction::default(), &graph, Event::SecondaryClick { at });
		assert_eq!(
			state.context_menu,
			Some(ContextMenu {
				node: "B".into(),
				at
			})
		);

		let (after, effects) = step(&state, &graph, Event::ContextAction(ContextAction::Delete));
		assert_eq!(effects, vec![Effect::DeleteNode { id: "B".into() }]);
		assert_eq!(after.context_menu, None);

		let (after, effects) = step(&state, &graph, Event::ContextAction(ContextAction::ConnectFrom));
		assert!(effects.is_empty());
		assert_eq!(after.selection, Selection::ConnectFrom("B".into()));

		let (after, effects) = step(&state, &graph, Event::ContextAction(ContextAction::Edit));
		assert_eq!(effects, vec![Effect::EditNode { id: "B".into() }]);
		assert_eq!(after.context_menu, None);

		let (after, _) = step(&state, &graph, Event::CloseContextMenu);
		assert_eq!(after.context_menu, None);
		let (_, effects) = step(&after, &graph, Event::ContextAction(ContextAction::Delete));
		assert!(effects.is_empty());
	}

	#[test]
	fn double_click_requests_edit() {
		let graph = two_nodes();
		let (_, effects) = step(&Interaction::default(), &graph, Event::DoubleClick { at: Point::new(12.0, 9.0) });
		assert_eq!(effects, vec![Effect::EditNode { id: "A".into() }]);
		let (_, effects) = step(&Interaction::default(), &graph, Event::DoubleClick { at: Point::new(150.0, 150.0) });
		assert!(effects.is_empty());
	}

	#[test]
	fn node_removal_scrubs_references() {
		let mut state = Interaction {
			mode: Mode::DraggingNode {
				id: "A".into(),
				grab_offset: Vec2::ZERO,
				origin: Point::ZERO,
				moved: false,
			},
			selection: Selection::Connection(5),
			context_menu: Some(ContextMenu {
				node: "A".into(),
				at: Point::ZERO,
			}),
			swallow_click: false,
		};
		state.node_removed("A", &[1, 3, 7]);
		assert_eq!(state.mode, Mode::Idle);
		assert_eq!(state.context_menu, None);
		assert_eq!(state.selection, Selection::Connection(3));

		state.node_removed("Z", &[3]);
		assert_eq!(state.selection, Selection::None);

		state.selection = Selection::ConnectFrom("Q".into());
		state.node_removed("Q", &[]);
		assert_eq!(state.selection, Selection::None);
	}

	#[test]
	fn connection_removal_shifts_selection() {
		let mut state = Interaction {
			selection: Selection::Connection(2),
			..Interaction::default()
		};
		state.connection_removed(4);
		assert_eq!(state.selection, Selection::Connection(2));
		state.connection_removed(0);
		assert_eq!(state.selection, Selection::Connection(1));
		state.connection_removed(1);
		assert_eq!(state.selection, Selection::None);
	}
}
