//! Canvas tuning knobs and storage slot names.

/// Which pointer button an event came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerButton {
	/// Left button / primary touch.
	#[default]
	Primary,
	/// Wheel button.
	Middle,
	/// Right button.
	Secondary,
}

impl PointerButton {
	/// Map a DOM `MouseEvent.button` code.
	pub fn from_dom(button: i16) -> Self {
		match button {
			1 => Self::Middle,
			2 => Self::Secondary,
			_ => Self::Primary,
		}
	}
}

/// Keys of the three independent persisted slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
	/// Serialized node list.
	pub nodes: String,
	/// Serialized connection list.
	pub connections: String,
	/// Raw document text.
	pub document: String,
}

impl Default for StorageKeys {
	fn default() -> Self {
		Self {
			nodes: "fu_nodes_v2".into(),
			connections: "fu_connections_v2".into(),
			document: "fu_document_v2".into(),
		}
	}
}

/// Interaction and persistence settings for the concept map canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
	/// Wheel zoom-in factor; zoom-out uses the reciprocal.
	pub zoom_step: f64,
	/// Optional `(min, max)` scale clamp. `None` leaves zoom unbounded.
	pub zoom_limits: Option<(f64, f64)>,
	/// Button that pans when pressed on empty canvas.
	pub pan_button: PointerButton,
	/// Screen distance a node press may travel and still count as a click.
	pub click_slop: f64,
	/// Extra screen-space slack around connection strokes for hit testing.
	pub connection_hit_tolerance: f64,
	/// Label given to freshly added nodes.
	pub new_node_text: String,
	/// World position new nodes are scattered from.
	pub new_node_origin: (f64, f64),
	/// Size of the scatter box for new nodes.
	pub new_node_spread: (f64, f64),
	/// Store slot names.
	pub storage: StorageKeys,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			zoom_step: 1.08,
			zoom_limits: None,
			pan_button: PointerButton::Middle,
			click_slop: 3.0,
			connection_hit_tolerance: 6.0,
			new_node_text: "Nuevo nodo".into(),
			new_node_origin: (300.0, 200.0),
			new_node_spread: (200.0, 160.0),
			storage: StorageKeys::default(),
		}
	}
}

impl CanvasConfig {
	/// Set the wheel zoom factor (values `<= 1` are ignored).
	pub fn with_zoom_step(mut self, step: f64) -> Self {
		if step.is_finite() && step > 1.0 {
			self.zoom_step = step;
		}
		self
	}

	/// Clamp zoom to `[min, max]`.
	pub fn with_zoom_limits(mut self, min: f64, max: f64) -> Self {
		if min > 0.0 && min <= max {
			self.zoom_limits = Some((min, max));
		}
		self
	}

	/// Choose the pan button.
	pub fn with_pan_button(mut self, button: PointerButton) -> Self {
		self.pan_button = button;
		self
	}
}
