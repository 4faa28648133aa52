use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::interaction::{ContextAction, Event};
use super::render;
use super::state::{ConceptMapState, Dialogs, Status};
use crate::config::{CanvasConfig, PointerButton};
use crate::store::{self, KeyValueStore};

/// `window.confirm` / `window.prompt`. A missing window answers "no".
struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
	fn confirm(&mut self, message: &str) -> bool {
		web_sys::window()
			.and_then(|w| w.confirm_with_message(message).ok())
			.unwrap_or(false)
	}

	fn prompt_text(&mut self, message: &str, current: &str) -> Option<String> {
		web_sys::window()
			.and_then(|w| w.prompt_with_message_and_default(message, current).ok())
			.flatten()
	}
}

/// Engine state plus the store its changes are written to.
struct Controller {
	state: ConceptMapState,
	store: Box<dyn KeyValueStore>,
	/// Set when the next animation frame has to repaint.
	dirty: bool,
}

impl Controller {
	fn dispatch(&mut self, event: Event) -> Status {
		let changes = self.state.dispatch(event, &mut BrowserDialogs);
		let keys = &self.state.config.storage;
		if changes.nodes {
			store::save_nodes(self.store.as_mut(), keys, &self.state.graph);
		}
		if changes.connections {
			store::save_connections(self.store.as_mut(), keys, &self.state.graph);
		}
		if changes.graph() || changes.view || changes.interaction {
			self.dirty = true;
		}
		self.state.status()
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.state.resize(width, height);
		self.dirty = true;
	}

	fn paint(&mut self, ctx: &CanvasRenderingContext2d) {
		if std::mem::take(&mut self.dirty) {
			render::render(&self.state, ctx);
		}
	}
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn command(dispatch: impl Fn(Event) + Clone + 'static, event: Event) -> impl Fn(MouseEvent) + 'static {
	move |_| dispatch(event.clone())
}

/// Interactive concept map: drag nodes, click-click to connect, wheel to zoom,
/// middle-drag to pan, right-click for the node menu.
#[component]
pub fn ConceptMapCanvas(
	/// Interaction tuning and storage slot names.
	#[prop(default = CanvasConfig::default())]
	config: CanvasConfig,
	/// Fixed canvas width; defaults to the parent's width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height; defaults to the parent's height.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	let backend = store::open_browser_store();
	let nodes = store::load_nodes(backend.as_ref(), &config.storage);
	let connections = store::load_connections(backend.as_ref(), &config.storage);
	let state = ConceptMapState::new(nodes, connections, config)
		.with_jitter_seed((js_sys::Date::now() as u64 % 233_280) as usize);
	let status = RwSignal::new(state.status());
	let controller: Rc<RefCell<Controller>> = Rc::new(RefCell::new(Controller {
		state,
		store: backend,
		dirty: true,
	}));

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (controller_init, animate_init, resize_cb_init) = (controller.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		controller_init.borrow_mut().resize(w, h);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("2d canvas context unavailable");
			return;
		};

		let (controller_resize, canvas_resize) = (controller_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			controller_resize.borrow_mut().resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (controller_anim, animate_inner) = (controller_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			controller_anim.borrow_mut().paint(&ctx);
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let dispatch = move |event: Event| {
		let next = controller.borrow_mut().dispatch(event);
		if status.with_untracked(|current| *current != next) {
			status.set(next);
		}
	};

	let d = dispatch.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let button = PointerButton::from_dom(ev.button());
		if button == PointerButton::Middle {
			// keep the browser's autoscroll out of the way
			ev.prevent_default();
		}
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::PointerDown { at, button });
		}
	};

	let d = dispatch.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::PointerMove { at });
		}
	};

	let d = dispatch.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::PointerUp { at });
		}
	};

	let d = dispatch.clone();
	let on_mouseleave = move |_: MouseEvent| d(Event::PointerLeave);

	let d = dispatch.clone();
	let on_click = move |ev: MouseEvent| {
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::Click { at });
		}
	};

	let d = dispatch.clone();
	let on_dblclick = move |ev: MouseEvent| {
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::DoubleClick { at });
		}
	};

	let d = dispatch.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::SecondaryClick { at });
		}
	};

	let d = dispatch.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(at) = local_point(canvas_ref, &ev) {
			d(Event::Wheel {
				at,
				delta_y: ev.delta_y(),
			});
		}
	};

	let menu_open = move || status.with(|s| s.context_menu.is_some());
	let menu_left = move || status.with(|s| s.context_menu.as_ref().map_or(0.0, |m| m.1));
	let menu_top = move || status.with(|s| s.context_menu.as_ref().map_or(0.0, |m| m.2));

	view! {
		<div class="concept-map">
			<div class="concept-map-toolbar">
				<button on:click=command(dispatch.clone(), Event::AddNode)>"Añadir nodo"</button>
				<button on:click=command(dispatch.clone(), Event::Reset)>"Reset"</button>
				<button
					class="danger"
					disabled=move || status.with(|s| s.selected_connection.is_none())
					on:click=command(dispatch.clone(), Event::DeleteSelectedConnection)
				>
					"Eliminar conexión"
				</button>
			</div>
			<div class="concept-map-surface" style="position: relative;">
				<canvas
					node_ref=canvas_ref
					class="concept-map-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:click=on_click
					on:dblclick=on_dblclick
					on:contextmenu=on_contextmenu
					on:wheel=on_wheel
					style="display: block; cursor: grab;"
				/>
				<div
					class="concept-map-context-menu"
					style=move || {
						format!(
							"position: absolute; z-index: 50; display: {}; left: {}px; top: {}px;",
							if menu_open() { "block" } else { "none" },
							menu_left(),
							menu_top(),
						)
					}
					on:mouseleave=command(dispatch.clone(), Event::CloseContextMenu)
				>
					<button on:click=command(dispatch.clone(), Event::ContextAction(ContextAction::Edit))>
						"✏️ Editar"
					</button>
					<button on:click=command(dispatch.clone(), Event::ContextAction(ContextAction::ConnectFrom))>
						"🔗 Conectar desde aquí"
					</button>
					<button on:click=command(dispatch.clone(), Event::ContextAction(ContextAction::Delete))>
						"🗑️ Eliminar"
					</button>
				</div>
				<div class="concept-map-help">
					"Arrastrá nodos, doble clic para editar, clic para seleccionar/crear conexión. "
					"Hacé clic en una conexión para seleccionarla y luego \"Eliminar conexión\". "
					"Rueda para zoom. Botón central del mouse para desplazar."
				</div>
			</div>
			<div class="concept-map-status">
				<div>
					"Seleccionado para conectar: "
					<strong>{move || status.with(|s| s.connect_from.clone().unwrap_or_else(|| "—".into()))}</strong>
				</div>
				<div>
					"Conexión seleccionada: "
					<strong>
						{move || status.with(|s| s.selected_connection.map_or_else(|| "—".into(), |i| i.to_string()))}
					</strong>
				</div>
				<div>
					{move || status.with(|s| format!("Nodos: {} · Conexiones: {}", s.node_count, s.connection_count))}
				</div>
			</div>
		</div>
	}
}
