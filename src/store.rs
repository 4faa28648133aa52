//! Key-value persistence for the node list, connection list and document text.
//!
//! Each slot is read once at startup and written after every committed change
//! to it. A missing or unreadable slot falls back to its built-in default
//! without affecting the other slots.

use std::collections::{HashMap, HashSet};

use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::components::concept_map::{ConceptGraph, Connection, Node, seed_connections, seed_nodes};
use crate::components::document::SEED_DOCUMENT;
use crate::config::StorageKeys;
use crate::error::{Error, Result};

/// String-keyed string store.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Browser `localStorage`.
pub struct LocalStore(web_sys::Storage);

impl LocalStore {
	/// `None` when storage is unavailable (private mode, sandboxed frame).
	pub fn open() -> Option<Self> {
		web_sys::window()?.local_storage().ok().flatten().map(Self)
	}
}

impl KeyValueStore for LocalStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.get_item(key).ok().flatten()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<()> {
		self.0.set_item(key, value).map_err(|err| Error::StoreWrite {
			key: key.into(),
			reason: format!("{err:?}"),
		})
	}
}

/// In-memory store, used when `localStorage` is unavailable and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(pub HashMap<String, String>);

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.get(key).cloned()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<()> {
		self.0.insert(key.into(), value.into());
		Ok(())
	}
}

fn read_slot<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
	let Some(raw) = store.get(key) else {
		return Ok(None);
	};
	serde_json::from_str(&raw)
		.map(Some)
		.map_err(|err| Error::StoreRead {
			key: key.into(),
			reason: err.to_string(),
		})
}

fn write_slot<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
	let result = serde_json::to_string(value)
		.map_err(|err| Error::StoreWrite {
			key: key.into(),
			reason: err.to_string(),
		})
		.and_then(|json| store.set(key, &json));
	if let Err(err) = result {
		warn!("{err}");
	}
}

fn or_seed<T>(slot: Result<Option<T>>, seed: impl FnOnce() -> T) -> T {
	match slot {
		Ok(Some(value)) => value,
		Ok(None) => seed(),
		Err(err) => {
			warn!("{err}; using defaults");
			seed()
		}
	}
}

/// Persisted nodes, or the seed set. A list with repeated ids counts as corrupt.
pub fn load_nodes(store: &dyn KeyValueStore, keys: &StorageKeys) -> Vec<Node> {
	let slot = read_slot::<Vec<Node>>(store, &keys.nodes).and_then(|nodes| {
		let Some(nodes) = nodes else {
			return Ok(None);
		};
		let duplicate = {
			let mut seen = HashSet::new();
			nodes
				.iter()
				.find(|n| !seen.insert(n.id.as_str()))
				.map(|n| n.id.clone())
		};
		match duplicate {
			Some(id) => Err(Error::StoreRead {
				key: keys.nodes.clone(),
				reason: format!("duplicate node id {id}"),
			}),
			None => Ok(Some(nodes)),
		}
	});
	let nodes = or_seed(slot, seed_nodes);
	info!("Loaded {} node(s)", nodes.len());
	nodes
}

/// Persisted connections, or the seed set. Dangling entries are kept and skipped at draw time.
pub fn load_connections(store: &dyn KeyValueStore, keys: &StorageKeys) -> Vec<Connection> {
	let connections = or_seed(read_slot(store, &keys.connections), seed_connections);
	info!("Loaded {} connection(s)", connections.len());
	connections
}

/// Raw document text, or the built-in document.
pub fn load_document(store: &dyn KeyValueStore, keys: &StorageKeys) -> String {
	store
		.get(&keys.document)
		.unwrap_or_else(|| SEED_DOCUMENT.to_owned())
}

pub fn save_nodes(store: &mut dyn KeyValueStore, keys: &StorageKeys, graph: &ConceptGraph) {
	write_slot(store, &keys.nodes, graph.nodes());
}

pub fn save_connections(store: &mut dyn KeyValueStore, keys: &StorageKeys, graph: &ConceptGraph) {
	write_slot(store, &keys.connections, graph.connections());
}

pub fn save_document(store: &mut dyn KeyValueStore, keys: &StorageKeys, text: &str) {
	if let Err(err) = store.set(&keys.document, text) {
		warn!("{err}");
	}
}

/// Open `localStorage`, falling back to a throwaway in-memory store.
pub fn open_browser_store() -> Box<dyn KeyValueStore> {
	match LocalStore::open() {
		Some(store) => Box::new(store),
		None => {
			warn!("localStorage unavailable; changes will not persist");
			Box::new(MemoryStore::default())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::concept_map::NodeKind;
	use kurbo::Point;

	fn keys() -> StorageKeys {
		StorageKeys::default()
	}

	#[test]
	fn empty_store_yields_seed_data() {
		let store = MemoryStore::default();
		assert_eq!(load_nodes(&store, &keys()), seed_nodes());
		assert_eq!(load_connections(&store, &keys()), seed_connections());
		assert_eq!(load_document(&store, &keys()), SEED_DOCUMENT);
	}

	#[test]
	fn corrupt_slots_fall_back_independently() {
		let mut store = MemoryStore::default();
		store.set("fu_nodes_v2", "{not json").unwrap();
		store
			.set("fu_connections_v2", r#"[{"from":"n1","to":"n1"}]"#)
			.unwrap();
		assert_eq!(load_nodes(&store, &keys()), seed_nodes());
		assert_eq!(load_connections(&store, &keys()), vec![Connection::new("n1", "n1")]);
	}

	#[test]
	fn duplicate_ids_are_treated_as_corrupt() {
		let mut store = MemoryStore::default();
		store
			.set(
				"fu_nodes_v2",
				r#"[{"id":"a","text":"x","x":0,"y":0,"type":"topic"},{"id":"a","text":"y","x":1,"y":1}]"#,
			)
			.unwrap();
		assert_eq!(load_nodes(&store, &keys()), seed_nodes());
	}

	#[test]
	fn distinct_ids_load_as_stored() {
		let mut store = MemoryStore::default();
		store
			.set(
				"fu_nodes_v2",
				r#"[{"id":"a","text":"x","x":0,"y":0,"type":"topic"},{"id":"b","text":"y","x":1,"y":1}]"#,
			)
			.unwrap();
		let nodes = load_nodes(&store, &keys());
		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].kind, NodeKind::Topic);
		assert_eq!(nodes[1].id, "b");
		assert_eq!(nodes[1].kind, NodeKind::Default);
	}

	#[test]
	fn saved_graph_loads_back() {
		let mut store = MemoryStore::default();
		let mut graph = ConceptGraph::new(seed_nodes(), seed_connections());
		let id = graph.add_node("nuevo", Point::new(1.0, 2.0), NodeKind::Default);
		graph.add_connection(id.clone(), "n1");
		save_nodes(&mut store, &keys(), &graph);
		save_connections(&mut store, &keys(), &graph);

		assert_eq!(load_nodes(&store, &keys()), graph.nodes());
		assert_eq!(load_connections(&store, &keys()), graph.connections());
	}

	#[test]
	fn document_is_stored_raw() {
		let mut store = MemoryStore::default();
		save_document(&mut store, &keys(), "# hola\n**x");
		assert_eq!(store.get("fu_document_v2").as_deref(), Some("# hola\n**x"));
		assert_eq!(load_document(&store, &keys()), "# hola\n**x");
	}
}
