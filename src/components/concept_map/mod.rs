mod component;
mod graph;
mod hit;
mod interaction;
mod render;
mod state;
mod types;
mod viewport;

pub use component::ConceptMapCanvas;
pub use graph::ConceptGraph;
#[cfg(test)]
pub use types::NodeKind;
pub use types::{Connection, Node, seed_connections, seed_nodes};
