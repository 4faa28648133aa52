//! Error kinds shared by the diagram engine and its persistence layer.

use thiserror::Error;

/// Errors produced by graph mutations and store access.
///
/// None of these reach the user: graph misses are no-ops and store failures
/// fall back to seed data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// A graph operation named a node id that does not exist.
	#[error("node not found: {0}")]
	NodeNotFound(String),
	/// A connection index past the end of the connection list.
	#[error("connection index {index} out of range (len {len})")]
	ConnectionOutOfRange {
		/// Requested index.
		index: usize,
		/// Current number of connections.
		len: usize,
	},
	/// A persisted slot was missing or could not be parsed.
	#[error("failed to read store slot `{key}`: {reason}")]
	StoreRead {
		/// Store key of the slot.
		key: String,
		/// Parser or backend message.
		reason: String,
	},
	/// The backing store refused a write.
	#[error("failed to write store slot `{key}`: {reason}")]
	StoreWrite {
		/// Store key of the slot.
		key: String,
		/// Backend message.
		reason: String,
	},
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
