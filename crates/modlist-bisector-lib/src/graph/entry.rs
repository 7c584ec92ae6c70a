use serde::{Serialize, Deserialize};

/// A single mod in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageEntry {
	pub identifier: String,
	/// Display name.
	pub name: String,
	/// Path of the enabled archive relative to the mod root, `/` separated.
	pub path: String,
	pub enabled: bool,
	/// Locked packages are only changed by explicit commands, never by the search.
	pub locked: bool,
}

impl PackageEntry {
	pub fn new(identifier: impl Into<String>, name: impl Into<String>, path: impl Into<String>, enabled: bool) -> Self {
		Self {
			identifier: identifier.into(),
			name: name.into(),
			path: path.into(),
			enabled,
			locked: false,
		}
	}

	/// Still part of the search.
	pub fn is_pending(&self) -> bool {
		!self.locked
	}
}
