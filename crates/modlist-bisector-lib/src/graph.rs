//! The dependency graph of a mod list.
//!
//! For an edge `A -> B`, `A` depends on `B`. `A` is a *dependent* of `B` and `B` a *dependency* of `A`.
//! Transitive dependents are *ancestors* and transitive dependencies are *descendants*.
//!
//! Edges may name identifiers that have no [`PackageEntry`], for example a dependency on the game itself.
//! These are kept until [`prune_stubs()`](DependencyGraph::prune_stubs()) is called.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Serialize, Deserialize};

mod entry;
pub use entry::PackageEntry;

mod view;
pub use view::GraphView;

/// Owns every package and dependency edge in a mod list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GraphData", into = "GraphData")]
pub struct DependencyGraph {
	nodes: BTreeMap<String, PackageEntry>,
	/// `A -> {B}`
	dependencies: BTreeMap<String, BTreeSet<String>>,
	/// `B -> {A}`
	dependents: BTreeMap<String, BTreeSet<String>>,
}

/// On-disk representation of [`DependencyGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphData {
	nodes: Vec<PackageEntry>,
	edges: Vec<(String, String)>,
}

impl From<GraphData> for DependencyGraph {
	fn from(data: GraphData) -> Self {
		let mut graph = DependencyGraph::default();
		for node in data.nodes {
			graph.insert(node);
		}
		for (from, to) in data.edges {
			graph.add_edge(&from, &to);
		}
		graph
	}
}

impl From<DependencyGraph> for GraphData {
	fn from(graph: DependencyGraph) -> Self {
		let edges = graph.edges().map(|(a, b)| (a.to_string(), b.to_string())).collect();
		GraphData {
			nodes: graph.nodes.into_values().collect(),
			edges,
		}
	}
}

impl DependencyGraph {
	/* Nodes */

	/// Adds a package, replacing any existing package with the same identifier. Edges are kept.
	pub fn insert(&mut self, entry: PackageEntry) -> Option<PackageEntry> {
		self.nodes.insert(entry.identifier.clone(), entry)
	}

	/// Removes a package and every edge touching it.
	pub fn remove(&mut self, identifier: &str) -> Option<PackageEntry> {
		self.remove_edges_of(identifier);
		self.nodes.remove(identifier)
	}

	pub fn get(&self, identifier: &str) -> Option<&PackageEntry> {
		self.nodes.get(identifier)
	}

	pub fn get_mut(&mut self, identifier: &str) -> Option<&mut PackageEntry> {
		self.nodes.get_mut(identifier)
	}

	pub fn contains(&self, identifier: &str) -> bool {
		self.nodes.contains_key(identifier)
	}

	/// Every package, ordered by identifier.
	pub fn nodes(&self) -> impl Iterator<Item = &PackageEntry> {
		self.nodes.values()
	}

	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut PackageEntry> {
		self.nodes.values_mut()
	}

	pub fn identifiers(&self) -> impl Iterator<Item = &str> {
		self.nodes.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/* Edges */

	/// Adds `from -> to`. Either end may be an identifier without a package.
	///
	/// Returns `false` if the edge already existed.
	pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
		self.dependents.entry(to.to_string()).or_default().insert(from.to_string());
		self.dependencies.entry(from.to_string()).or_default().insert(to.to_string())
	}

	pub fn remove_edge(&mut self, from: &str, to: &str) -> bool {
		if let Some(set) = self.dependents.get_mut(to) {
			set.remove(from);
			if set.is_empty() { self.dependents.remove(to); }
		}
		match self.dependencies.get_mut(from) {
			Some(set) => {
				let removed = set.remove(to);
				if set.is_empty() { self.dependencies.remove(from); }
				removed
			},
			None => false,
		}
	}

	pub fn has_edge(&self, from: &str, to: &str) -> bool {
		self.dependencies.get(from).map_or(false, |set| set.contains(to))
	}

	/// Every edge ordered by `(from, to)`.
	pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
		self.dependencies.iter()
			.flat_map(|(from, set)| set.iter().map(move |to| (from.as_str(), to.as_str())))
	}

	/// Direct dependencies of `identifier`, including identifiers without a package.
	pub fn dependencies_of(&self, identifier: &str) -> impl Iterator<Item = &str> {
		self.dependencies.get(identifier).into_iter().flatten().map(String::as_str)
	}

	/// Direct dependents of `identifier`, including identifiers without a package.
	pub fn dependents_of(&self, identifier: &str) -> impl Iterator<Item = &str> {
		self.dependents.get(identifier).into_iter().flatten().map(String::as_str)
	}

	fn remove_edges_of(&mut self, identifier: &str) {
		for to in self.dependencies.remove(identifier).unwrap_or_default() {
			if let Some(set) = self.dependents.get_mut(&to) {
				set.remove(identifier);
				if set.is_empty() { self.dependents.remove(&to); }
			}
		}
		for from in self.dependents.remove(identifier).unwrap_or_default() {
			if let Some(set) = self.dependencies.get_mut(&from) {
				set.remove(identifier);
				if set.is_empty() { self.dependencies.remove(&from); }
			}
		}
	}

	/// Removes every edge touching an identifier that has no package.
	///
	/// Returns the identifiers that were dropped.
	pub fn prune_stubs(&mut self) -> BTreeSet<String> {
		let stubs: BTreeSet<String> = self.dependencies.keys()
			.chain(self.dependents.keys())
			.filter(|id| !self.nodes.contains_key(*id))
			.cloned()
			.collect();

		for stub in &stubs {
			self.remove_edges_of(stub);
		}
		stubs
	}

	/* Views */

	/// A view over every package.
	pub fn view(&self) -> GraphView<'_> {
		GraphView::new(self, |_| true)
	}

	/// A view restricted to packages matching `filter`.
	pub fn filtered_view(&self, filter: fn(&PackageEntry) -> bool) -> GraphView<'_> {
		GraphView::new(self, filter)
	}
}
