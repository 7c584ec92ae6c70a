//! The bisection session over a mod list.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::graph::{DependencyGraph, GraphView, PackageEntry};
use crate::{toggler, Config, History};

mod reconcile;
mod search;
pub use search::BisectReport;

/// File name of the saved graph in the state directory.
pub const GRAPH_FILE: &str = "graph.json";

/// Counts of packages by state. Locked packages are only included in `total`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounts {
	pub enabled: usize,
	pub disabled: usize,
	pub total: usize,
}

impl NodeCounts {
	pub fn locked(&self) -> usize {
		self.total - self.enabled - self.disabled
	}
}

/// A mod list being bisected.
///
/// Changes to packages are applied to disk immediately, but the graph itself is only stored by
/// [`save()`](ModList::save()). It should be called after every operation, if the graph is not saved
/// the next [`load()`](ModList::load()) will reconcile the on disk state with the previous save.
#[derive(Debug)]
pub struct ModList {
	config: Config,
	state_dir: PathBuf,
	graph: DependencyGraph,
	history: History,
}

impl ModList {
	/// Creates a new session from the mods in the configured root.
	///
	/// Mods start in their current on disk state. With `reset` every mod is enabled first.
	///
	/// # Errors
	/// - [`Cycle`](crate::Error::Cycle) when unlocked packages depend on each other.
	/// - [`AmbiguousState`](crate::Error::AmbiguousState) and [`ArtifactMissing`](crate::Error::ArtifactMissing)
	/// when a mod archive was changed externally.
	pub fn build(config: Config, state_dir: impl Into<PathBuf>, reset: bool) -> crate::Result<Self> {
		let state_dir = state_dir.into();
		let mut graph = DependencyGraph::default();

		log::info!("Loading mods from {}", config.root().display());

		for package in crate::discovery::discover(config.root())? {
			let package = match package {
				Ok(package) => package,
				Err(crate::Error::Metadata { path, reason }) => {
					log::warn!("Skipping {}: {}", path.display(), reason);
					continue;
				},
				Err(e) => return Err(e),
			};

			let (path, disabled) = toggler::strip_disabled_suffix(&package.path);
			let path = path_to_string(&path)?;

			if let Some(existing) = graph.get(&package.identifier) {
				log::warn!("Duplicate mod {} at {} and {}, using the latter", package.identifier, existing.path, path);
			}

			graph.insert(PackageEntry::new(package.identifier.clone(), package.name, path, !disabled));
			for dependency in &package.depends {
				graph.add_edge(&package.identifier, dependency);
			}
		}

		log::debug!("Found {} mods", graph.len());

		let history = History::load(&state_dir)?;
		let mut modlist = Self { config, state_dir, graph, history };
		modlist.sync()?;
		if reset {
			modlist.reset()?;
		}
		Ok(modlist)
	}

	/// Loads a session previously stored with [`save()`](ModList::save()).
	///
	/// The config may have changed since so the session is reconciled with it.
	///
	/// # Errors
	/// See [`build()`](ModList::build()), additionally
	/// - [`IO`](crate::Error::IO) when the graph file can't be read.
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when the graph file is malformed.
	pub fn load(config: Config, state_dir: impl Into<PathBuf>) -> crate::Result<Self> {
		let state_dir = state_dir.into();
		let path = state_dir.join(GRAPH_FILE);
		log::debug!("Loading graph from {}", path.display());

		let file = std::fs::File::open(&path)?;
		let graph: DependencyGraph = serde_json::from_reader(std::io::BufReader::new(file))?;
		let history = History::load(&state_dir)?;

		let mut modlist = Self { config, state_dir, graph, history };
		modlist.sync()?;
		Ok(modlist)
	}

	/// Stores the graph and records the enabled packages in the history.
	pub fn save(&mut self) -> crate::Result<()> {
		self.history.push(self.graph.nodes().filter(|e| e.enabled).map(|e| e.identifier.clone()));

		std::fs::create_dir_all(&self.state_dir)?;
		let mut writer = std::io::BufWriter::new(std::fs::File::create(self.graph_path())?);
		serde_json::to_writer_pretty(&mut writer, &self.graph)?;
		writer.flush()?;

		self.history.save()?;
		log::debug!("Saved graph to {}", self.graph_path().display());
		Ok(())
	}

	/// Unlocks and enables every package then reapplies the config.
	///
	/// # Errors
	/// - [`Cycle`](crate::Error::Cycle) when packages that were only locked by a verdict depend on each other.
	/// Nothing is changed on disk or in the graph.
	pub fn reset(&mut self) -> crate::Result<&mut Self> {
		let previous = self.graph.clone();
		for entry in self.graph.nodes_mut() {
			entry.locked = false;
		}
		self.apply_overrides();
		self.splice_extra_deps();
		if let Err(e) = self.assert_acyclic_pending() {
			self.graph = previous;
			return Err(e);
		}

		for identifier in self.owned_identifiers() {
			if self.graph.get(&identifier).map_or(false, |e| !e.locked) {
				self.enable(&identifier)?;
			}
		}
		self.sync()
	}

	/* Direct state changes */

	pub fn enable(&mut self, identifier: &str) -> crate::Result<bool> {
		self.set_enabled(identifier, true, false)
	}

	/// # Errors
	/// - [`Validation`](crate::Error::Validation) when an enabled package depends on `identifier`.
	pub fn disable(&mut self, identifier: &str) -> crate::Result<bool> {
		let dependents = self.enabled_dependents(identifier);
		if !dependents.is_empty() {
			return Err(crate::Error::Validation(format!("{} is required by {}", identifier, dependents.join(", "))));
		}
		self.set_enabled(identifier, false, false)
	}

	pub fn toggle(&mut self, identifier: &str) -> crate::Result<bool> {
		if self.entry(identifier)?.enabled {
			self.disable(identifier)
		} else {
			self.enable(identifier)
		}
	}

	/// Sets the state of a package in the graph and on disk.
	///
	/// Nothing is done if the package is already in the requested state, unless `force` is set
	/// in which case the on disk state is corrected if needed.
	///
	/// Returns whether the archive on disk was changed.
	///
	/// # Errors
	/// - [`UnknownPackage`](crate::Error::UnknownPackage) when `identifier` isn't in the graph.
	/// - Any error from [`toggler::rename_path()`], the graph is left unchanged.
	pub fn set_enabled(&mut self, identifier: &str, value: bool, force: bool) -> crate::Result<bool> {
		let root = self.config.root().to_path_buf();
		let entry = self.graph.get_mut(identifier)
			.ok_or_else(|| crate::Error::UnknownPackage(identifier.to_string()))?;

		if entry.enabled == value && !force {
			return Ok(false);
		}

		let previous = entry.enabled;
		entry.enabled = value;
		let path = root.join(&entry.path);

		match toggler::set_path_enabled(path, value) {
			Ok(changed) => {
				if changed {
					log::trace!("{} {}", if value { "Enabled" } else { "Disabled" }, identifier);
				}
				Ok(changed)
			},
			Err(e) => {
				if let Some(entry) = self.graph.get_mut(identifier) {
					entry.enabled = previous;
				}
				Err(e)
			},
		}
	}

	/// Enables a package and locks it so it is never disabled by the search.
	pub fn require(&mut self, identifier: &str) -> crate::Result<&mut Self> {
		self.enable(identifier)?;
		if let Some(entry) = self.graph.get_mut(identifier) {
			entry.locked = true;
		}
		self.sync()
	}

	/// Records a dependency missing from a package's metadata.
	///
	/// If `identifier` is enabled `dependency` is unlocked so it can be enabled alongside it.
	///
	/// # Errors
	/// - [`UnknownPackage`](crate::Error::UnknownPackage) when either package isn't in the graph.
	/// - [`Cycle`](crate::Error::Cycle) when the edge would create a cycle among unlocked packages,
	/// the edge is not added and `dependency` stays locked.
	pub fn add_dependency(&mut self, identifier: &str, dependency: &str) -> crate::Result<&mut Self> {
		let enabled = self.entry(identifier)?.enabled;
		let dependency = self.entry(dependency)?;
		let (dependency_enabled, dependency_locked) = (dependency.enabled, dependency.locked);
		let dependency = dependency.identifier.clone();

		let added = self.graph.add_edge(identifier, &dependency);
		if enabled && !dependency_enabled {
			if let Some(entry) = self.graph.get_mut(&dependency) {
				entry.locked = false;
			}
		}

		if let Some(cycle) = self.pending_view().find_cycle() {
			if added {
				self.graph.remove_edge(identifier, &dependency);
			}
			if let Some(entry) = self.graph.get_mut(&dependency) {
				entry.locked = dependency_locked;
			}
			return Err(crate::Error::Cycle(cycle));
		}

		log::info!("Added dependency {} -> {}", identifier, dependency);
		self.sync()
	}

	/* Queries */

	/// Counts unlocked packages by state.
	pub fn count_nodes(&self) -> NodeCounts {
		let mut counts = NodeCounts::default();
		for entry in self.graph.nodes() {
			counts.total += 1;
			if entry.locked {
				continue;
			}
			if entry.enabled {
				counts.enabled += 1;
			} else {
				counts.disabled += 1;
			}
		}
		counts
	}

	/// The graph restricted to unlocked packages.
	pub fn pending_view(&self) -> GraphView<'_> {
		self.graph.filtered_view(PackageEntry::is_pending)
	}

	/// Unlocked packages by identifier.
	pub fn pending_nodes(&self) -> BTreeMap<&str, &PackageEntry> {
		self.pending_view().nodes().map(|e| (e.identifier.as_str(), e)).collect()
	}

	pub fn get(&self, identifier: &str) -> Option<&PackageEntry> {
		self.graph.get(identifier)
	}

	fn entry(&self, identifier: &str) -> crate::Result<&PackageEntry> {
		self.graph.get(identifier).ok_or_else(|| crate::Error::UnknownPackage(identifier.to_string()))
	}

	/// Enabled packages that directly depend on `identifier`, locked or not.
	fn enabled_dependents(&self, identifier: &str) -> Vec<&str> {
		let full = self.graph.view();
		full.dependents_of(identifier)
			.filter(|d| full.get(d).map_or(false, |e| e.enabled))
			.collect()
	}

	fn owned_identifiers(&self) -> Vec<String> {
		self.graph.identifiers().map(String::from).collect()
	}

	/* Fields */

	pub fn graph(&self) -> &DependencyGraph {
		&self.graph
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn history(&self) -> &History {
		&self.history
	}

	pub fn history_mut(&mut self) -> &mut History {
		&mut self.history
	}

	pub fn state_dir(&self) -> &Path {
		&self.state_dir
	}

	pub fn graph_path(&self) -> PathBuf {
		self.state_dir.join(GRAPH_FILE)
	}
}

/// Relative paths are stored `/` separated regardless of platform.
fn path_to_string(path: &Path) -> crate::Result<String> {
	let parts = path.components()
		.map(|c| c.as_os_str().to_str().ok_or_else(|| crate::Error::Parse(format!("{} is not valid unicode", path.display()))))
		.collect::<crate::Result<Vec<_>>>()?;
	Ok(parts.join("/"))
}
