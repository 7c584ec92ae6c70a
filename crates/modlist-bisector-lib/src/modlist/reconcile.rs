//! Bringing the graph in line with the config and the disk.

use super::*;

impl ModList {
	/// Reconciles the graph with the config and applies it to disk.
	///
	/// 1. Overridden packages are locked in their configured state.
	/// 1. Extra dependencies from the config are added.
	/// 1. Edges to identifiers without a package are dropped.
	/// 1. Unlocked packages are checked for cycles.
	/// 1. Unlocked packages required by an enabled package are enabled.
	/// 1. Every package's state is applied to disk, even if unchanged, to undo external changes.
	///
	/// Running this twice without changes in between has no further effect.
	///
	/// # Errors
	/// - [`Cycle`](crate::Error::Cycle) when unlocked packages depend on each other.
	/// - Any error from [`toggler::rename_path()`].
	pub fn sync(&mut self) -> crate::Result<&mut Self> {
		self.apply_overrides();
		self.splice_extra_deps();
		self.prune_stale();
		self.assert_acyclic_pending()?;
		self.propagate_enabled()?;
		self.apply_to_disk()?;
		Ok(self)
	}

	/// # Errors
	/// - [`Cycle`](crate::Error::Cycle) with the identifiers along the first cycle found.
	pub fn assert_acyclic_pending(&self) -> crate::Result<()> {
		match self.pending_view().find_cycle() {
			Some(cycle) => Err(crate::Error::Cycle(cycle)),
			None => Ok(()),
		}
	}

	pub(super) fn apply_overrides(&mut self) {
		for (identifier, enabled) in self.config.overrides() {
			match self.graph.get_mut(identifier) {
				Some(entry) => {
					entry.locked = true;
					entry.enabled = *enabled;
				},
				None => log::warn!("Override for {} ignored, no such mod", identifier),
			}
		}
	}

	pub(super) fn splice_extra_deps(&mut self) {
		for (identifier, dependencies) in self.config.extra_deps() {
			for dependency in dependencies {
				self.graph.add_edge(identifier, dependency);
			}
		}
	}

	fn prune_stale(&mut self) {
		let stale: Vec<String> = self.graph.nodes()
			.filter(|e| e.identifier.is_empty() || e.path.is_empty())
			.map(|e| e.identifier.clone())
			.collect();
		for identifier in stale {
			log::warn!("Dropping mod {:?} with missing metadata", identifier);
			self.graph.remove(&identifier);
		}

		let stubs = self.graph.prune_stubs();
		if !stubs.is_empty() {
			log::debug!("Ignoring dependencies on missing mods: {:?}", stubs);
		}
	}

	/* Ancestors are taken from the full graph so locked packages still pull in their dependencies */
	fn propagate_enabled(&mut self) -> crate::Result<()> {
		let full = self.graph.view();
		let required: Vec<String> = self.pending_view().topological_order()?
			.into_iter()
			.filter(|id| full.get(id).map_or(false, |e| !e.enabled))
			.filter(|id| full.ancestors(id).iter().any(|a| full.get(a).map_or(false, |e| e.enabled)))
			.map(String::from)
			.collect();

		for identifier in required {
			log::info!("Enabling {}, required by an enabled mod", identifier);
			if let Some(entry) = self.graph.get_mut(&identifier) {
				entry.enabled = true;
			}
		}
		Ok(())
	}

	fn apply_to_disk(&mut self) -> crate::Result<()> {
		let states: Vec<(String, bool)> = self.graph.nodes()
			.map(|e| (e.identifier.clone(), e.enabled))
			.collect();

		for (identifier, enabled) in states {
			if self.set_enabled(&identifier, enabled, true)? {
				log::debug!("Applied state of {} to disk", identifier);
			}
		}
		Ok(())
	}
}
