//! Bisection and recording the user's verdict.

use std::collections::BTreeSet;

use super::*;

/// Outcome of a single [`ModList::bisect()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BisectReport {
	pub newly_disabled: usize,
	/// Unlocked packages still enabled.
	pub remaining: usize,
	pub total: usize,
}

impl ModList {
	/// Disables half of the enabled unlocked packages.
	///
	/// Packages are visited dependents first so a package is never disabled while something that
	/// depends on it is still enabled. A package with an enabled dependent that can't be disabled,
	/// such as a locked one, is skipped.
	pub fn bisect(&mut self) -> crate::Result<BisectReport> {
		let counts = self.count_nodes();
		let target = counts.enabled / 2;

		let order: Vec<String> = self.pending_view().topological_order()?
			.into_iter()
			.map(String::from)
			.collect();

		let mut newly_disabled = 0;
		for identifier in order {
			if newly_disabled >= target {
				break;
			}
			if !self.enabled_dependents(&identifier).is_empty() {
				log::debug!("Keeping {} enabled, required by an enabled mod", identifier);
				continue;
			}
			if self.set_enabled(&identifier, false, false)? {
				newly_disabled += 1;
			}
		}

		let report = BisectReport {
			newly_disabled,
			remaining: self.count_nodes().enabled,
			total: counts.total,
		};
		log::debug!("Disabled {} mods ({}/{} remaining).", report.newly_disabled, report.remaining, report.total);
		Ok(report)
	}

	/// Verdict for when the problem persists: the disabled packages are not the cause.
	///
	/// Every unlocked disabled package is locked.
	pub fn set_disabled_good(&mut self) -> &mut Self {
		let mut locked = 0;
		for entry in self.graph.nodes_mut().filter(|e| e.is_pending() && !e.enabled) {
			entry.locked = true;
			locked += 1;
		}
		log::info!("Locked {} disabled mods.", locked);
		self
	}

	/// Verdict for when the problem is gone: the enabled packages are not the cause.
	///
	/// Unlocked disabled packages are enabled along with their dependencies and remain candidates.
	/// Every other unlocked enabled package is locked, disabled unless a locked enabled package requires it.
	pub fn set_enabled_good(&mut self) -> crate::Result<&mut Self> {
		let mut to_enable = BTreeSet::<String>::new();
		let mut to_disable = BTreeSet::<String>::new();

		for entry in self.pending_view().nodes() {
			if entry.enabled {
				to_disable.insert(entry.identifier.clone());
			} else {
				to_enable.insert(entry.identifier.clone());
			}
		}

		if !to_enable.is_disjoint(&to_disable) {
			return Err(crate::Error::Validation("packages can't be both enabled and disabled".to_string()));
		}

		for identifier in &to_enable {
			self.enable(identifier)?;
			for dependency in self.pending_descendants(identifier) {
				self.enable(&dependency)?;
				to_disable.remove(&dependency);
			}
		}

		let required_by_locked = self.required_by_locked();

		for identifier in &to_disable {
			if !required_by_locked.contains(identifier) {
				self.set_enabled(identifier, false, false)?;
			}
			if let Some(entry) = self.graph.get_mut(identifier) {
				entry.locked = true;
			}
		}

		log::info!("Locked {} enabled mods, {} mods remain.", to_disable.len(), self.count_nodes().enabled);
		Ok(self)
	}

	/// Unlocked packages `identifier` transitively depends on, following edges through locked packages.
	fn pending_descendants(&self, identifier: &str) -> Vec<String> {
		let full = self.graph.view();
		full.descendants(identifier)
			.into_iter()
			.filter(|id| full.get(id).map_or(false, PackageEntry::is_pending))
			.map(String::from)
			.collect()
	}

	/// Every package a locked enabled package transitively depends on.
	fn required_by_locked(&self) -> BTreeSet<String> {
		let full = self.graph.view();
		full.nodes()
			.filter(|e| e.locked && e.enabled)
			.flat_map(|e| full.descendants(&e.identifier))
			.map(String::from)
			.collect()
	}
}
