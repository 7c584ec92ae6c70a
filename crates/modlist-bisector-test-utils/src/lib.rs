//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use modlist_bisector::Config;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("zip error: {0}")]
	Zip(#[from] zip::result::ZipError),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A temporary mods directory and state directory.
pub struct ModFixture {
	mods: tempfile::TempDir,
	state: tempfile::TempDir,
	overrides: BTreeMap<String, bool>,
	extra_deps: BTreeMap<String, Vec<String>>,
}

impl ModFixture {
	pub fn new() -> Result<Self> {
		Ok(Self {
			mods: tempfile::tempdir()?,
			state: tempfile::tempdir()?,
			overrides: Default::default(),
			extra_deps: Default::default(),
		})
	}

	pub fn root(&self) -> &Path {
		self.mods.path()
	}

	pub fn state_dir(&self) -> &Path {
		self.state.path()
	}

	/// A config pointing at this fixture's mods directory.
	pub fn config(&self) -> Config {
		Config::new(self.root(), self.overrides.clone(), self.extra_deps.clone())
	}

	pub fn set_override(&mut self, id: &str, enabled: bool) -> &mut Self {
		self.overrides.insert(id.to_string(), enabled);
		self
	}

	pub fn add_extra_dep(&mut self, id: &str, dependency: &str) -> &mut Self {
		self.extra_deps.entry(id.to_string()).or_default().push(dependency.to_string());
		self
	}

	/// Writes `<id>.jar` with Fabric metadata, or `<id>.jar.disabled` when `enabled` is false.
	pub fn add_fabric_mod(&self, id: &str, depends: &[&str], enabled: bool) -> Result<PathBuf> {
		let depends: serde_json::Map<String, serde_json::Value> = depends.iter()
			.map(|d| (d.to_string(), serde_json::Value::String("*".to_string())))
			.collect();
		let metadata = serde_json::json!({
			"schemaVersion": 1,
			"id": id,
			"name": format!("{} Mod", id),
			"depends": depends,
		});
		self.write_archive(&archive_name(id, enabled), &[("fabric.mod.json", metadata.to_string())])
	}

	/// Writes `<id>.jar` with Quilt metadata, or `<id>.jar.disabled` when `enabled` is false.
	pub fn add_quilt_mod(&self, id: &str, depends: &[&str], enabled: bool) -> Result<PathBuf> {
		let metadata = serde_json::json!({
			"schema_version": 1,
			"quilt_loader": {
				"id": id,
				"metadata": { "name": format!("{} Mod", id) },
				"depends": depends.iter().map(|d| serde_json::json!({ "id": d })).collect::<Vec<_>>(),
			},
		});
		self.write_archive(&archive_name(id, enabled), &[("quilt.mod.json", metadata.to_string())])
	}

	/// Writes an archive with entries, `name` is relative to the mods directory.
	pub fn write_archive(&self, name: &str, entries: &[(&str, String)]) -> Result<PathBuf> {
		let path = self.root().join(name);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		let mut zip = zip::ZipWriter::new(std::fs::File::create(&path)?);
		for (entry, contents) in entries {
			zip.start_file(*entry, zip::write::FileOptions::default())?;
			zip.write_all(contents.as_bytes())?;
		}
		zip.finish()?;
		Ok(path)
	}

	/// Whether `<id>.jar` is present, checking the disabled form is absent.
	pub fn is_enabled_on_disk(&self, id: &str) -> bool {
		let enabled = self.root().join(archive_name(id, true)).exists();
		let disabled = self.root().join(archive_name(id, false)).exists();
		enabled && !disabled
	}

	/// Whether `<id>.jar.disabled` is present, checking the enabled form is absent.
	pub fn is_disabled_on_disk(&self, id: &str) -> bool {
		let enabled = self.root().join(archive_name(id, true)).exists();
		let disabled = self.root().join(archive_name(id, false)).exists();
		disabled && !enabled
	}
}

pub fn archive_name(id: &str, enabled: bool) -> String {
	if enabled {
		format!("{}.jar", id)
	} else {
		format!("{}.jar.disabled", id)
	}
}

/// Edges between unlocked packages where the dependent is enabled but the dependency is not.
pub fn closure_violations(graph: &modlist_bisector::DependencyGraph) -> Vec<(String, String)> {
	graph.edges()
		.filter_map(|(from, to)| Some((graph.get(from)?, graph.get(to)?)))
		.filter(|(a, b)| !a.locked && !b.locked && a.enabled && !b.enabled)
		.map(|(a, b)| (a.identifier.clone(), b.identifier.clone()))
		.collect()
}
