//! User configuration, read from a TOML file.
//!
//! ```toml
//! root = "/path/to/instance/mods"
//!
//! [overrides]
//! sodium = true
//! optifine = false
//!
//! [extra_deps]
//! create = ["flywheel"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	root: PathBuf,
	#[serde(default)]
	overrides: BTreeMap<String, bool>,
	#[serde(default)]
	extra_deps: BTreeMap<String, Vec<String>>,
}

impl Config {
	/// Creates a config directly.
	/// 
	/// `root` is used as given, unlike [`load_from_disk()`](Config::load_from_disk()) no resolution is done.
	pub fn new(root: impl Into<PathBuf>, overrides: BTreeMap<String, bool>, extra_deps: BTreeMap<String, Vec<String>>) -> Self {
		Self { root: root.into(), overrides, extra_deps }
	}

	/// Reads and validates a config file.
	/// 
	/// # Errors
	/// - [`IO`](crate::Error::IO) when reading the file or when `root` does not exist.
	/// - [`Toml`](crate::Error::Toml) when the file is not valid TOML.
	/// - [`Validation`](crate::Error::Validation) when the document does not match the config schema.
	pub fn load_from_disk(path: impl AsRef<Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("Loading config from {}", path.display());

		let text = std::fs::read_to_string(path)?;
		let document: toml::Table = toml::from_str(&text)?;
		let document = serde_json::to_value(document)?;

		validate(&document)?;

		let mut config: Config = serde_json::from_value(document)?;
		config.root = std::fs::canonicalize(&config.root)?;
		Ok(config)
	}

	/// The absolute directory mods are searched for in.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Packages with a forced state, these are always locked.
	pub fn overrides(&self) -> &BTreeMap<String, bool> {
		&self.overrides
	}

	/// Dependencies missing from a package's own metadata.
	pub fn extra_deps(&self) -> &BTreeMap<String, Vec<String>> {
		&self.extra_deps
	}
}

fn validate(document: &serde_json::Value) -> crate::Result<()> {
	let schema: serde_json::Value = serde_json::from_str(include_str!("config.schema.json"))?;
	let compiled = jsonschema::JSONSchema::compile(&schema)
		.map_err(|e| crate::Error::Validation(format!("config schema invalid: {}", e)))?;

	if let Err(errors) = compiled.validate(document) {
		let reasons: Vec<String> = errors.map(|e| format!("{} at \"{}\"", e, e.instance_path)).collect();
		return Err(crate::Error::Validation(reasons.join("; ")));
	}

	Ok(())
}
