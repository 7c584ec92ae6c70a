//! Mod metadata embedded in archives.
//!
//! Each supported loader stores its metadata in a differently named JSON file at the root of the archive.
//! The dialect is picked by probing which of these files exists.

use std::io::Read;

use serde::Deserialize;

pub const FABRIC_FILE: &str = "fabric.mod.json";
pub const QUILT_FILE: &str = "quilt.mod.json";

/// Metadata for a single mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageMetadata {
	Fabric(FabricMetadata),
	Quilt(QuiltMetadata),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FabricMetadata {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	/// Dependency identifier to version requirement(s). Versions are ignored.
	#[serde(default)]
	pub depends: std::collections::BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuiltMetadata {
	pub quilt_loader: QuiltLoader,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuiltLoader {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub metadata: Option<QuiltDisplayMetadata>,
	#[serde(default)]
	pub depends: Vec<QuiltDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuiltDisplayMetadata {
	pub name: Option<String>,
}

/// Quilt allows a dependency to be a bare identifier or an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QuiltDependency {
	Identifier(String),
	Object { id: String },
}

impl PackageMetadata {
	/// Reads the metadata out of an opened archive.
	///
	/// # Errors
	/// - [`Parse`](crate::Error::Parse) when the archive has no known metadata file or it is malformed.
	/// - [`Zip`](crate::Error::Zip) and [`IO`](crate::Error::IO) when reading the archive.
	pub fn from_archive<R: std::io::Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>) -> crate::Result<Self> {
		let has_file = |archive: &zip::ZipArchive<R>, name: &str| archive.file_names().any(|f| f == name);

		if has_file(&*archive, FABRIC_FILE) {
			Self::from_fabric_json(&read_entry(archive, FABRIC_FILE)?)
		} else if has_file(&*archive, QUILT_FILE) {
			Self::from_quilt_json(&read_entry(archive, QUILT_FILE)?)
		} else {
			Err(crate::Error::Parse("mod metadata not found".to_string()))
		}
	}

	pub fn from_fabric_json(json: &str) -> crate::Result<Self> {
		let metadata = serde_json::from_str(&strip_newlines(json))
			.map_err(|e| crate::Error::Parse(format!("invalid {}: {}", FABRIC_FILE, e)))?;
		Ok(PackageMetadata::Fabric(metadata))
	}

	pub fn from_quilt_json(json: &str) -> crate::Result<Self> {
		let metadata = serde_json::from_str(&strip_newlines(json))
			.map_err(|e| crate::Error::Parse(format!("invalid {}: {}", QUILT_FILE, e)))?;
		Ok(PackageMetadata::Quilt(metadata))
	}

	pub fn identifier(&self) -> &str {
		match self {
			PackageMetadata::Fabric(m) => &m.id,
			PackageMetadata::Quilt(m) => &m.quilt_loader.id,
		}
	}

	/// The human readable name, falling back to the identifier.
	pub fn name(&self) -> &str {
		match self {
			PackageMetadata::Fabric(m) => m.name.as_deref().unwrap_or(&m.id),
			PackageMetadata::Quilt(m) => {
				let loader = &m.quilt_loader;
				loader.name.as_deref()
					.or_else(|| loader.metadata.as_ref().and_then(|m| m.name.as_deref()))
					.unwrap_or(&loader.id)
			},
		}
	}

	pub fn depends(&self) -> Vec<String> {
		match self {
			PackageMetadata::Fabric(m) => m.depends.keys().cloned().collect(),
			PackageMetadata::Quilt(m) => m.quilt_loader.depends.iter()
				.map(|d| match d {
					QuiltDependency::Identifier(id) | QuiltDependency::Object { id } => id.clone(),
				})
				.collect(),
		}
	}
}

fn read_entry<R: std::io::Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> crate::Result<String> {
	let mut entry = archive.by_name(name)?;
	let mut bytes = Vec::<u8>::new();
	entry.read_to_end(&mut bytes)?;
	String::from_utf8(bytes).map_err(|_| crate::Error::Parse(format!("{} is not valid UTF-8", name)))
}

/* Some mods ship metadata with raw newlines inside of strings */
fn strip_newlines(json: &str) -> String {
	json.replace('\n', "")
}
