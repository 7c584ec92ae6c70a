//! Finding mod archives in a directory and reading their metadata.

use std::path::{Path, PathBuf};

pub mod metadata;
pub use metadata::PackageMetadata;

/// Matches both enabled and disabled mod archives.
const ARCHIVE_PATTERN: &str = r"\.jar(\.disabled)?$";

/// A mod archive found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPackage {
	/// Path relative to the search root, including [`DISABLED_SUFFIX`](crate::toggler::DISABLED_SUFFIX) if disabled.
	pub path: PathBuf,
	pub identifier: String,
	pub name: String,
	/// Identifiers of declared dependencies, these may not exist in the mod list.
	pub depends: Vec<String>,
}

/// Recursively finds every mod archive under `root`.
pub fn find_archives(root: &Path) -> crate::Result<impl Iterator<Item = crate::Result<PathBuf>>> {
	let pattern = regex::Regex::new(ARCHIVE_PATTERN).map_err(|e| crate::Error::Parse(e.to_string()))?;

	Ok(walkdir::WalkDir::new(root)
		.sort_by_file_name()
		.into_iter()
		.filter_map(move |entry| {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => return Some(Err(e.into())),
			};
			let is_archive = entry.file_type().is_file()
				&& entry.file_name().to_str().map_or(false, |name| pattern.is_match(name));
			is_archive.then(|| Ok(entry.into_path()))
		}))
}

/// Finds and reads every mod archive under `root`.
///
/// Archives whose metadata can't be read are returned as [`Metadata`](crate::Error::Metadata) errors
/// so callers can skip them and continue.
pub fn discover(root: &Path) -> crate::Result<impl Iterator<Item = crate::Result<DiscoveredPackage>> + '_> {
	Ok(find_archives(root)?.map(move |path| read_package(root, &path?)))
}

/// Reads the metadata of a single archive at `path`.
pub fn read_package(root: &Path, path: &Path) -> crate::Result<DiscoveredPackage> {
	let relative = pathdiff::diff_paths(path, root)
		.ok_or_else(|| crate::Error::Parse(format!("{} is not relative to {}", path.display(), root.display())))?;

	log::trace!("Reading mod metadata from {}", relative.display());

	let metadata = std::fs::File::open(path)
		.map_err(crate::Error::from)
		.and_then(|file| Ok(zip::ZipArchive::new(file)?))
		.and_then(|mut archive| PackageMetadata::from_archive(&mut archive))
		.map_err(|e| crate::Error::Metadata { path: path.to_path_buf(), reason: e.to_string() })?;

	Ok(DiscoveredPackage {
		path: relative,
		identifier: metadata.identifier().to_string(),
		name: metadata.name().to_string(),
		depends: metadata.depends(),
	})
}
