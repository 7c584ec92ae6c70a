//! Enabling and disabling archives on disk.
//!
//! A disabled archive has [`DISABLED_SUFFIX`] appended to its file name, which mod loaders ignore.

use std::path::{Path, PathBuf};

pub const DISABLED_SUFFIX: &str = ".disabled";

/// Returns the `(enabled, disabled)` forms of an archive path.
pub fn toggle_paths(enabled: impl Into<PathBuf>) -> (PathBuf, PathBuf) {
	let enabled = enabled.into();
	let mut disabled = enabled.clone().into_os_string();
	disabled.push(DISABLED_SUFFIX);
	(enabled, PathBuf::from(disabled))
}

/// Strips [`DISABLED_SUFFIX`] from `path` if present.
///
/// Returns the enabled form of the path and whether it was disabled.
pub fn strip_disabled_suffix(path: &Path) -> (PathBuf, bool) {
	match path.to_str().and_then(|s| s.strip_suffix(DISABLED_SUFFIX)) {
		Some(stripped) => (PathBuf::from(stripped), true),
		None => (path.to_path_buf(), false),
	}
}

/// Renames `source` to `target`.
///
/// Returns `false` when `target` already exists and `source` doesn't, meaning the rename has already happened.
///
/// # Errors
/// - [`AmbiguousState`](crate::Error::AmbiguousState) when both paths exist.
/// - [`ArtifactMissing`](crate::Error::ArtifactMissing) when neither path exists.
/// - [`IO`](crate::Error::IO) when the rename fails.
pub fn rename_path(source: &Path, target: &Path) -> crate::Result<bool> {
	match (source.exists(), target.exists()) {
		(true, false) => {
			log::trace!("Renaming {} to {}", source.display(), target.display());
			std::fs::rename(source, target)?;
			Ok(true)
		},
		(false, true) => Ok(false),
		(true, true) => Err(crate::Error::AmbiguousState(source.to_path_buf(), target.to_path_buf())),
		(false, false) => Err(crate::Error::ArtifactMissing(source.to_path_buf())),
	}
}

/// Moves the archive at `enabled` (or its disabled form) into the requested state.
///
/// See [`rename_path()`] for the return value and errors.
pub fn set_path_enabled(enabled: impl Into<PathBuf>, value: bool) -> crate::Result<bool> {
	let (enabled, disabled) = toggle_paths(enabled);
	if value {
		rename_path(&disabled, &enabled)
	} else {
		rename_path(&enabled, &disabled)
	}
}
