//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("zip error: {0}")]
	Zip(#[from] zip::result::ZipError),
	#[error("directory walk error: {0}")]
	WalkDir(#[from] walkdir::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(String),
	/// The archive at `path` has no usable mod metadata.
	#[error("mod metadata unreadable in {}: {reason}", path.display())]
	Metadata { path: PathBuf, reason: String },
	/// The identifiers along a dependency cycle among unlocked packages.
	#[error("cycle detected: {}", .0.join(" -> "))]
	Cycle(Vec<String>),
	/// Both the enabled and disabled forms of an archive exist.
	#[error("both paths already exist: {} and {}", .0.display(), .1.display())]
	AmbiguousState(PathBuf, PathBuf),
	/// Neither form of an archive exists.
	#[error("archive not found: {}", .0.display())]
	ArtifactMissing(PathBuf),
	#[error("unknown package: {0}")]
	UnknownPackage(String),
}
