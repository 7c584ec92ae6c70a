//! Record of which packages were enabled after each saved operation.
//!
//! The history is split into numbered segments `log_<n>.json`. Only the highest numbered segment is read
//! or written, starting a new segment with [`History::rollover()`] leaves older segments untouched.
//! Nothing in the search reads the history back, it exists for the user to retrace their steps.

use std::path::{Path, PathBuf};

const SEGMENT_PREFIX: &str = "log_";
const SEGMENT_EXTENSION: &str = ".json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
	dir: PathBuf,
	segment: usize,
	entries: Vec<Vec<String>>,
}

impl History {
	/// Loads the latest history segment in `dir`, or an empty history if there are none.
	///
	/// # Errors
	/// - [`IO`](crate::Error::IO) when reading the directory or segment.
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when the segment is malformed.
	pub fn load(dir: impl Into<PathBuf>) -> crate::Result<Self> {
		let dir = dir.into();
		let segment = match latest_segment(&dir)? {
			Some(segment) => segment,
			None => return Ok(Self { dir, segment: 0, entries: Vec::new() }),
		};

		let path = segment_path(&dir, segment);
		log::debug!("Loading history from {}", path.display());
		let data = std::fs::read(&path)?;
		let entries = if data.iter().all(u8::is_ascii_whitespace) {
			Vec::new()
		} else {
			serde_json::from_slice(&data)?
		};

		Ok(Self { dir, segment, entries })
	}

	/// Writes the current segment.
	pub fn save(&self) -> crate::Result<()> {
		std::fs::create_dir_all(&self.dir)?;
		let file = std::fs::File::create(self.path())?;
		serde_json::to_writer_pretty(file, &self.entries)?;
		Ok(())
	}

	/// Adds a snapshot of enabled identifiers, they are stored sorted.
	pub fn push(&mut self, enabled: impl IntoIterator<Item = impl Into<String>>) {
		let mut entry: Vec<String> = enabled.into_iter().map(Into::into).collect();
		entry.sort();
		self.entries.push(entry);
	}

	/// Starts a new, empty segment after the latest one on disk.
	///
	/// Unsaved entries are saved to the current segment first.
	/// The new segment is only created on disk by [`save()`](History::save()).
	pub fn rollover(&mut self) -> crate::Result<()> {
		if !self.entries.is_empty() {
			self.save()?;
		}
		self.segment = match latest_segment(&self.dir)? {
			Some(latest) => latest.max(self.segment) + 1,
			None => 0,
		};
		self.entries.clear();
		log::info!("Starting history segment {}", self.path().display());
		Ok(())
	}

	pub fn entries(&self) -> &[Vec<String>] {
		&self.entries
	}

	pub fn latest(&self) -> Option<&[String]> {
		self.entries.last().map(Vec::as_slice)
	}

	pub fn segment(&self) -> usize {
		self.segment
	}

	/// Path of the current segment.
	pub fn path(&self) -> PathBuf {
		segment_path(&self.dir, self.segment)
	}
}

fn segment_path(dir: &Path, index: usize) -> PathBuf {
	dir.join(format!("{}{}{}", SEGMENT_PREFIX, index, SEGMENT_EXTENSION))
}

/// Highest segment index in `dir`, compared numerically.
fn latest_segment(dir: &Path) -> crate::Result<Option<usize>> {
	if !dir.exists() {
		return Ok(None);
	}

	let mut latest = None;
	for entry in dir.read_dir()? {
		let name = entry?.file_name();
		let index = name.to_str()
			.and_then(|n| n.strip_prefix(SEGMENT_PREFIX))
			.and_then(|n| n.strip_suffix(SEGMENT_EXTENSION))
			.and_then(|n| n.parse::<usize>().ok());
		latest = latest.max(index);
	}
	Ok(latest)
}
