//! Narrows down which mod in a mod list causes a problem by repeatedly disabling half of the
//! remaining candidates, while never enabling a mod without the mods it depends on.
//!
//! # Usage
//! 1. Load a [`Config`] with [`Config::load_from_disk()`].
//! 1. [`ModList::build()`] from the mods on disk, or [`ModList::load()`] a previous session.
//! 1. [`ModList::bisect()`] to disable half of the remaining candidates.
//! 1. After testing, record the verdict with [`ModList::set_enabled_good()`] or [`ModList::set_disabled_good()`]
//! and bisect again until a single candidate remains.
//! 1. [`ModList::save()`] after every operation.

pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::Config;

pub mod toggler;
pub mod discovery;
pub mod graph;
pub use graph::DependencyGraph;
pub use graph::PackageEntry;

pub mod history;
pub use history::History;

pub mod modlist;
pub use modlist::ModList;
pub use modlist::BisectReport;
pub use modlist::NodeCounts;
