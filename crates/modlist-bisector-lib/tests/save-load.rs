use modlist_bisector::{Error, History, ModList};
use modlist_bisector_test_utils::ModFixture;

#[test]
fn saved_graph_is_stable() {
	let mut fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], true).unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();
	fixture.add_quilt_mod("c", &[], true).unwrap();
	fixture.add_fabric_mod("d", &[], false).unwrap();
	fixture.set_override("d", false);

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.bisect().unwrap();
	modlist.save().expect("failed to save");
	let graph = modlist.graph().clone();
	let first = std::fs::read(modlist.graph_path()).unwrap();

	let mut loaded = ModList::load(fixture.config(), fixture.state_dir()).expect("failed to load");
	assert_eq!(loaded.graph(), &graph);
	loaded.save().unwrap();
	let second = std::fs::read(loaded.graph_path()).unwrap();
	assert_eq!(first, second);
}

#[test]
fn load_applies_changed_config() {
	let mut fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.save().unwrap();

	fixture.set_override("a", false);
	let loaded = ModList::load(fixture.config(), fixture.state_dir()).unwrap();
	let a = loaded.get("a").unwrap();
	assert!(!a.enabled && a.locked);
	assert!(fixture.is_disabled_on_disk("a"));
}

#[test]
fn load_without_save() {
	let fixture = ModFixture::new().unwrap();
	match ModList::load(fixture.config(), fixture.state_dir()) {
		Err(Error::IO(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
		other => panic!("expected a missing graph, got {:?}", other.map(|_| ())),
	}
}

#[test]
fn save_records_history() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.save().unwrap();
	modlist.bisect().unwrap();
	modlist.save().unwrap();

	let history = History::load(fixture.state_dir()).unwrap();
	assert_eq!(history.segment(), 0);
	assert_eq!(history.entries(), &[vec!["a".to_string(), "b".to_string()], vec!["b".to_string()]]);
	assert_eq!(history.latest(), Some(&["b".to_string()][..]));
}

#[test]
fn rollover_starts_new_segment() {
	let state = tempfile::tempdir().unwrap();

	let mut history = History::load(state.path()).unwrap();
	history.push(["a"]);
	history.save().unwrap();
	history.rollover().unwrap();
	assert_eq!(history.segment(), 1);
	assert!(history.entries().is_empty());
	history.push(["b"]);
	history.save().unwrap();

	let history = History::load(state.path()).unwrap();
	assert_eq!(history.segment(), 1);
	assert_eq!(history.entries(), &[vec!["b".to_string()]]);
	assert!(state.path().join("log_0.json").exists());
}

#[test]
fn latest_segment_is_numeric() {
	let state = tempfile::tempdir().unwrap();
	std::fs::write(state.path().join("log_2.json"), r#"[["two"]]"#).unwrap();
	std::fs::write(state.path().join("log_10.json"), r#"[["ten"]]"#).unwrap();
	std::fs::write(state.path().join("log_x.json"), "not json").unwrap();

	let history = History::load(state.path()).unwrap();
	assert_eq!(history.segment(), 10);
	assert_eq!(history.latest(), Some(&["ten".to_string()][..]));
}

#[test]
fn empty_segment_loads_empty() {
	let state = tempfile::tempdir().unwrap();
	std::fs::write(state.path().join("log_0.json"), "\n").unwrap();

	let history = History::load(state.path()).unwrap();
	assert!(history.entries().is_empty());
	assert_eq!(history.latest(), None);
}

#[test]
fn rollover_keeps_unsaved_entries() {
	let state = tempfile::tempdir().unwrap();

	let mut history = History::load(state.path()).unwrap();
	history.push(["a"]);
	history.rollover().unwrap();
	assert_eq!(history.segment(), 1);
	assert!(history.entries().is_empty());

	let saved = History::load(state.path()).unwrap();
	assert_eq!(saved.segment(), 0);
	assert_eq!(saved.entries(), &[vec!["a".to_string()]]);
}
