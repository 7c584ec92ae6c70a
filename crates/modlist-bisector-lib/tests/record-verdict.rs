use modlist_bisector::{Error, ModList};
use modlist_bisector_test_utils::{closure_violations, ModFixture};

#[test]
fn disabled_good_locks_disabled_mods() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();
	fixture.add_fabric_mod("b", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.set_disabled_good();

	let a = modlist.get("a").unwrap();
	assert!(a.enabled && !a.locked);
	let b = modlist.get("b").unwrap();
	assert!(!b.enabled && b.locked);
	assert_eq!(modlist.count_nodes().locked(), 1);
}

#[test]
fn enabled_good_keeps_dependencies_of_reenabled_mods() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], true).unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();
	fixture.add_fabric_mod("c", &[], true).unwrap();
	fixture.add_fabric_mod("d", &["a"], false).unwrap();
	fixture.add_fabric_mod("e", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.set_enabled_good().expect("failed to record verdict");

	for id in ["a", "b", "d", "e"] {
		let entry = modlist.get(id).unwrap();
		assert!(entry.enabled && !entry.locked, "{} should be an enabled candidate", id);
		assert!(fixture.is_enabled_on_disk(id));
	}
	let c = modlist.get("c").unwrap();
	assert!(!c.enabled && c.locked);
	assert!(fixture.is_disabled_on_disk("c"));
	assert!(closure_violations(modlist.graph()).is_empty());
}

#[test]
fn enabled_good_locks_previously_enabled() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], true).unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();
	fixture.add_fabric_mod("c", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.set_enabled_good().unwrap();

	for id in ["a", "b"] {
		let entry = modlist.get(id).unwrap();
		assert!(!entry.enabled && entry.locked);
	}
	let c = modlist.get("c").unwrap();
	assert!(c.enabled && !c.locked);
	assert_eq!(modlist.count_nodes().enabled, 1);
}

#[test]
fn enabled_good_keeps_dependencies_of_locked_mods() {
	let mut fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("x", &["y"], true).unwrap();
	fixture.add_fabric_mod("y", &[], true).unwrap();
	fixture.add_fabric_mod("z", &[], false).unwrap();
	fixture.set_override("x", true);

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.set_enabled_good().unwrap();

	let y = modlist.get("y").unwrap();
	assert!(y.enabled && y.locked);
	assert!(fixture.is_enabled_on_disk("y"));
}

#[test]
fn verdicts_narrow_down_to_one() {
	let _ = env_logger::builder().is_test(true).try_init();
	let fixture = ModFixture::new().unwrap();
	for id in ["a", "b", "c", "d", "e", "f", "g", "h"] {
		fixture.add_fabric_mod(id, &[], true).unwrap();
	}
	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();

	/* The problem is caused by "f" */
	modlist.bisect().unwrap();
	while modlist.count_nodes().enabled + modlist.count_nodes().disabled > 1 {
		if modlist.get("f").unwrap().enabled {
			modlist.set_disabled_good();
		} else {
			modlist.set_enabled_good().unwrap();
		}
		if modlist.count_nodes().enabled > 1 {
			modlist.bisect().unwrap();
		}
	}

	let pending: Vec<&str> = modlist.pending_nodes().keys().copied().collect();
	assert_eq!(pending, vec!["f"]);
}

#[test]
fn require_locks_enabled() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], false).unwrap();
	fixture.add_fabric_mod("b", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.require("a").unwrap();

	let a = modlist.get("a").unwrap();
	assert!(a.enabled && a.locked);
	assert!(modlist.get("b").unwrap().enabled);
	assert!(fixture.is_enabled_on_disk("b"));

	assert!(matches!(modlist.require("missing"), Err(Error::UnknownPackage(_))));
}

#[test]
fn added_dependency_is_enabled() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();
	fixture.add_fabric_mod("b", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.set_disabled_good();
	assert!(modlist.get("b").unwrap().locked);

	modlist.add_dependency("a", "b").unwrap();
	let b = modlist.get("b").unwrap();
	assert!(b.enabled && !b.locked);
	assert!(modlist.graph().has_edge("a", "b"));
	assert!(fixture.is_enabled_on_disk("b"));
}

#[test]
fn added_dependency_cycle_is_rejected() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], true).unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	assert!(matches!(modlist.add_dependency("b", "a"), Err(Error::Cycle(_))));
	assert!(!modlist.graph().has_edge("b", "a"));
	assert!(matches!(modlist.add_dependency("a", "missing"), Err(Error::UnknownPackage(_))));
}

#[test]
fn direct_state_changes() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	assert!(!modlist.enable("a").unwrap());
	assert!(modlist.disable("a").unwrap());
	assert!(fixture.is_disabled_on_disk("a"));
	assert!(modlist.toggle("a").unwrap());
	assert!(fixture.is_enabled_on_disk("a"));
	assert!(matches!(modlist.toggle("missing"), Err(Error::UnknownPackage(_))));
}

#[test]
fn failed_toggle_leaves_state_unchanged() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	std::fs::remove_file(fixture.root().join("a.jar")).unwrap();

	assert!(matches!(modlist.disable("a"), Err(Error::ArtifactMissing(_))));
	assert!(modlist.get("a").unwrap().enabled);
}

#[test]
fn added_dependency_cycle_through_unlocked_dependency_is_rejected() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], true).unwrap();
	fixture.add_fabric_mod("b", &["a"], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	modlist.set_disabled_good();

	assert!(matches!(modlist.add_dependency("a", "b"), Err(Error::Cycle(_))));
	assert!(!modlist.graph().has_edge("a", "b"));
	let b = modlist.get("b").unwrap();
	assert!(!b.enabled && b.locked);
	assert!(modlist.sync().is_ok());
}

#[test]
fn disabling_a_required_dependency_is_rejected() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], true).unwrap();
	fixture.add_fabric_mod("b", &[], true).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	assert!(matches!(modlist.disable("b"), Err(Error::Validation(_))));
	assert!(matches!(modlist.toggle("b"), Err(Error::Validation(_))));
	assert!(modlist.get("b").unwrap().enabled);
	assert!(fixture.is_enabled_on_disk("b"));

	assert!(modlist.disable("a").unwrap());
	assert!(modlist.disable("b").unwrap());
	assert!(closure_violations(modlist.graph()).is_empty());
}
