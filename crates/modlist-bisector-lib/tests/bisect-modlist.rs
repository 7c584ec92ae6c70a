use modlist_bisector::ModList;
use modlist_bisector_test_utils::{closure_violations, ModFixture};

fn chain_and_isolated() -> ModFixture {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &["b"], true).unwrap();
	fixture.add_fabric_mod("b", &["c"], true).unwrap();
	fixture.add_fabric_mod("c", &[], true).unwrap();
	fixture.add_fabric_mod("d", &[], true).unwrap();
	fixture
}

#[test]
fn bisect_disables_dependents_first() {
	let fixture = chain_and_isolated();
	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();

	let report = modlist.bisect().expect("failed to bisect");
	assert_eq!(report.newly_disabled, 2);
	assert_eq!(report.remaining, 2);
	assert_eq!(report.total, 4);

	assert!(!modlist.get("a").unwrap().enabled);
	assert!(!modlist.get("b").unwrap().enabled);
	assert!(modlist.get("c").unwrap().enabled);
	assert!(modlist.get("d").unwrap().enabled);
	assert!(fixture.is_disabled_on_disk("a"));
	assert!(fixture.is_disabled_on_disk("b"));
	assert!(fixture.is_enabled_on_disk("c"));
	assert!(fixture.is_enabled_on_disk("d"));
	assert!(closure_violations(modlist.graph()).is_empty());
}

#[test]
fn bisect_never_enables() {
	let _ = env_logger::builder().is_test(true).try_init();
	let fixture = ModFixture::new().unwrap();
	for id in ["a", "b", "c", "d", "e"] {
		fixture.add_fabric_mod(id, &[], true).unwrap();
	}
	fixture.add_fabric_mod("f", &[], false).unwrap();
	fixture.add_fabric_mod("g", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	let mut previous = modlist.count_nodes().enabled;
	while previous > 0 {
		let before = modlist.graph().clone();
		let report = modlist.bisect().unwrap();
		assert_eq!(report.remaining, previous - previous / 2);

		for entry in modlist.graph().nodes() {
			assert!(!entry.enabled || before.get(&entry.identifier).unwrap().enabled);
		}
		if report.newly_disabled == 0 {
			break;
		}
		previous = report.remaining;
	}
	assert!(!modlist.get("f").unwrap().enabled);
	assert_eq!(modlist.count_nodes().enabled, 1);
}

#[test]
fn bisect_ignores_locked_mods() {
	let mut fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("x", &["y"], true).unwrap();
	fixture.add_fabric_mod("y", &[], true).unwrap();
	fixture.add_fabric_mod("z", &[], true).unwrap();
	fixture.set_override("x", true);

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	let report = modlist.bisect().unwrap();

	assert_eq!(report.newly_disabled, 1);
	let x = modlist.get("x").unwrap();
	assert!(x.enabled && x.locked);
	/* Still required by x */
	assert!(modlist.get("y").unwrap().enabled);
	assert!(!modlist.get("z").unwrap().enabled);
}

#[test]
fn bisect_with_nothing_enabled() {
	let fixture = ModFixture::new().unwrap();
	fixture.add_fabric_mod("a", &[], false).unwrap();

	let mut modlist = ModList::build(fixture.config(), fixture.state_dir(), false).unwrap();
	let report = modlist.bisect().unwrap();
	assert_eq!(report.newly_disabled, 0);
	assert_eq!(report.remaining, 0);
}
