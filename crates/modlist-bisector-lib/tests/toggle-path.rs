use modlist_bisector::toggler::*;

fn touch(path: &std::path::Path) {
	std::fs::write(path, b"jar").expect("failed to write test file");
}

#[test]
fn disables_then_reports_no_change() {
	let dir = tempfile::tempdir().expect("failed to create temp dir");
	let (enabled, disabled) = toggle_paths(dir.path().join("a.jar"));
	touch(&enabled);

	assert!(set_path_enabled(&enabled, false).expect("first disable failed"));
	assert!(!enabled.exists());
	assert!(disabled.exists());

	assert!(!set_path_enabled(&enabled, false).expect("second disable failed"));
	assert!(disabled.exists());
}

#[test]
fn enables_disabled_archive() {
	let dir = tempfile::tempdir().expect("failed to create temp dir");
	let (enabled, disabled) = toggle_paths(dir.path().join("nested").join("a.jar"));
	std::fs::create_dir_all(dir.path().join("nested")).unwrap();
	touch(&disabled);

	assert!(set_path_enabled(&enabled, true).unwrap());
	assert!(!set_path_enabled(&enabled, true).unwrap());
	assert!(enabled.exists() && !disabled.exists());
}

#[test]
fn both_forms_present_is_ambiguous() {
	let dir = tempfile::tempdir().unwrap();
	let (enabled, disabled) = toggle_paths(dir.path().join("a.jar"));
	touch(&enabled);
	touch(&disabled);

	assert!(matches!(set_path_enabled(&enabled, false), Err(modlist_bisector::Error::AmbiguousState(_, _))));
	assert!(matches!(set_path_enabled(&enabled, true), Err(modlist_bisector::Error::AmbiguousState(_, _))));
	/* Nothing was touched */
	assert!(enabled.exists() && disabled.exists());
}

#[test]
fn missing_archive_is_not_found() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("a.jar");

	match rename_path(&missing, &dir.path().join("b.jar")) {
		Err(modlist_bisector::Error::ArtifactMissing(path)) => assert_eq!(path, missing),
		other => panic!("expected ArtifactMissing, got {:?}", other),
	}
}

#[test]
fn disabled_suffix_is_stripped() {
	let (path, disabled) = strip_disabled_suffix(std::path::Path::new("sub/a.jar.disabled"));
	assert_eq!(path, std::path::PathBuf::from("sub/a.jar"));
	assert!(disabled);

	let (path, disabled) = strip_disabled_suffix(std::path::Path::new("a.jar"));
	assert_eq!(path, std::path::PathBuf::from("a.jar"));
	assert!(!disabled);
}
