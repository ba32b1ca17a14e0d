mod common;

use release_boss_core::AnyEmptyResult;

#[test]
fn scan_lists_markers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("version.rs"),
		"// %%release-boss: {{version}} %%\n1.0.0\n// %%release-boss:\n// {{major}}\n// %%\n1\n",
	)?;

	common::release_boss_cmd()
		.arg("scan")
		.arg("version.rs")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("version.rs (2 marker(s))"))
		.stdout(predicates::str::contains("line 1: {{version}}"))
		.stdout(predicates::str::contains("lines 3-5: // {{major}}\\n//"));

	// Scanning never writes.
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("version.rs"))?,
		"// %%release-boss: {{version}} %%\n1.0.0\n// %%release-boss:\n// {{major}}\n// %%\n1\n"
	);

	Ok(())
}

#[test]
fn scan_fails_on_unterminated_marker() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("broken.txt"),
		"ok\n%%release-boss: {{version}}\nnever closed\n",
	)?;

	common::release_boss_cmd()
		.arg("scan")
		.arg("broken.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"no closing `%%` found for marker starting at line 2",
		))
		.stdout(predicates::str::contains("1 malformed marker(s) found."));

	Ok(())
}

#[test]
fn scan_warns_about_missing_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::release_boss_cmd()
		.arg("scan")
		.arg("missing.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("missing.txt: file not found"));

	Ok(())
}
