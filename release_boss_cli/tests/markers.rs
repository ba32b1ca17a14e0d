mod common;

use predicates::prelude::PredicateBooleanExt;
use release_boss_core::AnyEmptyResult;

#[test]
fn markers_rewrites_generated_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("README.md"),
		"# Demo\n\n<!-- %%release-boss:\n```toml\ndemo = \"{{version}}\"\n``` %% \
		 -->\n```toml\ndemo = \"0.1.0\"\n```\n",
	)?;

	common::release_boss_cmd()
		.arg("markers")
		.arg("0.2.0")
		.arg("README.md")
		.arg("--local-only")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Version files:"))
		.stdout(predicates::str::contains("README.md"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("README.md"))?,
		"# Demo\n\n<!-- %%release-boss:\n```toml\ndemo = \"{{version}}\"\n``` %% \
		 -->\n```toml\ndemo = \"0.2.0\"\n```\n"
	);

	Ok(())
}

#[test]
fn markers_is_stable_across_runs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("version.py"),
		"# %%release-boss: __version__ = \"{{version}}\" %%\n__version__ = \"0.0.0\"\n",
	)?;

	for _ in 0..2 {
		common::release_boss_cmd()
			.arg("markers")
			.arg("1.1.1")
			.arg("version.py")
			.arg("--local-only")
			.arg("--path")
			.arg(tmp.path())
			.assert()
			.success();
	}

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("version.py"))?,
		"# %%release-boss: __version__ = \"{{version}}\" %%\n__version__ = \"1.1.1\"\n"
	);

	Ok(())
}

#[test]
fn markers_with_only_missing_files_updates_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::release_boss_cmd()
		.arg("markers")
		.arg("1.0.0")
		.arg("missing.txt")
		.arg("--local-only")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No files were updated"));

	Ok(())
}

#[test]
fn markers_reports_paths_relative_to_relative_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir(tmp.path().join("sub"))?;
	std::fs::write(
		tmp.path().join("sub/VERSION"),
		"%%release-boss: {{version}} %%\n0.1.0\n",
	)?;

	common::release_boss_cmd()
		.current_dir(tmp.path())
		.arg("markers")
		.arg("0.2.0")
		.arg("VERSION")
		.arg("--local-only")
		.arg("--path")
		.arg("sub")
		.assert()
		.success()
		.stdout(predicates::str::contains("Version files:\n  VERSION\n"))
		.stdout(predicates::str::contains("/sub/").not());

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("sub/VERSION"))?,
		"%%release-boss: {{version}} %%\n0.2.0\n"
	);

	Ok(())
}
