mod common;

use release_boss_core::AnyEmptyResult;
use serde_json::Value;

fn write_project(root: &std::path::Path) -> std::io::Result<()> {
	std::fs::write(
		root.join("release-boss.toml"),
		r#"version_files = ["src/version.rs"]
template_files = ["deploy/app.tpl.env"]

[[update_files]]
file = "Cargo.toml"
find_line = "version ="
replace_line = "version = \"{{version}}\""

[[update_files]]
file = "Cargo.toml"
find_line = "version ="
"#,
	)?;

	std::fs::create_dir_all(root.join("src"))?;
	std::fs::write(
		root.join("src/version.rs"),
		"// %%release-boss: pub const VERSION: &str = \"{{version}}\"; %%\npub const VERSION: \
		 &str = \"0.1.0\";\n",
	)?;

	std::fs::create_dir_all(root.join("deploy"))?;
	std::fs::write(
		root.join("deploy/app.tpl.env"),
		"APP_VERSION={{version}}\nAPP_MAJOR={{major}}\n",
	)?;

	std::fs::write(
		root.join("Cargo.toml"),
		"[package]\nname = \"demo\"\nversion = \"0.1.0\"\n",
	)?;

	Ok(())
}

#[test]
fn run_updates_every_configured_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	common::release_boss_cmd()
		.arg("run")
		.arg("2.3.4")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Version files:"))
		.stdout(predicates::str::contains("Generated files:"))
		.stdout(predicates::str::contains("Updated 3 file(s) for version 2.3.4."));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("src/version.rs"))?,
		"// %%release-boss: pub const VERSION: &str = \"{{version}}\"; %%\npub const VERSION: \
		 &str = \"2.3.4\";\n"
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("deploy/app.env"))?,
		"APP_VERSION=2.3.4\nAPP_MAJOR=2\n"
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("Cargo.toml"))?,
		"[package]\nname = \"demo\"\nversion = \"2.3.4\"\n"
	);

	Ok(())
}

#[test]
fn run_outputs_json_report() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	let output = common::release_boss_cmd()
		.arg("run")
		.arg("1.0.0")
		.arg("--local-only")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["version"], "1.0.0");
	assert_eq!(report["version_files"].as_array().map(Vec::len), Some(1));
	assert_eq!(report["template_files"].as_array().map(Vec::len), Some(1));
	assert_eq!(report["update_files"], serde_json::json!(["Cargo.toml"]));

	Ok(())
}

#[test]
fn run_without_config_updates_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::release_boss_cmd()
		.arg("run")
		.arg("1.0.0")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"No files were updated for version 1.0.0.",
		));

	Ok(())
}

#[test]
fn run_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("release-boss.toml"),
		"version_files = \"not a list\"\n",
	)?;

	common::release_boss_cmd()
		.arg("run")
		.arg("1.0.0")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn run_skips_missing_version_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("release-boss.toml"),
		"version_files = [\"missing.txt\", \"VERSION\"]\n",
	)?;
	std::fs::write(
		tmp.path().join("VERSION"),
		"%%release-boss: {{version}} %%\n0.0.0\n",
	)?;

	common::release_boss_cmd()
		.arg("run")
		.arg("0.0.1")
		.arg("--local-only")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 1 file(s)"))
		.stderr(predicates::str::contains("missing.txt"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("VERSION"))?,
		"%%release-boss: {{version}} %%\n0.0.1\n"
	);

	Ok(())
}
