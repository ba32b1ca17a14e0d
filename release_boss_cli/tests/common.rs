use assert_cmd::Command;

pub fn release_boss_cmd() -> Command {
	let mut cmd =
		Command::cargo_bin("release-boss").unwrap_or_else(|e| panic!("release-boss binary: {e}"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}
