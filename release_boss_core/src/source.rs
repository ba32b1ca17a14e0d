use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ReleaseBossError;
use crate::ReleaseBossResult;

/// Resolves the current content of a file.
///
/// `Ok(None)` means the file does not exist in this source. Errors are
/// reserved for failures other than a missing file.
pub trait ContentSource {
	fn fetch(&self, path: &Path) -> ReleaseBossResult<Option<String>>;

	/// Short human readable name used in log messages.
	fn describe(&self) -> String;
}

/// Reads files from the working copy below `root`.
#[derive(Debug, Clone)]
pub struct LocalSource {
	root: PathBuf,
}

impl LocalSource {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

impl ContentSource for LocalSource {
	fn fetch(&self, path: &Path) -> ReleaseBossResult<Option<String>> {
		let full_path = self.root.join(path);
		match std::fs::read_to_string(&full_path) {
			Ok(content) => {
				debug!(file = %full_path.display(), bytes = content.len(), "read local file");
				Ok(Some(content))
			}
			Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
			Err(error) => {
				Err(ReleaseBossError::Read {
					path: full_path.display().to_string(),
					reason: error.to_string(),
				})
			}
		}
	}

	fn describe(&self) -> String {
		"local working copy".to_string()
	}
}

/// Reads files as they exist on a git reference, e.g. `origin/release`.
///
/// Paths are resolved relative to `root`, which may be a subdirectory of the
/// repository.
///
/// Content on the release branch may already carry updates from a concurrent
/// release run that the local checkout has not seen yet.
#[derive(Debug, Clone)]
pub struct GitRefSource {
	root: PathBuf,
	reference: String,
}

impl GitRefSource {
	pub fn new(root: impl Into<PathBuf>, reference: impl Into<String>) -> Self {
		Self {
			root: root.into(),
			reference: reference.into(),
		}
	}

	/// Build the reference for `branch` on `remote`. An empty remote refers
	/// to the local branch.
	pub fn for_branch(root: impl Into<PathBuf>, remote: &str, branch: &str) -> Self {
		let reference = if remote.is_empty() {
			branch.to_string()
		} else {
			format!("{remote}/{branch}")
		};

		Self::new(root, reference)
	}

	pub fn reference(&self) -> &str {
		&self.reference
	}

	/// Fetch `branch` from `remote` so the remote-tracking reference is
	/// current. Failures are logged and otherwise ignored.
	pub fn refresh(&self, remote: &str, branch: &str) {
		if remote.is_empty() {
			return;
		}

		let output = Command::new("git")
			.current_dir(&self.root)
			.args(["fetch", "--quiet", remote, branch])
			.output();

		match output {
			Ok(output) if output.status.success() => {
				info!(remote, branch, "fetched release branch");
			}
			Ok(output) => {
				let stderr = String::from_utf8_lossy(&output.stderr);
				warn!(remote, branch, stderr = %stderr.trim(), "git fetch failed");
			}
			Err(error) => warn!(remote, branch, %error, "could not run git fetch"),
		}
	}

	fn git_path(&self, path: &Path) -> String {
		let relative = path.strip_prefix(&self.root).unwrap_or(path);
		relative.to_string_lossy().replace('\\', "/")
	}

	fn remote_error(&self, path: &str, reason: impl Into<String>) -> ReleaseBossError {
		ReleaseBossError::RemoteFetch {
			reference: self.reference.clone(),
			path: path.to_string(),
			reason: reason.into(),
		}
	}
}

impl ContentSource for GitRefSource {
	fn fetch(&self, path: &Path) -> ReleaseBossResult<Option<String>> {
		let git_path = self.git_path(path);
		// `<ref>:./<path>` is relative to the working directory, while
		// `<ref>:<path>` is relative to the repository top level.
		let object = format!("{}:./{git_path}", self.reference);

		let output = Command::new("git")
			.current_dir(&self.root)
			.args(["show", object.as_str()])
			.output()
			.map_err(|error| self.remote_error(&git_path, error.to_string()))?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
			return Err(self.remote_error(&git_path, stderr));
		}

		let content = String::from_utf8(output.stdout)
			.map_err(|error| self.remote_error(&git_path, error.to_string()))?;

		Ok(Some(content))
	}

	fn describe(&self) -> String {
		format!("`{}`", self.reference)
	}
}

/// Tries `preferred` first and falls back to `fallback` when the preferred
/// source fails, does not have the file or returns it empty. Errors from the
/// preferred source are logged and never returned.
#[derive(Debug, Clone)]
pub struct FallbackSource<P, F> {
	preferred: P,
	fallback: F,
}

impl<P: ContentSource, F: ContentSource> FallbackSource<P, F> {
	pub fn new(preferred: P, fallback: F) -> Self {
		Self {
			preferred,
			fallback,
		}
	}
}

impl<P: ContentSource, F: ContentSource> ContentSource for FallbackSource<P, F> {
	fn fetch(&self, path: &Path) -> ReleaseBossResult<Option<String>> {
		match self.preferred.fetch(path) {
			Ok(Some(content)) if !content.is_empty() => {
				info!(
					file = %path.display(),
					source = %self.preferred.describe(),
					"using content from preferred source"
				);
				return Ok(Some(content));
			}
			Ok(Some(_)) => {
				info!(
					file = %path.display(),
					source = %self.preferred.describe(),
					"file is empty in preferred source, falling back to {}",
					self.fallback.describe()
				);
			}
			Ok(None) => {
				info!(
					file = %path.display(),
					source = %self.preferred.describe(),
					"file not found in preferred source, falling back to {}",
					self.fallback.describe()
				);
			}
			Err(error) => {
				info!(
					file = %path.display(),
					%error,
					"falling back to {}",
					self.fallback.describe()
				);
			}
		}

		self.fallback.fetch(path)
	}

	fn describe(&self) -> String {
		format!(
			"{} with fallback to {}",
			self.preferred.describe(),
			self.fallback.describe()
		)
	}
}
