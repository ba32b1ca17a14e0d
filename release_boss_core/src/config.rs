use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::ReleaseBossError;
use crate::ReleaseBossResult;
use crate::source::ContentSource;
use crate::source::FallbackSource;
use crate::source::GitRefSource;
use crate::source::LocalSource;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"release-boss.toml",
	".release-boss.toml",
	".config/release-boss.toml",
];

/// Branch consulted before the working copy when none is configured.
pub const DEFAULT_RELEASE_BRANCH: &str = "release";

/// Remote whose copy of the release branch is read when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// Configuration loaded from a `release-boss.toml` file.
///
/// ```toml
/// release_branch = "release"
/// remote = "origin"
/// remote_lookup = true
/// fetch_before_lookup = false
///
/// version_files = ["src/version.rs", "README.md"]
/// template_files = ["deploy/values.tpl.yaml"]
///
/// [[update_files]]
/// file = "package.json"
/// find_line = "\"version\":"
/// replace_line = "  \"version\": \"{{version}}\","
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseBossConfig {
	/// Branch whose content is preferred over the working copy.
	#[serde(default = "default_release_branch")]
	pub release_branch: String,
	/// Remote holding the release branch. An empty string reads the local
	/// branch instead of a remote-tracking reference.
	#[serde(default = "default_remote")]
	pub remote: String,
	/// When false, only the working copy is read.
	#[serde(default = "default_true")]
	pub remote_lookup: bool,
	/// Run `git fetch <remote> <release_branch>` before reading any file.
	#[serde(default)]
	pub fetch_before_lookup: bool,
	/// Files containing `%%release-boss: ... %%` markers.
	#[serde(default)]
	pub version_files: Vec<PathBuf>,
	/// Files rendered as a whole into a sibling output file.
	#[serde(default)]
	pub template_files: Vec<PathBuf>,
	/// Line based find and replace entries. Entries are validated by
	/// [`ReleaseBossConfig::update_specs`].
	#[serde(default)]
	pub update_files: Vec<RawFileUpdateSpec>,
}

impl Default for ReleaseBossConfig {
	fn default() -> Self {
		Self {
			release_branch: default_release_branch(),
			remote: default_remote(),
			remote_lookup: true,
			fetch_before_lookup: false,
			version_files: Vec::new(),
			template_files: Vec::new(),
			update_files: Vec::new(),
		}
	}
}

/// An `[[update_files]]` entry as written in the config. Any field may be
/// missing; see [`RawFileUpdateSpec::validate`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawFileUpdateSpec {
	#[serde(default)]
	pub file: Option<PathBuf>,
	#[serde(default, alias = "findLine")]
	pub find_line: Option<String>,
	#[serde(default, alias = "replaceLine")]
	pub replace_line: Option<String>,
}

impl RawFileUpdateSpec {
	/// Convert into a [`FileUpdateSpec`] when every field is present and
	/// non-empty.
	pub fn validate(&self) -> Option<FileUpdateSpec> {
		let file = self.file.as_ref().filter(|file| !file.as_os_str().is_empty())?;
		let find_line = self.find_line.as_ref().filter(|find| !find.is_empty())?;
		let replace_line = self
			.replace_line
			.as_ref()
			.filter(|replace| !replace.is_empty())?;

		Some(FileUpdateSpec {
			file: file.clone(),
			find_line: find_line.clone(),
			replace_line: replace_line.clone(),
		})
	}
}

/// A validated line update: the first line of `file` containing `find_line`
/// is replaced with `replace_line` rendered against the release version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdateSpec {
	pub file: PathBuf,
	pub find_line: String,
	pub replace_line: String,
}

fn default_release_branch() -> String {
	DEFAULT_RELEASE_BRANCH.to_string()
}

fn default_remote() -> String {
	DEFAULT_REMOTE.to_string()
}

fn default_true() -> bool {
	true
}

impl ReleaseBossConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ReleaseBossResult<Option<ReleaseBossConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to the defaults when no config
	/// file exists.
	pub fn load_or_default(root: &Path) -> ReleaseBossResult<ReleaseBossConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn parse(content: &str) -> ReleaseBossResult<ReleaseBossConfig> {
		toml::from_str(content).map_err(|e| ReleaseBossError::ConfigParse(e.to_string()))
	}

	/// The validated update entries. Entries missing a field are dropped with
	/// a warning so they are never partially applied.
	pub fn update_specs(&self) -> Vec<FileUpdateSpec> {
		self.update_files
			.iter()
			.filter_map(|raw| {
				let spec = raw.validate();
				if spec.is_none() {
					warn!(entry = ?raw, "skipping invalid update file entry");
				}
				spec
			})
			.collect()
	}

	/// Build the content source described by this config: the release branch
	/// with fallback to the working copy, or the working copy alone when
	/// `remote_lookup` is disabled.
	pub fn content_source(&self, root: &Path) -> Box<dyn ContentSource> {
		let local = LocalSource::new(root);
		if !self.remote_lookup {
			return Box::new(local);
		}

		let remote = GitRefSource::for_branch(root, &self.remote, &self.release_branch);
		if self.fetch_before_lookup {
			remote.refresh(&self.remote, &self.release_branch);
		}

		Box::new(FallbackSource::new(remote, local))
	}
}
