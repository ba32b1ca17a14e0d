use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::FileUpdateSpec;
use crate::ReleaseBossConfig;
use crate::ReleaseBossError;
use crate::ReleaseBossResult;
use crate::Version;
use crate::engine::replace_first_matching_line;
use crate::engine::rewrite_markers;
use crate::engine::template_output_path;
use crate::render_template;
use crate::source::ContentSource;

/// Paths touched by a full release run.
#[derive(Debug, Default, Serialize)]
pub struct ReleaseReport {
	/// The version that was rendered.
	pub version: String,
	/// Absolute paths of files whose markers were rewritten.
	pub version_files: Vec<PathBuf>,
	/// Absolute paths of files generated from templates.
	pub template_files: Vec<PathBuf>,
	/// Configured paths of files changed by line updates.
	pub update_files: Vec<PathBuf>,
}

impl ReleaseReport {
	/// Total number of files written.
	pub fn file_count(&self) -> usize {
		self.version_files.len() + self.template_files.len() + self.update_files.len()
	}
}

/// Applies a release version to the files of a project.
///
/// Files are processed one at a time in the order given. A missing file is
/// skipped (or, for line updates, treated as empty) and any other I/O failure
/// aborts the batch.
pub struct ReleaseProcessor {
	root: PathBuf,
	version: Version,
	source: Box<dyn ContentSource>,
}

impl ReleaseProcessor {
	/// Create a processor for files below `root`. The `source` receives paths
	/// as given to the processor, usually relative to `root`.
	pub fn new(root: impl Into<PathBuf>, version: Version, source: Box<dyn ContentSource>) -> Self {
		if !version.is_complete() {
			warn!(
				version = version.as_str(),
				"version has fewer than three components, missing placeholders are left as is"
			);
		}

		Self {
			root: root.into(),
			version,
			source,
		}
	}

	/// Create a processor using the content source described by `config`.
	pub fn from_config(root: impl Into<PathBuf>, version: Version, config: &ReleaseBossConfig) -> Self {
		let root = root.into();
		let source = config.content_source(&root);
		Self::new(root, version, source)
	}

	pub fn version(&self) -> &Version {
		&self.version
	}

	/// Run every file set named in `config`: version files, then template
	/// files, then line updates.
	pub fn process_config(&self, config: &ReleaseBossConfig) -> ReleaseBossResult<ReleaseReport> {
		let version_files = self.process_version_files(&config.version_files)?;
		let template_files = self.process_template_files(&config.template_files)?;
		let update_files = self.process_update_files(&config.update_specs())?;

		Ok(ReleaseReport {
			version: self.version.to_string(),
			version_files,
			template_files,
			update_files,
		})
	}

	/// Rewrite the generated region after every marker in each file.
	/// Returns the absolute paths of the files written.
	pub fn process_version_files(&self, files: &[PathBuf]) -> ReleaseBossResult<Vec<PathBuf>> {
		let mut processed = Vec::new();
		info!(
			count = files.len(),
			version = self.version.as_str(),
			"processing version files"
		);

		for file in files {
			let Some(content) = self.source.fetch(file)? else {
				warn!(
					file = %file.display(),
					"file not found in {}, skipping",
					self.source.describe()
				);
				continue;
			};

			let rewrite = rewrite_markers(&content, &self.version);
			for marker in &rewrite.markers {
				debug!(
					file = %file.display(),
					line = marker.start_line + 1,
					multiline = marker.is_multiline(),
					"found marker"
				);
			}
			for diagnostic in &rewrite.diagnostics {
				warn!(
					file = %file.display(),
					line = diagnostic.line() + 1,
					"{}",
					diagnostic.message()
				);
			}
			info!(
				file = %file.display(),
				markers = rewrite.markers.len(),
				discarded = rewrite.discarded_lines,
				"rendered markers"
			);

			let path = self.root.join(file);
			write_and_verify(&path, &rewrite.content)?;
			processed.push(absolute(path));
		}

		Ok(processed)
	}

	/// Render each template file as a whole and write the result next to it.
	/// Template files are always read from the working copy. Returns the
	/// absolute paths of the generated files.
	pub fn process_template_files(&self, files: &[PathBuf]) -> ReleaseBossResult<Vec<PathBuf>> {
		let mut generated = Vec::new();
		info!(count = files.len(), "processing template files");

		for file in files {
			let path = self.root.join(file);
			let content = match std::fs::read_to_string(&path) {
				Ok(content) => content,
				Err(error) if error.kind() == ErrorKind::NotFound => {
					warn!(file = %path.display(), "template file not found, skipping");
					continue;
				}
				Err(error) => {
					return Err(ReleaseBossError::Read {
						path: path.display().to_string(),
						reason: error.to_string(),
					});
				}
			};

			let output_path = self.root.join(template_output_path(file));
			let rendered = render_template(&content, &self.version);
			info!(
				template = %path.display(),
				output = %output_path.display(),
				"rendered template"
			);

			write_and_verify(&output_path, &rendered)?;
			generated.push(absolute(output_path));
		}

		Ok(generated)
	}

	/// Replace the first line containing each spec's `find_line` with its
	/// rendered `replace_line`. Returns the paths of the files written, as
	/// configured.
	pub fn process_update_files(&self, specs: &[FileUpdateSpec]) -> ReleaseBossResult<Vec<PathBuf>> {
		let mut processed = Vec::new();
		if specs.is_empty() {
			debug!("no update files to process");
			return Ok(processed);
		}

		info!(count = specs.len(), "processing update files");

		for spec in specs {
			let content = self.source.fetch(&spec.file)?.unwrap_or_else(|| {
				info!(file = %spec.file.display(), "file does not exist yet, starting empty");
				String::new()
			});

			let replacement = render_template(&spec.replace_line, &self.version);
			let Some((line, updated)) =
				replace_first_matching_line(&content, &spec.find_line, &replacement)
			else {
				warn!(
					file = %spec.file.display(),
					find = spec.find_line.as_str(),
					"no line matched, skipping"
				);
				continue;
			};

			debug!(file = %spec.file.display(), line = line + 1, "replacing line");
			write_and_verify(&self.root.join(&spec.file), &updated)?;
			processed.push(spec.file.clone());
		}

		Ok(processed)
	}
}

/// Write `content` to `path` and read it back to confirm the write landed.
fn write_and_verify(path: &Path, content: &str) -> ReleaseBossResult<()> {
	std::fs::write(path, content).map_err(|e| {
		ReleaseBossError::Write {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	let written = std::fs::read_to_string(path).map_err(|e| {
		ReleaseBossError::Verify {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	if written != content {
		return Err(ReleaseBossError::Verify {
			path: path.display().to_string(),
			reason: format!(
				"expected {} bytes but found {} bytes",
				content.len(),
				written.len()
			),
		});
	}

	info!(file = %path.display(), bytes = written.len(), "wrote file");
	Ok(())
}

fn absolute(path: PathBuf) -> PathBuf {
	std::path::absolute(&path).unwrap_or(path)
}
