use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ReleaseBossError {
	#[error(transparent)]
	#[diagnostic(code(release_boss::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(release_boss::read))]
	Read { path: String, reason: String },

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(
		code(release_boss::write),
		help("check that the file and its parent directory are writable")
	)]
	Write { path: String, reason: String },

	#[error("failed to verify `{path}` after writing: {reason}")]
	#[diagnostic(
		code(release_boss::verify),
		help("another process may be modifying the file while release-boss runs")
	)]
	Verify { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(release_boss::config_parse),
		help(
			"check that release-boss.toml is valid TOML with `version_files`, `template_files` \
			 and/or `[[update_files]]` entries"
		)
	)]
	ConfigParse(String),

	#[error("could not read `{path}` from `{reference}`: {reason}")]
	#[diagnostic(code(release_boss::remote_fetch))]
	RemoteFetch {
		reference: String,
		path: String,
		reason: String,
	},
}

pub type ReleaseBossResult<T> = Result<T, ReleaseBossError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
