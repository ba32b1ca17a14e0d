use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Stamp release versions into source and config files.",
	long_about = "release-boss rewrites version information inside text files as part of a \
	              release pipeline.\n\nMark a region with `%%release-boss: ... %%` and the \
	              lines after the marker are regenerated from the template on every \
	              release.\n\nQuick start:\n  release-boss init           Create a \
	              release-boss.toml\n  release-boss run 1.2.3      Update every configured \
	              file\n  release-boss scan FILE...   List markers without writing"
)]
pub struct ReleaseBossCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Branch to read files from before falling back to the working copy.
	/// Overrides `release_branch` in the config file.
	#[arg(long, global = true)]
	pub release_branch: Option<String>,

	/// Only read files from the working copy.
	#[arg(long, global = true, default_value_t = false)]
	pub local_only: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `release-boss.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Apply a version to every file set named in the config file.
	///
	/// Version files are rewritten first, then template files are rendered,
	/// then line updates are applied. The first read or write failure stops
	/// the run.
	Run {
		/// The version to apply, e.g. `1.2.3`.
		version: String,

		/// Output format for the list of written files.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite the generated lines after every `%%release-boss: ... %%`
	/// marker in the given files.
	Markers {
		/// The version to apply, e.g. `1.2.3`.
		version: String,

		/// Files containing markers, relative to the project root.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		/// Output format for the list of written files.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Render whole template files into new files.
	///
	/// `config.tpl.yaml` is rendered to `config.yaml`. Files without `.tpl`
	/// in their path are rendered to `name.new.ext`.
	Render {
		/// The version to apply, e.g. `1.2.3`.
		version: String,

		/// Template files, relative to the project root.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		/// Output format for the list of written files.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Replace the first line containing a search string with a rendered
	/// line.
	Replace {
		/// The version to apply, e.g. `1.2.3`.
		version: String,

		/// File to update, relative to the project root.
		#[arg(long)]
		file: PathBuf,

		/// Text to search for. The first line containing it is replaced.
		#[arg(long)]
		find: String,

		/// Replacement line. May contain `{{version}}`, `{{major}}`,
		/// `{{minor}}` and `{{patch}}`.
		#[arg(long)]
		replace: String,

		/// Output format for the list of written files.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the markers found in the given files without writing anything.
	///
	/// Exits with a non-zero status code when a marker is never closed.
	Scan {
		/// Files to scan, relative to the project root.
		#[arg(required = true)]
		files: Vec<PathBuf>,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
