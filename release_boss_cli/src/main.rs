use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use release_boss_cli::Commands;
use release_boss_cli::OutputFormat;
use release_boss_cli::ReleaseBossCli;
use release_boss_core::FileUpdateSpec;
use release_boss_core::ReleaseBossConfig;
use release_boss_core::ReleaseProcessor;
use release_boss_core::ReleaseReport;
use release_boss_core::Version;
use release_boss_core::scan_markers;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ReleaseBossCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Run { version, format }) => run_release(&args, version, *format),
		Some(Commands::Markers {
			version,
			files,
			format,
		}) => run_markers(&args, version, files, *format),
		Some(Commands::Render {
			version,
			files,
			format,
		}) => run_render(&args, version, files, *format),
		Some(Commands::Replace {
			version,
			file,
			find,
			replace,
			format,
		}) => {
			let spec = FileUpdateSpec {
				file: file.clone(),
				find_line: find.clone(),
				replace_line: replace.clone(),
			};
			run_replace(&args, version, spec, *format)
		}
		Some(Commands::Scan { files }) => run_scan(&args, files),
		None => {
			eprintln!("No subcommand specified. Run `release-boss --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<release_boss_core::ReleaseBossError>() {
			Ok(release_err) => {
				let report: miette::Report = (*release_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if std::env::var_os("RUST_LOG").is_some() {
		EnvFilter::from_default_env()
	} else if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::new("warn")
	};

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init();
}

/// The project root as an absolute path, so written files can be reported
/// relative to it.
fn resolve_root(args: &ReleaseBossCli) -> PathBuf {
	let root = args
		.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
	std::path::absolute(&root).unwrap_or(root)
}

/// Load the config at the project root and apply command line overrides.
fn load_config(args: &ReleaseBossCli, root: &Path) -> Result<ReleaseBossConfig, Box<dyn std::error::Error>> {
	let mut config = ReleaseBossConfig::load_or_default(root)?;

	if let Some(branch) = &args.release_branch {
		config.release_branch.clone_from(branch);
	}
	if args.local_only {
		config.remote_lookup = false;
	}

	Ok(config)
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn run_init(args: &ReleaseBossCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = ReleaseBossConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("release-boss.toml");
	let sample_config = "# release-boss configuration\n\n# Branch checked for newer file \
	                     content before the working copy.\n# release_branch = \"release\"\n# \
	                     remote = \"origin\"\n\n# Files containing `%%release-boss: ... %%` \
	                     markers.\nversion_files = []\n\n# Files rendered as a whole. \
	                     `name.tpl.ext` becomes `name.ext`.\ntemplate_files = []\n\n# Replace \
	                     the first line containing `find_line`.\n# [[update_files]]\n# file = \
	                     \"Cargo.toml\"\n# find_line = \"version =\"\n# replace_line = \"version = \
	                     \\\"{{version}}\\\"\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Add a marker to a file:");
	println!("     // %%release-boss: pub const VERSION: &str = \"{{{{version}}}}\"; %%");
	println!("  2. List the file under `version_files`");
	println!("  3. Run `release-boss run 1.0.0`");

	Ok(())
}

fn run_release(
	args: &ReleaseBossCli,
	version: &str,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let processor = ReleaseProcessor::from_config(&root, Version::parse(version), &config);
	let report = processor.process_config(&config)?;

	print_report(&report, &root, format)
}

fn run_markers(
	args: &ReleaseBossCli,
	version: &str,
	files: &[PathBuf],
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let processor = ReleaseProcessor::from_config(&root, Version::parse(version), &config);
	let report = ReleaseReport {
		version: version.to_string(),
		version_files: processor.process_version_files(files)?,
		..ReleaseReport::default()
	};

	print_report(&report, &root, format)
}

fn run_render(
	args: &ReleaseBossCli,
	version: &str,
	files: &[PathBuf],
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let processor = ReleaseProcessor::from_config(&root, Version::parse(version), &config);
	let report = ReleaseReport {
		version: version.to_string(),
		template_files: processor.process_template_files(files)?,
		..ReleaseReport::default()
	};

	print_report(&report, &root, format)
}

fn run_replace(
	args: &ReleaseBossCli,
	version: &str,
	spec: FileUpdateSpec,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let processor = ReleaseProcessor::from_config(&root, Version::parse(version), &config);
	let report = ReleaseReport {
		version: version.to_string(),
		update_files: processor.process_update_files(&[spec])?,
		..ReleaseReport::default()
	};

	print_report(&report, &root, format)
}

fn print_report(
	report: &ReleaseReport,
	root: &Path,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	if let OutputFormat::Json = format {
		println!("{}", serde_json::to_string_pretty(report)?);
		return Ok(());
	}

	if report.file_count() == 0 {
		println!("No files were updated for version {}.", report.version);
		return Ok(());
	}

	let sections = [
		("Version files:", &report.version_files),
		("Generated files:", &report.template_files),
		("Updated files:", &report.update_files),
	];

	for (title, paths) in sections {
		if paths.is_empty() {
			continue;
		}

		println!("{}", colored!(title, bold));
		for path in paths {
			println!("  {}", make_relative(path, root));
		}
	}

	println!(
		"{} {} file(s) for version {}.",
		colored!("Updated", green),
		report.file_count(),
		report.version
	);

	Ok(())
}

fn run_scan(args: &ReleaseBossCli, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut diagnostic_count = 0;

	for file in files {
		let path = root.join(file);
		if !path.is_file() {
			println!(
				"{} {}: file not found",
				colored!("warning:", yellow),
				file.display()
			);
			continue;
		}

		let content = std::fs::read_to_string(&path)?;
		let lines: Vec<&str> = content.split('\n').collect();
		let (markers, diagnostics) = scan_markers(&lines);

		println!(
			"{} ({} marker(s))",
			colored!(file.display().to_string(), bold),
			markers.len()
		);

		for marker in &markers {
			let span = if marker.is_multiline() {
				format!("lines {}-{}", marker.start_line + 1, marker.end_line + 1)
			} else {
				format!("line {}", marker.start_line + 1)
			};
			println!("  {span}: {}", marker.template.replace('\n', "\\n"));
		}

		for diagnostic in &diagnostics {
			println!("  {} {}", colored!("warning:", yellow), diagnostic.message());
		}

		diagnostic_count += diagnostics.len();
	}

	if diagnostic_count > 0 {
		println!();
		println!(
			"{} malformed marker(s) found.",
			colored!(diagnostic_count.to_string(), red)
		);
		process::exit(1);
	}

	Ok(())
}
