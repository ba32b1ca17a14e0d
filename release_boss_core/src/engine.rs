use std::path::Path;
use std::path::PathBuf;

use crate::Marker;
use crate::ScanDiagnostic;
use crate::Version;
use crate::scanner::MARKER_START;
use crate::scanner::scan_markers;

/// Infix removed from template file names to produce the output name.
pub const TEMPLATE_INFIX: &str = ".tpl";
/// Infix inserted before the extension when the template has no `.tpl`.
pub const NEW_FILE_INFIX: &str = ".new";

/// Result of rewriting every marker in a file.
#[derive(Debug)]
pub struct MarkerRewrite {
	/// The rewritten file content.
	pub content: String,
	/// Markers found in the original content, in line order.
	pub markers: Vec<Marker>,
	/// Malformed markers that were left untouched.
	pub diagnostics: Vec<ScanDiagnostic>,
	/// Number of previously generated lines that were discarded.
	pub discarded_lines: usize,
}

/// Count how many of the `following` lines are stale generated content that
/// should be replaced by `rendered_len` freshly rendered lines.
///
/// The count stops at the first line containing a marker start token and
/// never exceeds `rendered_len`. The old generated region is assumed to have
/// the same number of lines as the new one; when a render changes its line
/// count between runs, stale lines may survive or unrelated lines may be
/// consumed.
pub fn plan_replacement(rendered_len: usize, following: &[&str]) -> usize {
	following
		.iter()
		.take(rendered_len)
		.take_while(|line| !line.contains(MARKER_START))
		.count()
}

/// Render every marker in `content` and replace the generated region after
/// each one.
///
/// Lines are split on `\n` and joined back with `\n`, so a trailing newline
/// and any `\r` characters are preserved. Content without markers is
/// returned unchanged.
pub fn rewrite_markers(content: &str, version: &Version) -> MarkerRewrite {
	let lines: Vec<&str> = content.split('\n').collect();
	let (markers, diagnostics) = scan_markers(&lines);

	let mut output: Vec<String> = Vec::with_capacity(lines.len());
	let mut cursor = 0;
	let mut discarded_lines = 0;

	for marker in &markers {
		output.extend(lines[cursor..=marker.end_line].iter().map(|line| line.to_string()));

		let rendered = version.render(&marker.template);
		let rendered_lines: Vec<&str> = rendered.split('\n').collect();
		let skip = plan_replacement(rendered_lines.len(), &lines[marker.end_line + 1..]);

		output.extend(rendered_lines.iter().map(|line| line.to_string()));
		cursor = marker.end_line + 1 + skip;
		discarded_lines += skip;
	}

	output.extend(lines[cursor..].iter().map(|line| line.to_string()));

	MarkerRewrite {
		content: output.join("\n"),
		markers,
		diagnostics,
		discarded_lines,
	}
}

/// Replace the first line of `content` containing `find` with `replacement`.
///
/// Returns the 0-indexed line that matched and the new content, or `None`
/// when no line contains `find`. Later matching lines are left untouched.
pub fn replace_first_matching_line(
	content: &str,
	find: &str,
	replacement: &str,
) -> Option<(usize, String)> {
	let mut lines: Vec<&str> = content.split('\n').collect();
	let index = lines.iter().position(|line| line.contains(find))?;
	lines[index] = replacement;

	Some((index, lines.join("\n")))
}

/// Derive the output path for a template file.
///
/// - `config.tpl.yaml` → `config.yaml` (every `.tpl` in the path is removed)
/// - `config.yaml` → `config.new.yaml`
/// - `Makefile` → `Makefile.new`
pub fn template_output_path(path: &Path) -> PathBuf {
	let display = path.to_string_lossy();
	if display.contains(TEMPLATE_INFIX) {
		return PathBuf::from(display.replace(TEMPLATE_INFIX, ""));
	}

	let stem = path
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.unwrap_or_default();
	let file_name = match path.extension() {
		Some(extension) => format!("{stem}{NEW_FILE_INFIX}.{}", extension.to_string_lossy()),
		None => format!("{stem}{NEW_FILE_INFIX}"),
	};

	match path.parent() {
		Some(parent) => parent.join(file_name),
		None => PathBuf::from(file_name),
	}
}
