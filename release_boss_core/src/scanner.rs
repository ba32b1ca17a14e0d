use serde::Serialize;

/// Token that opens a marker.
pub const MARKER_START: &str = "%%release-boss:";
/// Token that closes a marker.
pub const MARKER_END: &str = "%%";

/// A template marker found in a file.
///
/// ```text
/// // %%release-boss: pub const VERSION: &str = "{{version}}"; %%
/// pub const VERSION: &str = "1.2.3";
/// ```
///
/// The marker lines themselves are never rewritten. The lines that follow
/// `end_line` are the generated region which gets replaced by the rendered
/// template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
	/// 0-indexed line holding the start token.
	pub start_line: usize,
	/// 0-indexed line holding the end token. Equal to `start_line` for
	/// single-line markers.
	pub end_line: usize,
	/// Trimmed text between the tokens. Fragments of multi-line markers are
	/// trimmed individually and joined with `\n`.
	pub template: String,
}

impl Marker {
	pub fn is_multiline(&self) -> bool {
		self.end_line > self.start_line
	}
}

/// A problem found while scanning for markers. Diagnostics never stop the
/// scan; the affected region is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ScanDiagnostic {
	/// A start token with no end token before the end of the file.
	UnterminatedMarker {
		/// 0-indexed line of the start token.
		line: usize,
	},
}

impl ScanDiagnostic {
	/// 0-indexed line the diagnostic refers to.
	pub fn line(&self) -> usize {
		match self {
			Self::UnterminatedMarker { line } => *line,
		}
	}

	pub fn message(&self) -> String {
		match self {
			Self::UnterminatedMarker { line } => {
				format!(
					"no closing `{MARKER_END}` found for marker starting at line {}",
					line + 1
				)
			}
		}
	}
}

/// Scan `lines` for markers, returning them in line order together with any
/// diagnostics.
///
/// A line containing [`MARKER_START`] opens a marker. When [`MARKER_END`]
/// follows on the same line the marker is single-line. Otherwise every
/// following line is part of the template until the first line containing
/// [`MARKER_END`]; the text before that token is the last fragment. Scanning
/// resumes on the line after the marker ends, or on the line after the start
/// token when the marker is never closed.
pub fn scan_markers(lines: &[&str]) -> (Vec<Marker>, Vec<ScanDiagnostic>) {
	let mut markers = Vec::new();
	let mut diagnostics = Vec::new();
	let mut index = 0;

	while index < lines.len() {
		let line = lines[index];
		let Some(start) = line.find(MARKER_START) else {
			index += 1;
			continue;
		};

		let after_start = &line[start + MARKER_START.len()..];

		if let Some(end) = after_start.find(MARKER_END) {
			markers.push(Marker {
				start_line: index,
				end_line: index,
				template: after_start[..end].trim().to_string(),
			});
			index += 1;
			continue;
		}

		match find_multiline_end(lines, index, after_start) {
			Some((end_line, template)) => {
				markers.push(Marker {
					start_line: index,
					end_line,
					template,
				});
				index = end_line + 1;
			}
			None => {
				diagnostics.push(ScanDiagnostic::UnterminatedMarker { line: index });
				index += 1;
			}
		}
	}

	(markers, diagnostics)
}

fn find_multiline_end(lines: &[&str], start_line: usize, first: &str) -> Option<(usize, String)> {
	let mut fragments = vec![first.trim()];

	for (offset, line) in lines[start_line + 1..].iter().enumerate() {
		if let Some(end) = line.find(MARKER_END) {
			fragments.push(line[..end].trim());
			let template = fragments.join("\n").trim().to_string();
			return Some((start_line + 1 + offset, template));
		}

		fragments.push(line.trim());
	}

	None
}
