use std::fmt;

/// Replaced with the full version string.
pub const VERSION_PLACEHOLDER: &str = "{{version}}";
/// Replaced with the first dot-separated component.
pub const MAJOR_PLACEHOLDER: &str = "{{major}}";
/// Replaced with the second dot-separated component.
pub const MINOR_PLACEHOLDER: &str = "{{minor}}";
/// Replaced with the third dot-separated component.
pub const PATCH_PLACEHOLDER: &str = "{{patch}}";

/// A release version split into its `major.minor.patch` components.
///
/// The components are taken verbatim from splitting the raw string on `.`.
/// Nothing is validated: `"v1.x.3-beta"` yields `"v1"`, `"x"` and `"3-beta"`.
/// Components beyond the third are ignored and missing components are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
	raw: String,
	major: Option<String>,
	minor: Option<String>,
	patch: Option<String>,
}

impl Version {
	pub fn parse(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let mut parts = raw.split('.').map(str::to_string);
		let major = parts.next();
		let minor = parts.next();
		let patch = parts.next();

		Self {
			raw,
			major,
			minor,
			patch,
		}
	}

	/// The version exactly as it was provided.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	pub fn major(&self) -> Option<&str> {
		self.major.as_deref()
	}

	pub fn minor(&self) -> Option<&str> {
		self.minor.as_deref()
	}

	pub fn patch(&self) -> Option<&str> {
		self.patch.as_deref()
	}

	/// Returns true when all three components are present.
	pub fn is_complete(&self) -> bool {
		self.patch.is_some()
	}

	/// Render `template` against this version. See [`render_template`].
	pub fn render(&self, template: &str) -> String {
		render_template(template, self)
	}

	fn substitutions(&self) -> [(&'static str, Option<&str>); 4] {
		[
			(VERSION_PLACEHOLDER, Some(self.raw.as_str())),
			(MAJOR_PLACEHOLDER, self.major()),
			(MINOR_PLACEHOLDER, self.minor()),
			(PATCH_PLACEHOLDER, self.patch()),
		]
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

/// Substitute the `{{version}}`, `{{major}}`, `{{minor}}` and `{{patch}}`
/// placeholders in `template`.
///
/// The template is walked once from left to right, so text produced by one
/// substitution is never scanned for further placeholders. Placeholders are
/// matched literally: `{{ version }}` is not a placeholder. A placeholder whose
/// component is missing from the version is left in place, as is any other
/// `{{...}}` sequence.
pub fn render_template(template: &str, version: &Version) -> String {
	if !template.contains("{{") {
		return template.to_string();
	}

	let substitutions = version.substitutions();
	let mut output = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(index) = rest.find("{{") {
		output.push_str(&rest[..index]);
		let candidate = &rest[index..];

		let matched = substitutions
			.iter()
			.find(|&&(token, _)| candidate.starts_with(token));

		match matched {
			Some(&(token, value)) => {
				output.push_str(value.unwrap_or(token));
				rest = &candidate[token.len()..];
			}
			None => {
				// Advance a single brace so `{{{version}}}` still matches at the
				// next offset.
				output.push('{');
				rest = &candidate[1..];
			}
		}
	}

	output.push_str(rest);
	output
}
