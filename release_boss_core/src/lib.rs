//! `release_boss_core` is the core library for the release-boss version
//! stamper. It rewrites version information inside text files as part of a
//! release pipeline.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Version file
//!   → ContentSource (release branch first, then the working copy)
//!   → Marker scanner (finds `%%release-boss: ... %%` markers)
//!   → Renderer (substitutes {{version}}, {{major}}, {{minor}}, {{patch}})
//!   → Replacement planner (sizes the stale generated region after each marker)
//!   → Write and verify
//! ```
//!
//! Two companion processors share the renderer:
//!
//! - Template files are rendered as a whole into `name.yaml` (from
//!   `name.tpl.yaml`) or `name.new.yaml`.
//! - Update files replace the first line containing a search string with a
//!   rendered line.
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `release-boss.toml`.
//! - [`source`] — Content sources: working copy, git references and fallback.
//!
//! ## Marker Syntax
//!
//! ```text
//! # %%release-boss: image: app:{{version}} %%
//! image: app:1.2.3
//! ```
//!
//! Everything between `%%release-boss:` and the next `%%` is the template.
//! It may span several lines. The marker is kept and the lines following it
//! are replaced by the rendered template.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use release_boss_core::ReleaseBossConfig;
//! use release_boss_core::ReleaseProcessor;
//! use release_boss_core::Version;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = ReleaseBossConfig::load_or_default(root).unwrap();
//! let processor = ReleaseProcessor::from_config(root, Version::parse("1.2.3"), &config);
//! let report = processor.process_config(&config).unwrap();
//! println!("updated {} file(s)", report.file_count());
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use processor::*;
pub use scanner::*;
pub use version::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod processor;
mod scanner;
pub mod source;
mod version;
