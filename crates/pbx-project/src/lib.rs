//! Reading and writing `.xcodeproj` bundles.
//!
//! [`XcodeProj`] ties the layers together: it reads `project.pbxproj` with
//! the ASCII plist parser, decodes the `objects` dictionary into an
//! [`ObjectStore`](pbx_store::ObjectStore), loads `xcshareddata/` when
//! present, and writes the project back in the IDE's own layout.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pbx_project::{ProjectConfig, XcodeProj};
//! use pbx_store::{BuildFile, FileReference};
//!
//! let dir = Path::new("App.xcodeproj");
//! let mut project = XcodeProj::open(dir)?;
//! let store = &mut project.pbxproj.store;
//! let file = store.insert(FileReference::with_path("util.swift"));
//! store.insert(BuildFile::new(file));
//! project.write(dir, &ProjectConfig::default())?;
//! # Ok::<(), pbx_project::ProjectError>(())
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod pbxproj;
pub mod xcodeproj;

#[cfg(test)]
mod fixtures;

pub use config::ProjectConfig;
pub use diff::{diff_objects, diff_text, DiffHunk, DiffLine, ObjectDiff, TextDiff};
pub use error::{ProjectError, ProjectResult};
pub use pbxproj::{PbxProj, DEFAULT_ARCHIVE_VERSION, DEFAULT_OBJECT_VERSION};
pub use xcodeproj::{XcodeProj, PBXPROJ_FILE};
