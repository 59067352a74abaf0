use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{SharedDataError, SharedDataResult};
use crate::parser::SharedDataParser;

/// Name of the shared-data directory inside a project bundle.
pub const SHARED_DATA_DIR: &str = "xcshareddata";
/// Subdirectory holding scheme files.
pub const SCHEMES_DIR: &str = "xcschemes";
/// Extension of scheme files.
pub const SCHEME_EXTENSION: &str = "xcscheme";
/// Breakpoint list location, relative to the shared-data directory.
pub const BREAKPOINTS_PATH: &str = "xcdebugger/Breakpoints_v2.xcbkptlist";

/// Schemes and breakpoints shared by every user of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedData<S, B> {
    /// Schemes in file-name order.
    pub schemes: Vec<S>,
    pub breakpoints: Option<B>,
}

impl<S, B> Default for SharedData<S, B> {
    fn default() -> Self {
        Self {
            schemes: Vec::new(),
            breakpoints: None,
        }
    }
}

impl<S, B> SharedData<S, B> {
    /// Load `dir` (an `xcshareddata` directory) with `parser`.
    ///
    /// A missing `dir` is an error. A scheme file that fails to parse is
    /// skipped; a breakpoint list that fails to parse is treated as absent.
    pub fn load<P>(dir: &Path, parser: &P) -> SharedDataResult<Self>
    where
        P: SharedDataParser<Scheme = S, Breakpoints = B>,
    {
        if !dir.is_dir() {
            return Err(SharedDataError::NotFound {
                path: dir.to_path_buf(),
            });
        }

        let schemes = scheme_paths(&dir.join(SCHEMES_DIR))?
            .into_iter()
            .filter_map(|path| match parser.parse_scheme(&path) {
                Ok(scheme) => Some(scheme),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable scheme");
                    None
                }
            })
            .collect::<Vec<_>>();

        let breakpoints_path = dir.join(BREAKPOINTS_PATH);
        let breakpoints = if breakpoints_path.is_file() {
            match parser.parse_breakpoints(&breakpoints_path) {
                Ok(breakpoints) => Some(breakpoints),
                Err(e) => {
                    warn!(path = %breakpoints_path.display(), error = %e, "ignoring unreadable breakpoint list");
                    None
                }
            }
        } else {
            None
        };

        debug!(
            dir = %dir.display(),
            schemes = schemes.len(),
            breakpoints = breakpoints.is_some(),
            "loaded shared data"
        );
        Ok(Self {
            schemes,
            breakpoints,
        })
    }
}

/// `*.xcscheme` files directly under `dir`, sorted by file name. A missing
/// directory has no schemes.
fn scheme_paths(dir: &Path) -> SharedDataResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| SharedDataError::Io {
            path: e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
            source: e.into(),
        })?;
        let is_scheme = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == SCHEME_EXTENSION);
        if entry.file_type().is_file() && is_scheme {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
