use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SharedDataError, SharedDataResult};

/// Turns shared-data files into typed values.
///
/// The scheme and breakpoint formats are XML documents owned by the IDE.
/// This crate only locates the files; an implementation of this trait
/// decides what they mean.
pub trait SharedDataParser {
    type Scheme;
    type Breakpoints;

    /// Parse one `.xcscheme` file.
    fn parse_scheme(&self, path: &Path) -> SharedDataResult<Self::Scheme>;

    /// Parse the breakpoint list.
    fn parse_breakpoints(&self, path: &Path) -> SharedDataResult<Self::Breakpoints>;
}

/// A scheme file, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScheme {
    /// File stem, e.g. `App` for `App.xcscheme`.
    pub name: String,
    pub path: PathBuf,
    pub contents: String,
}

/// A breakpoint list file, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBreakpointList {
    pub path: PathBuf,
    pub contents: String,
}

/// Parser that reads each file as UTF-8 text and keeps it verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSharedDataParser;

impl RawSharedDataParser {
    fn read(path: &Path) -> SharedDataResult<String> {
        let bytes = fs::read(path).map_err(|source| SharedDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|e| SharedDataError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl SharedDataParser for RawSharedDataParser {
    type Scheme = RawScheme;
    type Breakpoints = RawBreakpointList;

    fn parse_scheme(&self, path: &Path) -> SharedDataResult<RawScheme> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(RawScheme {
            name,
            path: path.to_path_buf(),
            contents: Self::read(path)?,
        })
    }

    fn parse_breakpoints(&self, path: &Path) -> SharedDataResult<RawBreakpointList> {
        Ok(RawBreakpointList {
            path: path.to_path_buf(),
            contents: Self::read(path)?,
        })
    }
}
