use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plist error: {0}")]
    Plist(#[from] pbx_plist::PlistError),

    #[error("decode error: {0}")]
    Decode(#[from] pbx_store::DecodeError),

    #[error("shared data error: {0}")]
    SharedData(#[from] pbx_shared::SharedDataError),

    #[error("missing root field {0:?}")]
    MissingRootField(&'static str),

    #[error("root field {field:?} expected {expected}")]
    InvalidRootField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProjectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;
