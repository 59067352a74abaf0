//! The `xcshareddata` directory of a project bundle.
//!
//! Holds zero or more schemes under `xcschemes/` and at most one breakpoint
//! list under `xcdebugger/`. Both are XML formats this crate does not
//! interpret: a [`SharedDataParser`] turns each file into a typed value and
//! [`SharedData`] collects the results.
//!
//! [`RawSharedDataParser`] keeps file contents verbatim.

pub mod error;
pub mod parser;
pub mod shared;

pub use error::{SharedDataError, SharedDataResult};
pub use parser::{RawBreakpointList, RawScheme, RawSharedDataParser, SharedDataParser};
pub use shared::{SharedData, BREAKPOINTS_PATH, SCHEMES_DIR, SHARED_DATA_DIR};
