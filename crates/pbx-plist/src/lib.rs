//! Legacy ASCII property lists, as used by `project.pbxproj`.
//!
//! The grammar is small: dictionaries `{ key = value; }`, arrays
//! `( a, b, )`, and strings, either bare (`main.swift`) or quoted
//! (`"<group>"`). Comments (`/* ... */` and `// ...`) may appear anywhere
//! whitespace may; the IDE uses them to annotate identifier references with
//! human-readable names.
//!
//! # Key Types
//!
//! - [`PlistValue`] -- string / array / dictionary / commented string
//! - [`CommentedString`] -- a scalar paired with an optional annotation
//! - [`PlistKey`] -- a dictionary key; its comment is ignored for lookup
//! - [`PlistDict`] -- key-ordered mapping used for every dictionary
//!
//! # Reading and Writing
//!
//! - [`parse`] turns text into a [`PlistValue`]. Comments are discarded:
//!   they are derived data and are recomputed on write.
//! - [`write_document`] renders a root dictionary in the exact layout the
//!   IDE writes (tab indentation, `isa` first, per-`isa` object sections,
//!   single-line build files and file references), so that a load/save
//!   cycle produces no diff.

pub mod error;
pub mod parser;
pub mod value;
pub mod writer;

pub use error::{PlistError, PlistResult};
pub use parser::parse;
pub use value::{CommentedString, PlistDict, PlistKey, PlistValue};
pub use writer::{write_document, write_value, HEADER_LINE};
