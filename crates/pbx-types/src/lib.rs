//! Foundation types for pbx.
//!
//! Every object in a project file is addressed by an [`Identifier`], and every
//! relationship between objects is an `Identifier` written where the other
//! object's key is expected. This crate owns that token type and the
//! generator that hands out fresh ones.
//!
//! # Key Types
//!
//! - [`Identifier`] -- Opaque object key (24 upper-case hex characters in files
//!   written by the IDE, but any non-empty token is accepted)
//! - [`IdentifierGenerator`] -- Random or seeded source of fresh identifiers

pub mod error;
pub mod identifier;

pub use error::TypeError;
pub use identifier::{Identifier, IdentifierGenerator, CANONICAL_LEN};
