//! The typed object graph of a project file.
//!
//! A project file is a flat dictionary of objects keyed by [`Identifier`].
//! Objects refer to each other only by identifier; the [`ObjectStore`] owns
//! them all and resolves references on lookup.
//!
//! # Object Kinds
//!
//! - [`BuildPhase`] -- sources, frameworks, resources, headers, copy-files,
//!   shell-script
//! - [`BuildFile`] -- one file's membership in one phase
//! - [`FileReference`], [`Group`] -- the navigator tree
//! - [`NativeTarget`], [`ProjectObject`] -- products and the root object
//! - [`BuildConfiguration`], [`ConfigurationList`] -- build settings
//! - [`TargetDependency`], [`ContainerItemProxy`] -- links between targets
//! - [`OpaqueObject`] -- unmodelled kinds, kept verbatim
//!
//! Fields a kind does not model are kept in its `extra` dictionary and
//! written back unchanged.
//!
//! # Loading and Saving
//!
//! - [`Decoder`] dispatches each raw dictionary on its `isa` field.
//! - [`Encoder`] renders the store back, annotating every reference with a
//!   human-readable comment computed from the graph.
//!
//! # Design Rules
//!
//! 1. The set of kinds is closed; each variant fixes its own `isa`.
//! 2. Dangling references are tolerated; they lose their comment on encode.
//! 3. Name resolution is read-only and bounded in depth.
//! 4. Encoding is deterministic for a given store.

pub mod build_phase;
pub mod coerce;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fields;
pub mod object;
pub mod store;
pub mod validate;

pub use build_phase::{
    BuildPhase, BuildPhaseFields, BuildPhaseKind, CopyFilesBuildPhase, ShellScriptBuildPhase,
};
pub use decode::{DecodePolicy, DecodeReport, Decoder};
pub use encode::Encoder;
pub use error::{DecodeError, DecodeResult};
pub use object::{
    BuildConfiguration, BuildFile, ConfigurationList, ContainerItemProxy, FileReference, Group,
    GroupKind, NativeTarget, Object, OpaqueObject, ProjectObject, TargetDependency, ISA_KEY,
};
pub use pbx_types::Identifier;
pub use store::{ObjectStore, PhaseIndex, MAX_NAME_DEPTH};
pub use validate::DanglingReference;
