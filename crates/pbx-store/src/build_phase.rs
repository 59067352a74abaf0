//! The build-phase object family.
//!
//! A build phase is one step of a target's pipeline: compile sources, link
//! frameworks, copy resources, run a script. All phases share an ordered list
//! of build-file references and two execution flags; copy-files and
//! shell-script phases add their own fields.
//!
//! [`BuildPhase`] is a closed enum. Its `isa` comes from an exhaustive
//! `match`, so adding a variant without a discriminator does not compile.

use pbx_plist::{PlistDict, PlistValue};
use pbx_types::Identifier;

use crate::error::DecodeResult;
use crate::fields::{FieldReader, FieldWriter};

/// Which concrete phase a [`BuildPhase`] is. Fixed per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildPhaseKind {
    Sources,
    Frameworks,
    Resources,
    Headers,
    CopyFiles,
    ShellScript,
}

impl BuildPhaseKind {
    pub const ALL: [BuildPhaseKind; 6] = [
        Self::Sources,
        Self::Frameworks,
        Self::Resources,
        Self::Headers,
        Self::CopyFiles,
        Self::ShellScript,
    ];

    /// The discriminator written in the `isa` field.
    pub fn isa(self) -> &'static str {
        match self {
            Self::Sources => "PBXSourcesBuildPhase",
            Self::Frameworks => "PBXFrameworksBuildPhase",
            Self::Resources => "PBXResourcesBuildPhase",
            Self::Headers => "PBXHeadersBuildPhase",
            Self::CopyFiles => "PBXCopyFilesBuildPhase",
            Self::ShellScript => "PBXShellScriptBuildPhase",
        }
    }

    /// The name used in comments when the phase has no name of its own.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sources => "Sources",
            Self::Frameworks => "Frameworks",
            Self::Resources => "Resources",
            Self::Headers => "Headers",
            Self::CopyFiles => "CopyFiles",
            Self::ShellScript => "ShellScript",
        }
    }

    pub fn from_isa(isa: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.isa() == isa)
    }
}

impl std::fmt::Display for BuildPhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Fields every build phase carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPhaseFields {
    /// Action mask; [`BuildPhase::DEFAULT_BUILD_ACTION_MASK`] means "always".
    pub build_action_mask: u32,
    /// Build-file references in compile/link/copy order.
    pub files: Vec<Identifier>,
    pub run_only_for_deployment_postprocessing: bool,
    /// Fields of the phase that no typed field covers, kept verbatim.
    pub extra: PlistDict,
}

impl BuildPhaseFields {
    /// Fields with the given files and default flags.
    pub fn with_files(files: Vec<Identifier>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            build_action_mask: reader
                .uint_or("buildActionMask", BuildPhase::DEFAULT_BUILD_ACTION_MASK)?,
            files: reader.references("files")?,
            run_only_for_deployment_postprocessing: reader
                .int_bool_or_false("runOnlyForDeploymentPostprocessing")?,
            extra: PlistDict::new(),
        })
    }

    /// Encode the shared fields. `files` comments follow
    /// [`ObjectStore::build_file_comment`](crate::ObjectStore::build_file_comment).
    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.uint("buildActionMask", self.build_action_mask);
        let files = self
            .files
            .iter()
            .map(|file| PlistValue::commented(file.as_str(), writer.build_file_comment(file)))
            .collect();
        writer.value("files", PlistValue::Array(files));
        writer.int_bool(
            "runOnlyForDeploymentPostprocessing",
            self.run_only_for_deployment_postprocessing,
        );
    }
}

impl Default for BuildPhaseFields {
    fn default() -> Self {
        Self {
            build_action_mask: BuildPhase::DEFAULT_BUILD_ACTION_MASK,
            files: Vec::new(),
            run_only_for_deployment_postprocessing: false,
            extra: PlistDict::new(),
        }
    }
}

/// `PBXCopyFilesBuildPhase`: copies its files into a destination folder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyFilesBuildPhase {
    pub fields: BuildPhaseFields,
    pub name: Option<String>,
    pub dst_path: Option<String>,
    /// Destination folder code (e.g. 10 = Frameworks, 16 = Products).
    pub dst_subfolder_spec: Option<u32>,
}

/// `PBXShellScriptBuildPhase`: runs a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellScriptBuildPhase {
    pub fields: BuildPhaseFields,
    pub name: Option<String>,
    pub input_paths: Vec<String>,
    pub output_paths: Vec<String>,
    pub input_file_list_paths: Option<Vec<String>>,
    pub output_file_list_paths: Option<Vec<String>>,
    pub shell_path: String,
    pub shell_script: Option<String>,
    pub show_env_vars_in_log: Option<bool>,
}

impl ShellScriptBuildPhase {
    pub const DEFAULT_SHELL_PATH: &'static str = "/bin/sh";
}

impl Default for ShellScriptBuildPhase {
    fn default() -> Self {
        Self {
            fields: BuildPhaseFields::default(),
            name: None,
            input_paths: Vec::new(),
            output_paths: Vec::new(),
            input_file_list_paths: None,
            output_file_list_paths: None,
            shell_path: Self::DEFAULT_SHELL_PATH.to_string(),
            shell_script: None,
            show_env_vars_in_log: None,
        }
    }
}

/// A build phase of one of the known kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    Sources(BuildPhaseFields),
    Frameworks(BuildPhaseFields),
    Resources(BuildPhaseFields),
    Headers(BuildPhaseFields),
    CopyFiles(CopyFilesBuildPhase),
    ShellScript(ShellScriptBuildPhase),
}

impl BuildPhase {
    /// The "run always" action mask.
    pub const DEFAULT_BUILD_ACTION_MASK: u32 = 2_147_483_647;

    /// A sources phase with default flags.
    pub fn sources(files: Vec<Identifier>) -> Self {
        Self::Sources(BuildPhaseFields::with_files(files))
    }

    /// A frameworks (link) phase with default flags.
    pub fn frameworks(files: Vec<Identifier>) -> Self {
        Self::Frameworks(BuildPhaseFields::with_files(files))
    }

    /// A resources (copy bundle resources) phase with default flags.
    pub fn resources(files: Vec<Identifier>) -> Self {
        Self::Resources(BuildPhaseFields::with_files(files))
    }

    /// A headers phase with default flags.
    pub fn headers(files: Vec<Identifier>) -> Self {
        Self::Headers(BuildPhaseFields::with_files(files))
    }

    pub fn kind(&self) -> BuildPhaseKind {
        match self {
            Self::Sources(_) => BuildPhaseKind::Sources,
            Self::Frameworks(_) => BuildPhaseKind::Frameworks,
            Self::Resources(_) => BuildPhaseKind::Resources,
            Self::Headers(_) => BuildPhaseKind::Headers,
            Self::CopyFiles(_) => BuildPhaseKind::CopyFiles,
            Self::ShellScript(_) => BuildPhaseKind::ShellScript,
        }
    }

    pub fn isa(&self) -> &'static str {
        self.kind().isa()
    }

    /// Shared fields.
    pub fn fields(&self) -> &BuildPhaseFields {
        match self {
            Self::Sources(f) | Self::Frameworks(f) | Self::Resources(f) | Self::Headers(f) => f,
            Self::CopyFiles(phase) => &phase.fields,
            Self::ShellScript(phase) => &phase.fields,
        }
    }

    /// Shared fields, mutably. The kind cannot be changed through this.
    pub fn fields_mut(&mut self) -> &mut BuildPhaseFields {
        match self {
            Self::Sources(f) | Self::Frameworks(f) | Self::Resources(f) | Self::Headers(f) => f,
            Self::CopyFiles(phase) => &mut phase.fields,
            Self::ShellScript(phase) => &mut phase.fields,
        }
    }

    pub fn files(&self) -> &[Identifier] {
        &self.fields().files
    }

    pub fn build_action_mask(&self) -> u32 {
        self.fields().build_action_mask
    }

    pub fn run_only_for_deployment_postprocessing(&self) -> bool {
        self.fields().run_only_for_deployment_postprocessing
    }

    /// The phase's own name, for kinds that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::CopyFiles(phase) => phase.name.as_deref(),
            Self::ShellScript(phase) => phase.name.as_deref(),
            _ => None,
        }
    }

    /// Name shown in comments: the phase name if set, else the kind name.
    pub fn display_name(&self) -> String {
        self.name()
            .unwrap_or_else(|| self.kind().display_name())
            .to_string()
    }

    pub(crate) fn decode(kind: BuildPhaseKind, reader: &FieldReader<'_>) -> DecodeResult<Self> {
        let fields = BuildPhaseFields::decode(reader)?;
        let mut phase = match kind {
            BuildPhaseKind::Sources => Self::Sources(fields),
            BuildPhaseKind::Frameworks => Self::Frameworks(fields),
            BuildPhaseKind::Resources => Self::Resources(fields),
            BuildPhaseKind::Headers => Self::Headers(fields),
            BuildPhaseKind::CopyFiles => Self::CopyFiles(CopyFilesBuildPhase {
                fields,
                name: reader.string("name")?,
                dst_path: reader.string("dstPath")?,
                dst_subfolder_spec: reader.uint("dstSubfolderSpec")?,
            }),
            BuildPhaseKind::ShellScript => Self::ShellScript(ShellScriptBuildPhase {
                fields,
                name: reader.string("name")?,
                input_paths: reader.strings("inputPaths")?,
                output_paths: reader.strings("outputPaths")?,
                input_file_list_paths: reader.optional_strings("inputFileListPaths")?,
                output_file_list_paths: reader.optional_strings("outputFileListPaths")?,
                shell_path: reader
                    .string_or("shellPath", ShellScriptBuildPhase::DEFAULT_SHELL_PATH)?,
                shell_script: reader.string("shellScript")?,
                show_env_vars_in_log: reader.int_bool("showEnvVarsInLog")?,
            }),
        };
        phase.fields_mut().extra = reader.extra();
        Ok(phase)
    }

    pub(crate) fn encode(&self, writer: &mut FieldWriter<'_>) {
        self.fields().encode(writer);
        match self {
            Self::Sources(_) | Self::Frameworks(_) | Self::Resources(_) | Self::Headers(_) => {}
            Self::CopyFiles(phase) => {
                writer.optional_string("name", phase.name.as_deref());
                writer.optional_string("dstPath", phase.dst_path.as_deref());
                writer.optional_uint("dstSubfolderSpec", phase.dst_subfolder_spec);
            }
            Self::ShellScript(phase) => {
                writer.optional_string("name", phase.name.as_deref());
                writer.strings("inputPaths", &phase.input_paths);
                writer.strings("outputPaths", &phase.output_paths);
                writer.optional_strings("inputFileListPaths", phase.input_file_list_paths.as_deref());
                writer.optional_strings("outputFileListPaths", phase.output_file_list_paths.as_deref());
                writer.string("shellPath", &phase.shell_path);
                writer.optional_string("shellScript", phase.shell_script.as_deref());
                writer.optional_int_bool("showEnvVarsInLog", phase.show_env_vars_in_log);
            }
        }
        writer.extra(&self.fields().extra);
    }
}
