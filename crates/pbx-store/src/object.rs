use pbx_plist::{PlistDict, PlistValue};
use pbx_types::Identifier;

use crate::build_phase::{BuildPhase, BuildPhaseKind};
use crate::error::{DecodeError, DecodeResult};
use crate::fields::{FieldReader, FieldWriter};

/// Name of the discriminator field.
pub const ISA_KEY: &str = "isa";

// ---------------------------------------------------------------------------
// PBXBuildFile
// ---------------------------------------------------------------------------

/// Membership of one file in one build phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildFile {
    pub file_ref: Option<Identifier>,
    /// Per-file settings such as `ATTRIBUTES` or `COMPILER_FLAGS`.
    pub settings: Option<PlistDict>,
    /// Fields with no typed counterpart (`platformFilter`, `productRef`).
    pub extra: PlistDict,
}

impl BuildFile {
    pub const ISA: &'static str = "PBXBuildFile";

    pub fn new(file_ref: Identifier) -> Self {
        Self {
            file_ref: Some(file_ref),
            ..Self::default()
        }
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            file_ref: reader.reference("fileRef")?,
            settings: reader.dict("settings")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.optional_reference("fileRef", self.file_ref.as_ref());
        writer.optional_dict("settings", self.settings.as_ref());
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// PBXFileReference
// ---------------------------------------------------------------------------

/// A file on disk, relative to `source_tree`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileReference {
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: Option<String>,
    pub last_known_file_type: Option<String>,
    pub explicit_file_type: Option<String>,
    pub file_encoding: Option<u32>,
    pub include_in_index: Option<bool>,
    pub extra: PlistDict,
}

impl FileReference {
    pub const ISA: &'static str = "PBXFileReference";

    /// A group-relative file reference.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            source_tree: Some("<group>".into()),
            ..Self::default()
        }
    }

    /// `name` if set, else `path`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            explicit_file_type: reader.string("explicitFileType")?,
            file_encoding: reader.uint("fileEncoding")?,
            include_in_index: reader.int_bool("includeInIndex")?,
            last_known_file_type: reader.string("lastKnownFileType")?,
            name: reader.string("name")?,
            path: reader.string("path")?,
            source_tree: reader.string("sourceTree")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.optional_string("explicitFileType", self.explicit_file_type.as_deref());
        writer.optional_uint("fileEncoding", self.file_encoding);
        writer.optional_int_bool("includeInIndex", self.include_in_index);
        writer.optional_string("lastKnownFileType", self.last_known_file_type.as_deref());
        writer.optional_string("name", self.name.as_deref());
        writer.optional_string("path", self.path.as_deref());
        writer.optional_string("sourceTree", self.source_tree.as_deref());
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// PBXGroup / PBXVariantGroup
// ---------------------------------------------------------------------------

/// Whether a group is a plain folder or a localized variant set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Group,
    VariantGroup,
}

impl GroupKind {
    pub fn isa(self) -> &'static str {
        match self {
            Self::Group => "PBXGroup",
            Self::VariantGroup => "PBXVariantGroup",
        }
    }
}

/// A node of the navigator tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    kind: GroupKind,
    pub children: Vec<Identifier>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: Option<String>,
    pub extra: PlistDict,
}

impl Group {
    pub fn new(kind: GroupKind, children: Vec<Identifier>) -> Self {
        Self {
            kind,
            children,
            name: None,
            path: None,
            source_tree: Some("<group>".into()),
            extra: PlistDict::new(),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn isa(&self) -> &'static str {
        self.kind.isa()
    }

    /// `name` if set, else `path`. The main group usually has neither.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }

    fn decode(kind: GroupKind, reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            kind,
            children: reader.references("children")?,
            name: reader.string("name")?,
            path: reader.string("path")?,
            source_tree: reader.string("sourceTree")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.references("children", &self.children);
        writer.optional_string("name", self.name.as_deref());
        writer.optional_string("path", self.path.as_deref());
        writer.optional_string("sourceTree", self.source_tree.as_deref());
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// PBXNativeTarget
// ---------------------------------------------------------------------------

/// A product built from sources by an ordered list of build phases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeTarget {
    pub name: String,
    pub build_configuration_list: Option<Identifier>,
    pub build_phases: Vec<Identifier>,
    pub build_rules: Vec<Identifier>,
    pub dependencies: Vec<Identifier>,
    pub product_name: Option<String>,
    pub product_reference: Option<Identifier>,
    pub product_type: Option<String>,
    /// Fields with no typed counterpart (`packageProductDependencies`).
    pub extra: PlistDict,
}

impl NativeTarget {
    pub const ISA: &'static str = "PBXNativeTarget";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            build_configuration_list: reader.reference("buildConfigurationList")?,
            build_phases: reader.references("buildPhases")?,
            build_rules: reader.references("buildRules")?,
            dependencies: reader.references("dependencies")?,
            name: reader.required_string("name")?,
            product_name: reader.string("productName")?,
            product_reference: reader.reference("productReference")?,
            product_type: reader.string("productType")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.optional_reference("buildConfigurationList", self.build_configuration_list.as_ref());
        writer.references("buildPhases", &self.build_phases);
        writer.references("buildRules", &self.build_rules);
        writer.references("dependencies", &self.dependencies);
        writer.string("name", &self.name);
        writer.optional_string("productName", self.product_name.as_deref());
        writer.optional_reference("productReference", self.product_reference.as_ref());
        writer.optional_string("productType", self.product_type.as_deref());
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// PBXProject
// ---------------------------------------------------------------------------

/// The root object of the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectObject {
    pub main_group: Identifier,
    pub build_configuration_list: Option<Identifier>,
    pub targets: Vec<Identifier>,
    pub attributes: Option<PlistDict>,
    pub compatibility_version: Option<String>,
    pub development_region: Option<String>,
    pub has_scanned_for_encodings: bool,
    pub known_regions: Option<Vec<String>>,
    pub product_ref_group: Option<Identifier>,
    pub project_dir_path: String,
    pub project_root: String,
    /// Fields with no typed counterpart (`packageReferences`).
    pub extra: PlistDict,
}

impl ProjectObject {
    pub const ISA: &'static str = "PBXProject";

    /// Display name of every project object.
    pub const DISPLAY_NAME: &'static str = "Project object";

    pub fn new(main_group: Identifier) -> Self {
        Self {
            main_group,
            build_configuration_list: None,
            targets: Vec::new(),
            attributes: None,
            compatibility_version: None,
            development_region: None,
            has_scanned_for_encodings: false,
            known_regions: None,
            product_ref_group: None,
            project_dir_path: String::new(),
            project_root: String::new(),
            extra: PlistDict::new(),
        }
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            attributes: reader.dict("attributes")?,
            build_configuration_list: reader.reference("buildConfigurationList")?,
            compatibility_version: reader.string("compatibilityVersion")?,
            development_region: reader.string("developmentRegion")?,
            has_scanned_for_encodings: reader.int_bool_or_false("hasScannedForEncodings")?,
            known_regions: reader.optional_strings("knownRegions")?,
            main_group: reader.required_reference("mainGroup")?,
            product_ref_group: reader.reference("productRefGroup")?,
            project_dir_path: reader.string_or("projectDirPath", "")?,
            project_root: reader.string_or("projectRoot", "")?,
            targets: reader.references("targets")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.optional_dict("attributes", self.attributes.as_ref());
        writer.optional_reference("buildConfigurationList", self.build_configuration_list.as_ref());
        writer.optional_string("compatibilityVersion", self.compatibility_version.as_deref());
        writer.optional_string("developmentRegion", self.development_region.as_deref());
        writer.int_bool("hasScannedForEncodings", self.has_scanned_for_encodings);
        writer.optional_strings("knownRegions", self.known_regions.as_deref());
        writer.reference("mainGroup", &self.main_group);
        writer.optional_reference("productRefGroup", self.product_ref_group.as_ref());
        writer.string("projectDirPath", &self.project_dir_path);
        writer.string("projectRoot", &self.project_root);
        writer.references("targets", &self.targets);
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// XCBuildConfiguration / XCConfigurationList
// ---------------------------------------------------------------------------

/// A named set of build settings ("Debug", "Release").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub name: String,
    /// Settings are kept uninterpreted.
    pub build_settings: PlistDict,
    pub base_configuration_reference: Option<Identifier>,
    pub extra: PlistDict,
}

impl BuildConfiguration {
    pub const ISA: &'static str = "XCBuildConfiguration";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            base_configuration_reference: reader.reference("baseConfigurationReference")?,
            build_settings: reader.dict("buildSettings")?.unwrap_or_default(),
            name: reader.required_string("name")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.optional_reference(
            "baseConfigurationReference",
            self.base_configuration_reference.as_ref(),
        );
        writer.dict("buildSettings", &self.build_settings);
        writer.string("name", &self.name);
        writer.extra(&self.extra);
    }
}

/// The configurations of one project or target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationList {
    pub build_configurations: Vec<Identifier>,
    pub default_configuration_is_visible: bool,
    pub default_configuration_name: Option<String>,
    pub extra: PlistDict,
}

impl ConfigurationList {
    pub const ISA: &'static str = "XCConfigurationList";

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            build_configurations: reader.references("buildConfigurations")?,
            default_configuration_is_visible: reader
                .int_bool_or_false("defaultConfigurationIsVisible")?,
            default_configuration_name: reader.string("defaultConfigurationName")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.references("buildConfigurations", &self.build_configurations);
        writer.int_bool(
            "defaultConfigurationIsVisible",
            self.default_configuration_is_visible,
        );
        writer.optional_string(
            "defaultConfigurationName",
            self.default_configuration_name.as_deref(),
        );
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// PBXTargetDependency / PBXContainerItemProxy
// ---------------------------------------------------------------------------

/// A target's dependency on another target, through a proxy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetDependency {
    pub name: Option<String>,
    /// The target depended on, when it lives in the same project.
    pub target: Option<Identifier>,
    pub target_proxy: Option<Identifier>,
    pub extra: PlistDict,
}

impl TargetDependency {
    pub const ISA: &'static str = "PBXTargetDependency";

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            name: reader.string("name")?,
            target: reader.reference("target")?,
            target_proxy: reader.reference("targetProxy")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.optional_string("name", self.name.as_deref());
        writer.optional_reference("target", self.target.as_ref());
        writer.optional_reference("targetProxy", self.target_proxy.as_ref());
        writer.extra(&self.extra);
    }
}

/// Points at an object of this or another project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerItemProxy {
    /// The project containing the remote object.
    pub container_portal: Identifier,
    /// 1 for a target, 2 for a product reference.
    pub proxy_type: Option<u32>,
    /// Identifier inside the portal's project, written without a comment.
    pub remote_global_id_string: Option<String>,
    pub remote_info: Option<String>,
    pub extra: PlistDict,
}

impl ContainerItemProxy {
    pub const ISA: &'static str = "PBXContainerItemProxy";

    pub fn new(container_portal: Identifier) -> Self {
        Self {
            container_portal,
            proxy_type: None,
            remote_global_id_string: None,
            remote_info: None,
            extra: PlistDict::new(),
        }
    }

    fn decode(reader: &FieldReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            container_portal: reader.required_reference("containerPortal")?,
            proxy_type: reader.uint("proxyType")?,
            remote_global_id_string: reader.string("remoteGlobalIDString")?,
            remote_info: reader.string("remoteInfo")?,
            extra: reader.extra(),
        })
    }

    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.reference("containerPortal", &self.container_portal);
        writer.optional_uint("proxyType", self.proxy_type);
        writer.optional_string("remoteGlobalIDString", self.remote_global_id_string.as_deref());
        writer.optional_string("remoteInfo", self.remote_info.as_deref());
        writer.extra(&self.extra);
    }
}

// ---------------------------------------------------------------------------
// Opaque
// ---------------------------------------------------------------------------

/// An object of a kind this crate does not model, kept verbatim.
///
/// Only produced by the lenient decode policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueObject {
    pub isa: String,
    /// All fields except `isa`.
    pub fields: PlistDict,
}

impl OpaqueObject {
    /// `name` if it is a string, else `path`.
    pub fn display_name(&self) -> Option<&str> {
        ["name", "path"]
            .into_iter()
            .find_map(|key| self.fields.get(key).and_then(PlistValue::as_str))
    }

    fn decode(isa: &str, fields: &PlistDict) -> Self {
        let mut fields = fields.clone();
        fields.remove(ISA_KEY);
        Self {
            isa: isa.to_string(),
            fields,
        }
    }

    /// Strings equal to a key of the store are annotated like references.
    fn encode(&self, writer: &mut FieldWriter<'_>) {
        writer.extra(&self.fields);
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// Any object of the graph.
///
/// The set of kinds is closed; [`Object::isa`] is an exhaustive `match`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    BuildFile(BuildFile),
    FileReference(FileReference),
    Group(Group),
    NativeTarget(NativeTarget),
    Project(ProjectObject),
    BuildConfiguration(BuildConfiguration),
    ConfigurationList(ConfigurationList),
    TargetDependency(TargetDependency),
    ContainerItemProxy(ContainerItemProxy),
    BuildPhase(BuildPhase),
    Opaque(OpaqueObject),
}

impl Object {
    /// Discriminators of every modelled kind.
    pub const KNOWN_ISAS: &'static [&'static str] = &[
        BuildFile::ISA,
        FileReference::ISA,
        "PBXGroup",
        "PBXVariantGroup",
        NativeTarget::ISA,
        ProjectObject::ISA,
        BuildConfiguration::ISA,
        ConfigurationList::ISA,
        TargetDependency::ISA,
        ContainerItemProxy::ISA,
        "PBXSourcesBuildPhase",
        "PBXFrameworksBuildPhase",
        "PBXResourcesBuildPhase",
        "PBXHeadersBuildPhase",
        "PBXCopyFilesBuildPhase",
        "PBXShellScriptBuildPhase",
    ];

    pub fn isa(&self) -> &str {
        match self {
            Self::BuildFile(_) => BuildFile::ISA,
            Self::FileReference(_) => FileReference::ISA,
            Self::Group(group) => group.isa(),
            Self::NativeTarget(_) => NativeTarget::ISA,
            Self::Project(_) => ProjectObject::ISA,
            Self::BuildConfiguration(_) => BuildConfiguration::ISA,
            Self::ConfigurationList(_) => ConfigurationList::ISA,
            Self::TargetDependency(_) => TargetDependency::ISA,
            Self::ContainerItemProxy(_) => ContainerItemProxy::ISA,
            Self::BuildPhase(phase) => phase.isa(),
            Self::Opaque(opaque) => &opaque.isa,
        }
    }

    /// Decode a raw dictionary whose `isa` names a modelled kind.
    pub fn decode(id: &Identifier, fields: &PlistDict) -> DecodeResult<Self> {
        let isa = Self::discriminator(id, fields)?;
        Self::decode_known(id, isa, fields)?.ok_or_else(|| DecodeError::UnknownIsa {
            id: id.clone(),
            isa: isa.to_string(),
        })
    }

    /// Like [`Object::decode`], but keeps unknown kinds as [`OpaqueObject`].
    pub fn decode_or_opaque(id: &Identifier, fields: &PlistDict) -> DecodeResult<Self> {
        let isa = Self::discriminator(id, fields)?;
        Ok(Self::decode_known(id, isa, fields)?
            .unwrap_or_else(|| Self::Opaque(OpaqueObject::decode(isa, fields))))
    }

    fn discriminator<'a>(id: &Identifier, fields: &'a PlistDict) -> DecodeResult<&'a str> {
        fields
            .get(ISA_KEY)
            .and_then(PlistValue::as_str)
            .ok_or_else(|| DecodeError::MissingIsa {
                id: id.clone(),
                key: ISA_KEY,
            })
    }

    fn decode_known(id: &Identifier, isa: &str, fields: &PlistDict) -> DecodeResult<Option<Self>> {
        let reader = FieldReader::new(id, fields);
        let object = match isa {
            BuildFile::ISA => Self::BuildFile(BuildFile::decode(&reader)?),
            FileReference::ISA => Self::FileReference(FileReference::decode(&reader)?),
            "PBXGroup" => Self::Group(Group::decode(GroupKind::Group, &reader)?),
            "PBXVariantGroup" => Self::Group(Group::decode(GroupKind::VariantGroup, &reader)?),
            NativeTarget::ISA => Self::NativeTarget(NativeTarget::decode(&reader)?),
            ProjectObject::ISA => Self::Project(ProjectObject::decode(&reader)?),
            BuildConfiguration::ISA => {
                Self::BuildConfiguration(BuildConfiguration::decode(&reader)?)
            }
            ConfigurationList::ISA => Self::ConfigurationList(ConfigurationList::decode(&reader)?),
            TargetDependency::ISA => Self::TargetDependency(TargetDependency::decode(&reader)?),
            ContainerItemProxy::ISA => {
                Self::ContainerItemProxy(ContainerItemProxy::decode(&reader)?)
            }
            other => match BuildPhaseKind::from_isa(other) {
                Some(kind) => Self::BuildPhase(BuildPhase::decode(kind, &reader)?),
                None => return Ok(None),
            },
        };
        Ok(Some(object))
    }

    /// Encode all fields except `isa`.
    pub(crate) fn encode_fields(&self, writer: &mut FieldWriter<'_>) {
        match self {
            Self::BuildFile(o) => o.encode(writer),
            Self::FileReference(o) => o.encode(writer),
            Self::Group(o) => o.encode(writer),
            Self::NativeTarget(o) => o.encode(writer),
            Self::Project(o) => o.encode(writer),
            Self::BuildConfiguration(o) => o.encode(writer),
            Self::ConfigurationList(o) => o.encode(writer),
            Self::TargetDependency(o) => o.encode(writer),
            Self::ContainerItemProxy(o) => o.encode(writer),
            Self::BuildPhase(o) => o.encode(writer),
            Self::Opaque(o) => o.encode(writer),
        }
    }

    /// Outgoing references as `(field, target)` pairs, in field order.
    ///
    /// Opaque objects and fields kept verbatim report none: without a schema
    /// their strings cannot be told apart from references.
    pub fn references(&self) -> Vec<(&'static str, &Identifier)> {
        fn one<'a>(
            out: &mut Vec<(&'static str, &'a Identifier)>,
            field: &'static str,
            target: Option<&'a Identifier>,
        ) {
            out.extend(target.map(|t| (field, t)));
        }
        fn many<'a>(
            out: &mut Vec<(&'static str, &'a Identifier)>,
            field: &'static str,
            targets: &'a [Identifier],
        ) {
            out.extend(targets.iter().map(|t| (field, t)));
        }

        let mut out = Vec::new();
        match self {
            Self::BuildFile(o) => one(&mut out, "fileRef", o.file_ref.as_ref()),
            Self::FileReference(_) | Self::Opaque(_) => {}
            Self::Group(o) => many(&mut out, "children", &o.children),
            Self::NativeTarget(o) => {
                one(&mut out, "buildConfigurationList", o.build_configuration_list.as_ref());
                many(&mut out, "buildPhases", &o.build_phases);
                many(&mut out, "buildRules", &o.build_rules);
                many(&mut out, "dependencies", &o.dependencies);
                one(&mut out, "productReference", o.product_reference.as_ref());
            }
            Self::Project(o) => {
                one(&mut out, "buildConfigurationList", o.build_configuration_list.as_ref());
                one(&mut out, "mainGroup", Some(&o.main_group));
                one(&mut out, "productRefGroup", o.product_ref_group.as_ref());
                many(&mut out, "targets", &o.targets);
            }
            Self::BuildConfiguration(o) => one(
                &mut out,
                "baseConfigurationReference",
                o.base_configuration_reference.as_ref(),
            ),
            Self::ConfigurationList(o) => {
                many(&mut out, "buildConfigurations", &o.build_configurations)
            }
            Self::TargetDependency(o) => {
                one(&mut out, "target", o.target.as_ref());
                one(&mut out, "targetProxy", o.target_proxy.as_ref());
            }
            Self::ContainerItemProxy(o) => one(&mut out, "containerPortal", Some(&o.container_portal)),
            Self::BuildPhase(o) => many(&mut out, "files", o.files()),
        }
        out
    }

    pub fn as_build_phase(&self) -> Option<&BuildPhase> {
        match self {
            Self::BuildPhase(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn as_build_phase_mut(&mut self) -> Option<&mut BuildPhase> {
        match self {
            Self::BuildPhase(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn as_build_file(&self) -> Option<&BuildFile> {
        match self {
            Self::BuildFile(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_file_reference(&self) -> Option<&FileReference> {
        match self {
            Self::FileReference(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_native_target(&self) -> Option<&NativeTarget> {
        match self {
            Self::NativeTarget(target) => Some(target),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectObject> {
        match self {
            Self::Project(project) => Some(project),
            _ => None,
        }
    }
}

impl From<BuildFile> for Object {
    fn from(value: BuildFile) -> Self {
        Self::BuildFile(value)
    }
}

impl From<FileReference> for Object {
    fn from(value: FileReference) -> Self {
        Self::FileReference(value)
    }
}

impl From<Group> for Object {
    fn from(value: Group) -> Self {
        Self::Group(value)
    }
}

impl From<NativeTarget> for Object {
    fn from(value: NativeTarget) -> Self {
        Self::NativeTarget(value)
    }
}

impl From<ProjectObject> for Object {
    fn from(value: ProjectObject) -> Self {
        Self::Project(value)
    }
}

impl From<BuildConfiguration> for Object {
    fn from(value: BuildConfiguration) -> Self {
        Self::BuildConfiguration(value)
    }
}

impl From<ConfigurationList> for Object {
    fn from(value: ConfigurationList) -> Self {
        Self::ConfigurationList(value)
    }
}

impl From<TargetDependency> for Object {
    fn from(value: TargetDependency) -> Self {
        Self::TargetDependency(value)
    }
}

impl From<ContainerItemProxy> for Object {
    fn from(value: ContainerItemProxy) -> Self {
        Self::ContainerItemProxy(value)
    }
}

impl From<BuildPhase> for Object {
    fn from(value: BuildPhase) -> Self {
        Self::BuildPhase(value)
    }
}

#[cfg(test)]
mod tests {
    use pbx_plist::PlistKey;

    use super::*;

    fn raw(entries: &[(&str, PlistValue)]) -> PlistDict {
        entries
            .iter()
            .map(|(k, v)| (PlistKey::new(*k), v.clone()))
            .collect()
    }

    #[test]
    fn dispatch_on_isa() {
        let id = Identifier::new("X");
        let object = Object::decode(
            &id,
            &raw(&[("isa", "PBXFileReference".into()), ("path", "main.swift".into())]),
        )
        .unwrap();
        assert_eq!(object.isa(), "PBXFileReference");
        assert_eq!(
            object.as_file_reference().and_then(FileReference::display_name),
            Some("main.swift")
        );
    }

    #[test]
    fn every_known_isa_decodes_from_minimal_fields() {
        let id = Identifier::new("X");
        for isa in Object::KNOWN_ISAS {
            let fields = raw(&[
                ("isa", (*isa).into()),
                ("name", "N".into()),
                ("mainGroup", "G".into()),
                ("containerPortal", "R".into()),
            ]);
            let object = Object::decode(&id, &fields)
                .unwrap_or_else(|e| panic!("{isa} failed to decode: {e}"));
            assert_eq!(object.isa(), *isa);
        }
    }

    #[test]
    fn unknown_isa_is_an_error() {
        let id = Identifier::new("X");
        let err = Object::decode(&id, &raw(&[("isa", "PBXLegacyTarget".into())])).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownIsa {
                id,
                isa: "PBXLegacyTarget".into()
            }
        );
    }

    #[test]
    fn unknown_isa_can_be_kept_opaque() {
        let id = Identifier::new("X");
        let fields = raw(&[("isa", "PBXLegacyTarget".into()), ("name", "Old".into())]);
        let object = Object::decode_or_opaque(&id, &fields).unwrap();
        let Object::Opaque(opaque) = &object else {
            panic!("expected an opaque object");
        };
        assert_eq!(object.isa(), "PBXLegacyTarget");
        assert_eq!(opaque.display_name(), Some("Old"));
        assert!(!opaque.fields.contains_key("isa"));
    }

    #[test]
    fn missing_isa() {
        let id = Identifier::new("X");
        let err = Object::decode(&id, &raw(&[("name", "x".into())])).unwrap_err();
        assert!(matches!(err, DecodeError::MissingIsa { key: "isa", .. }));
    }

    #[test]
    fn required_fields_are_enforced() {
        let id = Identifier::new("X");
        let err = Object::decode(&id, &raw(&[("isa", "PBXNativeTarget".into())])).unwrap_err();
        assert_eq!(err, DecodeError::MissingField { id: id.clone(), field: "name" });

        let err = Object::decode(&id, &raw(&[("isa", "PBXProject".into())])).unwrap_err();
        assert_eq!(err, DecodeError::MissingField { id, field: "mainGroup" });
    }

    #[test]
    fn variant_group_keeps_its_kind() {
        let id = Identifier::new("X");
        let object = Object::decode(&id, &raw(&[("isa", "PBXVariantGroup".into())])).unwrap();
        let Object::Group(group) = object else {
            panic!("expected a group");
        };
        assert_eq!(group.kind(), GroupKind::VariantGroup);
        assert_eq!(group.isa(), "PBXVariantGroup");
    }

    #[test]
    fn references_in_field_order() {
        let mut target = NativeTarget::new("App");
        target.build_configuration_list = Some(Identifier::new("L"));
        target.build_phases = vec![Identifier::new("P1"), Identifier::new("P2")];
        target.product_reference = Some(Identifier::new("R"));
        let object = Object::from(target);
        let refs: Vec<(&str, &str)> = object
            .references()
            .into_iter()
            .map(|(field, id)| (field, id.as_str()))
            .collect();
        assert_eq!(
            refs,
            [
                ("buildConfigurationList", "L"),
                ("buildPhases", "P1"),
                ("buildPhases", "P2"),
                ("productReference", "R"),
            ]
        );
    }

    #[test]
    fn target_dependency_kinds() {
        let id = Identifier::new("X");
        let proxy = Object::decode(
            &id,
            &raw(&[
                ("isa", "PBXContainerItemProxy".into()),
                ("containerPortal", "R".into()),
                ("proxyType", "1".into()),
                ("remoteGlobalIDString", "T".into()),
                ("remoteInfo", "App".into()),
            ]),
        )
        .unwrap();
        let Object::ContainerItemProxy(proxy) = proxy else {
            panic!("expected a container item proxy");
        };
        assert_eq!(proxy.proxy_type, Some(1));
        assert_eq!(proxy.remote_global_id_string.as_deref(), Some("T"));
        assert!(proxy.extra.is_empty());

        let dependency = Object::decode(
            &id,
            &raw(&[
                ("isa", "PBXTargetDependency".into()),
                ("target", "T".into()),
                ("targetProxy", "P".into()),
            ]),
        )
        .unwrap();
        let refs: Vec<&str> = dependency
            .references()
            .into_iter()
            .map(|(_, target)| target.as_str())
            .collect();
        assert_eq!(refs, ["T", "P"]);
    }

    #[test]
    fn unmodelled_fields_are_kept() {
        let id = Identifier::new("X");
        let object = Object::decode(
            &id,
            &raw(&[
                ("isa", "PBXBuildFile".into()),
                ("fileRef", "F".into()),
                ("platformFilter", "ios".into()),
            ]),
        )
        .unwrap();
        let file = object.as_build_file().unwrap();
        assert_eq!(file.file_ref, Some(Identifier::new("F")));
        assert_eq!(file.extra.get("platformFilter").and_then(PlistValue::as_str), Some("ios"));
        assert!(!file.extra.contains_key("isa"));
    }
}
