use std::fmt;

use pbx_plist::{write_document, PlistDict, PlistKey, PlistValue};
use pbx_store::{
    coerce::int_text, DecodePolicy, DecodeReport, Decoder, Encoder, ObjectStore, ProjectObject,
};
use pbx_types::Identifier;
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};

/// Archive version written by every IDE release so far.
pub const DEFAULT_ARCHIVE_VERSION: u32 = 1;
/// Object version for newly created projects.
pub const DEFAULT_OBJECT_VERSION: u32 = 56;

/// The contents of a `project.pbxproj` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbxProj {
    pub archive_version: u32,
    pub object_version: u32,
    /// Always empty in practice; kept as read.
    pub classes: PlistDict,
    /// The `PBXProject` object.
    pub root_object: Identifier,
    pub store: ObjectStore,
}

impl PbxProj {
    /// A project file around an existing store.
    pub fn new(store: ObjectStore, root_object: Identifier) -> Self {
        Self {
            archive_version: DEFAULT_ARCHIVE_VERSION,
            object_version: DEFAULT_OBJECT_VERSION,
            classes: PlistDict::new(),
            root_object,
            store,
        }
    }

    /// Parse with the strict decode policy.
    ///
    /// The project name used in the root configuration-list comment is
    /// recovered from that comment; see [`PbxProj::parse_named`] to set it
    /// explicitly.
    pub fn parse(text: &str) -> ProjectResult<Self> {
        Self::parse_with_policy(text, DecodePolicy::Strict).map(|(project, _)| project)
    }

    /// Parse with an explicit decode policy.
    pub fn parse_with_policy(
        text: &str,
        policy: DecodePolicy,
    ) -> ProjectResult<(Self, DecodeReport)> {
        let root = pbx_plist::parse(text)?
            .into_dict()
            .ok_or(pbx_plist::PlistError::RootNotDictionary)?;

        let archive_version = root_uint(&root, "archiveVersion")?.unwrap_or(DEFAULT_ARCHIVE_VERSION);
        let object_version = root_uint(&root, "objectVersion")?.unwrap_or(DEFAULT_OBJECT_VERSION);
        let classes = match root.get("classes") {
            None => PlistDict::new(),
            Some(value) => value.as_dict().cloned().ok_or(ProjectError::InvalidRootField {
                field: "classes",
                expected: "a dictionary",
            })?,
        };
        let root_object = root
            .get("rootObject")
            .ok_or(ProjectError::MissingRootField("rootObject"))?
            .as_str()
            .map(Identifier::new)
            .ok_or(ProjectError::InvalidRootField {
                field: "rootObject",
                expected: "an identifier",
            })?;
        let objects = root
            .get("objects")
            .ok_or(ProjectError::MissingRootField("objects"))?
            .as_dict()
            .ok_or(ProjectError::InvalidRootField {
                field: "objects",
                expected: "a dictionary",
            })?;

        let (mut store, report) = Decoder::new(policy).decode_with_report(objects)?;
        if let Some(name) = recorded_project_name(text) {
            store.set_project_name(name);
        }
        debug!(
            objects = store.len(),
            object_version,
            root = %root_object,
            "parsed project file"
        );
        Ok((
            Self {
                archive_version,
                object_version,
                classes,
                root_object,
                store,
            },
            report,
        ))
    }

    /// Parse with an explicit decode policy and project name, which wins over
    /// any name recorded in the text.
    pub fn parse_named(
        text: &str,
        policy: DecodePolicy,
        project_name: &str,
    ) -> ProjectResult<(Self, DecodeReport)> {
        let (mut project, report) = Self::parse_with_policy(text, policy)?;
        project.store.set_project_name(project_name);
        Ok((project, report))
    }

    /// The root `PBXProject`, if the root identifier resolves to one.
    pub fn project(&self) -> Option<&ProjectObject> {
        self.store.get(&self.root_object)?.as_project()
    }

    /// The full root dictionary, with comments.
    pub fn to_plist(&self) -> PlistDict {
        let mut root = PlistDict::new();
        root.insert(
            PlistKey::new("archiveVersion"),
            PlistValue::from(self.archive_version.to_string()),
        );
        root.insert(PlistKey::new("classes"), PlistValue::Dict(self.classes.clone()));
        root.insert(
            PlistKey::new("objectVersion"),
            PlistValue::from(self.object_version.to_string()),
        );
        root.insert(
            PlistKey::new("objects"),
            PlistValue::Dict(Encoder::new(&self.store).encode()),
        );
        root.insert(
            PlistKey::new("rootObject"),
            PlistValue::commented(
                self.root_object.as_str(),
                self.store.display_name(&self.root_object),
            ),
        );
        root
    }
}

/// Renders the file text, header line included.
impl fmt::Display for PbxProj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_document(&self.to_plist()))
    }
}

/// The name inside `Build configuration list for PBXProject "<name>"`.
///
/// The file has no field for the project name; the IDE takes it from the
/// bundle directory and only writes it into this comment.
fn recorded_project_name(text: &str) -> Option<&str> {
    const MARKER: &str = "Build configuration list for PBXProject \"";
    let start = text.find(MARKER)? + MARKER.len();
    let len = text[start..].find("\" */")?;
    Some(&text[start..start + len])
}

fn root_uint(root: &PlistDict, field: &'static str) -> ProjectResult<Option<u32>> {
    match root.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .and_then(int_text)
            .map(Some)
            .ok_or(ProjectError::InvalidRootField {
                field,
                expected: "an unsigned integer",
            }),
    }
}
