use std::fs;
use std::io::Write;
use std::path::Path;

use pbx_shared::{
    RawBreakpointList, RawScheme, RawSharedDataParser, SharedData, SharedDataParser,
    SHARED_DATA_DIR,
};
use pbx_store::DecodeReport;
use tracing::{debug, info, warn};

use crate::config::ProjectConfig;
use crate::error::{ProjectError, ProjectResult};
use crate::pbxproj::PbxProj;

/// File name of the object graph inside a project bundle.
pub const PBXPROJ_FILE: &str = "project.pbxproj";

/// A `.xcodeproj` bundle: the project file plus optional shared data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XcodeProj<S = RawScheme, B = RawBreakpointList> {
    pub pbxproj: PbxProj,
    /// `None` when the bundle has no `xcshareddata` directory.
    pub shared_data: Option<SharedData<S, B>>,
}

impl XcodeProj {
    /// Open a bundle with the default configuration, keeping shared-data
    /// files verbatim.
    pub fn open(dir: &Path) -> ProjectResult<Self> {
        Self::open_with(dir, &ProjectConfig::default(), &RawSharedDataParser).map(|(p, _)| p)
    }
}

impl<S, B> XcodeProj<S, B> {
    pub fn new(pbxproj: PbxProj) -> Self {
        Self {
            pbxproj,
            shared_data: None,
        }
    }

    /// Open a bundle directory.
    ///
    /// The store's generator follows `config.identifier_seed`, and its
    /// project name is the bundle's file stem. Under the strict policy an
    /// object kind outside [`Object::KNOWN_ISAS`](pbx_store::Object::KNOWN_ISAS)
    /// fails the load; the lenient policy keeps it opaque.
    pub fn open_with<P>(
        dir: &Path,
        config: &ProjectConfig,
        parser: &P,
    ) -> ProjectResult<(Self, DecodeReport)>
    where
        P: SharedDataParser<Scheme = S, Breakpoints = B>,
    {
        if !dir.is_dir() {
            return Err(ProjectError::NotFound {
                path: dir.to_path_buf(),
            });
        }
        let path = dir.join(PBXPROJ_FILE);
        if !path.is_file() {
            return Err(ProjectError::NotFound { path });
        }

        let text = fs::read_to_string(&path).map_err(|e| ProjectError::io(&path, e))?;
        let (mut pbxproj, report) = PbxProj::parse_with_policy(&text, config.decode_policy)?;
        pbxproj.store.set_generator(config.generator());
        if let Some(stem) = dir.file_stem() {
            pbxproj.store.set_project_name(stem.to_string_lossy());
        }
        if !report.skipped.is_empty() {
            warn!(
                path = %path.display(),
                skipped = report.skipped.len(),
                "project loaded with undecodable objects dropped"
            );
        }

        let shared_dir = dir.join(SHARED_DATA_DIR);
        let shared_data = if shared_dir.is_dir() {
            Some(SharedData::load(&shared_dir, parser)?)
        } else {
            debug!(dir = %dir.display(), "no shared data");
            None
        };

        info!(
            path = %dir.display(),
            objects = pbxproj.store.len(),
            schemes = shared_data.as_ref().map_or(0, |s| s.schemes.len()),
            "opened project"
        );
        Ok((
            Self {
                pbxproj,
                shared_data,
            },
            report,
        ))
    }

    /// Write `project.pbxproj` into `dir`, creating the directory if needed.
    ///
    /// Shared data is not written.
    pub fn write(&self, dir: &Path, config: &ProjectConfig) -> ProjectResult<()> {
        fs::create_dir_all(dir).map_err(|e| ProjectError::io(dir, e))?;
        let path = dir.join(PBXPROJ_FILE);
        let text = self.pbxproj.to_string();

        if config.atomic_writes {
            let mut tmp =
                tempfile::NamedTempFile::new_in(dir).map_err(|e| ProjectError::io(dir, e))?;
            tmp.write_all(text.as_bytes())
                .and_then(|()| tmp.as_file().sync_all())
                .map_err(|e| ProjectError::io(tmp.path(), e))?;
            tmp.persist(&path)
                .map_err(|e| ProjectError::io(&path, e.error))?;
        } else {
            fs::write(&path, &text).map_err(|e| ProjectError::io(&path, e))?;
        }

        info!(
            path = %path.display(),
            bytes = text.len(),
            atomic = config.atomic_writes,
            "wrote project file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SAMPLE;
    use pbx_shared::BREAKPOINTS_PATH;
    use pbx_store::{BuildFile, BuildPhase, FileReference, Identifier, Object};

    fn bundle(root: &Path) -> std::path::PathBuf {
        let dir = root.join("Demo.xcodeproj");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PBXPROJ_FILE), SAMPLE).unwrap();
        dir
    }

    // -----------------------------------------------------------------------
    // Open
    // -----------------------------------------------------------------------

    #[test]
    fn open_reads_pbxproj() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = bundle(tmp.path());
        let project = XcodeProj::open(&dir).unwrap();
        assert_eq!(project.pbxproj.store.len(), 6);
        assert_eq!(project.pbxproj.store.project_name(), Some("Demo"));
        assert!(project.shared_data.is_none());
    }

    #[test]
    fn open_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = XcodeProj::open(&tmp.path().join("Nope.xcodeproj")).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn open_missing_pbxproj() {
        let tmp = tempfile::tempdir().unwrap();
        let err = XcodeProj::open(tmp.path()).unwrap_err();
        match err {
            ProjectError::NotFound { path } => assert!(path.ends_with(PBXPROJ_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn open_with_shared_data() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = bundle(tmp.path());
        let shared = dir.join(SHARED_DATA_DIR);
        fs::create_dir_all(shared.join("xcschemes")).unwrap();
        fs::write(shared.join("xcschemes/Demo.xcscheme"), "<Scheme/>").unwrap();
        fs::create_dir_all(shared.join("xcdebugger")).unwrap();
        fs::write(shared.join(BREAKPOINTS_PATH), "<Bucket/>").unwrap();

        let project = XcodeProj::open(&dir).unwrap();
        let shared = project.shared_data.unwrap();
        assert_eq!(shared.schemes.len(), 1);
        assert_eq!(shared.schemes[0].name, "Demo");
        assert!(shared.breakpoints.is_some());
    }

    // -----------------------------------------------------------------------
    // Write
    // -----------------------------------------------------------------------

    #[test]
    fn write_then_open_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let project = XcodeProj::open(&bundle(tmp.path())).unwrap();

        for atomic in [true, false] {
            let out = tmp.path().join(format!("Out{atomic}.xcodeproj"));
            let config = ProjectConfig {
                atomic_writes: atomic,
                ..ProjectConfig::default()
            };
            project.write(&out, &config).unwrap();
            assert_eq!(fs::read_to_string(out.join(PBXPROJ_FILE)).unwrap(), SAMPLE);
            let reopened = XcodeProj::open(&out).unwrap();
            assert_eq!(reopened.pbxproj, project.pbxproj);
        }
    }

    #[test]
    fn seeded_edits_are_reproducible() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = bundle(tmp.path());
        let config = ProjectConfig {
            identifier_seed: Some(99),
            ..ProjectConfig::default()
        };

        let edit = || {
            let (mut project, _) = XcodeProj::open_with(&dir, &config, &RawSharedDataParser).unwrap();
            let store = &mut project.pbxproj.store;
            let file = store.insert(FileReference::with_path("util.swift"));
            let build_file = store.insert(BuildFile::new(file));
            let phase = Identifier::new("P1");
            if let Some(Object::BuildPhase(phase)) = store.get_mut(&phase) {
                phase.fields_mut().files.push(build_file);
            }
            project.pbxproj.to_string()
        };

        let first = edit();
        assert_eq!(first, edit());
        assert!(first.contains("/* util.swift in Sources */,"));
        let reparsed = PbxProj::parse(&first).unwrap();
        let phase = reparsed
            .store
            .get(&Identifier::new("P1"))
            .and_then(Object::as_build_phase)
            .map(BuildPhase::files)
            .unwrap();
        assert_eq!(phase.len(), 2);
    }
}
