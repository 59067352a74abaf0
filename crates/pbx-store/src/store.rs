use std::collections::{BTreeMap, HashMap};

use pbx_types::{Identifier, IdentifierGenerator};
use tracing::debug;

use crate::build_phase::BuildPhase;
use crate::object::{Object, ProjectObject};

/// Maximum number of reference hops followed while resolving a name.
///
/// Well-formed graphs need at most two (build file -> file reference). The
/// bound keeps cyclic graphs from looping.
pub const MAX_NAME_DEPTH: usize = 8;

/// Owner of every object of one project, keyed by [`Identifier`].
///
/// References between objects are plain identifiers. The store does not
/// check them on mutation; [`ObjectStore::dangling_references`] reports the
/// broken ones on demand.
///
/// Iteration is in ascending identifier order.
#[derive(Clone, Default)]
pub struct ObjectStore {
    objects: BTreeMap<Identifier, Object>,
    generator: IdentifierGenerator,
    project_name: Option<String>,
}

impl ObjectStore {
    /// Create an empty store with a random identifier generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose generated identifiers are reproducible.
    pub fn with_generator(generator: IdentifierGenerator) -> Self {
        Self {
            generator,
            ..Self::default()
        }
    }

    pub(crate) fn from_objects(objects: BTreeMap<Identifier, Object>) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    pub fn set_generator(&mut self, generator: IdentifierGenerator) {
        self.generator = generator;
    }

    /// Name used for the project in configuration-list comments, usually the
    /// `.xcodeproj` directory stem.
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = Some(name.into());
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    // -----------------------------------------------------------------------
    // Ownership
    // -----------------------------------------------------------------------

    /// Take ownership of `object` under a freshly generated identifier.
    ///
    /// The identifier never collides with a key already in the store.
    pub fn insert(&mut self, object: impl Into<Object>) -> Identifier {
        let object = object.into();
        let mut id = self.generator.next_id();
        while self.objects.contains_key(&id) {
            debug!(id = %id, "generated identifier collides, retrying");
            id = self.generator.next_id();
        }
        debug!(id = %id, isa = object.isa(), "object inserted");
        self.objects.insert(id.clone(), object);
        id
    }

    /// Store `object` under a caller-chosen identifier, returning the object
    /// it replaced.
    pub fn insert_with_id(&mut self, id: Identifier, object: impl Into<Object>) -> Option<Object> {
        let object = object.into();
        debug!(id = %id, isa = object.isa(), "object stored");
        self.objects.insert(id, object)
    }

    /// Look up an object. A missing reference is `None`, never an error.
    pub fn get(&self, id: &Identifier) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &Identifier) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Remove an object. References to it elsewhere are left dangling.
    pub fn remove(&mut self, id: &Identifier) -> Option<Object> {
        let removed = self.objects.remove(id);
        if removed.is_some() {
            debug!(id = %id, "object removed");
        }
        removed
    }

    /// Whether an object is stored under the given identifier text.
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Object)> {
        self.objects.iter()
    }

    /// All identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &Identifier> {
        self.objects.keys()
    }

    /// All build phases in ascending identifier order.
    pub fn build_phases(&self) -> impl Iterator<Item = (&Identifier, &BuildPhase)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| object.as_build_phase().map(|phase| (id, phase)))
    }

    // -----------------------------------------------------------------------
    // Name resolution
    // -----------------------------------------------------------------------

    /// Human-readable name of an object, as written in comments.
    ///
    /// Build files resolve through their file reference, so this follows at
    /// most [`MAX_NAME_DEPTH`] hops. Returns `None` for a missing object or
    /// one without a name.
    pub fn display_name(&self, id: &Identifier) -> Option<String> {
        self.display_name_at(id, 0)
    }

    fn display_name_at(&self, id: &Identifier, depth: usize) -> Option<String> {
        if depth >= MAX_NAME_DEPTH {
            debug!(id = %id, depth, "name resolution depth exceeded");
            return None;
        }
        match self.get(id)? {
            Object::BuildFile(file) => {
                let target = file.file_ref.as_ref()?;
                self.display_name_at(target, depth + 1)
            }
            Object::FileReference(file) => file.display_name().map(str::to_string),
            Object::Group(group) => group.display_name().map(str::to_string),
            Object::NativeTarget(target) => Some(target.name.clone()),
            Object::Project(_) => Some(ProjectObject::DISPLAY_NAME.to_string()),
            Object::BuildConfiguration(config) => Some(config.name.clone()),
            Object::ConfigurationList(_) => self.configuration_list_name(id),
            Object::BuildPhase(phase) => Some(phase.display_name()),
            object @ (Object::TargetDependency(_) | Object::ContainerItemProxy(_)) => {
                Some(object.isa().to_string())
            }
            Object::Opaque(opaque) => opaque.display_name().map(str::to_string),
        }
    }

    /// `Build configuration list for <isa> "<name>"`, from the owning target
    /// or project.
    fn configuration_list_name(&self, list: &Identifier) -> Option<String> {
        self.objects.values().find_map(|object| {
            let (owner_list, name) = match object {
                Object::NativeTarget(target) => {
                    (target.build_configuration_list.as_ref(), Some(target.name.as_str()))
                }
                Object::Project(project) => {
                    (project.build_configuration_list.as_ref(), self.project_name())
                }
                _ => return None,
            };
            if owner_list != Some(list) {
                return None;
            }
            Some(match name {
                Some(name) => format!("Build configuration list for {} \"{name}\"", object.isa()),
                None => format!("Build configuration list for {}", object.isa()),
            })
        })
    }

    /// Display name of the build phase whose `files` contain `build_file`.
    ///
    /// When several phases list the same build file, the one with the lowest
    /// identifier wins. Scans every phase; use [`ObjectStore::phase_index`]
    /// when resolving many build files.
    pub fn build_phase_name(&self, build_file: &Identifier) -> Option<String> {
        self.build_phases()
            .find(|(_, phase)| phase.files().contains(build_file))
            .map(|(_, phase)| phase.display_name())
    }

    /// Comment attached to a reference to a build file.
    ///
    /// `"<file> in <phase>"` when both names resolve, `"<file>"` when only
    /// the file name does, `None` when the file name does not.
    pub fn build_file_comment(&self, build_file: &Identifier) -> Option<String> {
        self.compose_build_file_comment(build_file, || self.build_phase_name(build_file))
    }

    fn compose_build_file_comment(
        &self,
        build_file: &Identifier,
        phase_name: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        let file_name = self.display_name(build_file)?;
        Some(match phase_name() {
            Some(phase) => format!("{file_name} in {phase}"),
            None => file_name,
        })
    }

    /// Owning phase of every listed build file, built in one pass.
    pub fn phase_index(&self) -> PhaseIndex<'_> {
        let mut owners = HashMap::new();
        for (_, phase) in self.build_phases() {
            for file in phase.files() {
                owners.entry(file).or_insert(phase);
            }
        }
        PhaseIndex {
            store: self,
            owners,
        }
    }
}

/// Build file to owning phase, for resolving comments without rescanning.
///
/// Borrows the store; rebuild it after mutating.
#[derive(Debug)]
pub struct PhaseIndex<'a> {
    store: &'a ObjectStore,
    owners: HashMap<&'a Identifier, &'a BuildPhase>,
}

impl PhaseIndex<'_> {
    /// Same as [`ObjectStore::build_phase_name`].
    pub fn build_phase_name(&self, build_file: &Identifier) -> Option<String> {
        self.owners.get(build_file).map(|phase| phase.display_name())
    }

    /// Same as [`ObjectStore::build_file_comment`].
    pub fn build_file_comment(&self, build_file: &Identifier) -> Option<String> {
        self.store
            .compose_build_file_comment(build_file, || self.build_phase_name(build_file))
    }
}

/// Two stores are equal when they hold the same objects under the same
/// identifiers. Generator state and project name are not compared.
impl PartialEq for ObjectStore {
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects
    }
}

impl Eq for ObjectStore {}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("object_count", &self.objects.len())
            .field("seeded", &self.generator.is_seeded())
            .finish()
    }
}

impl<'a> IntoIterator for &'a ObjectStore {
    type Item = (&'a Identifier, &'a Object);
    type IntoIter = std::collections::btree_map::Iter<'a, Identifier, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_phase::{BuildPhaseKind, ShellScriptBuildPhase};
    use crate::object::{BuildFile, ConfigurationList, FileReference, NativeTarget};

    fn id(text: &str) -> Identifier {
        Identifier::new(text)
    }

    /// File reference F ("main.swift"), build file A -> F, Sources phase P -> [A].
    fn sources_store() -> ObjectStore {
        let mut store = ObjectStore::new();
        store.insert_with_id(id("F"), FileReference::with_path("main.swift"));
        store.insert_with_id(id("A"), BuildFile::new(id("F")));
        store.insert_with_id(id("P"), BuildPhase::sources(vec![id("A")]));
        store
    }

    // -----------------------------------------------------------------------
    // Ownership
    // -----------------------------------------------------------------------

    #[test]
    fn insert_generates_canonical_unique_ids() {
        let mut store = ObjectStore::new();
        let a = store.insert(FileReference::with_path("a.swift"));
        let b = store.insert(FileReference::with_path("b.swift"));
        assert_ne!(a, b);
        assert!(a.is_canonical());
        assert_eq!(store.len(), 2);
        assert!(store.contains(a.as_str()));
    }

    #[test]
    fn insert_skips_existing_keys() {
        let mut reference = IdentifierGenerator::seeded(7);
        let first = reference.next_id();
        let second = reference.next_id();

        let mut store = ObjectStore::with_generator(IdentifierGenerator::seeded(7));
        store.insert_with_id(first.clone(), FileReference::with_path("taken"));
        let generated = store.insert(FileReference::with_path("new"));
        assert_eq!(generated, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn lookup_missing_is_none() {
        let store = ObjectStore::new();
        assert!(store.get(&id("NOPE")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_leaves_references_dangling() {
        let mut store = sources_store();
        assert!(store.remove(&id("F")).is_some());
        assert!(store.remove(&id("F")).is_none());
        assert!(store.get(&id("A")).is_some());
        assert_eq!(store.display_name(&id("A")), None);
    }

    #[test]
    fn iteration_is_ascending() {
        let store = sources_store();
        let ids: Vec<&str> = store.ids().map(Identifier::as_str).collect();
        assert_eq!(ids, ["A", "F", "P"]);
    }

    #[test]
    fn debug_shows_count() {
        let store = sources_store();
        let text = format!("{store:?}");
        assert!(text.contains("object_count: 3"));
    }

    // -----------------------------------------------------------------------
    // Name resolution
    // -----------------------------------------------------------------------

    #[test]
    fn build_file_name_follows_file_ref() {
        let store = sources_store();
        assert_eq!(store.display_name(&id("A")).as_deref(), Some("main.swift"));
        assert_eq!(store.display_name(&id("P")).as_deref(), Some("Sources"));
    }

    #[test]
    fn build_file_comment_policy() {
        let store = sources_store();
        assert_eq!(
            store.build_file_comment(&id("A")).as_deref(),
            Some("main.swift in Sources")
        );

        let mut orphan = sources_store();
        orphan.remove(&id("P"));
        assert_eq!(orphan.build_file_comment(&id("A")).as_deref(), Some("main.swift"));

        assert_eq!(store.build_file_comment(&id("MISSING")), None);
    }

    #[test]
    fn phase_index_matches_scan() {
        let mut store = sources_store();
        store.insert_with_id(id("G"), FileReference::with_path("util.swift"));
        store.insert_with_id(id("B"), BuildFile::new(id("G")));
        store.insert_with_id(id("O"), BuildFile::new(id("F")));
        store.insert_with_id(id("Q"), BuildPhase::resources(vec![id("B"), id("A")]));

        let index = store.phase_index();
        for file in ["A", "B", "O", "MISSING"] {
            assert_eq!(
                index.build_file_comment(&id(file)),
                store.build_file_comment(&id(file)),
                "{file}"
            );
        }
        assert_eq!(index.build_phase_name(&id("A")).as_deref(), Some("Sources"));
        assert_eq!(index.build_file_comment(&id("O")).as_deref(), Some("main.swift"));
    }

    #[test]
    fn named_phase_uses_its_name() {
        let mut store = sources_store();
        store.insert_with_id(
            id("S"),
            BuildPhase::ShellScript(ShellScriptBuildPhase {
                name: Some("Run SwiftLint".into()),
                ..ShellScriptBuildPhase::default()
            }),
        );
        assert_eq!(store.display_name(&id("S")).as_deref(), Some("Run SwiftLint"));

        store.insert_with_id(
            id("S"),
            BuildPhase::ShellScript(ShellScriptBuildPhase::default()),
        );
        assert_eq!(
            store.display_name(&id("S")).as_deref(),
            Some(BuildPhaseKind::ShellScript.display_name())
        );
    }

    #[test]
    fn configuration_list_names_its_owner() {
        let mut store = ObjectStore::new();
        store.insert_with_id(id("L"), ConfigurationList::default());
        let mut target = NativeTarget::new("App");
        target.build_configuration_list = Some(id("L"));
        store.insert_with_id(id("T"), target);
        assert_eq!(
            store.display_name(&id("L")).as_deref(),
            Some("Build configuration list for PBXNativeTarget \"App\"")
        );

        store.insert_with_id(id("M"), ConfigurationList::default());
        let mut project = ProjectObject::new(id("G"));
        project.build_configuration_list = Some(id("M"));
        store.insert_with_id(id("R"), project);
        assert_eq!(
            store.display_name(&id("M")).as_deref(),
            Some("Build configuration list for PBXProject")
        );
        store.set_project_name("Demo");
        assert_eq!(
            store.display_name(&id("M")).as_deref(),
            Some("Build configuration list for PBXProject \"Demo\"")
        );
        assert_eq!(store.display_name(&id("R")).as_deref(), Some("Project object"));
    }

    #[test]
    fn cyclic_build_files_terminate() {
        let mut store = ObjectStore::new();
        store.insert_with_id(id("A"), BuildFile::new(id("B")));
        store.insert_with_id(id("B"), BuildFile::new(id("A")));
        store.insert_with_id(id("P"), BuildPhase::sources(vec![id("A")]));
        assert_eq!(store.display_name(&id("A")), None);
        assert_eq!(store.build_file_comment(&id("A")), None);
    }

    #[test]
    fn equality_ignores_generator() {
        let mut one = ObjectStore::with_generator(IdentifierGenerator::seeded(1));
        let mut two = ObjectStore::new();
        one.insert_with_id(id("A"), BuildFile::new(id("F")));
        two.insert_with_id(id("A"), BuildFile::new(id("F")));
        assert_eq!(one, two);
        two.insert_with_id(id("B"), BuildFile::new(id("F")));
        assert_ne!(one, two);
    }
}
