use pbx_types::Identifier;

use crate::store::ObjectStore;

/// A reference whose target is not in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub owner: Identifier,
    pub field: &'static str,
    pub target: Identifier,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} -> {} (missing)", self.owner, self.field, self.target)
    }
}

impl ObjectStore {
    /// Every reference whose target is missing, ordered by owner and then by
    /// field order.
    ///
    /// Encoding never needs this: a missing target only loses its comment.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for (owner, object) in self.iter() {
            for (field, target) in object.references() {
                if !self.contains(target.as_str()) {
                    dangling.push(DanglingReference {
                        owner: owner.clone(),
                        field,
                        target: target.clone(),
                    });
                }
            }
        }
        dangling
    }

    /// Returns `true` if every reference resolves.
    pub fn is_well_formed(&self) -> bool {
        self.dangling_references().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_phase::BuildPhase;
    use crate::object::{BuildFile, FileReference, ProjectObject};

    fn id(text: &str) -> Identifier {
        Identifier::new(text)
    }

    #[test]
    fn complete_graph_has_no_dangling_references() {
        let mut store = ObjectStore::new();
        store.insert_with_id(id("F"), FileReference::with_path("main.swift"));
        store.insert_with_id(id("A"), BuildFile::new(id("F")));
        store.insert_with_id(id("P"), BuildPhase::sources(vec![id("A")]));
        assert!(store.is_well_formed());
    }

    #[test]
    fn reports_owner_field_and_target() {
        let mut store = ObjectStore::new();
        store.insert_with_id(id("A"), BuildFile::new(id("F")));
        store.insert_with_id(id("P"), BuildPhase::sources(vec![id("A"), id("B")]));
        store.insert_with_id(id("R"), ProjectObject::new(id("G")));

        let dangling = store.dangling_references();
        assert_eq!(
            dangling,
            [
                DanglingReference { owner: id("A"), field: "fileRef", target: id("F") },
                DanglingReference { owner: id("P"), field: "files", target: id("B") },
                DanglingReference { owner: id("R"), field: "mainGroup", target: id("G") },
            ]
        );
        assert_eq!(dangling[0].to_string(), "A.fileRef -> F (missing)");
        assert!(!store.is_well_formed());
    }
}
