use pbx_plist::{PlistDict, PlistKey, PlistValue};
use pbx_types::Identifier;

use crate::fields::FieldWriter;
use crate::object::{Object, ISA_KEY};
use crate::store::ObjectStore;

/// Renders an [`ObjectStore`] as the raw `objects` dictionary.
///
/// Objects come out in ascending identifier order; the plist writer then
/// groups them into per-`isa` sections. Each key is annotated with the
/// object's comment and each reference with its target's display name. The
/// store is only read, so encoding is deterministic.
///
/// [`Encoder::encode`] resolves build-file comments through one
/// [`PhaseIndex`](crate::PhaseIndex), so it stays linear in the number of
/// listed files.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    store: &'a ObjectStore,
}

impl<'a> Encoder<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Self { store }
    }

    /// Encode every object.
    pub fn encode(&self) -> PlistDict {
        let index = self.store.phase_index();
        self.store
            .iter()
            .map(|(id, object)| {
                let comment = match object {
                    Object::BuildFile(_) => index.build_file_comment(id),
                    _ => self.store.display_name(id),
                };
                let key = PlistKey::with_comment(id.as_str(), comment);
                let writer = FieldWriter::with_index(self.store, &index);
                (key, PlistValue::Dict(Self::encode_fields(writer, object)))
            })
            .collect()
    }

    /// Encode one object, `None` if it is not in the store.
    pub fn encode_object(&self, id: &Identifier) -> Option<PlistDict> {
        let object = self.store.get(id)?;
        Some(Self::encode_fields(FieldWriter::new(self.store), object))
    }

    /// Comment written next to an object's key: the build-file comment for
    /// build files, the display name otherwise.
    pub fn object_comment(&self, id: &Identifier) -> Option<String> {
        match self.store.get(id)? {
            Object::BuildFile(_) => self.store.build_file_comment(id),
            _ => self.store.display_name(id),
        }
    }

    fn encode_fields(mut writer: FieldWriter<'_>, object: &Object) -> PlistDict {
        writer.string(ISA_KEY, object.isa());
        object.encode_fields(&mut writer);
        writer.finish()
    }
}
