use std::collections::BTreeMap;

use pbx_plist::{PlistDict, PlistValue};
use pbx_types::Identifier;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DecodeError, DecodeResult};
use crate::object::Object;
use crate::store::ObjectStore;

/// What to do with an object that cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// The first failure aborts the whole load.
    #[default]
    Strict,
    /// Unknown kinds are kept opaque; malformed objects are dropped and
    /// reported.
    Lenient,
}

/// Outcome of a lenient load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Objects of unknown kind kept as [`OpaqueObject`](crate::OpaqueObject).
    pub opaque: Vec<Identifier>,
    /// Objects that were dropped, with the reason.
    pub skipped: Vec<DecodeError>,
}

impl DecodeReport {
    /// Returns `true` if every object was decoded into a known kind.
    pub fn is_clean(&self) -> bool {
        self.opaque.is_empty() && self.skipped.is_empty()
    }
}

/// Builds an [`ObjectStore`] from the raw `objects` dictionary.
///
/// Each entry is dispatched on its `isa` field to the matching kind. Under
/// [`DecodePolicy::Strict`] the store is only built once every entry has
/// decoded, so a failure never leaves a partial store behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    policy: DecodePolicy,
}

impl Decoder {
    pub fn new(policy: DecodePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Decode every object, discarding the report.
    pub fn decode(&self, objects: &PlistDict) -> DecodeResult<ObjectStore> {
        self.decode_with_report(objects).map(|(store, _)| store)
    }

    /// Decode every object. The report is always clean under the strict
    /// policy.
    pub fn decode_with_report(
        &self,
        objects: &PlistDict,
    ) -> DecodeResult<(ObjectStore, DecodeReport)> {
        let mut decoded = BTreeMap::new();
        let mut report = DecodeReport::default();

        for (key, value) in objects {
            let id = Identifier::new(key.name.as_str());
            let result = Self::fields(&id, value).and_then(|fields| match self.policy {
                DecodePolicy::Strict => Object::decode(&id, fields),
                DecodePolicy::Lenient => Object::decode_or_opaque(&id, fields),
            });
            match result {
                Ok(object) => {
                    if let Object::Opaque(opaque) = &object {
                        debug!(id = %id, isa = %opaque.isa, "kept unknown object kind");
                        report.opaque.push(id.clone());
                    }
                    decoded.insert(id, object);
                }
                Err(err) if self.policy == DecodePolicy::Lenient => {
                    warn!(id = %id, error = %err, "skipping undecodable object");
                    report.skipped.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            objects = decoded.len(),
            opaque = report.opaque.len(),
            skipped = report.skipped.len(),
            "decoded object graph"
        );
        Ok((ObjectStore::from_objects(decoded), report))
    }

    fn fields<'a>(id: &Identifier, value: &'a PlistValue) -> DecodeResult<&'a PlistDict> {
        value.as_dict().ok_or_else(|| DecodeError::NotADictionary {
            id: id.clone(),
            found: value.kind_name(),
        })
    }
}
