use pbx_types::Identifier;

/// Errors from decoding raw plist objects into typed objects.
///
/// Every variant carries the identifier of the object being decoded, so a
/// best-effort caller can report exactly which entries were dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The entry under an identifier is not a dictionary.
    #[error("object {id}: expected a dictionary, found a {found}")]
    NotADictionary { id: Identifier, found: &'static str },

    /// The discriminator field is absent or not a string.
    #[error("object {id}: missing discriminator field {key:?}")]
    MissingIsa { id: Identifier, key: &'static str },

    /// The discriminator names a kind that is not registered.
    #[error("object {id}: unknown isa {isa:?}")]
    UnknownIsa { id: Identifier, isa: String },

    /// A field is present but has the wrong scalar shape.
    #[error("object {id}: field {field:?} expected {expected}, found {found:?}")]
    InvalidField {
        id: Identifier,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A field without a default is absent.
    #[error("object {id}: missing required field {field:?}")]
    MissingField { id: Identifier, field: &'static str },
}

impl DecodeError {
    /// The identifier of the object that failed to decode.
    pub fn identifier(&self) -> &Identifier {
        match self {
            Self::NotADictionary { id, .. }
            | Self::MissingIsa { id, .. }
            | Self::UnknownIsa { id, .. }
            | Self::InvalidField { id, .. }
            | Self::MissingField { id, .. } => id,
        }
    }
}

/// Result alias for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
