use std::borrow::Borrow;
use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of identifiers produced by [`IdentifierGenerator`].
pub const CANONICAL_LEN: usize = 24;

/// Number of random bytes behind a canonical identifier.
const CANONICAL_BYTES: usize = CANONICAL_LEN / 2;

/// Characters that would make an identifier unparseable as a bare plist token.
const DELIMITERS: &[char] = &['{', '}', '(', ')', '=', ';', ',', '"', '/'];

/// Opaque key of one object in a project graph.
///
/// An `Identifier` carries no meaning beyond equality, hashing and ordering.
/// It is a weak reference: resolving it to an object requires the store that
/// owns the graph. Identifiers read from disk are kept verbatim, so a file
/// that uses short hand-written keys round-trips unchanged.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a token as an identifier without validation.
    ///
    /// Decoders use this for keys that already came out of a parsed file.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse a token, rejecting empty strings and plist delimiters.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        if value.is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        if value
            .chars()
            .any(|c| c.is_whitespace() || DELIMITERS.contains(&c))
        {
            return Err(TypeError::InvalidIdentifier(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this looks like an IDE-generated identifier
    /// (24 upper-case hex characters).
    pub fn is_canonical(&self) -> bool {
        self.0.len() == CANONICAL_LEN
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    /// Consume the identifier, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Source of fresh canonical identifiers.
///
/// The random mode draws 96 bits from the thread RNG. The seeded mode hashes
/// `(seed, counter)` with BLAKE3, so two generators with the same seed yield
/// the same sequence; this keeps programmatically built projects reproducible
/// across runs.
///
/// The generator does not know which identifiers are taken. Callers that own
/// a key space (the object store) retry on collision.
#[derive(Clone, Debug)]
pub struct IdentifierGenerator {
    seed: Option<u64>,
    counter: u64,
}

impl IdentifierGenerator {
    /// A generator backed by the thread RNG.
    pub fn random() -> Self {
        Self {
            seed: None,
            counter: 0,
        }
    }

    /// A deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            counter: 0,
        }
    }

    /// Returns `true` if this generator produces a reproducible sequence.
    pub fn is_seeded(&self) -> bool {
        self.seed.is_some()
    }

    /// Produce the next identifier.
    pub fn next_id(&mut self) -> Identifier {
        let mut bytes = [0u8; CANONICAL_BYTES];
        match self.seed {
            None => rand::thread_rng().fill_bytes(&mut bytes),
            Some(seed) => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(b"pbx-identifier-v1:");
                hasher.update(&seed.to_le_bytes());
                hasher.update(&self.counter.to_le_bytes());
                bytes.copy_from_slice(&hasher.finalize().as_bytes()[..CANONICAL_BYTES]);
            }
        }
        self.counter = self.counter.wrapping_add(1);
        Identifier(hex::encode_upper(bytes))
    }
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::random()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parse_accepts_hex_and_short_tokens() {
        assert!(Identifier::parse("0A1B2C3D4E5F60718293A4B5").is_ok());
        assert_eq!(Identifier::parse("A").unwrap().as_str(), "A");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(Identifier::parse(""), Err(TypeError::EmptyIdentifier));
    }

    #[test]
    fn parse_rejects_delimiters() {
        for bad in ["A B", "A;", "{A}", "A/*x*/", "\"A\""] {
            assert!(
                matches!(Identifier::parse(bad), Err(TypeError::InvalidIdentifier(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn canonical_detection() {
        assert!(Identifier::new("0A1B2C3D4E5F60718293A4B5").is_canonical());
        assert!(!Identifier::new("0a1b2c3d4e5f60718293a4b5").is_canonical());
        assert!(!Identifier::new("A").is_canonical());
    }

    #[test]
    fn display_is_raw_text() {
        let id = Identifier::new("ABC");
        assert_eq!(format!("{id}"), "ABC");
        assert_eq!(format!("{id:?}"), "Identifier(ABC)");
    }

    #[test]
    fn ordering_follows_text() {
        assert!(Identifier::new("A") < Identifier::new("B"));
        assert!(Identifier::new("0F") < Identifier::new("A0"));
    }

    #[test]
    fn random_ids_are_canonical_and_unique() {
        let mut gen = IdentifierGenerator::random();
        let ids: HashSet<Identifier> = (0..256).map(|_| gen.next_id()).collect();
        assert_eq!(ids.len(), 256);
        assert!(ids.iter().all(Identifier::is_canonical));
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = IdentifierGenerator::seeded(7);
        let mut b = IdentifierGenerator::seeded(7);
        for _ in 0..16 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = IdentifierGenerator::seeded(1);
        let mut b = IdentifierGenerator::seeded(2);
        assert_ne!(a.next_id(), b.next_id());
    }

    proptest! {
        #[test]
        fn seeded_ids_are_canonical(seed in any::<u64>(), steps in 1..32usize) {
            let mut gen = IdentifierGenerator::seeded(seed);
            for _ in 0..steps {
                prop_assert!(gen.next_id().is_canonical());
            }
        }
    }
}
