use std::fs;
use std::path::Path;

use pbx_store::DecodePolicy;
use pbx_types::IdentifierGenerator;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};

/// Options for reading and writing projects.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// decode_policy = "lenient"
/// atomic_writes = false
/// identifier_seed = 42
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// How to treat objects that cannot be decoded.
    pub decode_policy: DecodePolicy,
    /// Write through a temporary file in the target directory, then rename.
    pub atomic_writes: bool,
    /// Seed for generated identifiers. `None` draws them at random.
    pub identifier_seed: Option<u64>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            decode_policy: DecodePolicy::Strict,
            atomic_writes: true,
            identifier_seed: None,
        }
    }
}

impl ProjectConfig {
    /// A configuration that keeps unknown objects instead of failing.
    pub fn lenient() -> Self {
        Self {
            decode_policy: DecodePolicy::Lenient,
            ..Default::default()
        }
    }

    pub fn from_toml_str(text: &str) -> ProjectResult<Self> {
        toml::from_str(text).map_err(|e| ProjectError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ProjectResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ProjectResult<String> {
        toml::to_string(self).map_err(|e| ProjectError::Config(e.to_string()))
    }

    /// The identifier generator this configuration asks for.
    pub fn generator(&self) -> IdentifierGenerator {
        match self.identifier_seed {
            Some(seed) => IdentifierGenerator::seeded(seed),
            None => IdentifierGenerator::random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ProjectConfig::default();
        assert_eq!(c.decode_policy, DecodePolicy::Strict);
        assert!(c.atomic_writes);
        assert!(c.identifier_seed.is_none());
        assert!(!c.generator().is_seeded());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ProjectConfig::from_toml_str("decode_policy = \"lenient\"\n").unwrap();
        assert_eq!(c.decode_policy, DecodePolicy::Lenient);
        assert!(c.atomic_writes);

        let c = ProjectConfig::from_toml_str("identifier_seed = 42\natomic_writes = false\n").unwrap();
        assert_eq!(c.identifier_seed, Some(42));
        assert!(!c.atomic_writes);
        assert!(c.generator().is_seeded());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ProjectConfig::from_toml_str("").unwrap(), ProjectConfig::default());
    }

    #[test]
    fn bad_policy_is_config_error() {
        let err = ProjectConfig::from_toml_str("decode_policy = \"sloppy\"").unwrap_err();
        assert!(matches!(err, ProjectError::Config(_)));
    }

    #[test]
    fn toml_round_trip_through_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pbx.toml");
        let config = ProjectConfig {
            decode_policy: DecodePolicy::Lenient,
            atomic_writes: false,
            identifier_seed: Some(7),
        };
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(ProjectConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ProjectConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ProjectError::Io { .. }));
    }
}
