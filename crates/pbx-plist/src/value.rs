use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Key-ordered dictionary. Keys compare by name only.
pub type PlistDict = BTreeMap<PlistKey, PlistValue>;

/// A scalar paired with an optional human-readable annotation.
///
/// Written as `text /* comment */`, or as bare `text` when there is no
/// comment. Used for identifier references and a few enumerated fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommentedString {
    pub text: String,
    pub comment: Option<String>,
}

impl CommentedString {
    pub fn new(text: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            text: text.into(),
            comment,
        }
    }

    /// A commented string without an annotation.
    pub fn bare(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

/// A dictionary key with an optional annotation.
///
/// Equality, ordering and hashing consider only `name`, so a key read back
/// from disk (where comments are discarded) finds the entry written with a
/// comment, and `dict.get("files")` works through `Borrow<str>`.
#[derive(Clone, Debug)]
pub struct PlistKey {
    pub name: String,
    pub comment: Option<String>,
}

impl PlistKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
        }
    }

    pub fn with_comment(name: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            name: name.into(),
            comment,
        }
    }
}

impl PartialEq for PlistKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PlistKey {}

impl PartialOrd for PlistKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlistKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for PlistKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Borrow<str> for PlistKey {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl From<&str> for PlistKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PlistKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A value of the ASCII plist grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlistValue {
    /// Plain text. Numbers and booleans are stored this way too.
    String(String),
    /// Text with an optional annotation.
    Commented(CommentedString),
    /// Ordered sequence.
    Array(Vec<PlistValue>),
    /// Key-ordered mapping.
    Dict(PlistDict),
}

impl PlistValue {
    /// A commented string value.
    pub fn commented(text: impl Into<String>, comment: Option<String>) -> Self {
        Self::Commented(CommentedString::new(text, comment))
    }

    /// The scalar text of a `String` or `Commented` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Commented(c) => Some(&c.text),
            Self::Array(_) | Self::Dict(_) => None,
        }
    }

    /// The annotation of a `Commented` value.
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Commented(c) => c.comment.as_deref(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&PlistDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut PlistDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn into_dict(self) -> Option<PlistDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) | Self::Commented(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dictionary",
        }
    }

    /// A copy of this value with every annotation removed.
    ///
    /// Parsed values never carry comments; stripping lets an encoded tree be
    /// compared against one read back from text.
    pub fn strip_comments(&self) -> PlistValue {
        match self {
            Self::String(s) => Self::String(s.clone()),
            Self::Commented(c) => Self::String(c.text.clone()),
            Self::Array(items) => Self::Array(items.iter().map(Self::strip_comments).collect()),
            Self::Dict(dict) => Self::Dict(
                dict.iter()
                    .map(|(k, v)| (PlistKey::new(k.name.clone()), v.strip_comments()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PlistValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PlistValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<CommentedString> for PlistValue {
    fn from(value: CommentedString) -> Self {
        Self::Commented(value)
    }
}

impl From<Vec<PlistValue>> for PlistValue {
    fn from(value: Vec<PlistValue>) -> Self {
        Self::Array(value)
    }
}

impl From<PlistDict> for PlistValue {
    fn from(value: PlistDict) -> Self {
        Self::Dict(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lookup_ignores_comment() {
        let mut dict = PlistDict::new();
        dict.insert(
            PlistKey::with_comment("ABC", Some("main.swift".into())),
            PlistValue::from("x"),
        );
        assert_eq!(dict.get("ABC"), Some(&PlistValue::from("x")));
        assert!(dict.contains_key(&PlistKey::new("ABC")));
    }

    #[test]
    fn dict_orders_by_key_name() {
        let mut dict = PlistDict::new();
        dict.insert("runOnlyForDeploymentPostprocessing".into(), "0".into());
        dict.insert("buildActionMask".into(), "1".into());
        dict.insert("files".into(), PlistValue::Array(vec![]));
        let keys: Vec<&str> = dict.keys().map(|k| k.name.as_str()).collect();
        assert_eq!(
            keys,
            ["buildActionMask", "files", "runOnlyForDeploymentPostprocessing"]
        );
    }

    #[test]
    fn as_str_reads_both_scalar_forms() {
        assert_eq!(PlistValue::from("a").as_str(), Some("a"));
        assert_eq!(
            PlistValue::commented("b", Some("note".into())).as_str(),
            Some("b")
        );
        assert_eq!(PlistValue::Array(vec![]).as_str(), None);
    }

    #[test]
    fn strip_comments_is_deep() {
        let value = PlistValue::Array(vec![
            PlistValue::commented("A", Some("main.swift in Sources".into())),
            PlistValue::commented("B", None),
        ]);
        assert_eq!(
            value.strip_comments(),
            PlistValue::Array(vec!["A".into(), "B".into()])
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(PlistValue::from("x").kind_name(), "string");
        assert_eq!(PlistValue::Array(vec![]).kind_name(), "array");
        assert_eq!(PlistValue::Dict(PlistDict::new()).kind_name(), "dictionary");
    }
}
