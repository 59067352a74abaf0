//! Dictionary-driven field access shared by every object kind.
//!
//! A kind's `decode` is an ordered list of [`FieldReader`] calls, one per
//! field, each naming the field, its coercion and its default. The reader
//! owns the error reporting, so no kind inspects raw [`PlistValue`]s itself.
//! [`FieldWriter`] is the mirror image and attaches reference comments.
//!
//! Fields a kind does not read are collected by [`FieldReader::extra`] and
//! written back by [`FieldWriter::extra`], so a load then save keeps them.

use std::cell::RefCell;
use std::collections::BTreeSet;

use pbx_plist::{PlistDict, PlistKey, PlistValue};
use pbx_types::Identifier;

use crate::coerce::{bool_text, int_bool, int_text};
use crate::error::{DecodeError, DecodeResult};
use crate::object::ISA_KEY;
use crate::store::{ObjectStore, PhaseIndex};

/// Typed, read-only view over one raw object dictionary.
///
/// Records which fields were read so the rest can be kept verbatim.
pub struct FieldReader<'a> {
    id: &'a Identifier,
    fields: &'a PlistDict,
    consumed: RefCell<BTreeSet<&'static str>>,
}

impl<'a> FieldReader<'a> {
    pub fn new(id: &'a Identifier, fields: &'a PlistDict) -> Self {
        Self {
            id,
            fields,
            consumed: RefCell::new(BTreeSet::new()),
        }
    }

    /// Identifier of the object being decoded.
    pub fn id(&self) -> &Identifier {
        self.id
    }

    /// The raw value of a field. Does not mark the field as read.
    pub fn raw(&self, field: &str) -> Option<&'a PlistValue> {
        self.fields.get(field)
    }

    fn lookup(&self, field: &'static str) -> Option<&'a PlistValue> {
        self.consumed.borrow_mut().insert(field);
        self.fields.get(field)
    }

    /// Every field no typed accessor has read so far, `isa` excluded.
    ///
    /// Call it last: a field read afterwards is reported here as well.
    pub fn extra(&self) -> PlistDict {
        let consumed = self.consumed.borrow();
        self.fields
            .iter()
            .filter(|(key, _)| key.name != ISA_KEY && !consumed.contains(key.name.as_str()))
            .map(|(key, value)| (PlistKey::new(key.name.as_str()), value.clone()))
            .collect()
    }

    fn invalid(&self, field: &'static str, expected: &'static str, found: &PlistValue) -> DecodeError {
        let found = match found.as_str() {
            Some(text) => text.to_string(),
            None => found.kind_name().to_string(),
        };
        DecodeError::InvalidField {
            id: self.id.clone(),
            field,
            expected,
            found,
        }
    }

    fn missing(&self, field: &'static str) -> DecodeError {
        DecodeError::MissingField {
            id: self.id.clone(),
            field,
        }
    }

    fn text(&self, field: &'static str) -> DecodeResult<Option<&'a str>> {
        match self.lookup(field) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a string", value)),
        }
    }

    /// Optional string field.
    pub fn string(&self, field: &'static str) -> DecodeResult<Option<String>> {
        Ok(self.text(field)?.map(str::to_string))
    }

    /// String field that defaults when absent.
    pub fn string_or(&self, field: &'static str, default: &str) -> DecodeResult<String> {
        Ok(self.text(field)?.unwrap_or(default).to_string())
    }

    /// String field with no default.
    pub fn required_string(&self, field: &'static str) -> DecodeResult<String> {
        self.string(field)?.ok_or_else(|| self.missing(field))
    }

    /// Optional reference.
    pub fn reference(&self, field: &'static str) -> DecodeResult<Option<Identifier>> {
        Ok(self.text(field)?.map(Identifier::new))
    }

    /// Reference with no default.
    pub fn required_reference(&self, field: &'static str) -> DecodeResult<Identifier> {
        self.reference(field)?.ok_or_else(|| self.missing(field))
    }

    fn texts(&self, field: &'static str) -> DecodeResult<Option<Vec<&'a str>>> {
        let Some(value) = self.lookup(field) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.invalid(field, "an array", value))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| self.invalid(field, "an array of strings", item))
            })
            .collect::<DecodeResult<Vec<_>>>()
            .map(Some)
    }

    /// Ordered references, empty when absent. Order is preserved exactly.
    pub fn references(&self, field: &'static str) -> DecodeResult<Vec<Identifier>> {
        Ok(self
            .texts(field)?
            .unwrap_or_default()
            .into_iter()
            .map(Identifier::new)
            .collect())
    }

    /// Ordered strings, empty when absent.
    pub fn strings(&self, field: &'static str) -> DecodeResult<Vec<String>> {
        Ok(self.optional_strings(field)?.unwrap_or_default())
    }

    /// Ordered strings, `None` when absent.
    pub fn optional_strings(&self, field: &'static str) -> DecodeResult<Option<Vec<String>>> {
        Ok(self
            .texts(field)?
            .map(|items| items.into_iter().map(str::to_string).collect()))
    }

    /// Optional decimal integer.
    pub fn uint(&self, field: &'static str) -> DecodeResult<Option<u32>> {
        match self.text(field)? {
            None => Ok(None),
            Some(text) => int_text(text).map(Some).ok_or_else(|| {
                self.invalid(field, "an unsigned integer", &PlistValue::from(text))
            }),
        }
    }

    /// Decimal integer that defaults when absent.
    pub fn uint_or(&self, field: &'static str, default: u32) -> DecodeResult<u32> {
        Ok(self.uint(field)?.unwrap_or(default))
    }

    /// Optional integer-valued boolean.
    pub fn int_bool(&self, field: &'static str) -> DecodeResult<Option<bool>> {
        match self.text(field)? {
            None => Ok(None),
            Some(text) => int_bool(text)
                .map(Some)
                .ok_or_else(|| self.invalid(field, "\"0\" or \"1\"", &PlistValue::from(text))),
        }
    }

    /// Integer-valued boolean, `false` when absent.
    pub fn int_bool_or_false(&self, field: &'static str) -> DecodeResult<bool> {
        Ok(self.int_bool(field)?.unwrap_or(false))
    }

    /// Optional nested dictionary, kept uninterpreted.
    pub fn dict(&self, field: &'static str) -> DecodeResult<Option<PlistDict>> {
        match self.lookup(field) {
            None => Ok(None),
            Some(PlistValue::Dict(dict)) => Ok(Some(dict.clone())),
            Some(other) => Err(self.invalid(field, "a dictionary", other)),
        }
    }
}

/// Builder for one encoded object dictionary.
///
/// Reference fields are annotated through the store's name resolution.
/// A missing target only drops the comment.
pub struct FieldWriter<'a> {
    store: &'a ObjectStore,
    index: Option<&'a PhaseIndex<'a>>,
    fields: PlistDict,
}

impl<'a> FieldWriter<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Self {
            store,
            index: None,
            fields: PlistDict::new(),
        }
    }

    /// A writer that resolves build-file comments through a prebuilt index
    /// instead of scanning every phase.
    pub fn with_index(store: &'a ObjectStore, index: &'a PhaseIndex<'a>) -> Self {
        Self {
            store,
            index: Some(index),
            fields: PlistDict::new(),
        }
    }

    /// The store used for comments.
    pub fn store(&self) -> &'a ObjectStore {
        self.store
    }

    /// Comment for a reference to a build file.
    pub fn build_file_comment(&self, build_file: &Identifier) -> Option<String> {
        match self.index {
            Some(index) => index.build_file_comment(build_file),
            None => self.store.build_file_comment(build_file),
        }
    }

    /// Insert a prebuilt value, replacing any earlier one.
    pub fn value(&mut self, field: &str, value: PlistValue) {
        self.fields.insert(PlistKey::new(field), value);
    }

    /// Plain string, quoted by the plist writer when needed.
    pub fn string(&mut self, field: &str, value: &str) {
        self.value(field, PlistValue::from(value));
    }

    /// Skipped when `None`.
    pub fn optional_string(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.string(field, value);
        }
    }

    /// Array of plain strings. Written even when empty.
    pub fn strings(&mut self, field: &str, values: &[String]) {
        let items = values.iter().map(|v| PlistValue::from(v.as_str())).collect();
        self.value(field, PlistValue::Array(items));
    }

    pub fn optional_strings(&mut self, field: &str, values: Option<&[String]>) {
        if let Some(values) = values {
            self.strings(field, values);
        }
    }

    /// Decimal text, written as a bare commented string.
    pub fn uint(&mut self, field: &str, value: u32) {
        self.value(field, PlistValue::commented(value.to_string(), None));
    }

    pub fn optional_uint(&mut self, field: &str, value: Option<u32>) {
        if let Some(value) = value {
            self.uint(field, value);
        }
    }

    /// `"1"` or `"0"`.
    pub fn int_bool(&mut self, field: &str, value: bool) {
        self.value(field, PlistValue::commented(bool_text(value), None));
    }

    pub fn optional_int_bool(&mut self, field: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.int_bool(field, value);
        }
    }

    /// A reference annotated with the target's display name.
    pub fn reference(&mut self, field: &str, target: &Identifier) {
        let value = self.commented_reference(target);
        self.value(field, value);
    }

    pub fn optional_reference(&mut self, field: &str, target: Option<&Identifier>) {
        if let Some(target) = target {
            self.reference(field, target);
        }
    }

    /// Ordered references, each annotated with its target's display name.
    pub fn references(&mut self, field: &str, targets: &[Identifier]) {
        let items = targets
            .iter()
            .map(|target| self.commented_reference(target))
            .collect();
        self.value(field, PlistValue::Array(items));
    }

    /// Nested dictionary, copied as is.
    pub fn dict(&mut self, field: &str, value: &PlistDict) {
        self.value(field, PlistValue::Dict(value.clone()));
    }

    pub fn optional_dict(&mut self, field: &str, value: Option<&PlistDict>) {
        if let Some(value) = value {
            self.dict(field, value);
        }
    }

    /// Fields kept verbatim from decoding.
    ///
    /// Strings equal to a key of the store, alone or inside an array, are
    /// annotated like references. A field already written wins.
    pub fn extra(&mut self, extra: &PlistDict) {
        for (key, value) in extra {
            if !self.fields.contains_key(key.name.as_str()) {
                let annotated = self.annotated(value);
                self.fields.insert(PlistKey::new(key.name.as_str()), annotated);
            }
        }
    }

    fn annotated(&self, value: &PlistValue) -> PlistValue {
        match value {
            PlistValue::String(text) if self.store.contains(text) => {
                self.commented_reference(&Identifier::new(text.as_str()))
            }
            PlistValue::Array(items) => {
                PlistValue::Array(items.iter().map(|item| self.annotated(item)).collect())
            }
            other => other.clone(),
        }
    }

    fn commented_reference(&self, target: &Identifier) -> PlistValue {
        PlistValue::commented(target.as_str(), self.store.display_name(target))
    }

    pub fn finish(self) -> PlistDict {
        self.fields
    }
}
