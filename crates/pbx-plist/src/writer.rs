//! Serializer producing the IDE's own layout.
//!
//! Layout rules:
//!
//! - one tab per nesting level, one entry per line;
//! - inside a dictionary, `isa` comes first and the remaining keys follow in
//!   key order;
//! - the `objects` dictionary of the root is split into
//!   `/* Begin <isa> section */` ... `/* End <isa> section */` blocks, one per
//!   `isa`, in ascending `isa` order;
//! - objects whose `isa` is in [`INLINE_ISAS`] are written on one line.

use std::collections::BTreeMap;

use crate::value::{CommentedString, PlistDict, PlistKey, PlistValue};

/// First line of every document.
pub const HEADER_LINE: &str = "// !$*UTF8*$!";

/// Root key whose entries are grouped into per-`isa` sections.
const SECTIONED_KEY: &str = "objects";

/// Discriminator key, always written first.
const ISA_KEY: &str = "isa";

/// Object kinds written on a single line.
pub const INLINE_ISAS: &[&str] = &["PBXBuildFile", "PBXFileReference"];

/// Render a root dictionary as a complete document, header line included.
pub fn write_document(root: &PlistDict) -> String {
    let mut writer = Writer::default();
    writer.out.push_str(HEADER_LINE);
    writer.out.push('\n');
    writer.write_dict(root, 0, true);
    writer.out.push('\n');
    writer.out
}

/// Render a single value in multi-line layout at nesting level zero.
pub fn write_value(value: &PlistValue) -> String {
    let mut writer = Writer::default();
    writer.write_value(value, 0, false);
    writer.out
}

#[derive(Default)]
struct Writer {
    out: String,
}

impl Writer {
    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push('\t');
        }
    }

    fn write_value(&mut self, value: &PlistValue, level: usize, inline: bool) {
        match value {
            PlistValue::String(text) => self.out.push_str(&quote(text)),
            PlistValue::Commented(c) => self.write_commented(c),
            PlistValue::Array(items) => self.write_array(items, level, inline),
            PlistValue::Dict(dict) if inline => self.write_inline_dict(dict),
            PlistValue::Dict(dict) => self.write_dict(dict, level, false),
        }
    }

    fn write_commented(&mut self, value: &CommentedString) {
        self.out.push_str(&quote(&value.text));
        self.write_comment(value.comment.as_deref());
    }

    fn write_comment(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.out.push_str(" /* ");
            self.out.push_str(&sanitize_comment(comment));
            self.out.push_str(" */");
        }
    }

    fn write_key(&mut self, key: &PlistKey) {
        self.out.push_str(&quote(&key.name));
        self.write_comment(key.comment.as_deref());
    }

    fn write_array(&mut self, items: &[PlistValue], level: usize, inline: bool) {
        self.out.push('(');
        if inline {
            for item in items {
                self.write_value(item, level, true);
                self.out.push_str(", ");
            }
        } else {
            self.out.push('\n');
            for item in items {
                self.indent(level + 1);
                self.write_value(item, level + 1, false);
                self.out.push_str(",\n");
            }
            self.indent(level);
        }
        self.out.push(')');
    }

    fn write_inline_dict(&mut self, dict: &PlistDict) {
        self.out.push('{');
        for (key, value) in ordered_entries(dict) {
            self.write_key(key);
            self.out.push_str(" = ");
            self.write_value(value, 0, true);
            self.out.push_str("; ");
        }
        self.out.push('}');
    }

    fn write_dict(&mut self, dict: &PlistDict, level: usize, is_root: bool) {
        self.out.push_str("{\n");
        for (key, value) in ordered_entries(dict) {
            self.indent(level + 1);
            self.write_key(key);
            self.out.push_str(" = ");
            match value {
                PlistValue::Dict(objects) if is_root && key.name == SECTIONED_KEY => {
                    self.write_sections(objects, level + 1);
                }
                other => self.write_value(other, level + 1, false),
            }
            self.out.push_str(";\n");
        }
        self.indent(level);
        self.out.push('}');
    }

    fn write_sections(&mut self, objects: &PlistDict, level: usize) {
        let mut sections: BTreeMap<&str, Vec<(&PlistKey, &PlistValue)>> = BTreeMap::new();
        for (key, value) in objects {
            sections.entry(isa_of(value)).or_default().push((key, value));
        }

        self.out.push_str("{\n");
        for (isa, entries) in sections {
            self.out.push_str("\n/* Begin ");
            self.out.push_str(isa);
            self.out.push_str(" section */\n");
            let inline = INLINE_ISAS.contains(&isa);
            for (key, value) in entries {
                self.indent(level + 1);
                self.write_key(key);
                self.out.push_str(" = ");
                match value {
                    PlistValue::Dict(dict) if inline => self.write_inline_dict(dict),
                    other => self.write_value(other, level + 1, false),
                }
                self.out.push_str(";\n");
            }
            self.out.push_str("/* End ");
            self.out.push_str(isa);
            self.out.push_str(" section */\n");
        }
        self.indent(level);
        self.out.push('}');
    }
}

/// Dictionary entries with `isa` first, the rest in key order.
fn ordered_entries(dict: &PlistDict) -> impl Iterator<Item = (&PlistKey, &PlistValue)> {
    let isa = dict.get_key_value(ISA_KEY);
    isa.into_iter()
        .chain(dict.iter().filter(|(key, _)| key.name != ISA_KEY))
}

fn isa_of(value: &PlistValue) -> &str {
    value
        .as_dict()
        .and_then(|dict| dict.get(ISA_KEY))
        .and_then(PlistValue::as_str)
        .unwrap_or("")
}

/// Returns `true` if `text` can be written without quotes.
fn is_bare(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.'))
        && !text.contains("//")
        && !text.contains("___")
}

/// Quote and escape `text` unless it is a bare token.
fn quote(text: &str) -> String {
    if is_bare(text) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// A comment must not close itself early.
fn sanitize_comment(comment: &str) -> String {
    comment.replace("*/", "(*)/")
}
