//! Reviewing changes between two encodings of a project.
//!
//! [`diff_text`] compares file text line by line with the `similar` crate
//! (Myers algorithm) and groups the result into hunks with three lines of
//! context. [`diff_objects`] compares two stores by identifier.

use std::fmt;

use pbx_store::ObjectStore;
use pbx_types::Identifier;
use similar::{ChangeTag, TextDiff as LineDiff};

/// Line-level difference between two texts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDiff {
    /// Changed regions in file order, empty when the texts are equal.
    pub hunks: Vec<DiffHunk>,
    /// Line count of the old text.
    pub old_lines: usize,
    /// Line count of the new text.
    pub new_lines: usize,
}

impl TextDiff {
    /// Returns `true` if the texts are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Number of added lines across all hunks.
    pub fn additions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Number of removed lines across all hunks.
    pub fn deletions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(|h| &h.lines)
    }
}

/// Unified-diff rendering, without file headers.
impl fmt::Display for TextDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hunk in &self.hunks {
            writeln!(
                f,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            )?;
            for line in &hunk.lines {
                match line {
                    DiffLine::Context(text) => writeln!(f, " {text}")?,
                    DiffLine::Added(text) => writeln!(f, "+{text}")?,
                    DiffLine::Removed(text) => writeln!(f, "-{text}")?,
                }
            }
        }
        Ok(())
    }
}

/// A contiguous region of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// First old line covered, 1-based.
    pub old_start: usize,
    /// Old lines covered (context plus removed).
    pub old_count: usize,
    /// First new line covered, 1-based.
    pub new_start: usize,
    /// New lines covered (context plus added).
    pub new_count: usize,
    /// Lines in order, without their trailing newline.
    pub lines: Vec<DiffLine>,
}

/// One line of a hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Unchanged line around a change.
    Context(String),
    /// Line only in the new text.
    Added(String),
    /// Line only in the old text.
    Removed(String),
}

/// Compute a line-by-line diff.
pub fn diff_text(old: &str, new: &str) -> TextDiff {
    let old_lines = old.lines().count();
    let new_lines = new.lines().count();
    if old == new {
        return TextDiff {
            hunks: Vec::new(),
            old_lines,
            new_lines,
        };
    }

    let line_diff = LineDiff::from_lines(old, new);
    let mut hunks = Vec::new();

    for group in line_diff.grouped_ops(3) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut hunk = DiffHunk {
            old_start: first.old_range().start + 1,
            old_count: 0,
            new_start: first.new_range().start + 1,
            new_count: 0,
            lines: Vec::new(),
        };

        for op in &group {
            for change in line_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        hunk.lines.push(DiffLine::Context(text));
                        hunk.old_count += 1;
                        hunk.new_count += 1;
                    }
                    ChangeTag::Delete => {
                        hunk.lines.push(DiffLine::Removed(text));
                        hunk.old_count += 1;
                    }
                    ChangeTag::Insert => {
                        hunk.lines.push(DiffLine::Added(text));
                        hunk.new_count += 1;
                    }
                }
            }
        }
        hunks.push(hunk);
    }

    TextDiff {
        hunks,
        old_lines,
        new_lines,
    }
}

/// Identifier-level difference between two stores.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectDiff {
    /// Only in the new store.
    pub added: Vec<Identifier>,
    /// Only in the old store.
    pub removed: Vec<Identifier>,
    /// Present in both with different contents.
    pub modified: Vec<Identifier>,
}

impl ObjectDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare two stores object by object. Each list is in ascending
/// identifier order.
pub fn diff_objects(old: &ObjectStore, new: &ObjectStore) -> ObjectDiff {
    let mut diff = ObjectDiff::default();
    for (id, object) in old {
        match new.get(id) {
            None => diff.removed.push(id.clone()),
            Some(other) if other != object => diff.modified.push(id.clone()),
            Some(_) => {}
        }
    }
    diff.added = new
        .ids()
        .filter(|id| !old.contains(id.as_str()))
        .cloned()
        .collect();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbx_store::{BuildFile, BuildPhase, FileReference};

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    #[test]
    fn identical_text_no_diff() {
        let diff = diff_text("a\nb\n", "a\nb\n");
        assert!(diff.is_empty());
        assert_eq!(diff.old_lines, 2);
        assert_eq!(diff.to_string(), "");
    }

    #[test]
    fn added_file_line() {
        let old = "files = (\n\tA /* main.swift in Sources */,\n);\n";
        let new = "files = (\n\tA /* main.swift in Sources */,\n\tB /* util.swift in Sources */,\n);\n";
        let diff = diff_text(old, new);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!((hunk.old_start, hunk.new_start), (1, 1));
        assert_eq!((hunk.old_count, hunk.new_count), (3, 4));
        assert!(diff
            .to_string()
            .contains("+\tB /* util.swift in Sources */,\n"));
    }

    #[test]
    fn distant_changes_form_separate_hunks() {
        let old: String = (0..20).map(|i| format!("line{i}\n")).collect();
        let new = old.replace("line1\n", "changed1\n").replace("line18\n", "changed18\n");
        let diff = diff_text(&old, &new);
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.additions(), 2);
        assert_eq!(diff.deletions(), 2);
        assert!(diff.hunks[0]
            .lines
            .iter()
            .any(|l| matches!(l, DiffLine::Context(_))));
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    #[test]
    fn object_changes_by_identifier() {
        let id = Identifier::new;
        let mut old = ObjectStore::new();
        old.insert_with_id(id("F"), FileReference::with_path("main.swift"));
        old.insert_with_id(id("A"), BuildFile::new(id("F")));
        old.insert_with_id(id("P"), BuildPhase::sources(vec![id("A")]));

        let mut new = old.clone();
        new.remove(&id("A"));
        new.insert_with_id(id("B"), BuildFile::new(id("F")));
        new.insert_with_id(id("P"), BuildPhase::sources(vec![id("B")]));

        let diff = diff_objects(&old, &new);
        assert_eq!(diff.added, [id("B")]);
        assert_eq!(diff.removed, [id("A")]);
        assert_eq!(diff.modified, [id("P")]);
        assert!(diff_objects(&old, &old).is_empty());
    }
}
