// src/document/run.rs - Inline runs and the marks they carry

use crate::extension::ExtensionRegistry;
use std::collections::BTreeMap;

/// Formatting kinds an inline run can carry. Declaration order is the
/// nesting order used when serializing (outermost first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    TextStyle,
}

impl MarkKind {
    pub fn name(self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::TextStyle => "textStyle",
        }
    }

    /// Only `textStyle` carries attributes; the others are plain on/off marks.
    pub fn accepts_attributes(self) -> bool {
        matches!(self, MarkKind::TextStyle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark {
    pub kind: MarkKind,
    pub attrs: BTreeMap<String, String>,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
        }
    }

    pub fn bold() -> Self {
        Self::new(MarkKind::Bold)
    }

    pub fn italic() -> Self {
        Self::new(MarkKind::Italic)
    }

    pub fn text_style() -> Self {
        Self::new(MarkKind::TextStyle)
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Set of marks on a run, kept sorted by kind with at most one mark per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MarkSet(Vec<Mark>);

impl MarkSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Mark] {
        &self.0
    }

    pub fn contains(&self, kind: MarkKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: MarkKind) -> Option<&Mark> {
        self.0.iter().find(|m| m.kind == kind)
    }

    /// Insert a mark, replacing any existing mark of the same kind.
    pub fn insert(&mut self, mark: Mark) {
        match self.0.binary_search_by(|m| m.kind.cmp(&mark.kind)) {
            Ok(idx) => self.0[idx] = mark,
            Err(idx) => self.0.insert(idx, mark),
        }
    }

    pub fn remove(&mut self, kind: MarkKind) -> Option<Mark> {
        let idx = self.0.iter().position(|m| m.kind == kind)?;
        Some(self.0.remove(idx))
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.insert(mark);
        self
    }

    pub fn without(mut self, kind: MarkKind) -> Self {
        self.remove(kind);
        self
    }

    /// Value of a `textStyle` attribute, `None` meaning unset.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.get(MarkKind::TextStyle).and_then(|m| m.attr(name))
    }

    /// Assign (or clear with `None`) a `textStyle` attribute. A `textStyle`
    /// mark left without attributes is removed.
    pub fn set_attr(&mut self, name: &str, value: Option<&str>) {
        let mut mark = self
            .remove(MarkKind::TextStyle)
            .unwrap_or_else(Mark::text_style);
        match value {
            Some(value) => {
                mark.attrs.insert(name.to_string(), value.to_string());
            }
            None => {
                mark.attrs.remove(name);
            }
        }
        if !mark.attrs.is_empty() {
            self.insert(mark);
        }
    }

    /// Rewrite attribute values into their canonical form, dropping unknown
    /// and default ones, then drop marks that end up as no-ops.
    pub(crate) fn prune(&mut self, registry: &ExtensionRegistry) {
        self.0.retain_mut(|mark| {
            if !mark.kind.accepts_attributes() {
                mark.attrs.clear();
                return true;
            }
            let kind = mark.kind;
            mark.attrs
                .retain(|name, value| match registry.canonical(kind, name, value) {
                    Some(canonical) => {
                        *value = canonical;
                        true
                    }
                    None => false,
                });
            !mark.attrs.is_empty()
        });
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut set = MarkSet::new();
        for mark in iter {
            set.insert(mark);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A span of text sharing one mark set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub marks: MarkSet,
}

impl Run {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, MarkSet::new())
    }

    /// Length in chars; all document offsets count chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Split into `(first `at` chars, remainder)`.
    pub fn split_at(&self, at: usize) -> (Run, Run) {
        let byte = self
            .text
            .char_indices()
            .nth(at)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
        let (head, tail) = self.text.split_at(byte);
        (
            Run::new(head, self.marks.clone()),
            Run::new(tail, self.marks.clone()),
        )
    }
}

/// Split a run sequence at a char offset. Offsets past the end put
/// everything on the left.
pub(crate) fn split_runs(runs: &[Run], at: usize) -> (Vec<Run>, Vec<Run>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut pos = 0;
    for run in runs {
        let len = run.char_len();
        if pos + len <= at {
            left.push(run.clone());
        } else if pos >= at {
            right.push(run.clone());
        } else {
            let (head, tail) = run.split_at(at - pos);
            left.push(head);
            right.push(tail);
        }
        pos += len;
    }
    (left, right)
}

/// Restore the run invariants: no empty runs, no no-op marks, and no two
/// neighbours with identical mark sets.
pub(crate) fn normalize_runs(runs: Vec<Run>, registry: &ExtensionRegistry) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for mut run in runs {
        if run.text.is_empty() {
            continue;
        }
        run.marks.prune(registry);
        match out.last_mut() {
            Some(prev) if prev.marks == run.marks => prev.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_set_keeps_one_mark_per_kind() {
        let mut marks = MarkSet::new();
        marks.insert(Mark::text_style().with_attr("fontSize", "12px"));
        marks.insert(Mark::bold());
        marks.insert(Mark::text_style().with_attr("fontSize", "20px"));

        let kinds: Vec<_> = marks.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MarkKind::Bold, MarkKind::TextStyle]);
        assert_eq!(marks.attr("fontSize"), Some("20px"));
    }

    #[test]
    fn test_clearing_last_attribute_drops_text_style() {
        let mut marks = MarkSet::new();
        marks.set_attr("fontSize", Some("20px"));
        assert!(marks.contains(MarkKind::TextStyle));

        marks.set_attr("fontSize", None);
        assert!(marks.is_empty());
    }

    #[test]
    fn test_split_run_counts_chars() {
        let run = Run::plain("héllo");
        let (head, tail) = run.split_at(2);
        assert_eq!(head.text, "hé");
        assert_eq!(tail.text, "llo");
    }

    #[test]
    fn test_split_runs_across_boundary() {
        let runs = vec![
            Run::plain("abc"),
            Run::new("def", MarkSet::new().with(Mark::bold())),
        ];
        let (left, right) = split_runs(&runs, 4);
        assert_eq!(left.len(), 2);
        assert_eq!(left[1].text, "d");
        assert_eq!(right[0].text, "ef");
        assert!(right[0].marks.contains(MarkKind::Bold));
    }

    #[test]
    fn test_normalize_merges_and_prunes() {
        let registry = ExtensionRegistry::global();
        let runs = vec![
            Run::plain("a"),
            Run::plain(""),
            Run::new("b", MarkSet::new().with(Mark::text_style())),
            Run::new("c", MarkSet::new().with(Mark::bold())),
            Run::new("d", MarkSet::new().with(Mark::bold())),
        ];
        let runs = normalize_runs(runs, registry);
        assert_eq!(
            runs,
            vec![
                Run::plain("ab"),
                Run::new("cd", MarkSet::new().with(Mark::bold())),
            ]
        );
    }
}
