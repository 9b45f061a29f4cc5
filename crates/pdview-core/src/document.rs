//! The flattened result of parsing a patch.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::LineError;
use crate::widget::{Point, Widget, WidgetId};

/// How a subpatch reference was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubpatchOutcome {
    /// The child loaded and contributed at least one widget.
    Loaded,
    /// No readable `<name>.pd` was found.
    Missing,
    /// The child loaded but produced no widgets.
    Empty,
    /// The child is one of its own ancestors.
    Cycle,
    /// Nesting exceeded the configured depth bound.
    DepthExceeded,
}

impl SubpatchOutcome {
    /// Short lowercase label.
    pub const fn name(&self) -> &'static str {
        match self {
            SubpatchOutcome::Loaded => "loaded",
            SubpatchOutcome::Missing => "missing",
            SubpatchOutcome::Empty => "empty",
            SubpatchOutcome::Cycle => "cycle",
            SubpatchOutcome::DepthExceeded => "depth exceeded",
        }
    }
}

/// One subpatch reference met while flattening.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubpatchReport {
    /// Name written after `pd`.
    pub name: String,
    /// Document that contains the reference, if it came from a file.
    pub parent: Option<PathBuf>,
    /// Resolved child path, when one was found.
    pub resolved: Option<PathBuf>,
    /// Absolute translation applied to the child's widgets.
    pub offset: Point,
    /// Nesting depth of the child (top-level children are depth 1).
    pub depth: usize,
    /// Widgets spliced into the flat list.
    pub widgets: usize,
    /// Resolution result.
    pub outcome: SubpatchOutcome,
}

/// A recognised line that produced no widget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LineDiagnostic {
    /// Document containing the line, if it came from a file.
    pub document: Option<PathBuf>,
    /// 1-based line number.
    pub line: usize,
    /// Why the line was skipped.
    #[cfg_attr(feature = "serde", serde(serialize_with = "display"))]
    pub error: LineError,
}

#[cfg(feature = "serde")]
fn display<S: serde::Serializer>(error: &LineError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Widget counts and skipped lines for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Widgets per [`Widget::kind_name`].
    pub by_kind: BTreeMap<&'static str, usize>,
    /// Recognised lines that produced no widget.
    pub skipped_lines: usize,
    /// Subpatch references that contributed nothing.
    pub unresolved_subpatches: usize,
}

/// Ordered, flattened widgets of a patch, plus what was skipped on the way.
///
/// Widgets appear in source line order; the widgets of a subpatch replace its
/// reference line, already translated into the parent's coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedDocument {
    pub(crate) path: Option<PathBuf>,
    pub(crate) opened: bool,
    pub(crate) widgets: Vec<Widget>,
    pub(crate) subpatches: Vec<SubpatchReport>,
    pub(crate) diagnostics: Vec<LineDiagnostic>,
}

impl ParsedDocument {
    /// Wraps an already-flattened widget list.
    pub fn from_widgets(widgets: Vec<Widget>) -> Self {
        Self {
            path: None,
            opened: true,
            widgets,
            subpatches: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Path of the top-level document, if parsed from a file.
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// False when the top-level document could not be read at all.
    pub fn opened(&self) -> bool {
        self.opened
    }

    /// The flat widget list.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Consumes the document, returning its widgets.
    pub fn into_widgets(self) -> Vec<Widget> {
        self.widgets
    }

    /// Widget by ID.
    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.index())
    }

    /// Widgets paired with their IDs, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Widget)> {
        self.widgets
            .iter()
            .enumerate()
            .map(|(i, w)| (WidgetId::from_index(i), w))
    }

    /// Number of widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns true if no widgets were produced.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Subpatch references met, in encounter order (depth-first).
    pub fn subpatches(&self) -> &[SubpatchReport] {
        &self.subpatches
    }

    /// Lines that were recognised but skipped, including those in subpatches.
    pub fn diagnostics(&self) -> &[LineDiagnostic] {
        &self.diagnostics
    }

    /// Summary counts.
    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            skipped_lines: self.diagnostics.len(),
            unresolved_subpatches: self
                .subpatches
                .iter()
                .filter(|r| r.outcome != SubpatchOutcome::Loaded)
                .count(),
            ..DocumentStats::default()
        };
        for widget in &self.widgets {
            *stats.by_kind.entry(widget.kind_name()).or_default() += 1;
        }
        stats
    }
}

impl<'a> IntoIterator for &'a ParsedDocument {
    type Item = &'a Widget;
    type IntoIter = std::slice::Iter<'a, Widget>;

    fn into_iter(self) -> Self::IntoIter {
        self.widgets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Channels, Size, WidgetKind};

    fn widget(kind: WidgetKind) -> Widget {
        Widget {
            position: Point::default(),
            size: Size::square(10.0),
            channels: Channels::both("c"),
            kind,
        }
    }

    #[test]
    fn ids_follow_document_order() {
        let doc = ParsedDocument::from_widgets(vec![
            widget(WidgetKind::Toggle),
            widget(WidgetKind::Trigger),
        ]);
        let ids: Vec<_> = doc.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(doc.get(WidgetId(1)).unwrap().kind, WidgetKind::Trigger);
        assert!(doc.get(WidgetId(2)).is_none());
    }

    #[test]
    fn stats_count_kinds_and_failures() {
        let mut doc = ParsedDocument::from_widgets(vec![
            widget(WidgetKind::Toggle),
            widget(WidgetKind::Toggle),
            widget(WidgetKind::Trigger),
        ]);
        doc.diagnostics.push(LineDiagnostic {
            document: None,
            line: 3,
            error: LineError::MissingSubpatchKeyword,
        });
        doc.subpatches.push(SubpatchReport {
            name: "x".into(),
            parent: None,
            resolved: None,
            offset: Point::default(),
            depth: 1,
            widgets: 0,
            outcome: SubpatchOutcome::Missing,
        });
        let stats = doc.stats();
        assert_eq!(stats.by_kind.get("toggle"), Some(&2));
        assert_eq!(stats.by_kind.get("trigger"), Some(&1));
        assert_eq!(stats.skipped_lines, 1);
        assert_eq!(stats.unresolved_subpatches, 1);
    }

    #[test]
    fn default_document_is_unopened_and_empty() {
        let doc = ParsedDocument::default();
        assert!(!doc.opened());
        assert!(doc.is_empty());
        assert!(doc.path().is_none());
    }
}
