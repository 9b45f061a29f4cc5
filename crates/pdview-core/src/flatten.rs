//! Document parsing with recursive subpatch flattening.
//!
//! [`PatchParser`] walks a document line by line. Each subpatch reference is
//! resolved to `<name>.pd`, parsed with the same pipeline, translated by the
//! reference's position and spliced into the output where the reference was.
//!
//! Every call works on its own local state: the only thing passed down the
//! recursion is the chain of ancestor documents (for cycle detection) and the
//! current depth. Two bounds keep a malformed document graph finite:
//!
//! - a document may not include one of its own ancestors
//!   ([`SubpatchOutcome::Cycle`]); sibling references to the same child are fine;
//! - nesting deeper than [`ParseOptions::max_depth`] is cut off
//!   ([`SubpatchOutcome::DepthExceeded`]).
//!
//! Neither aborts the parse. The offending reference contributes no widgets.

use std::path::{Path, PathBuf};

use crate::document::{LineDiagnostic, ParsedDocument, SubpatchOutcome, SubpatchReport};
use crate::error::SourceError;
use crate::parser::{ParseOptions, parse_line_detailed};
use crate::source::{FsSource, PatchSource};
use crate::widget::{Widget, WidgetKind};

/// Parses patch documents and flattens their subpatches.
///
/// # Example
///
/// ```rust
/// use pdview_core::{MemorySource, ParseOptions, PatchParser, Point};
///
/// let source = MemorySource::new()
///     .with("main.pd", "#X restore 50 50 pd child;\n")
///     .with("child.pd", "#X obj 10 10 bng 20 250 hit empty empty;\n");
///
/// let doc = PatchParser::new(source, ParseOptions::default()).parse_file("main.pd");
/// assert_eq!(doc.len(), 1);
/// assert_eq!(doc.widgets()[0].position, Point::new(60.0, 60.0));
/// ```
#[derive(Debug, Clone)]
pub struct PatchParser<S = FsSource> {
    source: S,
    options: ParseOptions,
}

impl Default for PatchParser<FsSource> {
    fn default() -> Self {
        Self::new(FsSource, ParseOptions::default())
    }
}

/// Where in the document graph a parse is running.
struct Frame<'a> {
    document: Option<&'a Path>,
    dir: Option<&'a Path>,
    ancestors: &'a [PathBuf],
    depth: usize,
}

impl Frame<'_> {
    fn document(&self) -> Option<PathBuf> {
        self.document.map(Path::to_path_buf)
    }
}

impl<S: PatchSource> PatchParser<S> {
    /// Creates a parser reading documents from `source`.
    pub fn new(source: S, options: ParseOptions) -> Self {
        Self { source, options }
    }

    /// Active options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The document source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parses and flattens the document at `path`.
    ///
    /// Returns an empty, unopened document if `path` cannot be read; see
    /// [`ParsedDocument::opened`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParsedDocument {
        let path = path.as_ref();
        let text = match self.load(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("cannot open patch: {err}");
                return ParsedDocument {
                    path: Some(path.to_path_buf()),
                    ..ParsedDocument::default()
                };
            }
        };

        let ancestors = [self.source.identity(path)];
        let frame = Frame {
            document: Some(path),
            dir: path.parent(),
            ancestors: &ancestors,
            depth: 0,
        };
        let mut doc = self.flatten(&text, &frame);
        doc.path = Some(path.to_path_buf());

        tracing::info!(
            widgets = doc.len(),
            skipped = doc.diagnostics.len(),
            "parsed {}",
            path.display()
        );
        doc
    }

    /// Parses and flattens patch text held in memory.
    ///
    /// Subpatches are resolved against `base_dir` (or the current directory
    /// when `None`) and then the search paths.
    pub fn parse_str(&self, text: &str, base_dir: Option<&Path>) -> ParsedDocument {
        let frame = Frame {
            document: None,
            dir: base_dir,
            ancestors: &[],
            depth: 0,
        };
        let doc = self.flatten(text, &frame);
        tracing::debug!(widgets = doc.len(), "parsed in-memory patch");
        doc
    }

    fn load(&self, path: &Path) -> Result<String, SourceError> {
        let bytes = self.source.read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }

    /// First existing candidate for `child`: beside the parent, then each search path.
    fn resolve(&self, child: &Path, dir: Option<&Path>) -> Option<PathBuf> {
        let beside = match dir {
            Some(dir) => dir.join(child),
            None => child.to_path_buf(),
        };
        std::iter::once(beside)
            .chain(self.options.search_paths.iter().map(|p| p.join(child)))
            .find(|candidate| self.source.exists(candidate))
    }

    fn flatten(&self, text: &str, frame: &Frame<'_>) -> ParsedDocument {
        let mut out = ParsedDocument {
            opened: true,
            ..ParsedDocument::default()
        };

        for (index, line) in lines(text).enumerate() {
            match parse_line_detailed(line, &self.options) {
                Ok(Some(widget)) if matches!(widget.kind, WidgetKind::SubpatchRef { .. }) => {
                    self.splice(widget, frame, &mut out);
                }
                Ok(Some(widget)) => {
                    tracing::debug!(line = index + 1, kind = widget.kind_name(), "widget");
                    out.widgets.push(widget);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        line = index + 1,
                        "skipping '{}': {error}",
                        line.trim()
                    );
                    out.diagnostics.push(LineDiagnostic {
                        document: frame.document(),
                        line: index + 1,
                        error,
                    });
                }
            }
        }
        out
    }

    fn splice(&self, reference: Widget, frame: &Frame<'_>, out: &mut ParsedDocument) {
        let WidgetKind::SubpatchRef {
            name,
            child_path,
            offset,
        } = reference.kind
        else {
            return;
        };

        let depth = frame.depth + 1;
        let mut report = SubpatchReport {
            name,
            parent: frame.document(),
            resolved: None,
            offset,
            depth,
            widgets: 0,
            outcome: SubpatchOutcome::Missing,
        };

        if depth > self.options.max_depth {
            tracing::warn!(
                "subpatch '{}' exceeds maximum depth {}",
                report.name,
                self.options.max_depth
            );
            report.outcome = SubpatchOutcome::DepthExceeded;
            out.subpatches.push(report);
            return;
        }

        let Some(path) = self.resolve(&child_path, frame.dir) else {
            tracing::warn!("subpatch '{}' not found", report.name);
            out.subpatches.push(report);
            return;
        };
        report.resolved = Some(path.clone());

        let identity = self.source.identity(&path);
        if frame.ancestors.contains(&identity) {
            tracing::warn!("subpatch '{}' includes itself", report.name);
            report.outcome = SubpatchOutcome::Cycle;
            out.subpatches.push(report);
            return;
        }

        let text = match self.load(&path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("subpatch '{}' unreadable: {err}", report.name);
                out.subpatches.push(report);
                return;
            }
        };

        let mut ancestors = frame.ancestors.to_vec();
        ancestors.push(identity);
        let child_frame = Frame {
            document: Some(path.as_path()),
            dir: path.parent(),
            ancestors: &ancestors,
            depth,
        };
        let child = self.flatten(&text, &child_frame);

        report.widgets = child.widgets.len();
        report.outcome = if child.widgets.is_empty() {
            tracing::warn!("subpatch '{}' has no widgets", report.name);
            SubpatchOutcome::Empty
        } else {
            SubpatchOutcome::Loaded
        };
        tracing::debug!(
            widgets = report.widgets,
            depth,
            "spliced subpatch '{}'",
            report.name
        );
        out.subpatches.push(report);

        out.subpatches
            .extend(child.subpatches.into_iter().map(|mut nested| {
                nested.offset = nested.offset.translated(offset);
                nested
            }));
        out.diagnostics.extend(child.diagnostics);
        out.widgets.extend(child.widgets.into_iter().map(|mut widget| {
            widget.translate(offset);
            widget
        }));
    }
}

/// Splits on `\n`, `\r\n` or a lone `\r`.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            line.split('\r')
        })
}
