//! Line classification and dispatch.
//!
//! A patch line is tokenized, classified by its first two tokens, and handed
//! to the extractor for its widget kind:
//!
//! | Prefix          | Tag                    | Extractor    |
//! |-----------------|------------------------|--------------|
//! | `#X obj`        | `hsl` `vsl`            | slider       |
//! | `#X obj`        | `tgl`                  | toggle       |
//! | `#X obj`        | `bng`                  | trigger      |
//! | `#X obj`        | `cnv`                  | label        |
//! | `#X obj`        | `pd`                   | subpatch     |
//! | `#X floatatom`  |                        | number entry |
//! | `#X restore`    |                        | subpatch     |
//!
//! Every other line (canvas headers, connections, comments, other objects)
//! yields no widget and no error. This module never resolves subpatches; see
//! [`PatchParser`](crate::PatchParser) for that.

use std::path::PathBuf;

use crate::error::LineError;
use crate::extract::{self, Extracted, SUBPATCH_MIN_TOKENS};
use crate::token::{Tokens, strip_terminator, tokenize};
use crate::widget::{Orientation, Point, Widget};

/// Default bound on subpatch nesting.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Default width of one character cell in an atom box.
pub const DEFAULT_CHAR_WIDTH: f32 = 8.0;

/// Options controlling a parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Maximum subpatch nesting depth. The top-level document is depth 0.
    pub max_depth: usize,
    /// Directories searched for `<name>.pd` after the referencing document's
    /// own directory.
    pub search_paths: Vec<PathBuf>,
    /// Pixel width of one atom-box character.
    pub char_width: f32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            search_paths: Vec::new(),
            char_width: DEFAULT_CHAR_WIDTH,
        }
    }
}

impl ParseOptions {
    /// Set the subpatch nesting bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Append a subpatch search directory.
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    /// Set the atom-box character width.
    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }
}

/// What a line's leading tokens say it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `#X obj x y <tag> ...` with the tag's terminator stripped.
    Object {
        /// Object class name.
        tag: &'a str,
    },
    /// `#X obj` with too few tokens to carry a class name.
    ShortObject,
    /// `#X floatatom ...`
    FloatAtom,
    /// `#X restore ...`
    Restore,
    /// Anything else.
    Other,
}

/// Classifies a tokenized line by its first two tokens.
pub fn classify<'a>(tokens: &[&'a str]) -> Directive<'a> {
    match tokens {
        ["#X", "obj", _, _, tag, ..] => Directive::Object {
            tag: strip_terminator(*tag),
        },
        ["#X", "obj", ..] => Directive::ShortObject,
        ["#X", "floatatom", ..] => Directive::FloatAtom,
        ["#X", "restore", ..] => Directive::Restore,
        _ => Directive::Other,
    }
}

fn position(tokens: &Tokens<'_>) -> Result<Point, LineError> {
    Ok(Point::new(tokens.f32_at(2)?, tokens.f32_at(3)?))
}

/// Parses one line into a widget, reporting why a recognised line failed.
///
/// `Ok(None)` means the line is not a supported widget (or is one with no
/// external effect). Subpatch references are returned as
/// [`WidgetKind::SubpatchRef`](crate::WidgetKind::SubpatchRef) without
/// loading the child.
pub fn parse_line_detailed(line: &str, options: &ParseOptions) -> Result<Option<Widget>, LineError> {
    let raw = tokenize(line);
    let tokens = Tokens::new(&raw);

    match classify(&raw) {
        Directive::Object { tag } => {
            // Unsupported objects are skipped before their position is read.
            let parse: fn(&Tokens<'_>, Point) -> Extracted = match tag {
                "hsl" => |t, p| extract::slider(t, p, Orientation::Horizontal),
                "vsl" => |t, p| extract::slider(t, p, Orientation::Vertical),
                "tgl" => extract::toggle,
                "bng" => extract::trigger,
                "cnv" => extract::label,
                "pd" => extract::subpatch,
                _ => return Ok(None),
            };
            parse(&tokens, position(&tokens)?)
        }
        Directive::ShortObject => Err(LineError::TooShort {
            kind: "obj",
            needed: 5,
            found: tokens.len(),
        }),
        Directive::FloatAtom => {
            tokens.require("floatatom", 4)?;
            extract::number_entry(&tokens, position(&tokens)?, options.char_width)
        }
        Directive::Restore => {
            tokens.require("restore", SUBPATCH_MIN_TOKENS)?;
            extract::subpatch(&tokens, extract::subpatch_position(&tokens)?)
        }
        Directive::Other => Ok(None),
    }
}

/// Parses one line with default options, logging and discarding failures.
///
/// ```rust
/// use pdview_core::{WidgetKind, parse_line};
///
/// let line = "#X obj 100 50 tgl 40 0 toggle_send toggle_receive empty 0 -10 0 12 #fcfcfc #000000 #000000 0 1;";
/// let widget = parse_line(line).unwrap();
/// assert_eq!(widget.kind, WidgetKind::Toggle);
/// assert!(parse_line("#X connect 0 0 1 0;").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<Widget> {
    match parse_line_detailed(line, &ParseOptions::default()) {
        Ok(widget) => widget,
        Err(err) => {
            tracing::warn!("skipping line '{}': {err}", line.trim_end());
            None
        }
    }
}
