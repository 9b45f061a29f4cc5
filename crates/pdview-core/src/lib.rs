//! pdview core - Pure Data patch parsing for host-side control surfaces
//!
//! This crate reads Pd patch files (`.pd`) and extracts the GUI widgets a
//! host application needs to mirror them: sliders, toggles, triggers, number
//! entries and labels. Everything else in a patch (DSP objects, connections,
//! comments) is ignored.
//!
//! # Pipeline
//!
//! - [`tokenize`] splits a line on whitespace.
//! - [`classify`] looks at the leading tokens and picks a [`Directive`].
//! - [`parse_line`] / [`parse_line_detailed`] run the extractor for the
//!   widget class and produce a [`Widget`].
//! - [`PatchParser`] reads whole documents through a [`PatchSource`] and
//!   splices subpatches in place, translated by their position.
//!
//! # Interaction
//!
//! - [`ChannelRegistry`] - callbacks bound to widgets after parsing
//! - [`Session`] - hit testing, presses and drags turned into emitted values
//!
//! # Example
//!
//! ```rust,no_run
//! use pdview_core::{PatchParser, Point, Session};
//!
//! let doc = PatchParser::default().parse_file("synth.pd");
//! for widget in &doc {
//!     println!("{} at {:?}", widget.kind_name(), widget.position);
//! }
//!
//! let mut session = Session::new(doc);
//! session.registry_mut().bind_all(
//!     |channel: &str, value: f32| println!("{channel} <- {value}"),
//!     |channel: &str, text: &str| println!("{channel} <- {text}"),
//! );
//! session.press(Point::new(110.0, 60.0));
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize` for the widget model and parsed documents.

pub mod binding;
pub mod color;
pub mod document;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod parser;
pub mod session;
pub mod source;
pub mod token;
pub mod widget;

// Re-export main types at crate root
pub use binding::{ChannelRegistry, MessageHandler, ValueHandler};
pub use color::{Rgb, parse_hex_color};
pub use document::{DocumentStats, LineDiagnostic, ParsedDocument, SubpatchOutcome, SubpatchReport};
pub use error::{LineError, SourceError};
pub use extract::{DEFAULT_PRECISION, NUMBER_HEIGHT, SUBPATCH_SIZE, synthesized_number_channel};
pub use flatten::PatchParser;
pub use parser::{
    DEFAULT_CHAR_WIDTH, DEFAULT_MAX_DEPTH, Directive, ParseOptions, classify, parse_line,
    parse_line_detailed,
};
pub use session::{Session, format_number};
pub use source::{FsSource, MemorySource, PatchSource};
pub use token::{strip_terminator, tokenize};
pub use widget::{
    Channels, Orientation, Point, SENTINEL_DASH, SENTINEL_EMPTY, Size, ValueRange, Widget,
    WidgetId, WidgetKind, is_sentinel,
};
