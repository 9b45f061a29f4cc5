//! Per-kind field extractors.
//!
//! Each extractor reads the fixed token positions of one widget class and
//! returns `Ok(None)` when the line is valid but describes a widget with no
//! external effect (both channels unset). Token indices count from the
//! leading `#X`:
//!
//! ```text
//!  0  1   2 3 4   5    6    7    8    9     10      11      ...
//! #X obj x y hsl w    h    min  max  _     send    receive ... value
//! #X obj x y tgl size _    send recv  _     ...
//! #X obj x y bng size _    send recv  ...
//! #X obj x y cnv _    w    h    send  recv  label   ... bg(15) fg(16)
//! #X floatatom x y  width min  max  _    _     send    receive ... value
//! #X restore x y pd name
//! #X restore x pd name                  (y reads as 0)
//! ```
//!
//! Toggle send/receive stay at 7 and 8, the same slots as `bng`. Pd writes
//! `tgl size init send receive ...`, so reading 8 and 9 would take the
//! receive name as the send channel.
//!
//! The numeric layout of each kind is read into a small record first; the
//! record is then turned into a [`Widget`] with the kind's defaults applied.

use std::path::PathBuf;

use crate::color::{Rgb, parse_hex_color};
use crate::error::LineError;
use crate::token::Tokens;
use crate::widget::{
    Channels, Orientation, Point, SENTINEL_EMPTY, Size, ValueRange, Widget, WidgetKind,
};

/// Result of an extractor: a widget, "no widget", or the reason the line failed.
pub(crate) type Extracted = Result<Option<Widget>, LineError>;

/// Minimum token counts per kind.
pub(crate) const SLIDER_MIN_TOKENS: usize = 12;
pub(crate) const TOGGLE_MIN_TOKENS: usize = 10;
pub(crate) const TRIGGER_MIN_TOKENS: usize = 9;
pub(crate) const NUMBER_MIN_TOKENS: usize = 7;
pub(crate) const LABEL_MIN_TOKENS: usize = 8;
pub(crate) const SUBPATCH_MIN_TOKENS: usize = 5;

/// Sliders carry their start-up value as the last token once the line is this long.
const SLIDER_VALUE_TOKENS: usize = 21;
/// Atom boxes carry their start-up value as the last token once the line is this long.
const NUMBER_VALUE_TOKENS: usize = 12;

/// Fixed height of an atom box.
pub const NUMBER_HEIGHT: f32 = 20.0;
/// Decimal digits shown by atom boxes with a fractional start-up value.
pub const DEFAULT_PRECISION: u8 = 2;
/// Placeholder extent of a subpatch reference.
pub const SUBPATCH_SIZE: Size = Size::square(100.0);

const SUBPATCH_KEYWORD: &str = "pd";
const SUBPATCH_EXTENSION: &str = "pd";

// ---------------------------------------------------------------------------
// Sliders
// ---------------------------------------------------------------------------

struct SliderLayout {
    size: Size,
    range: ValueRange,
    value: Option<f32>,
}

impl SliderLayout {
    fn read(tokens: &Tokens<'_>) -> Result<Self, LineError> {
        let size = Size::new(tokens.f32_at(5)?, tokens.f32_at(6)?);
        let range = ValueRange::new(tokens.f32_at(7)?, tokens.f32_at(8)?);
        let value = if tokens.len() >= SLIDER_VALUE_TOKENS {
            Some(tokens.last_f32()?)
        } else {
            None
        };
        Ok(Self { size, range, value })
    }
}

pub(crate) fn slider(tokens: &Tokens<'_>, position: Point, orientation: Orientation) -> Extracted {
    let kind = match orientation {
        Orientation::Horizontal => "hsl",
        Orientation::Vertical => "vsl",
    };
    tokens.require(kind, SLIDER_MIN_TOKENS)?;

    let channels = Channels::from_symbols(tokens.field_at(10)?, tokens.field_at(11)?);
    if channels.is_unbound() {
        return Ok(None);
    }

    let layout = SliderLayout::read(tokens)?;
    let initial_value = layout
        .value
        .map_or(layout.range.min, |v| layout.range.clamp(v));

    Ok(Some(Widget {
        position,
        size: layout.size,
        channels,
        kind: WidgetKind::Slider {
            orientation,
            range: layout.range,
            initial_value,
        },
    }))
}

// ---------------------------------------------------------------------------
// Toggle and trigger
// ---------------------------------------------------------------------------

pub(crate) fn toggle(tokens: &Tokens<'_>, position: Point) -> Extracted {
    tokens.require("tgl", TOGGLE_MIN_TOKENS)?;

    let channels = Channels::from_symbols(tokens.field_at(7)?, tokens.field_at(8)?);
    if channels.is_unbound() {
        return Ok(None);
    }

    Ok(Some(Widget {
        position,
        size: Size::square(tokens.f32_at(5)?),
        channels,
        kind: WidgetKind::Toggle,
    }))
}

pub(crate) fn trigger(tokens: &Tokens<'_>, position: Point) -> Extracted {
    tokens.require("bng", TRIGGER_MIN_TOKENS)?;

    let channels = Channels::from_symbols(tokens.field_at(7)?, tokens.field_at(8)?);
    if channels.is_unbound() {
        return Ok(None);
    }

    Ok(Some(Widget {
        position,
        size: Size::square(tokens.f32_at(5)?),
        channels,
        kind: WidgetKind::Trigger,
    }))
}

// ---------------------------------------------------------------------------
// Number entry
// ---------------------------------------------------------------------------

struct NumberLayout {
    width_chars: f32,
    range: ValueRange,
    value: Option<f32>,
}

impl NumberLayout {
    fn read(tokens: &Tokens<'_>) -> Result<Self, LineError> {
        let width_chars = tokens.f32_at(4)?;
        let mut range = ValueRange::new(tokens.f32_at(5)?, tokens.f32_at(6)?);
        if range.min == 0.0 && range.max == 0.0 {
            range = ValueRange::UNBOUNDED;
        }
        let value = if tokens.len() >= NUMBER_VALUE_TOKENS {
            Some(tokens.last_f32()?)
        } else {
            None
        };
        Ok(Self {
            width_chars,
            range,
            value,
        })
    }
}

/// Name used for both directions of an atom box that declares neither.
pub fn synthesized_number_channel(position: Point) -> String {
    format!("floatatom-{}-{}", position.x, position.y)
}

pub(crate) fn number_entry(tokens: &Tokens<'_>, position: Point, char_width: f32) -> Extracted {
    tokens.require("floatatom", NUMBER_MIN_TOKENS)?;

    let layout = NumberLayout::read(tokens)?;

    let symbol = |index: usize| {
        tokens
            .opt_str(index)
            .and_then(|_| tokens.field_at(index).ok())
            .unwrap_or(SENTINEL_EMPTY)
    };
    let mut channels = Channels::from_symbols(symbol(9), symbol(10));
    if channels.is_unbound() {
        channels = Channels::both(synthesized_number_channel(position));
    }

    let initial_value = layout.range.clamp(layout.value.unwrap_or(0.0));
    let display_precision = if initial_value.fract() == 0.0 {
        0
    } else {
        DEFAULT_PRECISION
    };

    Ok(Some(Widget {
        position,
        size: Size::new(layout.width_chars * char_width, NUMBER_HEIGHT),
        channels,
        kind: WidgetKind::NumberEntry {
            range: layout.range,
            initial_value,
            display_precision,
        },
    }))
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

pub(crate) fn label(tokens: &Tokens<'_>, position: Point) -> Extracted {
    tokens.require("cnv", LABEL_MIN_TOKENS)?;

    let size = Size::new(tokens.f32_at(6)?, tokens.f32_at(7)?);

    let optional = |index: usize| {
        tokens
            .opt_str(index)
            .and_then(|_| tokens.field_at(index).ok())
    };

    let channels = Channels::from_symbols(
        optional(8).unwrap_or(SENTINEL_EMPTY),
        optional(9).unwrap_or(SENTINEL_EMPTY),
    );
    let text = optional(10)
        .filter(|t| *t != SENTINEL_EMPTY)
        .map(str::to_string);

    let color_at = |index: usize, default: Rgb| match optional(index) {
        Some(token) if token.starts_with('#') => parse_hex_color(token),
        _ => default,
    };

    Ok(Some(Widget {
        position,
        size,
        channels,
        kind: WidgetKind::Label {
            text,
            background: color_at(15, Rgb::LABEL_BACKGROUND),
            text_color: color_at(16, Rgb::LABEL_TEXT),
        },
    }))
}

// ---------------------------------------------------------------------------
// Subpatch reference
// ---------------------------------------------------------------------------

/// Index of the child name: the token after `pd`, searched at 3 then 4.
fn subpatch_name_index(tokens: &Tokens<'_>) -> Result<usize, LineError> {
    for keyword_at in [3, 4] {
        if tokens.opt_str(keyword_at) == Some(SUBPATCH_KEYWORD)
            && tokens.opt_str(keyword_at + 1).is_some()
        {
            return Ok(keyword_at + 1);
        }
    }
    Err(LineError::MissingSubpatchKeyword)
}

/// Position of a `restore` line. With `pd` at token 3 there is no y, which reads as 0.
pub(crate) fn subpatch_position(tokens: &Tokens<'_>) -> Result<Point, LineError> {
    let x = tokens.f32_at(2)?;
    let y = match subpatch_name_index(tokens)? {
        4 => 0.0,
        _ => tokens.f32_at(3)?,
    };
    Ok(Point::new(x, y))
}

pub(crate) fn subpatch(tokens: &Tokens<'_>, position: Point) -> Extracted {
    tokens.require("subpatch", SUBPATCH_MIN_TOKENS)?;

    let index = subpatch_name_index(tokens)?;
    let name = tokens.field_at(index)?;
    if name.is_empty() {
        return Err(LineError::MissingToken { index });
    }

    let child_path = PathBuf::from(format!("{name}.{SUBPATCH_EXTENSION}"));

    Ok(Some(Widget {
        position,
        size: SUBPATCH_SIZE,
        channels: Channels {
            send: Some(format!("{name}_send")),
            receive: Some(format!("{name}_receive")),
        },
        kind: WidgetKind::SubpatchRef {
            name: name.to_string(),
            child_path,
            offset: position,
        },
    }))
}
