//! Typed widget model produced by the patch parser.
//!
//! Every supported line of a patch becomes one [`Widget`]: a position, a size,
//! a pair of optional channel names, and a [`WidgetKind`] carrying the
//! kind-specific fields. The set of kinds is closed by the Pd file grammar, so
//! consumers dispatch with `match` rather than through a trait object.
//!
//! Widgets are immutable once built. Runtime state (the current value of a
//! slider, a pending drag) lives in [`Session`](crate::Session), keyed by
//! [`WidgetId`].

use std::path::PathBuf;

use crate::color::Rgb;

/// Literal used by IEM GUIs for an unset send/receive symbol.
pub const SENTINEL_EMPTY: &str = "empty";

/// Literal used by atom boxes for an unset send/receive symbol.
pub const SENTINEL_DASH: &str = "-";

/// Returns true if `token` is one of the "not set" sentinels.
#[inline]
pub fn is_sentinel(token: &str) -> bool {
    token == SENTINEL_EMPTY || token == SENTINEL_DASH
}

/// Index of a widget within a flattened [`ParsedDocument`](crate::ParsedDocument).
///
/// IDs are assigned in document order and are only meaningful for the
/// document they were taken from. A reload produces fresh IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WidgetId(pub(crate) u32);

impl WidgetId {
    /// Returns the position of the widget in document order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// A point in patch coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `offset`.
    #[inline]
    pub fn translated(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }
}

/// Width and height in patch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A square of side `side`.
    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }
}

/// Inclusive value range of a ranged widget.
///
/// Pd allows inverted ranges (`min > max`, e.g. a slider whose top is 0), so
/// the declared order is preserved and [`clamp`](Self::clamp) works on the
/// ordered bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRange {
    /// Value at the start of the widget (left / bottom).
    pub min: f32,
    /// Value at the end of the widget (right / top).
    pub max: f32,
}

impl ValueRange {
    /// Range used by atom boxes that declare `0 0` (unbounded).
    pub const UNBOUNDED: Self = Self::new(-1_000_000.0, 1_000_000.0);

    /// Implicit range of toggles and triggers.
    pub const UNIT: Self = Self::new(0.0, 1.0);

    /// Creates a range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Smaller of the two bounds.
    #[inline]
    pub fn lower(&self) -> f32 {
        self.min.min(self.max)
    }

    /// Larger of the two bounds.
    #[inline]
    pub fn upper(&self) -> f32 {
        self.min.max(self.max)
    }

    /// Clamps `value` into the range.
    ///
    /// ```rust
    /// use pdview_core::ValueRange;
    ///
    /// let r = ValueRange::new(0.0, 127.0);
    /// assert_eq!(r.clamp(200.0), 127.0);
    /// assert_eq!(ValueRange::new(127.0, 0.0).clamp(-3.0), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.lower() {
            self.lower()
        } else if value > self.upper() {
            self.upper()
        } else {
            value
        }
    }

    /// Returns true if `value` lies within the range, bounds included.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.lower() && value <= self.upper()
    }

    /// Maps a value to 0.0..=1.0 along `min → max`. A degenerate range maps to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Outgoing and incoming channel names. `None` means "not bound".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channels {
    /// Channel the widget writes to (Pd send symbol).
    pub send: Option<String>,
    /// Channel the widget listens on (Pd receive symbol).
    pub receive: Option<String>,
}

impl Channels {
    /// Builds channels from raw symbol tokens, mapping sentinels to `None`.
    pub fn from_symbols(send: &str, receive: &str) -> Self {
        let bind = |token: &str| (!is_sentinel(token)).then(|| token.to_string());
        Self {
            send: bind(send),
            receive: bind(receive),
        }
    }

    /// Both directions bound to the same name.
    pub fn both(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            send: Some(name.clone()),
            receive: Some(name),
        }
    }

    /// True when neither direction is bound.
    #[inline]
    pub fn is_unbound(&self) -> bool {
        self.send.is_none() && self.receive.is_none()
    }
}

/// Slider direction, fixed by the object class (`hsl` / `vsl`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// `hsl`: minimum on the left.
    Horizontal,
    /// `vsl`: minimum at the bottom.
    Vertical,
}

/// Kind-specific widget data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum WidgetKind {
    /// Continuous slider (`hsl`, `vsl`).
    Slider {
        /// Track direction.
        orientation: Orientation,
        /// Declared range.
        range: ValueRange,
        /// Start-up value, already clamped into `range`.
        initial_value: f32,
    },
    /// Two-state toggle (`tgl`), range `0..=1`, starts off.
    Toggle,
    /// Momentary trigger (`bng`), stateless.
    Trigger,
    /// Numeric entry box (`floatatom`).
    NumberEntry {
        /// Effective range (`0 0` in the file becomes [`ValueRange::UNBOUNDED`]).
        range: ValueRange,
        /// Start-up value, already clamped into `range`.
        initial_value: f32,
        /// Decimal digits shown: 0 for integral start-up values, 2 otherwise.
        display_precision: u8,
    },
    /// Decorative canvas / label (`cnv`). Always kept.
    Label {
        /// Label text, if set.
        text: Option<String>,
        /// Fill colour.
        background: Rgb,
        /// Text colour.
        text_color: Rgb,
    },
    /// Reference to a child patch (`pd name`). Replaced by the child's widgets
    /// when a document is flattened.
    SubpatchRef {
        /// Child patch name as written after `pd`.
        name: String,
        /// Child file name, `<name>.pd`, resolved against the parent directory.
        child_path: PathBuf,
        /// Translation applied to every child widget.
        offset: Point,
    },
}

/// One widget parsed from a patch line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Widget {
    /// Absolute top-left corner.
    pub position: Point,
    /// Extent.
    pub size: Size,
    /// Bound channels.
    pub channels: Channels,
    /// Kind-specific data.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: WidgetKind,
}

impl Widget {
    /// Short lowercase name of the widget kind.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            WidgetKind::Slider {
                orientation: Orientation::Horizontal,
                ..
            } => "hslider",
            WidgetKind::Slider {
                orientation: Orientation::Vertical,
                ..
            } => "vslider",
            WidgetKind::Toggle => "toggle",
            WidgetKind::Trigger => "trigger",
            WidgetKind::NumberEntry { .. } => "number",
            WidgetKind::Label { .. } => "label",
            WidgetKind::SubpatchRef { .. } => "subpatch",
        }
    }

    /// Value range of ranged kinds. Toggles and triggers report `0..=1`.
    pub fn value_range(&self) -> Option<ValueRange> {
        match &self.kind {
            WidgetKind::Slider { range, .. } | WidgetKind::NumberEntry { range, .. } => {
                Some(*range)
            }
            WidgetKind::Toggle | WidgetKind::Trigger => Some(ValueRange::UNIT),
            WidgetKind::Label { .. } | WidgetKind::SubpatchRef { .. } => None,
        }
    }

    /// Start-up value; 0 for kinds without one.
    pub fn initial_value(&self) -> f32 {
        match &self.kind {
            WidgetKind::Slider { initial_value, .. }
            | WidgetKind::NumberEntry { initial_value, .. } => *initial_value,
            _ => 0.0,
        }
    }

    /// True for kinds the user can interact with.
    pub fn is_interactive(&self) -> bool {
        !matches!(
            self.kind,
            WidgetKind::Label { .. } | WidgetKind::SubpatchRef { .. }
        )
    }

    /// Returns true if `point` lies inside the widget bounds (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x <= self.position.x + self.size.width
            && point.y <= self.position.y + self.size.height
    }

    /// Shifts the widget (and a subpatch reference's offset) by `offset`.
    pub fn translate(&mut self, offset: Point) {
        self.position = self.position.translated(offset);
        if let WidgetKind::SubpatchRef { offset: own, .. } = &mut self.kind {
            *own = own.translated(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle_at(x: f32, y: f32) -> Widget {
        Widget {
            position: Point::new(x, y),
            size: Size::square(15.0),
            channels: Channels::both("t"),
            kind: WidgetKind::Toggle,
        }
    }

    #[test]
    fn sentinels() {
        assert!(is_sentinel("empty"));
        assert!(is_sentinel("-"));
        assert!(!is_sentinel("Empty"));
        assert!(!is_sentinel(""));
    }

    #[test]
    fn channels_from_symbols_maps_sentinels() {
        let c = Channels::from_symbols("empty", "freq");
        assert_eq!(c.send, None);
        assert_eq!(c.receive.as_deref(), Some("freq"));
        assert!(!c.is_unbound());
        assert!(Channels::from_symbols("-", "empty").is_unbound());
    }

    #[test]
    fn inverted_range_clamps_to_ordered_bounds() {
        let r = ValueRange::new(127.0, 0.0);
        assert_eq!(r.clamp(500.0), 127.0);
        assert_eq!(r.clamp(-1.0), 0.0);
        assert!(r.contains(64.0));
        assert_eq!(r.denormalize(0.0), 127.0);
        assert_eq!(r.normalize(0.0), 1.0);
    }

    #[test]
    fn degenerate_range_normalizes_to_zero() {
        assert_eq!(ValueRange::new(5.0, 5.0).normalize(5.0), 0.0);
    }

    #[test]
    fn toggle_reports_unit_range() {
        let t = toggle_at(0.0, 0.0);
        assert_eq!(t.value_range(), Some(ValueRange::UNIT));
        assert_eq!(t.initial_value(), 0.0);
        assert!(t.is_interactive());
        assert_eq!(t.kind_name(), "toggle");
    }

    #[test]
    fn contains_includes_edges() {
        let t = toggle_at(10.0, 10.0);
        assert!(t.contains(Point::new(10.0, 10.0)));
        assert!(t.contains(Point::new(25.0, 25.0)));
        assert!(!t.contains(Point::new(25.1, 12.0)));
        assert!(!t.contains(Point::new(9.9, 12.0)));
    }

    #[test]
    fn translate_moves_subpatch_offset_too() {
        let mut w = Widget {
            position: Point::new(10.0, 10.0),
            size: Size::square(100.0),
            channels: Channels::both("x"),
            kind: WidgetKind::SubpatchRef {
                name: "x".into(),
                child_path: "x.pd".into(),
                offset: Point::new(10.0, 10.0),
            },
        };
        w.translate(Point::new(5.0, -5.0));
        assert_eq!(w.position, Point::new(15.0, 5.0));
        match w.kind {
            WidgetKind::SubpatchRef { offset, .. } => assert_eq!(offset, Point::new(15.0, 5.0)),
            _ => unreachable!(),
        }
    }
}
