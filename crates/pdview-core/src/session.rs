//! Pointer interaction over a parsed document, without drawing.
//!
//! A [`Session`] owns the current value of every widget and turns pointer
//! presses and drags into value changes, which it emits through its
//! [`ChannelRegistry`]. Values arriving from outside ([`Session::receive`])
//! update widgets silently so a round trip through the host cannot loop.

use crate::binding::ChannelRegistry;
use crate::document::ParsedDocument;
use crate::widget::{Orientation, Point, ValueRange, Widget, WidgetId, WidgetKind};

/// Distance between each end of a slider and its usable track.
pub const SLIDER_TRACK_INSET: f32 = 6.0;

/// Vertical pointer travel before a number-entry drag takes effect.
pub const NUMBER_DRAG_THRESHOLD: f32 = 2.0;

/// Value change per unit of vertical drag on a number entry.
pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.5;

/// Smallest drag sensitivity accepted.
pub const MIN_DRAG_SENSITIVITY: f32 = 0.01;

/// Changes at or below this are not emitted.
pub const VALUE_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Slider {
        id: WidgetId,
    },
    Number {
        id: WidgetId,
        start_y: f32,
        start_value: f32,
        active: bool,
    },
}

/// Live widget state for one document.
#[derive(Debug)]
pub struct Session {
    document: ParsedDocument,
    values: Vec<f32>,
    registry: ChannelRegistry,
    drag: Option<Drag>,
    drag_sensitivity: f32,
}

impl Session {
    /// Starts a session with every widget at its initial value and no handlers bound.
    pub fn new(document: ParsedDocument) -> Self {
        let values = document.widgets().iter().map(Widget::initial_value).collect();
        let registry = ChannelRegistry::new(&document);
        Self {
            document,
            values,
            registry,
            drag: None,
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
        }
    }

    /// Sets the number-entry drag sensitivity (at least [`MIN_DRAG_SENSITIVITY`]).
    pub fn with_drag_sensitivity(mut self, sensitivity: f32) -> Self {
        self.drag_sensitivity = sensitivity.max(MIN_DRAG_SENSITIVITY);
        self
    }

    /// Replaces the document.
    ///
    /// Values return to their initial state and all handlers are dropped; the
    /// host binds again against the new widget IDs.
    pub fn reload(&mut self, document: ParsedDocument) {
        let sensitivity = self.drag_sensitivity;
        *self = Self::new(document).with_drag_sensitivity(sensitivity);
    }

    /// The document being driven.
    pub fn document(&self) -> &ParsedDocument {
        &self.document
    }

    /// Callback slots.
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Callback slots, for binding handlers.
    pub fn registry_mut(&mut self) -> &mut ChannelRegistry {
        &mut self.registry
    }

    /// Current value of a widget.
    pub fn value(&self, id: WidgetId) -> Option<f32> {
        self.values.get(id.index()).copied()
    }

    /// Current values in document order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns true while a press is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// First interactive widget, in document order, whose bounds contain `point`.
    pub fn hit_test(&self, point: Point) -> Option<WidgetId> {
        self.document
            .iter()
            .find(|(_, w)| w.is_interactive() && w.contains(point))
            .map(|(id, _)| id)
    }

    /// Presses the pointer at `point`, returning the widget hit.
    pub fn press(&mut self, point: Point) -> Option<WidgetId> {
        self.drag = None;
        let id = self.hit_test(point)?;
        let widget = self.document.get(id)?;
        tracing::debug!(id = id.index(), kind = widget.kind_name(), "press");

        match &widget.kind {
            WidgetKind::Toggle => {
                let next = if self.values[id.index()] >= 0.5 { 0.0 } else { 1.0 };
                self.values[id.index()] = next;
                self.registry.emit_value(id, next);
            }
            WidgetKind::Trigger => {
                self.registry.emit_value(id, 1.0);
            }
            WidgetKind::Slider {
                orientation, range, ..
            } => {
                let value = slider_value(widget, *orientation, *range, point);
                self.drag = Some(Drag::Slider { id });
                self.set_value(id, value);
            }
            WidgetKind::NumberEntry { .. } => {
                self.drag = Some(Drag::Number {
                    id,
                    start_y: point.y,
                    start_value: self.values[id.index()],
                    active: false,
                });
            }
            WidgetKind::Label { .. } | WidgetKind::SubpatchRef { .. } => {}
        }
        Some(id)
    }

    /// Moves a pressed pointer. Returns true if a value changed.
    pub fn drag(&mut self, point: Point) -> bool {
        match self.drag {
            Some(Drag::Slider { id }) => {
                let Some(widget) = self.document.get(id) else {
                    return false;
                };
                let WidgetKind::Slider {
                    orientation, range, ..
                } = widget.kind
                else {
                    return false;
                };
                let value = slider_value(widget, orientation, range, point);
                self.set_value(id, value)
            }
            Some(Drag::Number {
                id,
                start_y,
                start_value,
                ref mut active,
            }) => {
                if !*active && (point.y - start_y).abs() > NUMBER_DRAG_THRESHOLD {
                    *active = true;
                }
                if !*active {
                    return false;
                }
                let precision = match self.document.get(id).map(|w| &w.kind) {
                    Some(WidgetKind::NumberEntry {
                        display_precision, ..
                    }) => *display_precision,
                    _ => return false,
                };
                let raw = start_value + (start_y - point.y) * self.drag_sensitivity;
                self.set_value(id, round_to(raw, precision))
            }
            None => false,
        }
    }

    /// Ends any drag.
    pub fn release(&mut self) {
        self.drag = None;
    }

    /// Sets a widget's value, clamped into its range.
    ///
    /// Emits only if the stored value moved by more than [`VALUE_EPSILON`];
    /// returns whether it did.
    pub fn set_value(&mut self, id: WidgetId, value: f32) -> bool {
        let Some(range) = self.document.get(id).and_then(Widget::value_range) else {
            return false;
        };
        let clamped = range.clamp(value);
        let current = &mut self.values[id.index()];
        if (*current - clamped).abs() <= VALUE_EPSILON {
            return false;
        }
        *current = clamped;
        self.registry.emit_value(id, clamped);
        true
    }

    /// Sends a text message out of a widget.
    pub fn send_message(&mut self, id: WidgetId, text: &str) -> bool {
        self.registry.emit_message(id, text)
    }

    /// Applies a value arriving on `channel` to every widget listening on it.
    ///
    /// Nothing is emitted. Triggers have no state and ignore incoming values.
    /// Returns the number of widgets updated.
    pub fn receive(&mut self, channel: &str, value: f32) -> usize {
        let targets: Vec<WidgetId> = self.registry.receivers(channel).collect();
        let mut updated = 0;
        for id in targets {
            let Some(widget) = self.document.get(id) else {
                continue;
            };
            if matches!(widget.kind, WidgetKind::Trigger) {
                continue;
            }
            if let Some(range) = widget.value_range() {
                self.values[id.index()] = range.clamp(value);
                updated += 1;
            }
        }
        tracing::debug!(channel, value, updated, "receive");
        updated
    }

    /// Text shown by a number entry: its value at its display precision.
    ///
    /// `None` for other kinds.
    pub fn format_value(&self, id: WidgetId) -> Option<String> {
        let WidgetKind::NumberEntry {
            display_precision, ..
        } = self.document.get(id)?.kind
        else {
            return None;
        };
        let value = self.value(id)?;
        Some(format_number(value, display_precision))
    }
}

/// Formats `value` with `precision` decimals; precision 0 rounds to an integer.
pub fn format_number(value: f32, precision: u8) -> String {
    if precision == 0 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.*}", usize::from(precision))
    }
}

fn round_to(value: f32, precision: u8) -> f32 {
    let scale = 10f32.powi(i32::from(precision));
    (value * scale).round() / scale
}

/// Value under `point` along a slider's track.
fn slider_value(widget: &Widget, orientation: Orientation, range: ValueRange, point: Point) -> f32 {
    let (offset, extent) = match orientation {
        Orientation::Horizontal => (point.x - widget.position.x, widget.size.width),
        Orientation::Vertical => (point.y - widget.position.y, widget.size.height),
    };
    let track = extent - 2.0 * SLIDER_TRACK_INSET;
    if track <= 0.0 {
        return range.min;
    }
    let along = ((offset - SLIDER_TRACK_INSET) / track).clamp(0.0, 1.0);
    let normalized = match orientation {
        Orientation::Horizontal => along,
        Orientation::Vertical => 1.0 - along,
    };
    range.denormalize(normalized)
}
