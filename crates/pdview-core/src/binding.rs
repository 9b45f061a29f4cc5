//! Host callbacks bound to widgets after parsing.
//!
//! Parsing produces plain data. A host that wants widget output (to forward
//! to a running Pd instance, say) registers handlers here afterwards, keyed
//! by [`WidgetId`]. Widgets flattened out of subpatches are ordinary entries;
//! they route through the same registry as their parent's widgets.

use crate::document::ParsedDocument;
use crate::widget::{Channels, WidgetId};

/// Receives `(channel, value)` when a widget emits a number.
pub type ValueHandler = Box<dyn FnMut(&str, f32) + Send>;

/// Receives `(channel, text)` when a widget emits a message.
pub type MessageHandler = Box<dyn FnMut(&str, &str) + Send>;

#[derive(Default)]
struct Slot {
    on_value: Option<ValueHandler>,
    on_message: Option<MessageHandler>,
}

/// Per-widget callback slots plus each widget's channels.
///
/// ```rust
/// use std::sync::mpsc;
/// use pdview_core::{ChannelRegistry, ParsedDocument, parse_line};
///
/// let toggle = parse_line("#X obj 0 0 tgl 15 0 out in empty 0;").unwrap();
/// let doc = ParsedDocument::from_widgets(vec![toggle]);
///
/// let (tx, rx) = mpsc::channel();
/// let mut registry = ChannelRegistry::new(&doc);
/// registry.bind_all(
///     move |channel: &str, value: f32| tx.send((channel.to_string(), value)).unwrap(),
///     |_: &str, _: &str| {},
/// );
///
/// let (id, _) = doc.iter().next().unwrap();
/// assert!(registry.emit_value(id, 1.0));
/// assert_eq!(rx.recv().unwrap(), ("out".to_string(), 1.0));
/// ```
pub struct ChannelRegistry {
    channels: Vec<Channels>,
    slots: Vec<Slot>,
}

impl ChannelRegistry {
    /// Creates an empty registry covering every widget in `document`.
    pub fn new(document: &ParsedDocument) -> Self {
        let channels: Vec<Channels> = document.widgets().iter().map(|w| w.channels.clone()).collect();
        let slots = channels.iter().map(|_| Slot::default()).collect();
        Self { channels, slots }
    }

    /// Number of widgets covered.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the registry covers no widgets.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Channels of a widget.
    pub fn channels(&self, id: WidgetId) -> Option<&Channels> {
        self.channels.get(id.index())
    }

    /// Installs the numeric handler of one widget. Returns false for an unknown ID.
    pub fn bind_value<F>(&mut self, id: WidgetId, handler: F) -> bool
    where
        F: FnMut(&str, f32) + Send + 'static,
    {
        match self.slots.get_mut(id.index()) {
            Some(slot) => {
                slot.on_value = Some(Box::new(handler));
                true
            }
            None => false,
        }
    }

    /// Installs the message handler of one widget. Returns false for an unknown ID.
    pub fn bind_message<F>(&mut self, id: WidgetId, handler: F) -> bool
    where
        F: FnMut(&str, &str) + Send + 'static,
    {
        match self.slots.get_mut(id.index()) {
            Some(slot) => {
                slot.on_message = Some(Box::new(handler));
                true
            }
            None => false,
        }
    }

    /// Installs a clone of each handler on every widget.
    pub fn bind_all<V, M>(&mut self, on_value: V, on_message: M)
    where
        V: FnMut(&str, f32) + Clone + Send + 'static,
        M: FnMut(&str, &str) + Clone + Send + 'static,
    {
        for slot in &mut self.slots {
            slot.on_value = Some(Box::new(on_value.clone()));
            slot.on_message = Some(Box::new(on_message.clone()));
        }
    }

    /// Removes both handlers of a widget.
    pub fn unbind(&mut self, id: WidgetId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = Slot::default();
        }
    }

    /// Returns true if the widget has a numeric handler.
    pub fn is_bound(&self, id: WidgetId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.on_value.is_some())
    }

    /// Sends `value` out of the widget's outgoing channel.
    ///
    /// Returns true if a handler was called. Widgets without an outgoing
    /// channel emit nothing.
    pub fn emit_value(&mut self, id: WidgetId, value: f32) -> bool {
        let (Some(channels), Some(slot)) = (self.channels.get(id.index()), self.slots.get_mut(id.index()))
        else {
            return false;
        };
        let Some(send) = channels.send.as_deref() else {
            return false;
        };
        match slot.on_value.as_mut() {
            Some(handler) => {
                tracing::trace!(channel = send, value, "emit");
                handler(send, value);
                true
            }
            None => false,
        }
    }

    /// Sends a text message out of the widget's outgoing channel.
    pub fn emit_message(&mut self, id: WidgetId, text: &str) -> bool {
        let (Some(channels), Some(slot)) = (self.channels.get(id.index()), self.slots.get_mut(id.index()))
        else {
            return false;
        };
        let Some(send) = channels.send.as_deref() else {
            return false;
        };
        match slot.on_message.as_mut() {
            Some(handler) => {
                tracing::trace!(channel = send, text, "emit message");
                handler(send, text);
                true
            }
            None => false,
        }
    }

    /// Widgets whose incoming channel is `channel`, in document order.
    pub fn receivers<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = WidgetId> + 'a {
        self.channels
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.receive.as_deref() == Some(channel))
            .map(|(i, _)| WidgetId::from_index(i))
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bound = self.slots.iter().filter(|s| s.on_value.is_some()).count();
        f.debug_struct("ChannelRegistry")
            .field("widgets", &self.slots.len())
            .field("bound", &bound)
            .finish()
    }
}
