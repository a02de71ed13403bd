use std::rc::Rc;

use super::{Document, NodeId};
use crate::error::FormError;

/// Events dispatched through the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    /// A button or other control was activated.
    Click,
    /// A field lost focus. Validators re-check the field on this.
    FocusOut,
    /// A date picker finished a selection on its field.
    DateSelect,
}

/// Result returned by event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Handled; stops bubbling to ancestors.
    Consumed,
    /// Not handled; keeps bubbling.
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// Callback bound to a node. Receives the document and the node the event
/// was originally triggered on.
pub type Handler = Rc<dyn Fn(&mut Document, NodeId) -> Result<EventResult, FormError>>;

/// Wraps a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Document, NodeId) -> Result<EventResult, FormError> + 'static,
{
    Rc::new(f)
}
