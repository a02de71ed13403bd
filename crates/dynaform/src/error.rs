use crate::dom::{DomError, NodeId};

/// Errors raised while building or interacting with a form.
///
/// Everything except [`FormError::Dom`] points at a mistake in the builder
/// script or the engine setup and stops the build pass that raised it.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A builder script referenced a widget type nobody registered.
    #[error("unknown widget type `{0}`")]
    UnknownWidget(String),

    /// A composing widget (`nested`, `list`) was invoked without a nested callback.
    #[error("widget `{widget}` bound to `{name}` needs a nested builder callback")]
    MissingNested { widget: String, name: String },

    /// A date could not be written with the field's format.
    #[error("cannot format a date with `{0}`")]
    DateFormat(String),

    #[error("node {0:?} has no date picker attached")]
    NoDatePicker(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("invalid form configuration: {0}")]
    Config(#[from] serde_json::Error),
}
