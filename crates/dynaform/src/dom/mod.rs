//! Retained output tree.
//!
//! Builders produce nodes in a [`Document`]; interactive widgets bind
//! [`Handler`]s to them. The tree can be queried, mutated by handlers,
//! and serialized with [`Document::to_html`].

mod document;
mod error;
mod event;
mod html;

pub use document::{Document, Element, NodeId, NodeKind, Selector};
pub use error::DomError;
pub use event::{handler, DomEvent, EventResult, Handler};
