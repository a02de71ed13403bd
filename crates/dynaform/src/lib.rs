//! Dynaform: builds form widget trees from nested JSON data.
//!
//! A builder script walks the data with a [`FormContext`], one call per
//! field. Each call derives the field's path name, identifier, label and
//! value, then dispatches to the builder registered under the widget type.
//! Lists add, remove and reorder their items through event handlers on the
//! output [`Document`].
//!
//! # Quick start
//!
//! ```rust,ignore
//! use dynaform::prelude::*;
//! use serde_json::json;
//!
//! let engine = Engine::builder().datepicker(ChronoDatePicker::new()).build();
//!
//! let mut doc = Document::new();
//! let form = doc.create_element("form");
//! let root = doc.create(Element::new("div").class("dynaform"));
//! doc.append(form, root)?;
//!
//! let data = json!({ "title": "Dr", "phones": [{ "number": "555" }] });
//! engine.dynaform(&mut doc, root, data, |ctx| {
//!     ctx.text("title", json!({ "required": true }))?
//!         .datepicker("birthDate", json!({}))?
//!         .list("phones", json!({}), |phone| {
//!             phone.text("number", json!({}))?;
//!             Ok(())
//!         })?;
//!     Ok(())
//! })?;
//!
//! println!("{}", doc.to_html(form));
//! ```
//!
//! # Custom widgets
//!
//! Register a builder under a new name, or under an existing one to wrap it:
//!
//! ```rust,ignore
//! let engine = Engine::builder()
//!     .register([("rating", builder(|ctx, opts, _prev| {
//!         let el = Element::new("input").attr("type", "range").attr("name", &opts.name);
//!         Ok(ctx.doc_mut().create(el))
//!     }))])
//!     .build();
//! ```

pub mod builders;
pub mod config;
pub mod context;
pub mod dom;
pub mod engine;
pub mod error;
pub mod logging;
pub mod naming;
pub mod options;
pub mod picker;
pub mod registry;
pub mod validate;

pub use config::FormConfig;
pub use context::FormContext;
pub use engine::{Engine, EngineBuilder};
pub use error::FormError;

/// Everything a builder script or custom widget needs.
pub mod prelude {
    pub use crate::config::FormConfig;
    pub use crate::context::FormContext;
    pub use crate::dom::{handler, Document, DomEvent, Element, EventResult, NodeId, Selector};
    pub use crate::engine::{Engine, EngineBuilder};
    pub use crate::error::FormError;
    pub use crate::naming::IdScheme;
    pub use crate::options::{Field, FieldOptions, Options};
    pub use crate::picker::{ChronoDatePicker, DatePicker};
    pub use crate::registry::{builder, Builder, BuilderFn, WidgetKind};
    pub use crate::validate::{Validator, ValidatorSettings};
}
