use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::FormContext;
use crate::dom::{Document, NodeId};
use crate::error::FormError;

/// Callback that fills a nested form context (sub-object or list item).
///
/// Must not keep the context past its own call: it borrows the document.
pub type NestedFn = Rc<dyn Fn(&mut FormContext<'_>) -> Result<(), FormError>>;

/// Click callback for buttons. Receives the clicked node.
pub type ClickFn = Rc<dyn Fn(&mut Document, NodeId) -> Result<(), FormError>>;

/// Keys owned by the dispatcher. Caller-supplied values for them never reach a builder.
const RESERVED: &[&str] = &["name", "id", "value", "label"];

// ── LabelSpec ─────────────────────────────────────────────────────────────

/// What the caller asked for in terms of a label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelSpec {
    /// Derive the label from the binding name, if there is one.
    #[default]
    Auto,
    /// No label at all (`"label": false`).
    Hidden,
    /// Explicit label text. An empty string renders no label.
    Text(String),
}

// ── FieldOptions ──────────────────────────────────────────────────────────

/// Caller-supplied options for one widget invocation.
///
/// Free-form attributes are JSON values so builder scripts can pass them
/// inline:
///
/// ```rust,ignore
/// ctx.text("title", json!({ "required": true }))?;
/// ctx.list("phones", json!({ "moveButtons": false, "label": "Phone numbers" }), |item| { ... })?;
/// ```
#[derive(Clone, Default)]
pub struct FieldOptions {
    pub label: LabelSpec,
    pub attrs: Map<String, Value>,
    pub on_click: Option<ClickFn>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, text: impl Into<String>) -> Self {
        self.label = LabelSpec::Text(text.into());
        self
    }

    pub fn no_label(mut self) -> Self {
        self.label = LabelSpec::Hidden;
        self
    }

    /// Sets a free-form option. `label` is routed to [`LabelSpec`].
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "label" {
            match value {
                Value::Bool(false) => self.label = LabelSpec::Hidden,
                Value::String(s) => self.label = LabelSpec::Text(s),
                _ => {}
            }
        } else {
            self.attrs.insert(key, value);
        }
        self
    }

    pub fn required(self) -> Self {
        self.set("required", true)
    }

    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Document, NodeId) -> Result<(), FormError> + 'static,
    {
        self.on_click = Some(Rc::new(f));
        self
    }
}

impl From<Value> for FieldOptions {
    /// Objects become options key by key; anything else is ignored.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().fold(Self::new(), |opts, (k, v)| opts.set(k, v)),
            _ => Self::new(),
        }
    }
}

// ── Field ─────────────────────────────────────────────────────────────────

/// One widget invocation: optional binding name, options and nested callback.
#[derive(Clone, Default)]
pub struct Field {
    pub bind: Option<String>,
    pub options: FieldOptions,
    pub nested: Option<NestedFn>,
}

impl Field {
    /// A field bound to the property `name` of the current data.
    pub fn bound(name: impl Into<String>) -> Self {
        Self { bind: Some(name.into()), ..Self::default() }
    }

    /// A field bound to the current data itself.
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: impl Into<FieldOptions>) -> Self {
        self.options = options.into();
        self
    }

    pub fn nested<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut FormContext<'_>) -> Result<(), FormError> + 'static,
    {
        self.nested = Some(Rc::new(f));
        self
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Resolved options handed to a builder.
///
/// `name`, `id` and `value` are computed by the dispatcher. A builder that
/// renders its own label takes `label` (sets it to `None`) so the
/// dispatcher does not wrap the result a second time.
#[derive(Clone, Default)]
pub struct Options {
    pub label: Option<String>,
    pub nested: Option<NestedFn>,
    pub attrs: Map<String, Value>,
    pub on_click: Option<ClickFn>,
    pub name: String,
    pub id: String,
    pub value: Value,
}

impl Options {
    /// Merges caller options with the computed identity fields.
    pub(crate) fn resolve(
        caller: FieldOptions,
        label: Option<String>,
        nested: Option<NestedFn>,
        name: String,
        id: String,
        value: Value,
    ) -> Self {
        let FieldOptions { mut attrs, on_click, .. } = caller;
        for key in RESERVED {
            attrs.remove(*key);
        }
        Self { label, nested, attrs, on_click, name, id, value }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Document, NodeId) -> Result<(), FormError> + 'static,
    {
        self.on_click = Some(Rc::new(f));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Truthiness of an option; absent counts as false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(truthy)
    }

    /// Optional capabilities: on unless explicitly `false`.
    pub fn enabled(&self, key: &str) -> bool {
        self.get(key) != Some(&Value::Bool(false))
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }
}

/// Loose truthiness of a data value (`null`, `false`, `0`, `""` are false).
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a data value for `value` attributes and text content.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
