use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::context::FormContext;
use crate::dom::NodeId;
use crate::error::FormError;
use crate::options::Options;

/// A builder function: renders one widget from resolved options.
///
/// The third argument is the builder this one replaced, if any, so an
/// override can delegate to the implementation it specializes.
pub type BuilderFn =
    Rc<dyn Fn(&mut FormContext<'_>, &mut Options, Option<&Builder>) -> Result<NodeId, FormError>>;

/// Wraps a closure into a [`BuilderFn`].
pub fn builder<F>(f: F) -> BuilderFn
where
    F: Fn(&mut FormContext<'_>, &mut Options, Option<&Builder>) -> Result<NodeId, FormError> + 'static,
{
    Rc::new(f)
}

// ── WidgetKind ────────────────────────────────────────────────────────────

/// Widget type names. Built-ins are variants; anything else is `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Text,
    Textarea,
    Datepicker,
    Checkbox,
    Nested,
    Button,
    List,
    Upload,
    Custom(String),
}

impl WidgetKind {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::Textarea => "textarea",
            WidgetKind::Datepicker => "datepicker",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Nested => "nested",
            WidgetKind::Button => "button",
            WidgetKind::List => "list",
            WidgetKind::Upload => "upload",
            WidgetKind::Custom(name) => name,
        }
    }
}

impl From<&str> for WidgetKind {
    fn from(name: &str) -> Self {
        match name {
            "text" => WidgetKind::Text,
            "textarea" => WidgetKind::Textarea,
            "datepicker" => WidgetKind::Datepicker,
            "checkbox" => WidgetKind::Checkbox,
            "nested" => WidgetKind::Nested,
            "button" => WidgetKind::Button,
            "list" => WidgetKind::List,
            "upload" => WidgetKind::Upload,
            other => WidgetKind::Custom(other.to_string()),
        }
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Custom(name) => name,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Builder ───────────────────────────────────────────────────────────────

/// A registered builder, linked to the one it replaced.
pub struct Builder {
    func: BuilderFn,
    previous: Option<Rc<Builder>>,
}

impl Builder {
    /// Runs this builder, passing along the builder it replaced.
    pub fn build(&self, ctx: &mut FormContext<'_>, options: &mut Options) -> Result<NodeId, FormError> {
        (self.func)(ctx, options, self.previous.as_deref())
    }

    pub fn previous(&self) -> Option<&Builder> {
        self.previous.as_deref()
    }
}

// ── Registry ──────────────────────────────────────────────────────────────

/// Type name → builder table.
///
/// Registering a name that already exists replaces it for dispatch and keeps
/// the old builder reachable as the new one's `previous`:
///
/// ```rust,ignore
/// registry.register([(WidgetKind::Text, builder(|ctx, opts, prev| {
///     let prev = prev.ok_or_else(|| FormError::UnknownWidget("text".into()))?;
///     let field = prev.build(ctx, opts)?;
///     ctx.doc_mut().set_attr(field, "autocomplete", "off")?;
///     Ok(field)
/// }))]);
/// ```
#[derive(Default, Clone)]
pub struct Registry {
    builders: HashMap<String, Rc<Builder>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in widgets.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(crate::builders::builtins());
        registry
    }

    /// Adds or replaces builders. Can be called any number of times.
    pub fn register<I, K>(&mut self, builders: I)
    where
        I: IntoIterator<Item = (K, BuilderFn)>,
        K: Into<String>,
    {
        for (name, func) in builders {
            let name = name.into();
            let previous = self.builders.get(&name).cloned();
            if previous.is_some() {
                log::debug!("builder `{name}` replaced; previous stays reachable");
            }
            self.builders.insert(name, Rc::new(Builder { func, previous }));
        }
    }

    /// The newest builder registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Rc<Builder>> {
        self.builders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
