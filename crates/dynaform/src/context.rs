use std::rc::Rc;

use serde_json::Value;

use crate::dom::{Document, Element, NodeId};
use crate::engine::Engine;
use crate::error::FormError;
use crate::naming;
use crate::options::{Field, FieldOptions, LabelSpec, NestedFn, Options};
use crate::registry::WidgetKind;

/// The recursive binding unit: an output container, the data bound to it and
/// the path prefix of that data.
///
/// Builder scripts receive a context and call one widget method per field:
///
/// ```rust,ignore
/// engine.dynaform(&mut doc, root, data, |ctx| {
///     ctx.text("firstName", json!({ "required": true }))?
///         .nested("address", json!({}), |addr| {
///             addr.text("street", json!({}))?.text("city", json!({}))?;
///             Ok(())
///         })?;
///     Ok(())
/// })?;
/// ```
pub struct FormContext<'a> {
    engine: Rc<Engine>,
    doc: &'a mut Document,
    container: NodeId,
    /// Container the top-level build started from.
    root: NodeId,
    /// Detached subtrees of enclosing groups still under construction.
    pending: Vec<NodeId>,
    data: Value,
    prefix: Option<String>,
}

impl<'a> FormContext<'a> {
    pub fn new(
        engine: Rc<Engine>,
        doc: &'a mut Document,
        container: NodeId,
        data: Value,
        prefix: Option<String>,
    ) -> Self {
        Self { engine, doc, container, root: container, pending: Vec::new(), data, prefix }
    }

    /// Scopes identifier collision checks to `root` instead of the container.
    pub(crate) fn with_root(mut self, root: NodeId) -> Self {
        self.root = root;
        self
    }

    pub fn engine(&self) -> &Rc<Engine> { &self.engine }
    pub fn doc(&self) -> &Document { &*self.doc }
    pub fn doc_mut(&mut self) -> &mut Document { &mut *self.doc }
    pub fn container(&self) -> NodeId { self.container }
    pub fn root(&self) -> NodeId { self.root }
    pub fn data(&self) -> &Value { &self.data }
    pub fn prefix(&self) -> Option<&str> { self.prefix.as_deref() }

    // ── dispatch ──────────────────────────────────────────────────────────

    /// Builds one widget of type `kind` for `field` and appends it to the
    /// container.
    ///
    /// Fails with [`FormError::UnknownWidget`] when nothing is registered
    /// under the type name.
    pub fn invoke(&mut self, kind: impl Into<WidgetKind>, field: Field) -> Result<&mut Self, FormError> {
        let kind = kind.into();
        let type_name = kind.as_str();
        let builder = self
            .engine
            .registry()
            .get(type_name)
            .cloned()
            .ok_or_else(|| FormError::UnknownWidget(type_name.to_string()))?;

        let mut options = self.resolve(field);
        log::trace!("{type_name} `{}` (id `{}`)", options.name, options.id);
        self.check_identifier(&options);

        let node = builder.build(self, &mut options)?;
        self.doc.add_class(node, type_name)?;

        let node = match options.label.take() {
            Some(label) => self.wrap_label(node, &label, &options.id)?,
            None => node,
        };
        self.doc.append(self.container, node)?;
        Ok(self)
    }

    /// Runs the newest builder for `kind` directly: no label wrapping, no
    /// type class, nothing appended. Builders use this to delegate.
    pub fn build_raw(&mut self, kind: impl Into<WidgetKind>, options: &mut Options) -> Result<NodeId, FormError> {
        let kind = kind.into();
        let builder = self
            .engine
            .registry()
            .get(kind.as_str())
            .cloned()
            .ok_or_else(|| FormError::UnknownWidget(kind.to_string()))?;
        builder.build(self, options)
    }

    /// Runs `nested` against a fresh context over `container`.
    pub fn descend(
        &mut self,
        container: NodeId,
        data: Value,
        prefix: String,
        nested: &NestedFn,
    ) -> Result<(), FormError> {
        let mut pending = self.pending.clone();
        let top = self.doc.root_of(container);
        if self.doc.root_of(self.root) != top && !pending.contains(&top) {
            pending.push(top);
        }
        let mut child = FormContext::new(Rc::clone(&self.engine), &mut *self.doc, container, data, Some(prefix))
            .with_root(self.root);
        child.pending = pending;
        nested(&mut child)
    }

    fn resolve(&self, field: Field) -> Options {
        let Field { bind, options, nested } = field;

        let label = match &options.label {
            LabelSpec::Hidden => None,
            LabelSpec::Text(text) if !text.is_empty() => Some(text.clone()),
            LabelSpec::Text(_) | LabelSpec::Auto => bind.as_deref().map(naming::to_label),
        };
        let (name, value) = match bind.as_deref() {
            Some(bind) => (
                naming::param(self.prefix(), bind),
                self.data.get(bind).cloned().unwrap_or(Value::Null),
            ),
            None => (self.prefix.clone().unwrap_or_default(), self.data.clone()),
        };
        let id = naming::identifier(self.engine.config().id_scheme, &name);

        Options::resolve(options, label, nested, name, id, value)
    }

    fn check_identifier(&self, options: &Options) {
        if let Some(existing) = self.identifier_collision(&options.id) {
            log::warn!(
                "identifier `{}` for `{}` is already used by {existing:?}; labels and error placement may target the wrong field",
                options.id,
                options.name,
            );
        }
    }

    /// An element of this form already carrying `id`.
    ///
    /// Looks in the root container and in the detached subtrees of groups
    /// still being built.
    pub(crate) fn identifier_collision(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        std::iter::once(self.root)
            .chain(self.pending.iter().copied())
            .find_map(|scope| self.doc.element_by_id(scope, id))
    }

    fn wrap_label(&mut self, node: NodeId, label: &str, id: &str) -> Result<NodeId, FormError> {
        let wrapper = self.doc.create(Element::new("div").class("labeled"));
        let label = self.doc.create(label_for(Element::new("label"), id).class("name").text(label));
        let element = self.doc.create(Element::new("div").class("element"));
        self.doc.append(wrapper, label)?;
        self.doc.append(wrapper, element)?;
        self.doc.append(element, node)?;
        Ok(wrapper)
    }

    // ── built-in widgets ──────────────────────────────────────────────────

    pub fn text(&mut self, bind: &str, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(WidgetKind::Text, Field::bound(bind).options(options))
    }

    pub fn textarea(&mut self, bind: &str, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(WidgetKind::Textarea, Field::bound(bind).options(options))
    }

    pub fn datepicker(&mut self, bind: &str, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(WidgetKind::Datepicker, Field::bound(bind).options(options))
    }

    pub fn checkbox(&mut self, bind: &str, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(WidgetKind::Checkbox, Field::bound(bind).options(options))
    }

    pub fn upload(&mut self, bind: &str, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(WidgetKind::Upload, Field::bound(bind).options(options))
    }

    /// An unbound button; set its click callback with [`FieldOptions::on_click`].
    pub fn button(&mut self, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(WidgetKind::Button, Field::unbound().options(options))
    }

    /// Descends into the sub-object `bind`.
    pub fn nested<F>(&mut self, bind: &str, options: impl Into<FieldOptions>, f: F) -> Result<&mut Self, FormError>
    where
        F: Fn(&mut FormContext<'_>) -> Result<(), FormError> + 'static,
    {
        self.invoke(WidgetKind::Nested, Field::bound(bind).options(options).nested(f))
    }

    /// A dynamic list over the array `bind`; `f` fills each item.
    pub fn list<F>(&mut self, bind: &str, options: impl Into<FieldOptions>, f: F) -> Result<&mut Self, FormError>
    where
        F: Fn(&mut FormContext<'_>) -> Result<(), FormError> + 'static,
    {
        self.invoke(WidgetKind::List, Field::bound(bind).options(options).nested(f))
    }

    /// A widget bound to the context's own data, e.g. the scalar of a list item.
    pub fn unbound(&mut self, kind: impl Into<WidgetKind>, options: impl Into<FieldOptions>) -> Result<&mut Self, FormError> {
        self.invoke(kind, Field::unbound().options(options))
    }
}

/// Sets `for` unless the field has no identifier.
pub(crate) fn label_for(el: Element, id: &str) -> Element {
    if id.is_empty() { el } else { el.attr("for", id) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormConfig;
    use crate::dom::Selector;
    use crate::naming::IdScheme;
    use crate::registry::builder;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    fn form(engine: &Rc<Engine>, data: Value, script: impl FnOnce(&mut FormContext<'_>) -> Result<(), FormError>) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        engine.dynaform(&mut doc, root, data, script).unwrap();
        (doc, root)
    }

    fn input_named(doc: &Document, root: NodeId, name: &str) -> NodeId {
        doc.find(root, Selector::Tag("input"))
            .into_iter()
            .find(|&n| doc.attr(n, "name") == Some(name))
            .unwrap_or_else(|| panic!("no input named {name}"))
    }

    #[test]
    fn end_to_end_required_text() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, json!({ "title": "" }), |ctx| {
            ctx.text("title", json!({ "required": true }))?;
            Ok(())
        });

        let inputs = doc.find(root, Selector::Tag("input"));
        assert_eq!(inputs.len(), 1);
        let input = inputs[0];
        assert_eq!(doc.attr(input, "name"), Some("title"));
        assert_eq!(doc.attr(input, "value"), Some(""));
        assert!(doc.has_class(input, "required"));
        assert!(doc.has_class(input, "text"));
    }

    #[test]
    fn labels_are_derived_and_bound_to_identifier() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, json!({ "firstName": "Ann" }), |ctx| {
            ctx.text("firstName", json!({}))?;
            Ok(())
        });
        assert_eq!(
            doc.to_html(root),
            concat!(
                r#"<div><div class="labeled"><label for="firstName" class="name">First Name</label>"#,
                r#"<div class="element"><input type="text" name="firstName" id="firstName" value="Ann" class="text"></div>"#,
                r#"</div></div>"#,
            )
        );
    }

    #[test]
    fn explicit_and_hidden_labels() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, json!({}), |ctx| {
            ctx.text("a", json!({ "label": "Custom" }))?
                .text("b", json!({ "label": false }))?
                .text("zipCode", json!({ "label": "" }))?;
            Ok(())
        });
        let labels: Vec<String> =
            doc.find(root, Selector::Tag("label")).into_iter().map(|l| doc.text_content(l)).collect();
        assert_eq!(labels, vec!["Custom", "Zip Code"]);
    }

    #[test]
    fn hashed_scheme_reaches_rendered_identifiers() {
        let engine = Engine::builder()
            .config(FormConfig::default().id_scheme(IdScheme::Hashed))
            .build();
        let (doc, root) = form(&engine, json!({}), |ctx| {
            ctx.nested("a", json!({ "label": false }), |a| {
                a.text("b", json!({}))?;
                Ok(())
            })?
            .text("ab", json!({}))?;
            Ok(())
        });

        let nested = input_named(&doc, root, "a.b");
        let flat = input_named(&doc, root, "ab");
        let nested_id = doc.attr(nested, "id").unwrap();
        let flat_id = doc.attr(flat, "id").unwrap();
        assert_ne!(nested_id, flat_id);
        assert_eq!(nested_id, naming::identifier(IdScheme::Hashed, "a.b"));

        let fors: Vec<&str> = doc.find(root, Selector::Tag("label")).into_iter().filter_map(|l| doc.attr(l, "for")).collect();
        assert_eq!(fors, vec![nested_id, flat_id]);
    }

    #[test]
    fn identifier_collisions_are_detected_within_the_form() {
        let engine = Engine::new();
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let outside = doc.create(Element::new("input").attr("id", "city"));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        engine
            .dynaform(&mut doc, root, json!({}), move |ctx| {
                ctx.nested("a", json!({ "label": false }), move |a| {
                    a.text("b", json!({}))?;
                    s.borrow_mut().push(a.identifier_collision("ab"));
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        let nested = input_named(&doc, root, "a.b");
        assert_eq!(*seen.borrow(), vec![Some(nested)]);

        let ctx = FormContext::new(Rc::clone(&engine), &mut doc, root, Value::Null, None);
        assert_eq!(ctx.identifier_collision("ab"), Some(nested));
        assert_eq!(ctx.identifier_collision("city"), None);
        assert_eq!(ctx.identifier_collision(""), None);
        assert!(ctx.doc().contains(outside));
    }

    #[test]
    fn unbound_root_field_has_no_name_or_for() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, json!("x"), |ctx| {
            ctx.unbound(WidgetKind::Text, json!({ "label": "Search" }))?;
            Ok(())
        });
        assert_eq!(
            doc.to_html(root),
            concat!(
                r#"<div><div class="labeled"><label class="name">Search</label>"#,
                r#"<div class="element"><input type="text" value="x" class="text"></div></div></div>"#,
            )
        );
    }

    #[test]
    fn nested_paths_and_values() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, json!({ "contact": { "name": "Ann" } }), |ctx| {
            ctx.nested("contact", json!({}), |contact| {
                contact.text("name", json!({}))?;
                Ok(())
            })?;
            Ok(())
        });
        let input = input_named(&doc, root, "contact.name");
        assert_eq!(doc.attr(input, "value"), Some("Ann"));
        assert_eq!(doc.attr(input, "id"), Some("contactname"));
        assert!(doc.closest(input, Selector::Class("nested")).is_some());
    }

    #[test]
    fn missing_data_binds_null() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, Value::Null, |ctx| {
            ctx.nested("contact", json!({}), |contact| {
                contact.text("name", json!({}))?;
                Ok(())
            })?;
            Ok(())
        });
        let input = input_named(&doc, root, "contact.name");
        assert_eq!(doc.attr(input, "value"), Some(""));
    }

    #[test]
    fn unknown_widget_is_fatal() {
        let engine = Engine::new();
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let err = engine
            .dynaform(&mut doc, root, json!({}), |ctx| {
                ctx.invoke("rating", Field::bound("stars"))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownWidget(name) if name == "rating"));
    }

    #[test]
    fn caller_cannot_spoof_identity_fields() {
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        let engine = Engine::builder()
            .register([(
                "probe",
                builder(move |ctx, opts, _| {
                    *s.borrow_mut() = Some((opts.name.clone(), opts.id.clone(), opts.value.clone(), opts.get("name").cloned()));
                    Ok(ctx.doc_mut().create_element("span"))
                }),
            )])
            .build();

        form(&engine, json!({ "city": "Oslo" }), |ctx| {
            ctx.invoke("probe", Field::bound("city").options(json!({ "name": "x", "id": "y", "value": "z" })))?;
            Ok(())
        });

        let (name, id, value, raw_name) = seen.borrow_mut().take().unwrap();
        assert_eq!(name, "city");
        assert_eq!(id, "city");
        assert_eq!(value, json!("Oslo"));
        assert_eq!(raw_name, None);
    }

    #[test]
    fn second_registration_wraps_the_first() {
        let engine = Engine::builder()
            .register([(
                WidgetKind::Text,
                builder(|ctx, opts, prev| {
                    let prev = prev.ok_or_else(|| FormError::UnknownWidget("text".into()))?;
                    let field = prev.build(ctx, opts)?;
                    ctx.doc_mut().set_attr(field, "autocomplete", "off")?;
                    Ok(field)
                }),
            )])
            .build();

        let (doc, root) = form(&engine, json!({ "q": "rust" }), |ctx| {
            ctx.text("q", json!({ "label": false }))?;
            Ok(())
        });
        let input = input_named(&doc, root, "q");
        assert_eq!(doc.attr(input, "autocomplete"), Some("off"));
        assert_eq!(doc.attr(input, "value"), Some("rust"));
    }

    #[test]
    fn unbound_field_takes_prefix_and_whole_data() {
        let engine = Engine::new();
        let mut doc = Document::new();
        let root = doc.create_element("div");
        {
            let mut ctx = FormContext::new(Rc::clone(&engine), &mut doc, root, json!("a"), Some("tags[0]".into()));
            ctx.unbound(WidgetKind::Text, json!({})).unwrap();
        }
        let input = input_named(&doc, root, "tags[0]");
        assert_eq!(doc.attr(input, "value"), Some("a"));
        assert_eq!(doc.find(root, Selector::Tag("label")).len(), 0);
    }

    #[test]
    fn chained_calls_append_in_order() {
        let engine = Engine::new();
        let (doc, root) = form(&engine, json!({ "a": 1, "b": 2 }), |ctx| {
            ctx.text("a", json!({ "label": false }))?.text("b", json!({ "label": false }))?;
            Ok(())
        });
        let names: Vec<_> = doc.children(root).iter().map(|&n| doc.attr(n, "name").unwrap_or_default()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.attr(doc.children(root)[0], "value"), Some("1"));
    }
}
