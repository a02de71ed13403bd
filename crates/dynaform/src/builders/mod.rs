//! Built-in widget builders.
//!
//! Each builder turns resolved [`Options`](crate::options::Options) into a
//! node of the output tree. They are registered by
//! [`Registry::with_builtins`](crate::registry::Registry::with_builtins) and
//! can be replaced or wrapped like any user builder.

pub mod button;
pub mod checkbox;
pub mod datepicker;
pub mod list;
pub mod nested;
pub mod text;
pub mod textarea;
pub mod upload;

use crate::dom::Element;
use crate::registry::{builder, BuilderFn, WidgetKind};

/// The built-in builders, keyed by kind.
pub fn builtins() -> Vec<(WidgetKind, BuilderFn)> {
    vec![
        (WidgetKind::Text, builder(text::build)),
        (WidgetKind::Textarea, builder(textarea::build)),
        (WidgetKind::Datepicker, builder(datepicker::build)),
        (WidgetKind::Checkbox, builder(checkbox::build)),
        (WidgetKind::Nested, builder(nested::build)),
        (WidgetKind::Button, builder(button::build)),
        (WidgetKind::List, builder(list::build)),
        (WidgetKind::Upload, builder(upload::build)),
    ]
}

/// Sets `name` unless the field has no path (unbound at the root).
fn with_name(el: Element, name: &str) -> Element {
    if name.is_empty() { el } else { el.attr("name", name) }
}

/// Sets `id` unless the field has no path.
fn with_id(el: Element, id: &str) -> Element {
    if id.is_empty() { el } else { el.attr("id", id) }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::context::FormContext;
    use crate::dom::{handler, Document, DomEvent, EventResult, NodeId, Selector};
    use crate::engine::Engine;
    use crate::error::FormError;
    use crate::options::{Field, FieldOptions};
    use crate::registry::WidgetKind;

    fn render<F>(data: Value, script: F) -> (Document, NodeId)
    where
        F: FnOnce(&mut FormContext<'_>) -> Result<(), FormError>,
    {
        let engine = Engine::new();
        let mut doc = Document::new();
        let root = doc.create_element("div");
        engine.dynaform(&mut doc, root, data, script).unwrap();
        (doc, root)
    }

    fn inner(doc: &Document, root: NodeId) -> String {
        doc.children(root).iter().map(|&n| doc.to_html(n)).collect()
    }

    #[test]
    fn text_and_textarea_markup() {
        let (doc, root) = render(json!({ "age": 42, "notes": "hi" }), |ctx| {
            ctx.text("age", json!({ "label": false }))?
                .textarea("notes", json!({ "label": false, "required": true }))?;
            Ok(())
        });
        assert_eq!(
            inner(&doc, root),
            concat!(
                r#"<input type="text" name="age" id="age" value="42" class="text">"#,
                r#"<textarea name="notes" id="notes" class="required textarea">hi</textarea>"#,
            )
        );
    }

    #[test]
    fn upload_allows_multiple_files() {
        let (doc, root) = render(json!({}), |ctx| {
            ctx.upload("files", json!({ "label": false }))?;
            Ok(())
        });
        assert_eq!(
            inner(&doc, root),
            r#"<input type="file" multiple="multiple" name="files" id="files" class="upload">"#
        );
    }

    #[test]
    fn checkbox_renders_its_own_label() {
        let (doc, root) = render(json!({ "agree": true, "spam": 0 }), |ctx| {
            ctx.checkbox("agree", json!({}))?.checkbox("spam", json!({}))?;
            Ok(())
        });
        let children = doc.children(root);
        assert_eq!(
            doc.to_html(children[0]),
            concat!(
                r#"<div class="labeled checkbox"><label for="agree" class="name">Agree</label>"#,
                r#"<input type="checkbox" name="agree" value="on" id="agree" class="checkbox" checked></div>"#,
            )
        );
        let spam = doc.find_first(children[1], Selector::Tag("input")).unwrap();
        assert!(!doc.is_checked(spam));
        assert_eq!(doc.find(root, Selector::Class("element")).len(), 0);
    }

    #[test]
    fn button_uses_label_as_caption_and_swallows_clicks() {
        let clicks = Rc::new(Cell::new(0));
        let c = Rc::clone(&clicks);
        let (mut doc, root) = render(json!({}), move |ctx| {
            ctx.button(FieldOptions::new().label("Save").on_click(move |_, _| {
                c.set(c.get() + 1);
                Ok(())
            }))?
            .invoke(WidgetKind::Button, Field::unbound().options(json!({ "icon": "trash" })))?;
            Ok(())
        });

        let bubbled = Rc::new(Cell::new(false));
        let b = Rc::clone(&bubbled);
        doc.on(
            root,
            DomEvent::Click,
            handler(move |_, _| {
                b.set(true);
                Ok(EventResult::Consumed)
            }),
        )
        .unwrap();

        let buttons = doc.children(root).to_vec();
        assert_eq!(doc.to_html(buttons[0]), r#"<input type="submit" value="Save" class="button cancel">"#);
        assert_eq!(
            doc.to_html(buttons[1]),
            r#"<input type="submit" class="button cancel image-button trash">"#
        );

        assert_eq!(doc.click(buttons[0]).unwrap(), EventResult::Consumed);
        doc.click(buttons[1]).unwrap();
        assert_eq!(clicks.get(), 1);
        assert!(!bubbled.get());
    }

    #[test]
    fn nested_without_callback_is_a_configuration_error() {
        let engine = Engine::new();
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let err = engine
            .dynaform(&mut doc, root, json!({}), |ctx| {
                ctx.invoke(WidgetKind::Nested, Field::bound("address"))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, FormError::MissingNested { widget, name } if widget == "nested" && name == "address"));
    }

    #[test]
    fn nested_groups_fields_under_the_sub_object() {
        let (doc, root) = render(json!({ "address": { "city": "Oslo" } }), |ctx| {
            ctx.nested("address", json!({ "label": false }), |addr| {
                addr.text("city", json!({ "label": false }))?;
                Ok(())
            })?;
            Ok(())
        });
        assert_eq!(
            inner(&doc, root),
            r#"<div class="nested"><input type="text" name="address.city" id="addresscity" value="Oslo" class="text"></div>"#
        );
    }
}
