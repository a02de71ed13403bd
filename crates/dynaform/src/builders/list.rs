//! Dynamic list widget.
//!
//! ```text
//! div.list
//! ├── ul
//! │   └── li[data-path="phones[0]"]
//! │       ├── span.item.draggable
//! │       │   ├── input.button.up
//! │       │   ├── input.button.down
//! │       │   ├── span.itemElement   ← nested context, prefix `phones[0]`
//! │       │   └── input.button.remove
//! │       └── span.errors
//! └── input.button.add
//! ```
//!
//! Every item is bound to the index it had when it was added. Moving or
//! dragging items changes only their visual order, and removing an item
//! leaves the others' paths untouched. A new item takes the current item
//! count as its index.

use std::rc::Rc;

use serde_json::Value;

use crate::context::FormContext;
use crate::dom::{Document, Element, NodeId, Selector};
use crate::error::FormError;
use crate::naming;
use crate::options::{NestedFn, Options};
use crate::registry::{Builder, WidgetKind};

/// Class of the drag handle inside each item.
const HANDLE: &str = "item";

#[derive(Debug, Clone, Copy)]
struct Controls {
    move_buttons: bool,
    drag_and_drop: bool,
    remove_button: bool,
    add_button: bool,
}

struct ListState {
    name: String,
    /// Root container of the form the list belongs to.
    form: NodeId,
    items: NodeId,
    nested: NestedFn,
    controls: Controls,
}

pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let nested = options.nested.clone().ok_or_else(|| FormError::MissingNested {
        widget: "list".to_string(),
        name: options.name.clone(),
    })?;
    let controls = Controls {
        move_buttons: options.enabled("moveButtons"),
        drag_and_drop: options.enabled("dragAndDrop"),
        remove_button: options.enabled("removeButton"),
        add_button: options.enabled("addButton"),
    };

    let doc = ctx.doc_mut();
    let root = doc.create_element("div");
    let items = doc.create_element("ul");
    doc.append(root, items)?;

    let state = Rc::new(ListState { name: options.name.clone(), form: ctx.root(), items, nested, controls });

    match &options.value {
        Value::Array(values) => {
            for (index, value) in values.iter().enumerate() {
                add_item(ctx, &state, index, value.clone())?;
            }
        }
        Value::Null => {}
        other => log::warn!("list `{}` is bound to a non-array value {other}; starting empty", state.name),
    }

    if controls.drag_and_drop {
        ctx.doc_mut().make_sortable(items, HANDLE)?;
    }

    if controls.add_button {
        let engine = Rc::clone(ctx.engine());
        let list = Rc::clone(&state);
        let mut add = Options::default().set("icon", "add").on_click(move |doc, _| {
            let index = doc.children(list.items).len();
            let mut ctx = FormContext::new(Rc::clone(&engine), doc, list.items, Value::Null, None).with_root(list.form);
            add_item(&mut ctx, &list, index, Value::Null)
        });
        let add = ctx.build_raw(WidgetKind::Button, &mut add)?;
        ctx.doc_mut().append(root, add)?;
    }

    Ok(root)
}

fn add_item(ctx: &mut FormContext<'_>, list: &ListState, index: usize, value: Value) -> Result<(), FormError> {
    let path = naming::array_item(&list.name, index);
    log::debug!("list `{}`: adding item `{path}`", list.name);

    let doc = ctx.doc_mut();
    let li = doc.create(Element::new("li").attr("data-path", &path));
    doc.append(list.items, li)?;
    let item = doc.create(Element::new("span").class(HANDLE).class_if("draggable", list.controls.drag_and_drop));
    doc.append(li, item)?;

    if list.controls.move_buttons {
        let up = control(ctx, "up", move |doc, _| {
            if let Some(prev) = doc.prev_sibling(li) {
                doc.insert_before(li, prev)?;
            }
            Ok(())
        })?;
        let down = control(ctx, "down", move |doc, _| {
            if let Some(next) = doc.next_sibling(li) {
                doc.insert_after(li, next)?;
            }
            Ok(())
        })?;
        ctx.doc_mut().append(item, up)?;
        ctx.doc_mut().append(item, down)?;
    }

    let element = ctx.doc_mut().create(Element::new("span").class("itemElement"));
    ctx.doc_mut().append(item, element)?;
    ctx.descend(element, value, path, &list.nested)?;

    if list.controls.remove_button {
        let remove = control(ctx, "remove", move |doc, _| {
            log::debug!("removing list item {li:?}");
            doc.remove(li)?;
            Ok(())
        })?;
        ctx.doc_mut().append(item, remove)?;
    }

    let errors = ctx.doc_mut().create(Element::new("span").class("errors"));
    ctx.doc_mut().append(li, errors)?;
    Ok(())
}

fn control<F>(ctx: &mut FormContext<'_>, icon: &str, on_click: F) -> Result<NodeId, FormError>
where
    F: Fn(&mut Document, NodeId) -> Result<(), FormError> + 'static,
{
    let mut options = Options::default().set("icon", icon).on_click(on_click);
    ctx.build_raw(WidgetKind::Button, &mut options)
}

// ── inspection ────────────────────────────────────────────────────────────

/// The `ul` holding the items of the list rendered at or below `list`.
fn items_container(doc: &Document, list: NodeId) -> Option<NodeId> {
    if doc.tag(list) == Some("ul") {
        Some(list)
    } else {
        doc.find_first(list, Selector::Tag("ul"))
    }
}

/// The `li` items of the list rendered at or below `list`, in visual order.
pub fn items(doc: &Document, list: NodeId) -> Vec<NodeId> {
    items_container(doc, list)
        .map(|ul| doc.children(ul).to_vec())
        .unwrap_or_default()
}

/// Paths the items of `list` are bound to, in visual order.
pub fn item_paths(doc: &Document, list: NodeId) -> Vec<String> {
    items(doc, list)
        .into_iter()
        .filter_map(|li| doc.attr(li, "data-path").map(str::to_string))
        .collect()
}

/// The control button with class `icon` (`up`, `down`, `remove`) of `item`.
pub fn control_of(doc: &Document, item: NodeId, icon: &str) -> Option<NodeId> {
    doc.find(item, Selector::Class(icon))
        .into_iter()
        .find(|&n| doc.has_class(n, "button") && doc.closest(n, Selector::Tag("li")) == Some(item))
}

/// The add button of `list`.
pub fn add_button(doc: &Document, list: NodeId) -> Option<NodeId> {
    let ul = items_container(doc, list)?;
    doc.next_sibling(ul).filter(|&n| doc.has_class(n, "add"))
}
