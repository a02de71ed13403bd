use crate::context::FormContext;
use crate::dom::{handler, DomEvent, Element, EventResult, NodeId};
use crate::error::FormError;
use crate::options::Options;
use crate::registry::Builder;

/// Action button.
///
/// The label becomes the button caption (and is taken out of `options`);
/// the `icon` option adds an icon class. Clicks run `on_click` and never
/// bubble, so they do not submit the enclosing form.
pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let icon = options.str("icon").map(str::to_string);
    let label = options.label.take();

    let mut el = Element::new("input")
        .attr("type", "submit")
        .class("button")
        .class("cancel")
        .class_if("image-button", icon.is_some() && label.is_none());
    if let Some(label) = label {
        el = el.attr("value", label);
    }
    if let Some(icon) = icon {
        el = el.class(icon);
    }

    let doc = ctx.doc_mut();
    let node = doc.create(el);
    let click = options.on_click.clone();
    doc.on(
        node,
        DomEvent::Click,
        handler(move |doc, target| {
            if let Some(f) = &click {
                f(doc, target)?;
            }
            Ok(EventResult::Consumed)
        }),
    )?;
    Ok(node)
}
