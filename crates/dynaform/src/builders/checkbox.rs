use crate::context::{label_for, FormContext};
use crate::dom::{Element, NodeId};
use crate::error::FormError;
use crate::options::{truthy, Options};
use crate::registry::Builder;

use super::{with_id, with_name};

/// Checkbox with its label on the same line.
///
/// Renders the label itself and takes it out of `options`, so the
/// dispatcher does not add the usual label wrapper.
pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let cb = with_name(Element::new("input").attr("type", "checkbox"), &options.name).attr("value", "on");
    let cb = with_id(cb, &options.id)
        .class("checkbox")
        .checked(truthy(&options.value));

    let label = label_for(Element::new("label"), &options.id)
        .class("name")
        .text(options.label.take().unwrap_or_default());

    let doc = ctx.doc_mut();
    let wrapper = doc.create(Element::new("div").class("labeled"));
    let label = doc.create(label);
    let cb = doc.create(cb);
    doc.append(wrapper, label)?;
    doc.append(wrapper, cb)?;
    Ok(wrapper)
}
