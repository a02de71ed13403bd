use crate::context::FormContext;
use crate::dom::{Element, NodeId};
use crate::error::FormError;
use crate::options::{display_value, Options};
use crate::registry::Builder;

use super::{with_id, with_name};

/// Single-line text input.
pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let el = with_name(Element::new("input").attr("type", "text"), &options.name);
    let el = with_id(el, &options.id)
        .attr("value", display_value(&options.value))
        .class("text")
        .class_if("required", options.flag("required"));
    Ok(ctx.doc_mut().create(el))
}
