use crate::context::FormContext;
use crate::dom::{Element, NodeId};
use crate::error::FormError;
use crate::options::{display_value, Options};
use crate::registry::Builder;

use super::{with_id, with_name};

/// Multi-line text input; the value becomes its text content.
pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let mut el = with_id(with_name(Element::new("textarea"), &options.name), &options.id)
        .class_if("required", options.flag("required"));
    let text = display_value(&options.value);
    if !text.is_empty() {
        el = el.text(text);
    }
    Ok(ctx.doc_mut().create(el))
}
