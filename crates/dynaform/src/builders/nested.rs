use crate::context::FormContext;
use crate::dom::{Element, NodeId};
use crate::error::FormError;
use crate::options::Options;
use crate::registry::Builder;

/// Group of fields bound to a sub-object: the nested callback runs against a
/// new context whose data is the resolved value and whose prefix is the
/// resolved name.
pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let nested = options.nested.clone().ok_or_else(|| FormError::MissingNested {
        widget: "nested".to_string(),
        name: options.name.clone(),
    })?;
    let el = ctx.doc_mut().create(Element::new("div").class("nested"));
    ctx.descend(el, options.value.clone(), options.name.clone(), &nested)?;
    Ok(el)
}
