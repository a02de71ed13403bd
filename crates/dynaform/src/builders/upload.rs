use crate::context::FormContext;
use crate::dom::{Element, NodeId};
use crate::error::FormError;
use crate::options::Options;
use crate::registry::Builder;

use super::{with_id, with_name};

pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let el = Element::new("input").attr("type", "file").attr("multiple", "multiple");
    let el = with_name(el, &options.name);
    Ok(ctx.doc_mut().create(with_id(el, &options.id)))
}
