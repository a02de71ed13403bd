use std::rc::Rc;

use crate::context::FormContext;
use crate::dom::{handler, DomEvent, NodeId};
use crate::error::FormError;
use crate::options::Options;
use crate::picker::DatePickerSettings;
use crate::registry::{Builder, WidgetKind};

/// Text field with a date picker attached.
///
/// Delegates to whatever `text` builder is registered, then hands the field
/// to the engine's date picker. Without a picker the field stays plain text.
pub fn build(ctx: &mut FormContext<'_>, options: &mut Options, _prev: Option<&Builder>) -> Result<NodeId, FormError> {
    let field = ctx.build_raw(WidgetKind::Text, options)?;

    let Some(picker) = ctx.engine().datepicker().map(Rc::clone) else {
        log::debug!("no date picker installed, `{}` stays a plain text field", options.name);
        return Ok(field);
    };

    let date_format = options
        .str("dateFormat")
        .map(str::to_string)
        .unwrap_or_else(|| ctx.engine().config().date_format.clone());
    let settings = DatePickerSettings {
        date_format,
        // Off unless the caller asks for it.
        show_anim: options.flag("showAnim"),
        // A finished pick re-validates the field.
        on_select: handler(|doc, field| doc.trigger(field, DomEvent::FocusOut)),
    };
    picker.attach(ctx.doc_mut(), field, settings)?;
    Ok(field)
}
