//! Hooks for an external validation framework.
//!
//! The engine defines no rules of its own. It activates an installed
//! [`Validator`] on the enclosing form after a build. It supplies the error
//! placement used to show messages next to fields. When a date picker is
//! installed too, it registers a rule that checks date fields against their
//! picker format.

use std::rc::Rc;

use crate::dom::{Document, DomError, Element, NodeId, Selector};
use crate::error::FormError;
use crate::picker::DatePicker;

/// Name of the date rule, and of the class it is attached to.
pub const DATE_RULE: &str = "datepicker";
pub const DATE_RULE_MESSAGE: &str = "Invalid date.";

/// Checks the current value of a field.
pub type ValidationMethod = Rc<dyn Fn(&Document, NodeId, &str) -> bool>;

/// Places an error `label` node next to `field`.
pub type ErrorPlacement = Rc<dyn Fn(&mut Document, NodeId, NodeId) -> Result<(), DomError>>;

/// The validation framework, as seen by the engine.
pub trait Validator {
    /// Starts validating `form` with `settings`.
    fn activate(&self, doc: &mut Document, form: NodeId, settings: &ValidatorSettings) -> Result<(), FormError>;

    /// Makes `method` available under `name`.
    fn add_method(&self, name: &str, method: ValidationMethod, message: &str);

    /// Applies the method `method` to every field carrying `class`.
    fn add_class_rule(&self, class: &str, method: &str);
}

/// Settings shared by every form the engine activates validation on.
#[derive(Clone)]
pub struct ValidatorSettings {
    pub error_placement: ErrorPlacement,
    /// Tag the framework wraps each message in.
    pub wrapper: String,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            error_placement: Rc::new(place_error),
            wrapper: "b".to_string(),
        }
    }
}

/// Default error placement.
///
/// Uses the `.errors` container of the field's `.labeled` block or list
/// item, creating one right after the field when there is none. The
/// container is kept inside a `span.error-tooltip`.
pub fn place_error(doc: &mut Document, label: NodeId, field: NodeId) -> Result<(), DomError> {
    const SCOPE: &[Selector<'static>] = &[Selector::Class("labeled"), Selector::Tag("li")];

    let existing = doc
        .closest(field, Selector::AnyOf(SCOPE))
        .and_then(|scope| doc.find_first(scope, Selector::Class("errors")));
    let errors = match existing {
        Some(errors) => errors,
        None => {
            let errors = doc.create(Element::new("span").class("errors"));
            doc.insert_after(errors, field)?;
            errors
        }
    };

    let wrapped = doc.parent(errors).is_some_and(|p| doc.has_class(p, "error-tooltip"));
    if !wrapped {
        let tooltip = doc.create(Element::new("span").class("error-tooltip"));
        doc.wrap(errors, tooltip)?;
    }
    doc.append(errors, label)
}

/// The date rule: empty values pass, anything else must parse with the
/// field's picker format.
pub fn date_method(picker: Rc<dyn DatePicker>) -> ValidationMethod {
    Rc::new(move |doc, field, value| {
        if value.trim().is_empty() {
            return true;
        }
        let Some(format) = picker.date_format(doc, field) else {
            return false;
        };
        picker.parse_date(&format, value).is_ok()
    })
}

/// Registers the date rule with `validator`.
pub(crate) fn install_date_rule(validator: &dyn Validator, picker: Rc<dyn DatePicker>) {
    log::debug!("installing `{DATE_RULE}` validation rule");
    validator.add_method(DATE_RULE, date_method(picker), DATE_RULE_MESSAGE);
    validator.add_class_rule(DATE_RULE, DATE_RULE);
}
