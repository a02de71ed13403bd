//! Date-picker collaborator.
//!
//! The `datepicker` builder hands its text field to whatever [`DatePicker`]
//! the engine was built with. [`ChronoDatePicker`] is a headless
//! implementation: it records the format on the field and parses values
//! with `chrono`.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::dom::{Document, DomEvent, EventResult, Handler, NodeId};
use crate::error::FormError;

/// Attribute holding the date format of a picker-enabled field.
pub const FORMAT_ATTR: &str = "data-date-format";

/// Settings passed to [`DatePicker::attach`].
#[derive(Clone)]
pub struct DatePickerSettings {
    /// strftime-style format of the field's value.
    pub date_format: String,
    pub show_anim: bool,
    /// Runs once a selection completes, with the field as target.
    pub on_select: Handler,
}

pub trait DatePicker {
    /// Turns `field` into a date field.
    fn attach(&self, doc: &mut Document, field: NodeId, settings: DatePickerSettings) -> Result<(), FormError>;

    /// The format `field` was attached with, if any.
    fn date_format(&self, doc: &Document, field: NodeId) -> Option<String>;

    /// Parses `value` against `format`.
    fn parse_date(&self, format: &str, value: &str) -> Result<NaiveDate, chrono::ParseError>;
}

// ── ChronoDatePicker ──────────────────────────────────────────────────────

/// Headless date picker backed by `chrono` format strings.
#[derive(Debug, Clone, Default)]
pub struct ChronoDatePicker;

impl ChronoDatePicker {
    pub fn new() -> Self {
        Self
    }

    /// Simulates the user picking `date` on `field`: writes the formatted
    /// value and fires [`DomEvent::DateSelect`].
    pub fn select(&self, doc: &mut Document, field: NodeId, date: NaiveDate) -> Result<EventResult, FormError> {
        let format = self
            .date_format(doc, field)
            .ok_or(FormError::NoDatePicker(field))?;
        let mut value = String::new();
        write!(value, "{}", date.format(&format)).map_err(|_| FormError::DateFormat(format.clone()))?;
        doc.set_attr(field, "value", value)?;
        doc.trigger(field, DomEvent::DateSelect)
    }
}

impl DatePicker for ChronoDatePicker {
    fn attach(&self, doc: &mut Document, field: NodeId, settings: DatePickerSettings) -> Result<(), FormError> {
        doc.set_attr(field, FORMAT_ATTR, &settings.date_format)?;
        if settings.show_anim {
            doc.set_attr(field, "data-show-anim", "true")?;
        }
        doc.add_class(field, "hasDatepicker")?;
        doc.on(field, DomEvent::DateSelect, settings.on_select)?;
        Ok(())
    }

    fn date_format(&self, doc: &Document, field: NodeId) -> Option<String> {
        doc.attr(field, FORMAT_ATTR).map(str::to_string)
    }

    fn parse_date(&self, format: &str, value: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(value, format)
    }
}
