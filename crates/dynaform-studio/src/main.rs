//! Renders the contact form against a JSON document and replays list
//! interactions on it.
//!
//! Usage:
//!   dynaform-studio                                  # built-in sample data
//!   dynaform-studio --data person.json --add 2       # two extra phone rows
//!   dynaform-studio --remove 0 --move-up 1           # edit the phone list
//!   dynaform-studio --config form.json --log dynaform=trace

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::{Value, json};

use dynaform::builders::list;
use dynaform::logging::{LoggingConfig, init_logging};
use dynaform::prelude::*;
use dynaform::validate::ValidationMethod;

const SAMPLE: &str = include_str!("../forms/contact.json");

#[derive(Parser, Debug)]
#[command(name = "dynaform-studio")]
#[command(about = "Render a data-driven contact form and replay list edits")]
struct Args {
    /// JSON document bound to the form (defaults to a built-in sample)
    #[arg(short = 'd', long)]
    data: Option<PathBuf>,

    /// Form configuration (idScheme, dateFormat, validate)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Click the phone list's add button this many times
    #[arg(long, default_value_t = 0)]
    add: usize,

    /// Remove the phone item at this position
    #[arg(long)]
    remove: Option<usize>,

    /// Move the phone item at this position up by one
    #[arg(long)]
    move_up: Option<usize>,

    /// Log filter, env_logger syntax
    #[arg(long)]
    log: Option<String>,
}

/// Validator stand-in that reports what the engine asks of it.
struct LogValidator;

impl Validator for LogValidator {
    fn activate(&self, doc: &mut Document, form: NodeId, settings: &ValidatorSettings) -> Result<(), FormError> {
        let required = doc.find(form, Selector::Class("required")).len();
        log::info!("validation active on {form:?}: {required} required field(s), messages in <{}>", settings.wrapper);
        Ok(())
    }

    fn add_method(&self, name: &str, _method: ValidationMethod, message: &str) {
        log::info!("validation method `{name}` registered (\"{message}\")");
    }

    fn add_class_rule(&self, class: &str, method: &str) {
        log::info!("fields with class `{class}` checked by `{method}`");
    }
}

fn contact_form(ctx: &mut FormContext<'_>) -> Result<(), FormError> {
    ctx.text("firstName", json!({ "required": true }))?
        .text("lastName", json!({}))?
        .datepicker("birthDate", json!({}))?
        .checkbox("newsletter", json!({ "label": "Send me the newsletter" }))?
        .nested("address", json!({}), |address| {
            address.text("street", json!({}))?.text("city", json!({}))?;
            Ok(())
        })?
        .list("phones", json!({ "label": "Phone numbers" }), |phone| {
            phone.text("kind", json!({}))?.text("number", json!({ "required": true }))?;
            Ok(())
        })?
        .textarea("notes", json!({}))?
        .upload("attachments", json!({ "label": false }))?;
    Ok(())
}

fn read_json(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &args.log {
        logging = logging.filter(filter);
    }
    init_logging(logging);

    let data: Value = match &args.data {
        Some(path) => serde_json::from_str(&read_json(path)?).with_context(|| format!("parsing {}", path.display()))?,
        None => serde_json::from_str(SAMPLE).context("parsing built-in sample")?,
    };
    let config = match &args.config {
        Some(path) => FormConfig::from_json_str(&read_json(path)?).with_context(|| format!("loading {}", path.display()))?,
        None => FormConfig::default(),
    };

    let engine = Engine::builder()
        .config(config)
        .datepicker(ChronoDatePicker::new())
        .validator(LogValidator)
        .build();

    let mut doc = Document::new();
    let form = doc.create(Element::new("form").attr("method", "post"));
    let root = doc.create(Element::new("div").class("dynaform"));
    doc.append(form, root)?;

    engine.dynaform(&mut doc, root, data, contact_form).context("building form")?;
    println!("{}", doc.to_html(form));

    if args.add == 0 && args.remove.is_none() && args.move_up.is_none() {
        return Ok(());
    }

    let phones = doc
        .find(root, Selector::Class("list"))
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("form has no list widget"))?;

    if args.add > 0 {
        let add = list::add_button(&doc, phones).ok_or_else(|| anyhow!("phone list has no add button"))?;
        for _ in 0..args.add {
            doc.click(add)?;
        }
        log::info!("added {} phone item(s)", args.add);
    }
    if let Some(index) = args.remove {
        click_control(&mut doc, phones, index, "remove")?;
    }
    if let Some(index) = args.move_up {
        click_control(&mut doc, phones, index, "up")?;
    }

    log::info!("phone items now bound to {:?}", list::item_paths(&doc, phones));
    println!();
    println!("{}", doc.to_html(form));
    Ok(())
}

/// Clicks the `icon` control of the item at `index`.
fn click_control(doc: &mut Document, list_node: NodeId, index: usize, icon: &str) -> Result<()> {
    let items = list::items(doc, list_node);
    let item = *items
        .get(index)
        .ok_or_else(|| anyhow!("no phone item at {index} (list has {})", items.len()))?;
    let button = list::control_of(doc, item, icon).ok_or_else(|| anyhow!("item {index} has no `{icon}` button"))?;
    doc.click(button)?;
    log::info!("clicked `{icon}` on phone item {index}");
    Ok(())
}
