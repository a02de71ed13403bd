use std::rc::Rc;

use serde_json::Value;

use crate::config::FormConfig;
use crate::context::FormContext;
use crate::dom::{Document, NodeId, Selector};
use crate::error::FormError;
use crate::picker::DatePicker;
use crate::registry::{BuilderFn, Registry};
use crate::validate::{self, Validator, ValidatorSettings};

/// The form engine: the widget registry plus its optional collaborators.
///
/// Built once with [`Engine::builder`] and shared behind an `Rc`; handlers
/// installed by list widgets keep a reference so they can build items long
/// after the initial pass.
///
/// ```rust,ignore
/// let engine = Engine::builder()
///     .config(FormConfig::from_json_str(r#"{ "dateFormat": "%d.%m.%Y" }"#)?)
///     .datepicker(ChronoDatePicker::new())
///     .build();
///
/// engine.dynaform(&mut doc, root, data, |ctx| {
///     ctx.text("title", json!({ "required": true }))?;
///     Ok(())
/// })?;
/// ```
pub struct Engine {
    registry: Registry,
    config: FormConfig,
    datepicker: Option<Rc<dyn DatePicker>>,
    validator: Option<Rc<dyn Validator>>,
    validator_settings: ValidatorSettings,
}

impl Engine {
    /// An engine with the built-in widgets and default configuration.
    ///
    /// Returned as an `Rc`: list handlers keep the engine alive after the
    /// build pass.
    pub fn new() -> Rc<Self> {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn registry(&self) -> &Registry { &self.registry }
    pub fn config(&self) -> &FormConfig { &self.config }
    pub fn datepicker(&self) -> Option<&Rc<dyn DatePicker>> { self.datepicker.as_ref() }
    pub fn validator(&self) -> Option<&Rc<dyn Validator>> { self.validator.as_ref() }
    pub fn validator_settings(&self) -> &ValidatorSettings { &self.validator_settings }

    /// Builds a form into `container`.
    ///
    /// Runs `script` against a root context bound to `data`, then activates
    /// validation on the `form` element enclosing `container`. Returns the
    /// container so calls can be chained by the host.
    pub fn dynaform<F>(self: &Rc<Self>, doc: &mut Document, container: NodeId, data: Value, script: F) -> Result<NodeId, FormError>
    where
        F: FnOnce(&mut FormContext<'_>) -> Result<(), FormError>,
    {
        log::debug!("building form into {container:?}");
        {
            let mut ctx = FormContext::new(Rc::clone(self), doc, container, data, None);
            script(&mut ctx)?;
        }
        self.activate_validation(doc, container)?;
        Ok(container)
    }

    fn activate_validation(&self, doc: &mut Document, container: NodeId) -> Result<(), FormError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };
        if !self.config.validate {
            log::debug!("validation disabled by configuration");
            return Ok(());
        }
        match doc.closest(container, Selector::Tag("form")) {
            Some(form) => {
                log::debug!("activating validation on {form:?}");
                validator.activate(doc, form, &self.validator_settings)
            }
            None => {
                log::debug!("{container:?} has no enclosing form, validation skipped");
                Ok(())
            }
        }
    }
}

// ── EngineBuilder ─────────────────────────────────────────────────────────

/// Configures an [`Engine`]. Starts from the built-in widgets.
pub struct EngineBuilder {
    registry: Registry,
    config: FormConfig,
    datepicker: Option<Rc<dyn DatePicker>>,
    validator: Option<Rc<dyn Validator>>,
    validator_settings: ValidatorSettings,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::with_builtins(),
            config: FormConfig::default(),
            datepicker: None,
            validator: None,
            validator_settings: ValidatorSettings::default(),
        }
    }

    /// Adds or replaces widget builders. See [`Registry::register`].
    pub fn register<I, K>(mut self, builders: I) -> Self
    where
        I: IntoIterator<Item = (K, BuilderFn)>,
        K: Into<String>,
    {
        self.registry.register(builders);
        self
    }

    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn datepicker(mut self, picker: impl DatePicker + 'static) -> Self {
        self.datepicker = Some(Rc::new(picker));
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }

    /// Same as [`EngineBuilder::validator`], for a validator the caller keeps a handle to.
    pub fn shared_validator(mut self, validator: Rc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn validator_settings(mut self, settings: ValidatorSettings) -> Self {
        self.validator_settings = settings;
        self
    }

    pub fn build(self) -> Rc<Engine> {
        if let (Some(validator), Some(picker)) = (&self.validator, &self.datepicker) {
            validate::install_date_rule(validator.as_ref(), Rc::clone(picker));
        }
        Rc::new(Engine {
            registry: self.registry,
            config: self.config,
            datepicker: self.datepicker,
            validator: self.validator,
            validator_settings: self.validator_settings,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
