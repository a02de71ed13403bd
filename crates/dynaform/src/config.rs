use serde::Deserialize;

use crate::error::FormError;
use crate::naming::IdScheme;

/// Engine-wide settings, fixed when the [`crate::Engine`] is built.
///
/// Can be written in code with the chained setters or loaded from JSON:
///
/// ```json
/// { "idScheme": "hashed", "dateFormat": "%d.%m.%Y", "validate": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FormConfig {
    /// How field paths become element identifiers.
    pub id_scheme: IdScheme,
    /// strftime format used by date fields that do not set `dateFormat`.
    pub date_format: String,
    /// Activate the installed validator on the enclosing form after a build.
    pub validate: bool,
}

impl FormConfig {
    pub fn from_json_str(src: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn id_scheme(mut self, v: IdScheme) -> Self { self.id_scheme = v; self }
    pub fn date_format(mut self, v: impl Into<String>) -> Self { self.date_format = v.into(); self }
    pub fn validate(mut self, v: bool) -> Self { self.validate = v; self }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            id_scheme: IdScheme::Stripped,
            date_format: "%m/%d/%Y".to_string(),
            validate: true,
        }
    }
}
