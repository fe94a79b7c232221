use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::error::ConfigError;

/// Quiet period after the last keystroke before a lookup is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Values shorter than this never hit the lookup service.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Field description handed over by the host form.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FieldContent {
    /// Initial value.
    #[serde(default)]
    pub value: Option<String>,
    /// Raw autocomplete descriptor. Presence enables autocomplete; it is
    /// validated by [`AutocompleteConfig::from_value`].
    #[serde(default)]
    pub autocomplete: Option<JsonValue>,
}

impl FieldContent {
    pub fn plain(value: Option<String>) -> Self {
        Self {
            value,
            autocomplete: None,
        }
    }

    /// Returns the validated autocomplete configuration, `None` when
    /// autocomplete is not requested.
    pub fn autocomplete_config(&self) -> Result<Option<AutocompleteConfig>, ConfigError> {
        match &self.autocomplete {
            None | Some(JsonValue::Null) => Ok(None),
            Some(raw) => AutocompleteConfig::from_value(raw).map(Some),
        }
    }
}

/// Validated autocomplete descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteConfig {
    /// Name of the server side lookup action.
    pub action: String,
    /// Static parameters sent along with every query.
    pub params: JsonMap<String, JsonValue>,
    /// Names of sibling form fields whose current values are sent with every
    /// query.
    pub form_params: Vec<String>,
}

impl AutocompleteConfig {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: JsonMap::new(),
            form_params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: JsonMap<String, JsonValue>) -> Self {
        self.params = params;
        self
    }

    pub fn with_form_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.form_params = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_value(raw: &JsonValue) -> Result<Self, ConfigError> {
        let Some(obj) = raw.as_object() else {
            return Err(ConfigError::NotAnObject);
        };

        let action = obj
            .get("action")
            .and_then(JsonValue::as_str)
            .ok_or(ConfigError::MissingAction)?
            .to_string();

        let params = match obj.get("params") {
            None | Some(JsonValue::Null) => JsonMap::new(),
            Some(JsonValue::Object(map)) => map.clone(),
            Some(_) => return Err(ConfigError::ParamsNotMap),
        };

        let form_params = match obj.get("form_params") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or(ConfigError::FormParamsNotList)?,
            Some(_) => return Err(ConfigError::FormParamsNotList),
        };

        Ok(Self {
            action,
            params,
            form_params,
        })
    }

    /// Whether queries depend on sibling fields, which forces a fresh lookup
    /// whenever the field regains focus.
    pub fn depends_on_form(&self) -> bool {
        !self.form_params.is_empty()
    }
}

/// Timing knobs of the autocomplete behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
        }
    }
}

/// On-disk representation; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSettingsToml {
    debounce_ms: Option<u64>,
    min_query_chars: Option<usize>,
}

impl FieldSettings {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let parsed: FieldSettingsToml =
            toml::from_str(contents).map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        let defaults = Self::default();
        Ok(Self {
            debounce: parsed
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            min_query_chars: parsed.min_query_chars.unwrap_or(defaults.min_query_chars),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsUnreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_toml_str(&contents)
    }
}
