//! Mask configuration, read from YAML/JSON documents or from the declarative
//! attributes of a field.

use crate::mask::{MaskError, MaskHandle, MaskOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const ATTR_KEY_MASK: &str = "key-mask";
pub const ATTR_KEY_MASK_PATTERN: &str = "key-mask-pattern";
pub const ATTR_KEY_MASK_PRESET: &str = "key-mask-preset";
pub const ATTR_KEY_MASK_INSERT_STATIC: &str = "key-mask-insert-static";
pub const ATTR_KEY_MASK_MODE: &str = "key-mask-mode";

/// How a bound field runs edits through the mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Let edits land, then repair or revert them.
    #[default]
    Reactive,
    /// Vet each keystroke before it lands; deletions are still repaired.
    Preventive,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reactive" => Ok(Self::Reactive),
            "preventive" => Ok(Self::Preventive),
            other => Err(format!(
                "unknown mode `{other}` (expected reactive or preventive)"
            )),
        }
    }
}

/// Ready-made masks for common formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    PhoneUs,
    ZipUs,
    Date,
    Time,
    PostalCa,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::PhoneUs,
        Preset::ZipUs,
        Preset::Date,
        Preset::Time,
        Preset::PostalCa,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PhoneUs => "phone-us",
            Self::ZipUs => "zip-us",
            Self::Date => "date",
            Self::Time => "time",
            Self::PostalCa => "postal-ca",
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            Self::PhoneUs => "(999) 999-9999",
            Self::ZipUs => "99999",
            Self::Date => "99/99/9999",
            Self::Time => "99:99",
            Self::PostalCa => "U9U 9U9",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == value)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|preset| preset.name()).collect();
                format!("unknown preset `{value}` (expected one of {})", known.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "MaskDocument")]
pub struct MaskConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    pub insert_static_characters: bool,
    pub mode: Mode,
}

/// On-disk shape of [`MaskConfig`]. The attribute spellings of the pattern
/// are accepted next to `pattern` and resolved like field attributes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct MaskDocument {
    key_mask: Option<String>,
    pattern: Option<String>,
    key_mask_pattern: Option<String>,
    preset: Option<Preset>,
    insert_static_characters: bool,
    mode: Mode,
}

impl Default for MaskDocument {
    fn default() -> Self {
        let config = MaskConfig::default();
        Self {
            key_mask: None,
            pattern: None,
            key_mask_pattern: None,
            preset: config.preset,
            insert_static_characters: config.insert_static_characters,
            mode: config.mode,
        }
    }
}

impl From<MaskDocument> for MaskConfig {
    fn from(document: MaskDocument) -> Self {
        Self {
            pattern: first_non_empty([
                document.key_mask,
                document.pattern,
                document.key_mask_pattern,
            ]),
            preset: document.preset,
            insert_static_characters: document.insert_static_characters,
            mode: document.mode,
        }
    }
}

fn first_non_empty(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            preset: None,
            insert_static_characters: true,
            mode: Mode::Reactive,
        }
    }
}

impl MaskConfig {
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, MaskError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, MaskError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, MaskError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(std::fs::read_to_string(path)?.as_str()),
            Some("json") => Self::from_json_str(std::fs::read_to_string(path)?.as_str()),
            _ => Err(MaskError::UnsupportedConfigFormat(path.to_path_buf())),
        }
    }

    /// Reads configuration from field attributes. `key-mask` wins over
    /// `key-mask-pattern` when both are set and non-empty.
    pub fn from_attributes(attributes: &IndexMap<String, String>) -> Result<Self, MaskError> {
        let mut config = Self {
            pattern: first_non_empty(
                [ATTR_KEY_MASK, ATTR_KEY_MASK_PATTERN].map(|name| attributes.get(name).cloned()),
            ),
            ..Self::default()
        };

        if let Some(value) = attributes.get(ATTR_KEY_MASK_PRESET) {
            config.preset = Some(parse_attribute(ATTR_KEY_MASK_PRESET, value)?);
        }
        if let Some(value) = attributes.get(ATTR_KEY_MASK_INSERT_STATIC) {
            config.insert_static_characters = parse_attribute(ATTR_KEY_MASK_INSERT_STATIC, value)?;
        }
        if let Some(value) = attributes.get(ATTR_KEY_MASK_MODE) {
            config.mode = parse_attribute(ATTR_KEY_MASK_MODE, value)?;
        }

        Ok(config)
    }

    /// The mask to compile: an explicit pattern first, then the preset.
    pub fn resolve_pattern(&self) -> Result<&str, MaskError> {
        if let Some(pattern) = self.pattern.as_deref()
            && !pattern.is_empty()
        {
            return Ok(pattern);
        }
        self.preset
            .map(Preset::pattern)
            .ok_or(MaskError::MissingPattern)
    }

    pub fn options(&self) -> MaskOptions {
        MaskOptions {
            insert_static_characters: self.insert_static_characters,
        }
    }

    pub fn attach(&self, initial: impl Into<String>) -> Result<MaskHandle, MaskError> {
        MaskHandle::attach(self.resolve_pattern()?, self.options(), initial)
    }
}

fn parse_attribute<T: FromStr>(name: &str, value: &str) -> Result<T, MaskError> {
    value.trim().parse().map_err(|_| MaskError::InvalidAttribute {
        name: name.to_string(),
        value: value.to_string(),
    })
}
