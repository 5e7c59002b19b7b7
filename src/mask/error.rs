use std::fmt;
use std::path::PathBuf;

/// Errors raised while configuring or attaching a mask.
///
/// None of these reach the host as a failure of an edit: edits only ever
/// produce an accepted value or a [`Rejection`].
#[derive(Debug)]
pub enum MaskError {
    /// No mask pattern was supplied, or it was empty.
    MissingPattern,
    /// The target field cannot hold free text.
    UnsupportedField,
    /// The synthesized matcher could not be built.
    Pattern(regex::Error),
    /// A configuration attribute held a value that could not be interpreted.
    InvalidAttribute { name: String, value: String },
    /// A configuration file extension is not one of the supported formats.
    UnsupportedConfigFormat(PathBuf),
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPattern => write!(f, "masked field has no mask pattern configured"),
            Self::UnsupportedField => {
                write!(f, "masked field is not a text field a mask can apply to")
            }
            Self::Pattern(err) => write!(f, "could not build mask matcher: {err}"),
            Self::InvalidAttribute { name, value } => {
                write!(f, "invalid value {value:?} for attribute `{name}`")
            }
            Self::UnsupportedConfigFormat(path) => write!(
                f,
                "unsupported config format for {} (expected .yaml, .yml or .json)",
                path.display()
            ),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Yaml(err) => write!(f, "YAML error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for MaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Yaml(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for MaskError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern(err)
    }
}

impl From<std::io::Error> for MaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for MaskError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<serde_json::Error> for MaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Why an edit was refused. The value reverts to the last accepted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The edit would hold more entered characters than the mask has slots.
    Overflow { capacity: usize, attempted: usize },
    /// No rebuilt value conforms to the mask.
    Unreformattable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow {
                capacity,
                attempted,
            } => write!(
                f,
                "edit needs {attempted} slots but the mask only has {capacity}"
            ),
            Self::Unreformattable => write!(f, "edit cannot be reformatted to fit the mask"),
        }
    }
}
