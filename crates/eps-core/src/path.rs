use std::fmt::{self, Display};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EpsError, ErrorInfo};

/// Separator used in the rendered `Class>Object>Field` form.
pub const PATH_SEPARATOR: char = '>';

/// Identifies one field on one model object.
///
/// Rendered and persisted as `Class>Object>Field`. Class and object names
/// compare case-insensitively, matching how the model layer resolves them;
/// field names compare case-sensitively because the model's field labels
/// are exact identifiers.
#[derive(Debug, Clone)]
pub struct BindingPath {
    /// Object class, e.g. `Material`.
    pub class: String,
    /// Object name within the class, e.g. `Concrete200`.
    pub object: String,
    /// Field name on the object, e.g. `Thickness`.
    pub field: String,
}

impl BindingPath {
    /// Creates a path from its three components.
    pub fn new(
        class: impl Into<String>,
        object: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            object: object.into(),
            field: field.into(),
        }
    }
}

impl PartialEq for BindingPath {
    fn eq(&self, other: &Self) -> bool {
        self.class.eq_ignore_ascii_case(&other.class)
            && self.object.eq_ignore_ascii_case(&other.object)
            && self.field == other.field
    }
}

impl Eq for BindingPath {}

impl Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.class,
            self.object,
            self.field,
            sep = PATH_SEPARATOR
        )
    }
}

impl FromStr for BindingPath {
    type Err = EpsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(PATH_SEPARATOR).collect();
        if parts.len() != 3 || parts.iter().any(|part| part.trim().is_empty()) {
            return Err(EpsError::Table(
                ErrorInfo::new("path-parse", "malformed binding path")
                    .with_context("path", raw)
                    .with_hint("expected Class>Object>Field"),
            ));
        }
        Ok(BindingPath::new(
            parts[0].trim(),
            parts[1].trim(),
            parts[2].trim(),
        ))
    }
}

impl Serialize for BindingPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BindingPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|err: EpsError| {
            D::Error::custom(format!("invalid binding path: {}", err.info().message))
        })
    }
}
