use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A single parameter value carried by a binding.
///
/// Model fields hold either numeric quantities or free-form keywords
/// (schedule names, material choices). Values deserialized from tabular
/// files arrive as strings and are coerced to [`ParamValue::Number`] when
/// they parse as a float, which is what makes persisted numeric columns
/// compare equal to freshly generated ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Numeric value, stored as a double like the model layer does.
    Number(f64),
    /// Literal text value, kept verbatim.
    Text(String),
}

impl ParamValue {
    /// Parses a raw string, coercing to [`ParamValue::Number`] when possible.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(number) => ParamValue::Number(number),
            Err(_) => ParamValue::Text(trimmed.to_string()),
        }
    }

    /// Returns the numeric interpretation of the value, if any.
    ///
    /// Text values are re-parsed so arguments deserialized as strings can
    /// still feed numeric sampler parameters.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(number) => Some(*number),
            ParamValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Returns true when the value is textual and cannot be read as a number.
    pub fn is_textual(&self) -> bool {
        self.as_f64().is_none()
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(number) => write!(f, "{number}"),
            ParamValue::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(number: f64) -> Self {
        ParamValue::Number(number)
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        ParamValue::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        ParamValue::Text(text)
    }
}
