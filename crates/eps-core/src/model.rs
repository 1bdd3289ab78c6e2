use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{EpsError, ErrorInfo};
use crate::path::BindingPath;
use crate::value::ParamValue;

/// Declared numeric bounds on a model field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldRange {
    /// Inclusive lower bound, when declared.
    pub minimum: Option<f64>,
    /// Inclusive upper bound, when declared.
    pub maximum: Option<f64>,
}

impl FieldRange {
    /// Creates a range with both bounds declared.
    pub fn bounded(minimum: f64, maximum: f64) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    /// Returns true when `value` lies within the declared bounds.
    pub fn contains(&self, value: f64) -> bool {
        if let Some(minimum) = self.minimum {
            if value < minimum {
                return false;
            }
        }
        if let Some(maximum) = self.maximum {
            if value > maximum {
                return false;
            }
        }
        true
    }
}

/// Per-binding outcome of a field write.
///
/// A missing target is an outcome rather than an error so one absent
/// binding cannot abort a whole batch; the materializer aggregates these
/// per case instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOutcome {
    /// The value was written and lies within any declared range.
    Applied,
    /// The value was written but violates the declared range.
    RangeExceeded,
    /// The class, object or field does not exist on the model.
    NotFound,
}

/// Boundary trait over the excluded model layer.
///
/// The engine only ever reads and writes named fields on the model and asks
/// it to persist artifacts; everything else about the model (schema,
/// validation, simulation) stays behind this trait.
pub trait ModelStore {
    /// Reads the live value of the addressed field.
    ///
    /// Fails with [`EpsError::NotFound`] when the class, object or field
    /// cannot be resolved.
    fn locate_field(&self, path: &BindingPath) -> Result<ParamValue, EpsError>;

    /// Returns the declared numeric range of the addressed field.
    ///
    /// `Ok(None)` means the field declares no range; an `Err` means the
    /// lookup itself failed. The two cases are deliberately distinct.
    fn field_range(&self, path: &BindingPath) -> Result<Option<FieldRange>, EpsError>;

    /// Writes a value to the addressed field, reporting a three-way outcome.
    ///
    /// Range-exceeded values are still applied; the outcome is a soft
    /// warning for the caller.
    fn set_field(&mut self, path: &BindingPath, value: ParamValue) -> Result<SetOutcome, EpsError>;

    /// Persists the current model state under the given artifact name.
    fn save_artifact(&mut self, name: &str) -> Result<(), EpsError>;

    /// File extension used for artifacts produced from this model, without
    /// the leading dot (e.g. `idf`).
    fn artifact_extension(&self) -> &str;
}

/// In-memory [`ModelStore`] holding plain field maps.
///
/// Serves as the mock model for tests and demos: objects are keyed by
/// lowercased `(class, object)` so lookups match the case-insensitive
/// resolution rule, fields are exact keys, and saved artifact names are
/// recorded instead of written to disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryModel {
    objects: BTreeMap<(String, String), BTreeMap<String, ParamValue>>,
    ranges: BTreeMap<(String, String, String), FieldRange>,
    saved: Vec<String>,
    extension: String,
}

impl MemoryModel {
    /// Creates an empty model producing `.idf` artifacts.
    pub fn new() -> Self {
        Self {
            extension: "idf".to_string(),
            ..Self::default()
        }
    }

    fn object_key(class: &str, object: &str) -> (String, String) {
        (class.to_ascii_lowercase(), object.to_ascii_lowercase())
    }

    fn range_key(path: &BindingPath) -> (String, String, String) {
        (
            path.class.to_ascii_lowercase(),
            path.object.to_ascii_lowercase(),
            path.field.clone(),
        )
    }

    /// Inserts an object with the given fields, replacing any previous one.
    pub fn insert_object<I, F, V>(&mut self, class: &str, object: &str, fields: I)
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<ParamValue>,
    {
        let map = fields
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .collect();
        self.objects.insert(Self::object_key(class, object), map);
    }

    /// Declares a numeric range for the addressed field.
    pub fn declare_range(&mut self, path: &BindingPath, range: FieldRange) {
        self.ranges.insert(Self::range_key(path), range);
    }

    /// Removes an object and its fields, if present.
    pub fn remove_object(&mut self, class: &str, object: &str) {
        self.objects.remove(&Self::object_key(class, object));
    }

    /// Returns the current value of a field, if present.
    pub fn field(&self, class: &str, object: &str, field: &str) -> Option<&ParamValue> {
        self.objects
            .get(&Self::object_key(class, object))
            .and_then(|fields| fields.get(field))
    }

    /// Names of artifacts saved so far, in save order.
    pub fn saved_artifacts(&self) -> &[String] {
        &self.saved
    }
}

impl ModelStore for MemoryModel {
    fn locate_field(&self, path: &BindingPath) -> Result<ParamValue, EpsError> {
        self.field(&path.class, &path.object, &path.field)
            .cloned()
            .ok_or_else(|| {
                EpsError::NotFound(
                    ErrorInfo::new("field-missing", "field could not be resolved")
                        .with_context("path", path.to_string()),
                )
            })
    }

    fn field_range(&self, path: &BindingPath) -> Result<Option<FieldRange>, EpsError> {
        Ok(self.ranges.get(&Self::range_key(path)).copied())
    }

    fn set_field(&mut self, path: &BindingPath, value: ParamValue) -> Result<SetOutcome, EpsError> {
        let key = Self::object_key(&path.class, &path.object);
        let Some(fields) = self.objects.get_mut(&key) else {
            return Ok(SetOutcome::NotFound);
        };
        if !fields.contains_key(&path.field) {
            return Ok(SetOutcome::NotFound);
        }
        let exceeded = match (self.ranges.get(&Self::range_key(path)), value.as_f64()) {
            (Some(range), Some(number)) => !range.contains(number),
            _ => false,
        };
        fields.insert(path.field.clone(), value);
        if exceeded {
            Ok(SetOutcome::RangeExceeded)
        } else {
            Ok(SetOutcome::Applied)
        }
    }

    fn save_artifact(&mut self, name: &str) -> Result<(), EpsError> {
        self.saved.push(name.to_string());
        Ok(())
    }

    fn artifact_extension(&self) -> &str {
        &self.extension
    }
}
