use std::fmt::{self, Display};

use eps_core::{BindingPath, EpsError, FieldRange, ModelStore, ParamValue, RngHandle};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::registry::SamplerRegistry;

/// Record of a generated value dropped because it violates the field's
/// declared range. Non-fatal: the binding keeps the surviving values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeWarning {
    /// Binding whose candidate value was dropped.
    pub path: BindingPath,
    /// The offending value.
    pub value: ParamValue,
    /// The declared range it violates.
    pub range: FieldRange,
}

/// One model field bound to a sampler and its generated parameter values.
///
/// The binding holds the field's address and the live value read at bind
/// time; it never writes to the model itself. Applying values is the batch
/// materializer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBinding {
    path: BindingPath,
    current_value: ParamValue,
    sampler_name: String,
    args: Vec<ParamValue>,
    params: Vec<ParamValue>,
}

impl FieldBinding {
    /// Binds a field to a sampler and generates its parameter values.
    ///
    /// Fails fast with [`EpsError::NotFound`] when the path does not resolve.
    /// With `args` omitted the binding defaults to a one-shot repeat of the
    /// field's current value.
    pub fn bind(
        model: &dyn ModelStore,
        registry: &SamplerRegistry,
        path: BindingPath,
        sampler_name: &str,
        args: Option<Vec<ParamValue>>,
        rng: &mut RngHandle,
    ) -> Result<Self, EpsError> {
        let current_value = model.locate_field(&path)?;
        let args = args.unwrap_or_else(|| vec![current_value.clone(), ParamValue::Number(1.0)]);
        let mut binding = Self {
            path,
            current_value,
            sampler_name: sampler_name.to_string(),
            args,
            params: Vec::new(),
        };
        binding.generate(model, registry, rng)?;
        Ok(binding)
    }

    /// The bound field's address.
    pub fn path(&self) -> &BindingPath {
        &self.path
    }

    /// Value the field held when the binding was created.
    pub fn current_value(&self) -> &ParamValue {
        &self.current_value
    }

    /// Catalogue name of the sampler in use.
    pub fn sampler_name(&self) -> &str {
        &self.sampler_name
    }

    /// Arguments passed to the sampler.
    pub fn args(&self) -> &[ParamValue] {
        &self.args
    }

    /// Generated parameter values, after range filtering and any group
    /// truncation.
    pub fn params(&self) -> &[ParamValue] {
        &self.params
    }

    /// Re-runs the sampler and refilters against the field's declared range.
    ///
    /// Values outside the range are dropped, never clamped; each drop is
    /// returned as a [`RangeWarning`] and logged. An empty surviving list is
    /// legitimate and simply yields a zero-length group later on.
    pub fn generate(
        &mut self,
        model: &dyn ModelStore,
        registry: &SamplerRegistry,
        rng: &mut RngHandle,
    ) -> Result<Vec<RangeWarning>, EpsError> {
        let sampler = registry.resolve(&self.sampler_name)?;
        let candidates = sampler.generate(&self.args, rng)?;
        let (params, warnings) = self.filter_candidates(model, candidates)?;
        self.params = params;
        Ok(warnings)
    }

    /// Atomically replaces the sampler and arguments, then regenerates.
    ///
    /// On any failure the binding is left untouched.
    pub fn apply_sampler(
        &mut self,
        model: &dyn ModelStore,
        registry: &SamplerRegistry,
        sampler_name: &str,
        args: Vec<ParamValue>,
        rng: &mut RngHandle,
    ) -> Result<Vec<RangeWarning>, EpsError> {
        let sampler = registry.resolve(sampler_name)?;
        let candidates = sampler.generate(&args, rng)?;
        let (params, warnings) = self.filter_candidates(model, candidates)?;
        self.sampler_name = sampler_name.to_string();
        self.args = args;
        self.params = params;
        Ok(warnings)
    }

    fn filter_candidates(
        &self,
        model: &dyn ModelStore,
        candidates: Vec<ParamValue>,
    ) -> Result<(Vec<ParamValue>, Vec<RangeWarning>), EpsError> {
        let Some(range) = model.field_range(&self.path)? else {
            return Ok((candidates, Vec::new()));
        };
        let mut params = Vec::with_capacity(candidates.len());
        let mut warnings = Vec::new();
        for value in candidates {
            match value.as_f64() {
                Some(number) if !range.contains(number) => {
                    warn!(
                        path = %self.path,
                        value = %value,
                        "generated value outside declared range, dropped"
                    );
                    warnings.push(RangeWarning {
                        path: self.path.clone(),
                        value,
                        range,
                    });
                }
                _ => params.push(value),
            }
        }
        Ok((params, warnings))
    }

    pub(crate) fn set_params(&mut self, params: Vec<ParamValue>) {
        self.params = params;
    }

    pub(crate) fn truncate_params(&mut self, len: usize) {
        self.params.truncate(len);
    }
}

impl Display for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {}({}) -> {} values",
            self.path,
            self.sampler_name,
            self.args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            self.params.len()
        )
    }
}
