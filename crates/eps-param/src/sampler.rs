use eps_core::errors::{EpsError, ErrorInfo};
use eps_core::{ParamValue, RngHandle};
use rand::Rng;
use rand_distr::{Binomial, Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Generation strategy behind a catalogue sampler.
///
/// A closed tagged set: persistence stores only the catalogue name plus the
/// argument list and resolves the name against [`crate::SamplerRegistry`],
/// never serialized code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    /// Repeat one value a fixed number of times.
    Constant,
    /// Evenly spaced values, both ends inclusive.
    Linspace,
    /// Arithmetic progression, end exclusive.
    Arange,
    /// Uniform draws from `[low, high)`.
    Uniform,
    /// Normal draws with the given mean and standard deviation.
    Gaussian,
    /// Binomial draws over a fixed trial count.
    Bernoulli,
    /// Power-law draws scaled into `[0, max]`.
    Power,
    /// Literal values reproduced verbatim.
    Enumerate,
}

/// A named value-generation strategy with its argument metadata.
///
/// `parameter_names` and `parameter_descriptions` are parallel arrays kept
/// for UI layers listing the catalogue; generation itself only needs the
/// kind and the argument list.
#[derive(Debug, Clone)]
pub struct Sampler {
    kind: SamplerKind,
    name: &'static str,
    parameter_names: &'static [&'static str],
    parameter_descriptions: &'static [&'static str],
}

impl Sampler {
    /// Creates a catalogue entry. Used by the builtin registry and by tests
    /// that assemble mock registries.
    pub fn new(
        kind: SamplerKind,
        name: &'static str,
        parameter_names: &'static [&'static str],
        parameter_descriptions: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            name,
            parameter_names,
            parameter_descriptions,
        }
    }

    /// Catalogue name this sampler resolves under.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Generation strategy.
    pub fn kind(&self) -> SamplerKind {
        self.kind
    }

    /// Formal argument names, in call order.
    pub fn parameter_names(&self) -> &[&str] {
        self.parameter_names
    }

    /// Human readable description per argument, parallel to
    /// [`Sampler::parameter_names`].
    pub fn parameter_descriptions(&self) -> &[&str] {
        self.parameter_descriptions
    }

    /// Whether repeated generation with the same arguments consumes
    /// randomness. Stochastic samplers are reproducible only under the same
    /// [`RngHandle`] seed.
    pub fn is_stochastic(&self) -> bool {
        matches!(
            self.kind,
            SamplerKind::Uniform | SamplerKind::Gaussian | SamplerKind::Bernoulli | SamplerKind::Power
        )
    }

    /// Runs the sampler over the given arguments.
    ///
    /// Arguments that arrived as text (from a deserialized table) are
    /// coerced to numbers where the strategy expects them. `Enumerate` is
    /// variadic and passes its arguments through verbatim; an empty literal
    /// set is allowed and yields an empty sequence.
    pub fn generate(
        &self,
        args: &[ParamValue],
        rng: &mut RngHandle,
    ) -> Result<Vec<ParamValue>, EpsError> {
        if self.kind != SamplerKind::Enumerate && args.len() != self.parameter_names.len() {
            return Err(EpsError::Sampler(
                ErrorInfo::new("sampler-arity", "wrong number of arguments")
                    .with_context("sampler", self.name)
                    .with_context("expected", self.parameter_names.len().to_string())
                    .with_context("received", args.len().to_string()),
            ));
        }
        match self.kind {
            SamplerKind::Constant => {
                let count = self.count_arg(args, 1)?;
                Ok(vec![args[0].clone(); count])
            }
            SamplerKind::Linspace => {
                let start = self.numeric_arg(args, 0)?;
                let end = self.numeric_arg(args, 1)?;
                let num = self.count_arg(args, 2)?;
                Ok(linspace(start, end, num))
            }
            SamplerKind::Arange => {
                let start = self.numeric_arg(args, 0)?;
                let end = self.numeric_arg(args, 1)?;
                let step = self.numeric_arg(args, 2)?;
                if step == 0.0 {
                    return Err(EpsError::Sampler(
                        ErrorInfo::new("arange-zero-step", "step must be non-zero")
                            .with_context("sampler", self.name),
                    ));
                }
                Ok(arange(start, end, step))
            }
            SamplerKind::Uniform => {
                let low = self.numeric_arg(args, 0)?;
                let high = self.numeric_arg(args, 1)?;
                let size = self.count_arg(args, 2)?;
                Ok((0..size)
                    .map(|_| ParamValue::Number(low + (high - low) * rng.inner_mut().gen::<f64>()))
                    .collect())
            }
            SamplerKind::Gaussian => {
                let mean = self.numeric_arg(args, 0)?;
                let stddev = self.numeric_arg(args, 1)?;
                let size = self.count_arg(args, 2)?;
                let normal = Normal::new(mean, stddev).map_err(|err| {
                    EpsError::Sampler(
                        ErrorInfo::new("gaussian-args", "invalid normal distribution")
                            .with_context("sampler", self.name)
                            .with_hint(err.to_string()),
                    )
                })?;
                Ok((0..size)
                    .map(|_| ParamValue::Number(normal.sample(rng.inner_mut())))
                    .collect())
            }
            SamplerKind::Bernoulli => {
                let trials = self.count_arg(args, 0)?;
                let probability = self.numeric_arg(args, 1)?;
                let size = self.count_arg(args, 2)?;
                let binomial = Binomial::new(trials as u64, probability).map_err(|err| {
                    EpsError::Sampler(
                        ErrorInfo::new("bernoulli-args", "invalid binomial distribution")
                            .with_context("sampler", self.name)
                            .with_hint(err.to_string()),
                    )
                })?;
                Ok((0..size)
                    .map(|_| ParamValue::Number(binomial.sample(rng.inner_mut()) as f64))
                    .collect())
            }
            SamplerKind::Power => {
                let max = self.numeric_arg(args, 0)?;
                let exponent = self.numeric_arg(args, 1)?;
                let size = self.count_arg(args, 2)?;
                if exponent <= 0.0 {
                    return Err(EpsError::Sampler(
                        ErrorInfo::new("power-exponent", "exponent must be positive")
                            .with_context("sampler", self.name),
                    ));
                }
                // inverse-CDF draw for density p(x) = a x^(a-1) on [0, 1]
                Ok((0..size)
                    .map(|_| {
                        let unit: f64 = rng.inner_mut().gen::<f64>();
                        ParamValue::Number(max * unit.powf(1.0 / exponent))
                    })
                    .collect())
            }
            SamplerKind::Enumerate => Ok(enumerate(args)),
        }
    }

    fn numeric_arg(&self, args: &[ParamValue], index: usize) -> Result<f64, EpsError> {
        args[index].as_f64().ok_or_else(|| {
            EpsError::Sampler(
                ErrorInfo::new("sampler-arg", "argument is not numeric")
                    .with_context("sampler", self.name)
                    .with_context("argument", self.parameter_names[index])
                    .with_context("value", args[index].to_string()),
            )
        })
    }

    fn count_arg(&self, args: &[ParamValue], index: usize) -> Result<usize, EpsError> {
        let number = self.numeric_arg(args, index)?;
        if number < 0.0 {
            return Err(EpsError::Sampler(
                ErrorInfo::new("sampler-arg", "count argument is negative")
                    .with_context("sampler", self.name)
                    .with_context("argument", self.parameter_names[index])
                    .with_context("value", args[index].to_string()),
            ));
        }
        Ok(number as usize)
    }
}

fn linspace(start: f64, end: f64, num: usize) -> Vec<ParamValue> {
    match num {
        0 => Vec::new(),
        1 => vec![ParamValue::Number(start)],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|index| {
                    // pin the endpoint so it lands exactly on `end`
                    let value = if index == num - 1 {
                        end
                    } else {
                        start + step * index as f64
                    };
                    ParamValue::Number(value)
                })
                .collect()
        }
    }
}

fn arange(start: f64, end: f64, step: f64) -> Vec<ParamValue> {
    let count = ((end - start) / step).ceil();
    if count <= 0.0 {
        return Vec::new();
    }
    (0..count as usize)
        .map(|index| ParamValue::Number(start + step * index as f64))
        .collect()
}

fn enumerate(args: &[ParamValue]) -> Vec<ParamValue> {
    if let [ParamValue::Text(text)] = args {
        if text.contains(',') {
            return text.split(',').map(ParamValue::parse).collect();
        }
    }
    args.to_vec()
}
