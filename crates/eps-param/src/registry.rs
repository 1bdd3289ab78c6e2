use std::collections::BTreeMap;

use eps_core::errors::{EpsError, ErrorInfo};

use crate::sampler::{Sampler, SamplerKind};

/// Explicit catalogue of samplers, keyed by lowercase name.
///
/// Constructed once at startup and passed wherever sampler names need
/// resolving (binding generation, table loading). Tests substitute mock
/// registries; nothing in the engine reaches for global state.
#[derive(Debug, Clone)]
pub struct SamplerRegistry {
    samplers: BTreeMap<String, Sampler>,
}

impl SamplerRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            samplers: BTreeMap::new(),
        }
    }

    /// Creates the builtin catalogue.
    ///
    /// `random` is an alias of the uniform strategy kept for operators used
    /// to the historical catalogue; it resolves to its own entry so saved
    /// `(name, args)` pairs survive round-trips unchanged.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Sampler::new(
            SamplerKind::Constant,
            "constant",
            &["value", "count"],
            &["value to repeat", "number of copies"],
        ));
        registry.register(Sampler::new(
            SamplerKind::Linspace,
            "linspace",
            &["start", "end", "num"],
            &[
                "first value of the spread",
                "last value of the spread",
                "number of samples",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Arange,
            "arange",
            &["start", "end", "step"],
            &[
                "first value of the progression",
                "exclusive end of the progression",
                "difference between consecutive values",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Uniform,
            "uniform",
            &["low", "high", "size"],
            &[
                "lower bound of the draw",
                "upper bound of the draw",
                "number of draws",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Uniform,
            "random",
            &["low", "high", "size"],
            &[
                "lower bound of the draw",
                "upper bound of the draw",
                "number of draws",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Gaussian,
            "gaussian",
            &["mean", "stddev", "size"],
            &[
                "centre of the distribution",
                "standard deviation of the distribution",
                "number of draws",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Bernoulli,
            "bernoulli",
            &["trials", "probability", "size"],
            &[
                "trial count per draw (the value when probability is 1)",
                "success probability in [0, 1]",
                "number of draws",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Power,
            "power",
            &["max", "exponent", "size"],
            &[
                "upper end of the draw, results fall in [0, max]",
                "exponent a of the density p = a x^(a-1)",
                "number of draws",
            ],
        ));
        registry.register(Sampler::new(
            SamplerKind::Enumerate,
            "enumerate",
            &["values"],
            &["literal values, or one comma-separated string"],
        ));
        registry
    }

    /// Registers a sampler under its own name, replacing any previous entry.
    pub fn register(&mut self, sampler: Sampler) {
        self.samplers
            .insert(sampler.name().to_ascii_lowercase(), sampler);
    }

    /// Resolves a catalogue name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Result<&Sampler, EpsError> {
        self.samplers
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| {
                EpsError::Sampler(
                    ErrorInfo::new("sampler-unknown", "no sampler registered under this name")
                        .with_context("sampler", name),
                )
            })
    }

    /// Registered catalogue names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samplers.keys().map(String::as_str)
    }
}

impl Default for SamplerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
