use std::fmt::{self, Display};

use eps_core::errors::{EpsError, ErrorInfo};
use eps_core::{derive_substream_seed, BindingPath, ModelStore, ParamValue, RngHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binding::FieldBinding;
use crate::registry::SamplerRegistry;

/// An aligned collection of bindings sharing one parameter count.
///
/// Index `i` across all member bindings is one coherent parameter
/// combination ("case i"). Groups are combined with [`BindingGroup::merge`]
/// (union, counts must match) or [`BindingGroup::cross`] (Cartesian
/// product, counts multiply).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingGroup {
    bindings: Vec<FieldBinding>,
    param_count: usize,
}

impl BindingGroup {
    /// Builds a group by regenerating every binding and aligning lengths.
    ///
    /// Each binding draws from its own substream of `seed`, so stochastic
    /// samplers are reproducible per binding regardless of group order. The
    /// group's parameter count is the minimum generated length; longer
    /// bindings keep the prefix of that length, never a random subset. A
    /// resulting count of zero is a legitimate empty batch, distinct from a
    /// construction failure.
    pub fn assemble(
        model: &dyn ModelStore,
        registry: &SamplerRegistry,
        seed: u64,
        mut bindings: Vec<FieldBinding>,
    ) -> Result<Self, EpsError> {
        if bindings.is_empty() {
            return Err(EpsError::Group(ErrorInfo::new(
                "group-empty",
                "a binding group needs at least one binding",
            )));
        }
        for (index, binding) in bindings.iter_mut().enumerate() {
            let mut rng = RngHandle::from_seed(derive_substream_seed(seed, index as u64));
            let warnings = binding.generate(model, registry, &mut rng)?;
            if !warnings.is_empty() {
                warn!(
                    path = %binding.path(),
                    dropped = warnings.len(),
                    "range filtering dropped generated values"
                );
            }
        }
        let param_count = bindings
            .iter()
            .map(|binding| binding.params().len())
            .min()
            .unwrap_or(0);
        for binding in &mut bindings {
            binding.truncate_params(param_count);
        }
        debug!(bindings = bindings.len(), param_count, "assembled binding group");
        Ok(Self {
            bindings,
            param_count,
        })
    }

    /// Member bindings, in insertion order.
    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    /// Number of aligned cases in this group.
    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Rendered path strings of all member bindings.
    pub fn path_strings(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|binding| binding.path().to_string())
            .collect()
    }

    /// The `(path, value)` pairs making up case `index`.
    ///
    /// `index` must be below [`BindingGroup::param_count`].
    pub fn case(&self, index: usize) -> impl Iterator<Item = (&BindingPath, &ParamValue)> {
        self.bindings
            .iter()
            .map(move |binding| (binding.path(), &binding.params()[index]))
    }

    /// Cartesian product of two groups, returned as a new group.
    ///
    /// Inputs are left untouched. Self's value lists are tiled
    /// `other.param_count` times; other's lists have each element repeated
    /// `self.param_count` times consecutively, so case `ia + ib * Na` pairs
    /// every value of self with every value of other exactly once. Counts
    /// multiply: crossing 30 x 40 cases yields 1200, so combining groups is
    /// an explicit caller decision, never an implicit default.
    pub fn cross(&self, other: &BindingGroup) -> BindingGroup {
        let tile = other.param_count;
        let repeat = self.param_count;
        let mut bindings = Vec::with_capacity(self.bindings.len() + other.bindings.len());
        for binding in &self.bindings {
            let mut tiled = binding.clone();
            tiled.set_params(
                (0..tile)
                    .flat_map(|_| binding.params().iter().cloned())
                    .collect(),
            );
            bindings.push(tiled);
        }
        for binding in &other.bindings {
            let mut repeated = binding.clone();
            repeated.set_params(
                binding
                    .params()
                    .iter()
                    .flat_map(|value| std::iter::repeat(value.clone()).take(repeat))
                    .collect(),
            );
            bindings.push(repeated);
        }
        let param_count = self.param_count * other.param_count;
        debug!(param_count, "crossed binding groups");
        BindingGroup {
            bindings,
            param_count,
        }
    }

    /// Successive pairwise cross of a list of groups.
    pub fn cross_all(groups: impl IntoIterator<Item = BindingGroup>) -> Option<BindingGroup> {
        groups
            .into_iter()
            .reduce(|combined, next| combined.cross(&next))
    }

    /// Union of two groups' bindings under a shared parameter count.
    ///
    /// Mismatched counts are rejected: silently inheriting one side's count
    /// would misalign the other side's cases. Bindings are concatenated
    /// without deduplication.
    pub fn merge(&self, other: &BindingGroup) -> Result<BindingGroup, EpsError> {
        if self.param_count != other.param_count {
            return Err(EpsError::Group(
                ErrorInfo::new("merge-count-mismatch", "parameter counts differ")
                    .with_context("left", self.param_count.to_string())
                    .with_context("right", other.param_count.to_string())
                    .with_hint("cross the groups instead, or regenerate with matching sizes"),
            ));
        }
        let mut bindings = self.bindings.clone();
        bindings.extend(other.bindings.iter().cloned());
        Ok(BindingGroup {
            bindings,
            param_count: self.param_count,
        })
    }

    /// Removes at most one binding per given path string, first match wins.
    ///
    /// Returns how many bindings were removed. Unparseable path strings are
    /// rejected before anything is removed.
    pub fn drop_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<usize, EpsError> {
        let parsed: Vec<BindingPath> = paths
            .iter()
            .map(|raw| raw.as_ref().parse())
            .collect::<Result<_, _>>()?;
        let mut removed = 0;
        for target in parsed {
            if let Some(position) = self
                .bindings
                .iter()
                .position(|binding| *binding.path() == target)
            {
                self.bindings.remove(position);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl Display for BindingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BindingGroup: {} bindings, {} cases",
            self.bindings.len(),
            self.param_count
        )?;
        for binding in &self.bindings {
            writeln!(f, "  {binding}")?;
        }
        Ok(())
    }
}
