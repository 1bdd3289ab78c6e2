//! Batch materialization: applies every case of a binding group to the
//! model and saves one artifact per surviving case.
//!
//! Each case is an independent, idempotent unit of work: applying case `i`
//! reads nothing from other cases and re-running it rewrites the same
//! artifact, which is what lets an external orchestrator process indices in
//! parallel or stop issuing them to cancel.

mod naming;

use eps_core::{BindingPath, EpsError, ModelStore, SetOutcome};
use eps_param::BindingGroup;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use naming::ArtifactNaming;

/// Outcome of one field write within a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingStatus {
    /// The binding that was applied.
    pub path: BindingPath,
    /// Three-way write outcome.
    pub outcome: SetOutcome,
}

/// Outcome of one case of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case index within the group.
    pub index: usize,
    /// Name of the saved artifact, when the case was not skipped.
    pub artifact: Option<String>,
    /// Per-binding write outcomes, in binding order.
    pub statuses: Vec<BindingStatus>,
    /// True when any binding target was missing and the case was dropped.
    pub skipped: bool,
    /// True when the artifact was written despite range violations.
    pub range_warned: bool,
}

/// Aggregate report of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One report per case, in index order.
    pub cases: Vec<CaseReport>,
}

impl BatchReport {
    /// Number of artifacts written.
    pub fn written(&self) -> usize {
        self.cases.iter().filter(|case| !case.skipped).count()
    }

    /// Number of cases dropped because a binding target was missing.
    pub fn skipped(&self) -> usize {
        self.cases.iter().filter(|case| case.skipped).count()
    }
}

/// Applies every case of `group` to `model`, saving one artifact per case.
///
/// A `NotFound` outcome on any binding dominates the whole case: nothing is
/// saved and the case is reported skipped, so a partially applied artifact
/// never reaches disk. `RangeExceeded` is a soft warning; the case is still
/// saved with its `range_warned` flag set. Write errors other than the
/// three-way outcome (e.g. a version mismatch surfaced by the model layer)
/// propagate unchanged.
pub fn materialize(
    model: &mut dyn ModelStore,
    group: &BindingGroup,
    naming: &ArtifactNaming,
) -> Result<BatchReport, EpsError> {
    let names = naming.resolve(group.param_count(), model.artifact_extension());
    let mut cases = Vec::with_capacity(group.param_count());
    for index in 0..group.param_count() {
        let mut statuses = Vec::with_capacity(group.bindings().len());
        let mut missing = false;
        let mut exceeded = false;
        for binding in group.bindings() {
            let value = binding.params()[index].clone();
            let outcome = model.set_field(binding.path(), value)?;
            match outcome {
                SetOutcome::NotFound => missing = true,
                SetOutcome::RangeExceeded => exceeded = true,
                SetOutcome::Applied => {}
            }
            statuses.push(BindingStatus {
                path: binding.path().clone(),
                outcome,
            });
        }
        if missing {
            warn!(case = index, "binding target missing, case skipped");
            cases.push(CaseReport {
                index,
                artifact: None,
                statuses,
                skipped: true,
                range_warned: exceeded,
            });
            continue;
        }
        if exceeded {
            warn!(case = index, "case written with out-of-range values");
        }
        let name = names[index].clone();
        model.save_artifact(&name)?;
        debug!(case = index, artifact = %name, "case materialized");
        cases.push(CaseReport {
            index,
            artifact: Some(name),
            statuses,
            skipped: false,
            range_warned: exceeded,
        });
    }
    Ok(BatchReport { cases })
}
