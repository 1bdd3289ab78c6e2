use serde::{Deserialize, Serialize};
use tracing::warn;

/// Names the artifacts a batch run produces.
///
/// The base name is always present; an explicit per-case name list is
/// honoured only when its length matches the case count, otherwise the run
/// falls back to indexed names with a warning rather than desynchronizing
/// names from cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactNaming {
    base: String,
    explicit: Option<Vec<String>>,
}

impl ArtifactNaming {
    /// Synthesized `base_<index>.<ext>` names.
    pub fn indexed(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            explicit: None,
        }
    }

    /// Explicit per-case names, with `base` kept as the fallback.
    pub fn explicit(base: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            base: base.into(),
            explicit: Some(names),
        }
    }

    /// Resolves the name list for a run of `count` cases.
    pub(crate) fn resolve(&self, count: usize, extension: &str) -> Vec<String> {
        let suffix = format!(".{extension}");
        if let Some(names) = &self.explicit {
            if names.len() == count {
                return names
                    .iter()
                    .map(|name| {
                        if name.ends_with(&suffix) {
                            name.clone()
                        } else {
                            format!("{name}{suffix}")
                        }
                    })
                    .collect();
            }
            warn!(
                names = names.len(),
                cases = count,
                "explicit artifact names do not cover the cases, using indexed names"
            );
        }
        (0..count)
            .map(|index| format!("{}_{index}{suffix}", self.base))
            .collect()
    }
}
