#![deny(missing_docs)]
#![doc = "Core types and the model-layer boundary for the EPS parametric engine."]

pub mod errors;
mod model;
mod path;
pub mod rng;
mod value;

pub use errors::{EpsError, ErrorInfo};
pub use model::{FieldRange, MemoryModel, ModelStore, SetOutcome};
pub use path::{BindingPath, PATH_SEPARATOR};
pub use rng::{derive_substream_seed, RngHandle};
pub use value::ParamValue;
