//! Parametric editing and cross-product combination engine.
//!
//! Bindings tie one model field to a named sampler; groups align bindings
//! into parameter vectors and combine via merge or Cartesian cross; the
//! table module persists a group losslessly. Writing artifacts from a group
//! lives in `eps-batch`.

mod binding;
mod group;
mod registry;
mod sampler;
mod table;

pub use binding::{FieldBinding, RangeWarning};
pub use group::BindingGroup;
pub use registry::SamplerRegistry;
pub use sampler::{Sampler, SamplerKind};
pub use table::{
    load_table, modified_time, save_table, TableFormat, RESERVED_NAME_COLUMNS,
};
