pub mod common;
pub mod period;
pub mod record;

pub use common::{safe_number, NamedEntity};
pub use period::{PeriodDescriptor, PeriodDimension, PeriodValue};
pub use record::{
    forest_from_str, forest_from_value, Branch, Leaf, LeafFlags, NodeKind, RecordForest,
    RecordNode,
};
