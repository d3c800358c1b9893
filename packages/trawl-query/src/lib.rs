pub mod clause;
pub mod fragments;
pub mod registry;
pub mod sort;

mod error;

pub use clause::{BoolSection, Clause, RangeBounds};
pub use error::{Error, Result};
pub use fragments::QueryFragments;
pub use registry::{ExtensionFn, ExtensionRegistry};
pub use sort::{FieldSort, SortDirection, SortMode, SortOptions};
