mod tabular_policy;

pub use tabular_policy::{ActionValues, TabularPolicy};
