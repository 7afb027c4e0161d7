pub mod deriver;
pub mod merger;

pub use deriver::{DerivedDataset, FeatureDeriver};
pub use merger::{DatasetMerger, MergedDataset, SourceFile};
