//! Linkage Recipe - the `LinkOptions` configuration schema, field-name
//! resolution, recipe validation, and translation into the core's
//! `LinkageOptions`.

pub mod field_resolver;
pub mod schema;
pub mod translate;
pub mod validation;

pub use schema::{LinkOptions, SimilarityFunctionSpec, SimilarityKernel};
pub use translate::to_linkage_options;
pub use validation::validate_recipe;
