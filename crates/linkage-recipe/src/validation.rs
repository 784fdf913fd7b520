//! Recipe-level validation: schema and field-resolution problems the core's
//! `validate_options` cannot see (it only knows about already-built
//! `SimilarityFunction`/`BlockingRule` values, not field names).

use thiserror::Error;

use crate::field_resolver::resolve_field_name;
use crate::schema::LinkOptions;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid version: expected '1.0', got '{0}'")]
    InvalidVersion(String),

    #[error("recipe_id cannot be empty")]
    EmptyRecipeId,

    #[error("blocking field '{0}' not found in record schema")]
    UnknownBlockingField(String),

    #[error("similarity function field '{0}' not found in record schema")]
    UnknownSimilarityField(String),

    #[error("similarity_functions must not be empty")]
    NoSimilarityFunctions,

    #[error("m_probs/u_probs must have length {0} (one per similarity function)")]
    MismatchedProbabilityLengths(usize),
}

/// Validate a recipe against the set of field names the record schema
/// actually carries. Accumulates every violation rather than stopping at
/// the first one, so a caller sees the whole list of problems at once.
pub fn validate_recipe(recipe: &LinkOptions, available_fields: &[String]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if recipe.version != "1.0" {
        errors.push(ValidationError::InvalidVersion(recipe.version.clone()));
    }
    if recipe.recipe_id.trim().is_empty() {
        errors.push(ValidationError::EmptyRecipeId);
    }
    if recipe.similarity_functions.is_empty() {
        errors.push(ValidationError::NoSimilarityFunctions);
    }

    let n = recipe.similarity_functions.len();
    if recipe.m_probs.len() != n || recipe.u_probs.len() != n {
        errors.push(ValidationError::MismatchedProbabilityLengths(n));
    }

    for field in &recipe.blocking_fields {
        if resolve_field_name(field, available_fields).is_none() {
            errors.push(ValidationError::UnknownBlockingField(field.clone()));
        }
    }
    for function in &recipe.similarity_functions {
        if resolve_field_name(&function.field, available_fields).is_none() {
            errors.push(ValidationError::UnknownSimilarityField(function.field.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
