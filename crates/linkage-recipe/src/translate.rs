//! Translates a validated `LinkOptions` into the core's `LinkageOptions`,
//! the orchestrator's single input struct.

use linkage_core::record::IdfMap;
use linkage_core::scorer::{field_cosine_similarity, field_edit_similarity, field_jaro_similarity};
use linkage_core::{BlockingRule, LinkageOptions};

use crate::schema::{LinkOptions, SimilarityKernel};

/// Build the core's `LinkageOptions` from a recipe. Callers should run
/// `validate_recipe` first; this function does not re-check field
/// resolution, only builds the runtime values the core operates on.
pub fn to_linkage_options(recipe: &LinkOptions) -> LinkageOptions {
    let idf = match &recipe.idf_corpus {
        Some(corpus) => IdfMap::from_corpus(corpus.iter().map(String::as_str)),
        None => IdfMap::empty(),
    };

    let blocking_rules = recipe
        .blocking_fields
        .iter()
        .map(BlockingRule::from_field_name)
        .collect();

    let similarity_functions = recipe
        .similarity_functions
        .iter()
        .map(|spec| match spec.kernel {
            SimilarityKernel::TokenEdit => field_edit_similarity(spec.field.clone(), idf.clone()),
            SimilarityKernel::TokenJaro => field_jaro_similarity(spec.field.clone(), idf.clone()),
            SimilarityKernel::TfidfCosine => field_cosine_similarity(spec.field.clone(), idf.clone()),
        })
        .collect();

    let n = recipe.similarity_functions.len();
    let field_weights = recipe.field_weights.clone().unwrap_or_else(|| vec![1.0; n]);

    LinkageOptions {
        blocking_rules,
        similarity_functions,
        m_probs: recipe.m_probs.clone(),
        u_probs: recipe.u_probs.clone(),
        batch_size: recipe.batch_size,
        match_threshold: recipe.match_threshold,
        em_max_iter: recipe.em_max_iter,
        em_tolerance: recipe.em_tolerance,
        field_weights,
    }
}
