use thiserror::Error;

use crate::models::RecipeId;

/// Validation failures raised when recipes enter the store. Lookups on
/// unknown ids are not errors; those operations simply do nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Recipe title is required.")]
    EmptyTitle,
    #[error("Recipe {0} already exists.")]
    DuplicateId(RecipeId),
}
