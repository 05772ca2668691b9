//! Domain models handed out by the store and rendered by the TUI. The types
//! stay light-weight data holders; the store is the only place that mutates a
//! recipe once it exists, so the fields are private and read through
//! accessors.

use std::fmt;

use crate::store::StoreError;

/// Opaque identifier for a recipe. Ids are unique within a store and never
/// change for the lifetime of the recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecipeId(u64);

impl RecipeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, mostly useful for logging.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single recipe in the collection.
pub struct Recipe {
    id: RecipeId,
    /// Never blank; enforced by every constructor and by the store's update
    /// path.
    title: String,
    description: String,
}

impl Recipe {
    /// Build a recipe with a caller-chosen id. Both fields are trimmed and the
    /// title must contain something other than whitespace.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let draft = RecipeDraft::new(title, description)?;
        Ok(draft.into_recipe(RecipeId::new(id)))
    }

    pub fn id(&self) -> RecipeId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Apply a partial update, returning whether any field actually changed.
    pub(crate) fn apply(&mut self, patch: RecipePatch) -> bool {
        let mut changed = false;
        if let Some(title) = patch.title {
            let title = title.trim();
            if !title.is_empty() && title != self.title {
                self.title = title.to_string();
                changed = true;
            }
        }
        if let Some(description) = patch.description {
            let description = description.trim();
            if description != self.description {
                self.description = description.to_string();
                changed = true;
            }
        }
        changed
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Validated input for a recipe the store has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    title: String,
    description: String,
}

impl RecipeDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
            description: description.into().trim().to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn into_recipe(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
        }
    }
}

/// Partial update for an existing recipe. `None` leaves the field alone; a
/// blank title is ignored rather than clearing the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl RecipePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
