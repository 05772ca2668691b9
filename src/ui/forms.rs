use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Recipe, RecipeDraft, RecipeId, RecipePatch};

/// Form state shared by the add and edit dialogs.
#[derive(Default, Clone)]
pub(crate) struct RecipeForm {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) active: RecipeField,
    pub(crate) error: Option<String>,
}

/// Fields available within the recipe form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum RecipeField {
    #[default]
    Title,
    Description,
}

impl RecipeForm {
    /// Populate the form from an existing recipe when editing.
    pub(crate) fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title().to_string(),
            description: recipe.description().to_string(),
            active: RecipeField::Title,
            error: None,
        }
    }

    /// Swap focus between title and description.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            RecipeField::Title => RecipeField::Description,
            RecipeField::Description => RecipeField::Title,
        };
    }

    /// Append a character to the active field. Control characters are refused.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            RecipeField::Title => self.title.push(ch),
            RecipeField::Description => self.description.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            RecipeField::Title => {
                self.title.pop();
            }
            RecipeField::Description => {
                self.description.pop();
            }
        }
    }

    /// Both fields are required once trimmed.
    pub(crate) fn parse_inputs(&self) -> Result<RecipeDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Recipe title is required."));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(anyhow!("Recipe description is required."));
        }
        Ok(RecipeDraft::new(title, description)?)
    }

    /// Validated inputs as a patch replacing both fields.
    pub(crate) fn to_patch(&self) -> Result<RecipePatch> {
        let draft = self.parse_inputs()?;
        Ok(RecipePatch::title(draft.title()).with_description(draft.description()))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: RecipeField) -> Line<'static> {
        let value = match field {
            RecipeField::Title => &self.title,
            RecipeField::Description => &self.description,
        };
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: RecipeField) -> usize {
        match field {
            RecipeField::Title => self.title.chars().count(),
            RecipeField::Description => self.description.chars().count(),
        }
    }
}

/// Pending deletion awaiting a Y/N answer.
#[derive(Clone)]
pub(crate) struct ConfirmRecipeDelete {
    pub(crate) id: RecipeId,
    pub(crate) title: String,
}

impl ConfirmRecipeDelete {
    pub(crate) fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id(),
            title: recipe.title().to_string(),
        }
    }
}
