use std::fmt;

use crate::models::RecipeId;

/// Lists the app can show. Each one is a different read-only view of the
/// store.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum ListKind {
    /// Search-filtered view of every recipe.
    All,
    Favorites,
    Recommendations,
}

impl ListKind {
    pub(crate) fn empty_message(self) -> &'static str {
        match self {
            ListKind::All => "No recipes yet. Press '+' to add your first recipe!",
            ListKind::Favorites => "No favorites yet. Press '*' on a recipe to mark it.",
            ListKind::Recommendations => "No recommendations right now. Press 'r' to try again.",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            ListKind::All => "Recipe List",
            ListKind::Favorites => "My Favorites",
            ListKind::Recommendations => "Recommended For You",
        };
        f.write_str(title)
    }
}

/// High-level navigation states.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Screen {
    List(ListKind),
    /// Single recipe; `from` is the list Esc returns to.
    Detail { id: RecipeId, from: ListKind },
}

/// Selection within whichever list is on screen. The list length is passed in
/// on every call because the underlying view can shrink between keystrokes.
#[derive(Default, Debug)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        let new = (self.selected as isize + offset).clamp(0, max);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_clamped() {
        let mut cursor = ListCursor::default();
        cursor.move_selection(-3, 4);
        assert_eq!(cursor.selected, 0);
        cursor.move_selection(10, 4);
        assert_eq!(cursor.selected, 3);
        cursor.ensure_in_bounds(2);
        assert_eq!(cursor.selected, 1);
        cursor.move_selection(1, 0);
        assert_eq!(cursor.selected, 0);
    }

    #[test]
    fn select_last_on_empty_list() {
        let mut cursor = ListCursor::default();
        cursor.select_last(0);
        assert_eq!(cursor.selected, 0);
        cursor.select_last(5);
        assert_eq!(cursor.selected, 4);
        cursor.select_first();
        assert_eq!(cursor.selected, 0);
    }
}
