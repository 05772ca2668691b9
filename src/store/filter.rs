//! Search predicate backing the filtered view.

use crate::models::Recipe;

/// Whether `recipe` should appear in the filtered view for `term`. A blank term
/// matches everything; otherwise the term must appear, ignoring case, in the
/// title or the description.
pub fn matches(recipe: &Recipe, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    recipe.title().to_lowercase().contains(&needle)
        || recipe.description().to_lowercase().contains(&needle)
}

/// Clone the matching recipes in collection order.
pub(crate) fn filter_recipes(recipes: &[Recipe], term: &str) -> Vec<Recipe> {
    if term.trim().is_empty() {
        return recipes.to_vec();
    }
    recipes
        .iter()
        .filter(|recipe| matches(recipe, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: u64, title: &str, description: &str) -> Recipe {
        Recipe::new(id, title, description).unwrap()
    }

    #[test]
    fn blank_term_matches_everything() {
        let r = recipe(1, "Pasta", "Quick and easy");
        assert!(matches(&r, ""));
        assert!(matches(&r, "   \t"));
    }

    #[test]
    fn matches_title_or_description_ignoring_case() {
        let r = recipe(1, "Fried Rice", "rice and veggies");
        assert!(matches(&r, "RICE"));
        assert!(matches(&r, "veg"));
        assert!(!matches(&r, "pasta"));
    }

    #[test]
    fn inner_whitespace_is_part_of_the_term() {
        let r = recipe(1, "Rice and Beans", "Tasty and filling");
        assert!(matches(&r, "and b"));
        assert!(!matches(&r, "rice  and"));
    }

    #[test]
    fn filter_keeps_collection_order() {
        let recipes = vec![
            recipe(1, "Rice and Beans", "Tasty and filling"),
            recipe(2, "Pasta", "Quick and easy"),
            recipe(3, "Fried Rice", "rice and veggies"),
        ];
        let ids: Vec<u64> = filter_recipes(&recipes, "rice")
            .iter()
            .map(|r| r.id().get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
