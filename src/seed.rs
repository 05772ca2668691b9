//! Recipes the app opens with when no `--empty` flag is passed.

use crate::models::Recipe;
use crate::store::StoreError;

const SAMPLES: &[(&str, &str)] = &[
    ("Rice and Beans", "Tasty and filling"),
    ("Pasta", "Quick and easy"),
    ("Fried Rice", "Day-old rice tossed with veggies, egg and soy sauce"),
    ("Tomato Soup", "Roasted tomatoes blended with garlic and basil"),
    ("Pancakes", "Fluffy breakfast stack with maple syrup"),
    ("Guacamole", "Avocado, lime, onion and a pinch of salt"),
];

/// Build the sample recipes with ids starting at 1.
pub fn sample_recipes() -> Result<Vec<Recipe>, StoreError> {
    SAMPLES
        .iter()
        .zip(1u64..)
        .map(|(&(title, description), id)| Recipe::new(id, title, description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecipeStore;

    #[test]
    fn samples_load_into_a_store() {
        let store = RecipeStore::with_recipes(sample_recipes().unwrap()).unwrap();
        assert_eq!(store.len(), SAMPLES.len());
        assert_eq!(store.recipes()[0].title(), "Rice and Beans");
    }
}
