//! The recipe store: one owned collection of recipes plus the views derived
//! from it. Every mutation recomputes the derived views before it returns, so
//! whoever reads the store next sees a consistent snapshot.

mod error;
pub mod filter;
pub mod recommend;

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info, warn};

use crate::models::{Recipe, RecipeDraft, RecipeId, RecipePatch};

pub use error::StoreError;
pub use filter::matches;
pub use recommend::{CoinFlip, RecommendationPolicy};

/// Change notifications delivered to subscribers after the store has finished
/// recomputing its derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    RecipeAdded(RecipeId),
    RecipeUpdated(RecipeId),
    RecipeDeleted(RecipeId),
    SearchChanged,
    FavoriteAdded(RecipeId),
    FavoriteRemoved(RecipeId),
    RecommendationsGenerated { count: usize },
}

/// Handle returned by [`RecipeStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Owned recipe collection with its search, favorites and recommendation views.
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    search_term: String,
    filtered: Vec<Recipe>,
    favorites: BTreeSet<RecipeId>,
    recommendations: Vec<Recipe>,
    policy: Box<dyn RecommendationPolicy>,
    /// Next id to try; `None` once the counter ran past `u64::MAX`.
    next_id: Option<u64>,
    version: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl RecipeStore {
    /// Empty store using the coin-flip recommender seeded from the OS.
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
            search_term: String::new(),
            filtered: Vec::new(),
            favorites: BTreeSet::new(),
            recommendations: Vec::new(),
            policy: Box::new(CoinFlip::from_entropy()),
            next_id: Some(1),
            version: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Start from an initial set of recipes. Ids must be unique.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Result<Self, StoreError> {
        let mut seen = BTreeSet::new();
        for recipe in &recipes {
            if !seen.insert(recipe.id()) {
                return Err(StoreError::DuplicateId(recipe.id()));
            }
        }

        let mut store = Self::new();
        store.next_id = recipes
            .iter()
            .map(|recipe| recipe.id().get())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        store.recipes = recipes;
        store.refilter();
        debug!(count = store.recipes.len(), "recipe store initialized");
        Ok(store)
    }

    /// Replace the recommendation policy, e.g. with a seeded [`CoinFlip`].
    pub fn with_policy(mut self, policy: impl RecommendationPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn filtered_recipes(&self) -> &[Recipe] {
        &self.filtered
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn favorites(&self) -> &BTreeSet<RecipeId> {
        &self.favorites
    }

    /// Snapshot from the last [`generate_recommendations`](Self::generate_recommendations)
    /// call. Later mutations do not refresh it.
    pub fn recommendations(&self) -> &[Recipe] {
        &self.recommendations
    }

    /// Incremented by every operation that changed observable state.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id() == id)
    }

    pub fn position(&self, id: RecipeId) -> Option<usize> {
        self.recipes.iter().position(|recipe| recipe.id() == id)
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_favorite(&self, id: RecipeId) -> bool {
        self.favorites.contains(&id)
    }

    /// Favorite recipes in collection order.
    pub fn favorite_recipes(&self) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| self.favorites.contains(&recipe.id()))
            .cloned()
            .collect()
    }

    /// Append a new recipe under a freshly generated id.
    pub fn add_recipe(&mut self, draft: RecipeDraft) -> RecipeId {
        let id = self.allocate_id();
        self.recipes.push(draft.into_recipe(id));
        self.refilter();
        debug!(%id, "recipe added");
        self.commit(StoreEvent::RecipeAdded(id));
        id
    }

    /// Append a recipe that already carries an id. Colliding ids are refused
    /// and leave the store untouched.
    pub fn insert_recipe(&mut self, recipe: Recipe) -> Result<RecipeId, StoreError> {
        let id = recipe.id();
        if self.contains(id) {
            warn!(%id, "rejected recipe with duplicate id");
            return Err(StoreError::DuplicateId(id));
        }
        self.next_id = match (self.next_id, id.get().checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        self.recipes.push(recipe);
        self.refilter();
        debug!(%id, "recipe inserted");
        self.commit(StoreEvent::RecipeAdded(id));
        Ok(id)
    }

    /// Apply `patch` to the recipe with `id`. Returns `false` when no such
    /// recipe exists. A patch that changes nothing is not reported to
    /// subscribers.
    pub fn update_recipe(&mut self, id: RecipeId, patch: RecipePatch) -> bool {
        if patch.is_empty() {
            return self.contains(id);
        }
        let Some(recipe) = self.recipes.iter_mut().find(|recipe| recipe.id() == id) else {
            debug!(%id, "update ignored, no such recipe");
            return false;
        };
        if recipe.apply(patch) {
            self.refilter();
            debug!(%id, "recipe updated");
            self.commit(StoreEvent::RecipeUpdated(id));
        }
        true
    }

    /// Remove the recipe with `id` along with its favorite mark.
    pub fn delete_recipe(&mut self, id: RecipeId) -> Option<Recipe> {
        let Some(index) = self.position(id) else {
            debug!(%id, "delete ignored, no such recipe");
            return None;
        };
        let removed = self.recipes.remove(index);
        self.favorites.remove(&id);
        self.refilter();
        debug!(%id, "recipe deleted");
        self.commit(StoreEvent::RecipeDeleted(id));
        Some(removed)
    }

    /// Replace the search term and refresh the filtered view.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        self.refilter();
        debug!(term = %self.search_term, matches = self.filtered.len(), "search term changed");
        self.commit(StoreEvent::SearchChanged);
    }

    /// Mark a recipe as favorite. Unknown ids are ignored. Returns whether the
    /// recipe is a favorite afterwards.
    pub fn add_favorite(&mut self, id: RecipeId) -> bool {
        if !self.contains(id) {
            debug!(%id, "favorite ignored, no such recipe");
            return false;
        }
        if self.favorites.insert(id) {
            debug!(%id, "favorite added");
            self.commit(StoreEvent::FavoriteAdded(id));
        }
        true
    }

    /// Returns whether `id` was a favorite before the call.
    pub fn remove_favorite(&mut self, id: RecipeId) -> bool {
        if self.favorites.remove(&id) {
            debug!(%id, "favorite removed");
            self.commit(StoreEvent::FavoriteRemoved(id));
            true
        } else {
            false
        }
    }

    /// Flip favorite membership, returning the new state.
    pub fn toggle_favorite(&mut self, id: RecipeId) -> bool {
        if self.is_favorite(id) {
            self.remove_favorite(id);
            false
        } else {
            self.add_favorite(id)
        }
    }

    /// Recompute recommendations from every recipe that is not a favorite.
    pub fn generate_recommendations(&mut self) -> &[Recipe] {
        let candidates: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|recipe| !self.favorites.contains(&recipe.id()))
            .cloned()
            .collect();
        self.recommendations = self.policy.recommend(&candidates);
        // Policies are external code; drop anything that was not offered.
        self.recommendations
            .retain(|recipe| candidates.iter().any(|c| c.id() == recipe.id()));
        let count = self.recommendations.len();
        info!(
            candidates = candidates.len(),
            count, "generated recommendations"
        );
        self.commit(StoreEvent::RecommendationsGenerated { count });
        &self.recommendations
    }

    /// Register a callback run after every state change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Walk forward from the counter; once it is exhausted, reuse the lowest
    /// free id. The collection can never hold every `u64`, so one always exists.
    fn allocate_id(&mut self) -> RecipeId {
        let mut candidate = self.next_id;
        while let Some(raw) = candidate {
            if !self.contains(RecipeId::new(raw)) {
                break;
            }
            candidate = raw.checked_add(1);
        }
        let raw = match candidate {
            Some(raw) => raw,
            None => self.lowest_free_id(),
        };
        self.next_id = raw.checked_add(1);
        RecipeId::new(raw)
    }

    fn lowest_free_id(&self) -> u64 {
        let used: BTreeSet<u64> = self.recipes.iter().map(|recipe| recipe.id().get()).collect();
        (1..=u64::MAX)
            .find(|raw| !used.contains(raw))
            .unwrap_or(0)
    }

    fn refilter(&mut self) {
        self.filtered = filter::filter_recipes(&self.recipes, &self.search_term);
    }

    fn commit(&mut self, event: StoreEvent) {
        self.version += 1;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecipeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeStore")
            .field("recipes", &self.recipes)
            .field("search_term", &self.search_term)
            .field("filtered", &self.filtered.len())
            .field("favorites", &self.favorites)
            .field("recommendations", &self.recommendations.len())
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn store() -> RecipeStore {
        RecipeStore::with_recipes(vec![
            Recipe::new(1, "Rice and Beans", "Tasty and filling").unwrap(),
            Recipe::new(2, "Pasta", "Quick and easy").unwrap(),
        ])
        .unwrap()
        .with_policy(CoinFlip::seeded(11))
    }

    #[test]
    fn generated_ids_skip_existing_ones() {
        let mut store = store();
        let id = store.add_recipe(RecipeDraft::new("Soup", "").unwrap());
        assert_eq!(id, RecipeId::new(3));

        store
            .insert_recipe(Recipe::new(10, "Stew", "").unwrap())
            .unwrap();
        let next = store.add_recipe(RecipeDraft::new("Salad", "").unwrap());
        assert_eq!(next, RecipeId::new(11));
    }

    #[test]
    fn generated_ids_wrap_after_the_largest_id() {
        let mut store = RecipeStore::with_recipes(vec![
            Recipe::new(u64::MAX - 1, "Almost", "").unwrap(),
        ])
        .unwrap();
        let first = store.add_recipe(RecipeDraft::new("Last", "").unwrap());
        let second = store.add_recipe(RecipeDraft::new("Wrapped", "").unwrap());
        let third = store.add_recipe(RecipeDraft::new("Next", "").unwrap());
        assert_eq!(first, RecipeId::new(u64::MAX));
        assert_eq!(second, RecipeId::new(1));
        assert_eq!(third, RecipeId::new(2));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn inserting_the_largest_id_reuses_free_ids() {
        let mut store = store();
        store
            .insert_recipe(Recipe::new(u64::MAX, "Edge", "").unwrap())
            .unwrap();
        let id = store.add_recipe(RecipeDraft::new("Soup", "").unwrap());
        assert_eq!(id, RecipeId::new(3));
        assert!(store.contains(RecipeId::new(u64::MAX)));
    }

    #[test]
    fn empty_patch_reports_presence_without_changes() {
        let mut store = store();
        let version = store.version();
        assert!(store.update_recipe(RecipeId::new(1), RecipePatch::default()));
        assert!(!store.update_recipe(RecipeId::new(9), RecipePatch::default()));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn with_recipes_rejects_duplicates() {
        let err = RecipeStore::with_recipes(vec![
            Recipe::new(1, "A", "").unwrap(),
            Recipe::new(1, "B", "").unwrap(),
        ])
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(RecipeId::new(1)));
    }

    #[test]
    fn noop_operations_do_not_bump_version() {
        let mut store = store();
        let start = store.version();
        store.set_search_term("");
        store.update_recipe(RecipeId::new(99), RecipePatch::title("x"));
        store.delete_recipe(RecipeId::new(99));
        store.add_favorite(RecipeId::new(99));
        store.remove_favorite(RecipeId::new(1));
        store.update_recipe(RecipeId::new(1), RecipePatch::title("Rice and Beans"));
        assert_eq!(store.version(), start);

        store.add_favorite(RecipeId::new(1));
        store.add_favorite(RecipeId::new(1));
        assert_eq!(store.version(), start + 1);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |event| sink.borrow_mut().push(*event));

        store.set_search_term("pasta");
        store.add_favorite(RecipeId::new(2));
        store.delete_recipe(RecipeId::new(2));

        assert_eq!(
            *seen.borrow(),
            vec![
                StoreEvent::SearchChanged,
                StoreEvent::FavoriteAdded(RecipeId::new(2)),
                StoreEvent::RecipeDeleted(RecipeId::new(2)),
            ]
        );
        assert_eq!(store.version(), seen.borrow().len() as u64);

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.set_search_term("");
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn toggle_favorite_round_trip() {
        let mut store = store();
        assert!(store.toggle_favorite(RecipeId::new(1)));
        assert!(store.is_favorite(RecipeId::new(1)));
        assert!(!store.toggle_favorite(RecipeId::new(1)));
        assert!(store.favorites().is_empty());
        assert!(!store.toggle_favorite(RecipeId::new(42)));
    }

    #[test]
    fn recommendations_stay_stale_until_regenerated() {
        let mut store = store().with_policy(CoinFlip::seeded(0).with_probability(1.0));
        store.generate_recommendations();
        assert_eq!(store.recommendations().len(), 2);

        store.add_favorite(RecipeId::new(1));
        assert_eq!(store.recommendations().len(), 2);

        store.generate_recommendations();
        let ids: Vec<RecipeId> = store.recommendations().iter().map(Recipe::id).collect();
        assert_eq!(ids, vec![RecipeId::new(2)]);
    }

    struct Everything;

    impl RecommendationPolicy for Everything {
        fn recommend(&mut self, _candidates: &[Recipe]) -> Vec<Recipe> {
            vec![
                Recipe::new(1, "Rice and Beans", "Tasty and filling").unwrap(),
                Recipe::new(2, "Pasta", "Quick and easy").unwrap(),
                Recipe::new(77, "Ghost", "").unwrap(),
            ]
        }
    }

    #[test]
    fn policy_output_is_limited_to_candidates() {
        let mut store = store().with_policy(Everything);
        store.add_favorite(RecipeId::new(1));
        let ids: Vec<RecipeId> = store
            .generate_recommendations()
            .iter()
            .map(Recipe::id)
            .collect();
        assert_eq!(ids, vec![RecipeId::new(2)]);
    }
}
