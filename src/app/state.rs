// Cercanos - app/state.rs
//
// Application state management. Holds the roster, filter state, filtered
// view, favourites, logged-in user, and the selected professional.
// Owned by the caller and mutated through `&mut self`; every mutation is
// applied as one step and is visible to the next read.

use crate::app::account;
use crate::app::favorites::Favorites;
use crate::app::storage::LocalStorage;
use crate::core::filter::FilterState;
use crate::core::model::{Professional, User, ViewMode};
use crate::core::review::{build_review, ReviewDraft, ReviewOutcome, ReviewRejection};
use crate::core::roster::{Catalog, Roster};
use crate::util::error::{RosterError, StorageError};
use chrono::{DateTime, Utc};

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Facet options and the demo identity.
    pub catalog: Catalog,

    roster: Roster,

    /// Current filter configuration. Call `apply_filters` after editing it
    /// directly; the setters below do so themselves.
    pub filter_state: FilterState,

    /// Indices of professionals matching the current filter (into the roster).
    filtered_indices: Vec<usize>,

    favorites: Favorites,

    current_user: Option<User>,

    /// Identifier of the professional open in the detail view. Resolved on
    /// every read so the view always reflects the latest record.
    selected_id: Option<String>,

    /// List or map presentation.
    pub view_mode: ViewMode,

    storage: Box<dyn LocalStorage>,
}

impl AppState {
    /// Create state over a seeded roster, restoring favourites and the
    /// logged-in user from `storage`.
    pub fn new(catalog: Catalog, roster: Roster, storage: Box<dyn LocalStorage>) -> Self {
        let favorites = Favorites::load(storage.as_ref());
        let current_user = account::restore_user(storage.as_ref());
        let filtered_indices = (0..roster.len()).collect();

        tracing::info!(
            professionals = roster.len(),
            favorites = favorites.len(),
            logged_in = current_user.is_some(),
            "Application state ready"
        );

        Self {
            catalog,
            roster,
            filter_state: FilterState::default(),
            filtered_indices,
            favorites,
            current_user,
            selected_id: None,
            view_mode: ViewMode::default(),
            storage,
        }
    }

    // -------------------------------------------------------------------------
    // Roster and filtering
    // -------------------------------------------------------------------------

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Recompute the filtered view from the roster and filter state.
    pub fn apply_filters(&mut self) {
        self.filtered_indices =
            crate::core::filter::apply_filters(self.roster.professionals(), &self.filter_state);
        tracing::debug!(
            visible = self.filtered_indices.len(),
            total = self.roster.len(),
            "Filters applied"
        );
    }

    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered_indices
    }

    /// Professionals matching the current filter, in roster order.
    pub fn visible_professionals(&self) -> Vec<&Professional> {
        let all = self.roster.professionals();
        self.filtered_indices
            .iter()
            .filter_map(|&idx| all.get(idx))
            .collect()
    }

    /// Replace the whole filter state.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter_state = filter;
        self.apply_filters();
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter_state.query = query.to_string();
        self.apply_filters();
    }

    pub fn toggle_specialty(&mut self, specialty: &str) {
        self.filter_state.toggle_specialty(specialty);
        self.apply_filters();
    }

    pub fn toggle_insurance(&mut self, insurance: &str) {
        self.filter_state.toggle_insurance(insurance);
        self.apply_filters();
    }

    /// Select a minimum rating, or clear it if it is already selected.
    pub fn toggle_min_rating(&mut self, rating: u8) {
        self.filter_state.toggle_min_rating(rating);
        self.apply_filters();
    }

    pub fn clear_facets(&mut self) {
        self.filter_state.clear_facets();
        self.apply_filters();
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Open the detail view for `id`. Returns false if no such professional.
    pub fn select(&mut self, id: &str) -> bool {
        if self.roster.get(id).is_some() {
            self.selected_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    /// The professional in the detail view, looked up fresh.
    pub fn selected_professional(&self) -> Option<&Professional> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.roster.get(id))
    }

    // -------------------------------------------------------------------------
    // Favourites
    // -------------------------------------------------------------------------

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Toggle a favourite and persist the set. Returns the new membership.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, StorageError> {
        self.favorites.toggle(id, self.storage.as_mut())
    }

    /// Favourite professionals present in the roster, in roster order.
    pub fn favorite_professionals(&self) -> Vec<&Professional> {
        self.roster.select_ids(self.favorites.ids())
    }

    // -------------------------------------------------------------------------
    // Account
    // -------------------------------------------------------------------------

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Log in as the demo user.
    pub fn login(&mut self) -> Result<&User, StorageError> {
        let user = account::login(&self.catalog, self.storage.as_mut())?;
        Ok(self.current_user.insert(user))
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        account::logout(self.storage.as_mut())?;
        self.current_user = None;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Submit a review for `professional_id` as the logged-in user.
    ///
    /// Invalid submissions are rejected without touching the roster. On
    /// success the filtered view is recomputed, since the rating changed.
    pub fn submit_review(
        &mut self,
        professional_id: &str,
        draft: &ReviewDraft,
        submitted_at: DateTime<Utc>,
    ) -> ReviewOutcome {
        let Some(user) = self.current_user.as_ref() else {
            return reject(ReviewRejection::NotLoggedIn);
        };
        if let Err(rejection) = draft.validate() {
            return reject(rejection);
        }
        if self.roster.get(professional_id).is_none() {
            return reject(ReviewRejection::UnknownProfessional {
                id: professional_id.to_string(),
            });
        }

        let review = build_review(professional_id, user, draft, submitted_at);
        let review_id = review.id.clone();
        let outcome = match self.roster.add_review(professional_id, review) {
            Ok(prof) => ReviewOutcome::Applied {
                review_id,
                new_rating: prof.rating,
                review_count: prof.review_count,
            },
            Err(_) => ReviewOutcome::Rejected(ReviewRejection::UnknownProfessional {
                id: professional_id.to_string(),
            }),
        };

        self.apply_filters();
        outcome
    }

    /// Replace the accepted insurances of a professional.
    ///
    /// Plans missing from the catalog are accepted but logged.
    pub fn save_insurances(
        &mut self,
        professional_id: &str,
        insurances: Vec<String>,
    ) -> Result<&Professional, RosterError> {
        for plan in &insurances {
            if !self.catalog.insurance_plans.contains(plan) {
                tracing::warn!(plan = %plan, "Insurance plan is not in the catalog");
            }
        }
        self.roster.set_insurances(professional_id, insurances)?;
        self.apply_filters();
        self.roster
            .get(professional_id)
            .ok_or_else(|| RosterError::NotFound {
                id: professional_id.to_string(),
            })
    }
}

fn reject(rejection: ReviewRejection) -> ReviewOutcome {
    tracing::debug!(reason = %rejection, "Review submission rejected");
    ReviewOutcome::Rejected(rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::storage::MemoryStorage;
    use crate::core::roster::load_builtin;
    use chrono::TimeZone;

    fn make_state() -> AppState {
        let (catalog, roster) = load_builtin().unwrap();
        AppState::new(catalog, roster, Box::new(MemoryStorage::new()))
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_717_000_000_000).single().unwrap()
    }

    #[test]
    fn test_new_state_shows_everything() {
        let state = make_state();
        assert_eq!(state.visible_professionals().len(), state.roster().len());
        assert!(!state.is_logged_in());
        assert!(state.favorites().is_empty());
    }

    #[test]
    fn test_setters_reapply_filters() {
        let mut state = make_state();
        state.toggle_specialty("Pediatría");
        let visible: Vec<&str> = state
            .visible_professionals()
            .iter()
            .map(|p| p.specialty.as_str())
            .collect();
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|s| *s == "Pediatría"));

        state.clear_facets();
        assert_eq!(state.visible_professionals().len(), state.roster().len());
    }

    #[test]
    fn test_review_requires_login() {
        let mut state = make_state();
        let before = state.roster().get("1").cloned();
        let outcome = state.submit_review("1", &ReviewDraft::new(5, "Excelente"), now());
        assert_eq!(outcome, ReviewOutcome::Rejected(ReviewRejection::NotLoggedIn));
        assert_eq!(state.roster().get("1").cloned(), before);
    }

    #[test]
    fn test_selected_professional_sees_new_review() {
        let mut state = make_state();
        state.login().unwrap();
        assert!(state.select("2"));
        let before = state.selected_professional().unwrap().review_count;

        let outcome = state.submit_review("2", &ReviewDraft::new(5, "Excelente"), now());
        assert!(outcome.is_applied());

        let selected = state.selected_professional().unwrap();
        assert_eq!(selected.review_count, before + 1);
        assert_eq!(selected.reviews[0].comment, "Excelente");
    }

    #[test]
    fn test_review_updates_rating_filter_result() {
        let mut state = make_state();
        state.login().unwrap();
        state.toggle_min_rating(4);
        assert!(!state.visible_professionals().iter().any(|p| p.id == "2"));

        // Pediatrician starts at 3.0 from one review; two fives lift it to 4.33.
        for _ in 0..2 {
            state.submit_review("2", &ReviewDraft::new(5, "Muy bien"), now());
        }
        assert!(state.visible_professionals().iter().any(|p| p.id == "2"));
    }

    #[test]
    fn test_unknown_professional_review_rejected() {
        let mut state = make_state();
        state.login().unwrap();
        let outcome = state.submit_review("404", &ReviewDraft::new(3, "hola"), now());
        assert_eq!(
            outcome,
            ReviewOutcome::Rejected(ReviewRejection::UnknownProfessional {
                id: "404".to_string()
            })
        );
    }

    #[test]
    fn test_select_unknown_is_refused() {
        let mut state = make_state();
        assert!(!state.select("nope"));
        assert!(state.selected_professional().is_none());

        assert!(state.select("3"));
        assert!(!state.select("nope"));
        assert_eq!(state.selected_professional().map(|p| p.id.as_str()), Some("3"));
        state.clear_selection();
        assert!(state.selected_professional().is_none());
    }

    #[test]
    fn test_filtered_indices_track_query() {
        let mut state = make_state();
        state.set_query("zzz");
        assert!(state.filtered_indices().is_empty());
        state.set_query("");
        assert_eq!(state.filtered_indices().len(), state.roster().len());
    }

    #[test]
    fn test_favorites_resolve_in_roster_order() {
        let mut state = make_state();
        state.toggle_favorite("5").unwrap();
        state.toggle_favorite("2").unwrap();
        state.toggle_favorite("ghost").unwrap();
        let ids: Vec<&str> = state
            .favorite_professionals()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "5"]);
        assert!(state.is_favorite("ghost"));
    }

    #[test]
    fn test_save_insurances_affects_insurance_facet() {
        let mut state = make_state();
        state.toggle_insurance("PAMI");
        assert!(!state.visible_professionals().iter().any(|p| p.id == "1"));

        let updated = state
            .save_insurances("1", vec!["OSDE".to_string(), "PAMI".to_string()])
            .unwrap();
        assert_eq!(updated.insurances, vec!["OSDE", "PAMI"]);
        assert!(state.visible_professionals().iter().any(|p| p.id == "1"));
    }

    #[test]
    fn test_logout_clears_user() {
        let mut state = make_state();
        state.login().unwrap();
        assert!(state.is_logged_in());
        state.logout().unwrap();
        assert!(state.current_user().is_none());
    }
}
