// Cercanos - core/filter.rs
//
// Composable filter engine for the professional roster.
// All active criteria are AND-combined; the result always preserves roster
// order and is recomputed in full on every change.
// Core layer: pure logic, no I/O.

use crate::core::model::Professional;
use std::collections::HashSet;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Free-text search over name and specialty (case-insensitive).
    /// Empty = no filter.
    pub query: String,

    /// Specialties to include (empty = all).
    pub specialties: HashSet<String>,

    /// Insurance plans; a professional must accept at least one (empty = all).
    pub insurances: HashSet<String>,

    /// Minimum star rating. 0 = no filter.
    pub min_rating: u8,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.specialties.is_empty()
            && self.insurances.is_empty()
            && self.min_rating == 0
    }

    /// Number of active facet selections, as shown on the filter badge.
    /// The text query is not a facet and does not count.
    pub fn active_filter_count(&self) -> usize {
        self.specialties.len() + self.insurances.len() + usize::from(self.min_rating > 0)
    }

    /// Select `rating` as the minimum, or clear it if it is already selected.
    pub fn toggle_min_rating(&mut self, rating: u8) {
        self.min_rating = if self.min_rating == rating { 0 } else { rating };
    }

    /// Checkbox toggle for the specialty facet.
    pub fn toggle_specialty(&mut self, specialty: &str) {
        toggle_in_set(&mut self.specialties, specialty);
    }

    /// Checkbox toggle for the insurance facet.
    pub fn toggle_insurance(&mut self, insurance: &str) {
        toggle_in_set(&mut self.insurances, insurance);
    }

    /// Reset all facets. The text query is left untouched.
    pub fn clear_facets(&mut self) {
        self.specialties.clear();
        self.insurances.clear();
        self.min_rating = 0;
    }
}

/// Remove `value` if present, otherwise insert it.
fn toggle_in_set(set: &mut HashSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Remove `value` from an ordered list if present, otherwise append it.
///
/// Used by list-valued selections that keep display order (the insurance
/// panel's accepted-plans list).
pub fn toggle_in_list(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
    } else {
        list.push(value.to_string());
    }
}

/// Apply filters to a roster, returning indices of matching professionals.
///
/// Indices are ascending, so the result is an order-preserving subsequence
/// of `roster`.
pub fn apply_filters(roster: &[Professional], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..roster.len()).collect();
    }

    let query_lower = filter.query.to_lowercase();

    roster
        .iter()
        .enumerate()
        .filter(|(_, prof)| matches_all(prof, filter, &query_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Convenience form of [`apply_filters`] that returns the matching records.
pub fn filter_professionals<'a>(
    roster: &'a [Professional],
    filter: &FilterState,
) -> Vec<&'a Professional> {
    apply_filters(roster, filter)
        .into_iter()
        .map(|idx| &roster[idx])
        .collect()
}

/// Check if a single professional matches all active filters.
fn matches_all(prof: &Professional, filter: &FilterState, query_lower: &str) -> bool {
    // Text search: name OR specialty
    if !query_lower.is_empty()
        && !prof.name.to_lowercase().contains(query_lower)
        && !prof.specialty.to_lowercase().contains(query_lower)
    {
        return false;
    }

    if !filter.specialties.is_empty() && !filter.specialties.contains(&prof.specialty) {
        return false;
    }

    if !filter.insurances.is_empty() && !prof.accepts_any(&filter.insurances) {
        return false;
    }

    prof.rating >= f64::from(filter.min_rating)
}
