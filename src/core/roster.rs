// Cercanos - core/roster.rs
//
// The roster store: the in-memory collection of professionals plus the
// catalog (facet options and the demo user) they were seeded with.
//
// The built-in dataset is embedded in the binary; a replacement dataset can
// be supplied as a JSON file with the same shape.

use crate::core::model::{Professional, Review, User};
use crate::core::review::apply_review;
use crate::util::constants::MAX_REVIEW_RATING;
use crate::util::error::RosterError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Embedded default dataset.
const BUILTIN_SEED: &str = include_str!("../../data/roster.json");

/// Facet options and the fixed demo identity used by login.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Specialty options, in display order.
    pub specialties: Vec<String>,
    /// Insurance plan options, in display order.
    pub insurance_plans: Vec<String>,
    /// The identity every login resolves to.
    pub mock_user: User,
}

/// On-disk shape of a seed dataset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    #[serde(flatten)]
    catalog: Catalog,
    professionals: Vec<Professional>,
}

/// Mutable collection of professionals, in seed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    professionals: Vec<Professional>,
}

impl Roster {
    /// Build a roster, rejecting duplicate identifiers and ratings off the
    /// star scale (0.0 to 5.0 for professionals, 1 to 5 for reviews).
    pub fn new(professionals: Vec<Professional>) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        for prof in &professionals {
            if !seen.insert(prof.id.as_str()) {
                return Err(RosterError::DuplicateId {
                    id: prof.id.clone(),
                });
            }
            if !(0.0..=f64::from(MAX_REVIEW_RATING)).contains(&prof.rating) {
                return Err(RosterError::InvalidRating {
                    id: prof.id.clone(),
                    rating: prof.rating,
                });
            }
            if let Some(review) = prof
                .reviews
                .iter()
                .find(|r| !(1..=MAX_REVIEW_RATING).contains(&r.rating))
            {
                return Err(RosterError::InvalidReviewRating {
                    id: prof.id.clone(),
                    review_id: review.id.clone(),
                    rating: review.rating,
                });
            }
        }
        Ok(Self { professionals })
    }

    /// All professionals in roster order.
    pub fn professionals(&self) -> &[Professional] {
        &self.professionals
    }

    pub fn len(&self) -> usize {
        self.professionals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.professionals.is_empty()
    }

    /// Look up a professional by identifier.
    pub fn get(&self, id: &str) -> Option<&Professional> {
        self.professionals.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Professional, RosterError> {
        self.professionals
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RosterError::NotFound { id: id.to_string() })
    }

    /// Prepend a review to a professional and recompute its aggregates.
    pub fn add_review(&mut self, id: &str, review: Review) -> Result<&Professional, RosterError> {
        let prof = self.get_mut(id)?;
        apply_review(prof, review);
        tracing::debug!(
            professional = id,
            review_count = prof.review_count,
            rating = prof.rating,
            "Review added"
        );
        Ok(prof)
    }

    /// Replace the accepted insurance list of a professional.
    ///
    /// Duplicates are dropped, keeping the first occurrence's position.
    pub fn set_insurances(
        &mut self,
        id: &str,
        insurances: Vec<String>,
    ) -> Result<&Professional, RosterError> {
        let prof = self.get_mut(id)?;
        let mut seen = HashSet::new();
        prof.insurances = insurances
            .into_iter()
            .filter(|plan| seen.insert(plan.clone()))
            .collect();
        tracing::info!(
            professional = id,
            count = prof.insurances.len(),
            "Accepted insurances updated"
        );
        Ok(prof)
    }

    /// Professionals whose IDs are in `ids`, in roster order.
    /// IDs with no matching professional are skipped.
    pub fn select_ids<'a, I>(&self, ids: I) -> Vec<&Professional>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = ids.into_iter().collect();
        self.professionals
            .iter()
            .filter(|p| wanted.contains(p.id.as_str()))
            .collect()
    }
}

/// Parse a seed dataset. `path` is used for error context only.
pub fn parse_seed(content: &str, path: &Path) -> Result<(Catalog, Roster), RosterError> {
    let seed: SeedFile = serde_json::from_str(content).map_err(|e| RosterError::SeedParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let roster = Roster::new(seed.professionals)?;
    Ok((seed.catalog, roster))
}

/// Load the dataset embedded in the binary.
pub fn load_builtin() -> Result<(Catalog, Roster), RosterError> {
    let (catalog, roster) = parse_seed(BUILTIN_SEED, &PathBuf::from("<builtin>/roster.json"))?;
    tracing::debug!(professionals = roster.len(), "Loaded built-in roster");
    Ok((catalog, roster))
}

/// Load a dataset from a JSON file on disk.
pub fn load_from_path(path: &Path) -> Result<(Catalog, Roster), RosterError> {
    let content = std::fs::read_to_string(path).map_err(|e| RosterError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let (catalog, roster) = parse_seed(&content, path)?;
    tracing::info!(
        path = %path.display(),
        professionals = roster.len(),
        "Loaded roster from file"
    );
    Ok((catalog, roster))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_seed_is_valid() {
        let (catalog, roster) = load_builtin().expect("embedded roster must parse");
        assert!(!roster.is_empty());
        assert!(!catalog.specialties.is_empty());
        assert!(!catalog.insurance_plans.is_empty());

        for prof in roster.professionals() {
            assert!(
                catalog.specialties.contains(&prof.specialty),
                "specialty '{}' of {} missing from catalog",
                prof.specialty,
                prof.id
            );
            if !prof.reviews.is_empty() {
                assert_eq!(prof.review_count as usize, prof.reviews.len(), "{}", prof.id);
            }
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let (_, roster) = load_builtin().unwrap();
        let mut profs = roster.professionals().to_vec();
        profs.push(profs[0].clone());
        let err = Roster::new(profs).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateId { .. }));
    }

    #[test]
    fn test_professional_rating_off_scale_rejected() {
        let (_, roster) = load_builtin().unwrap();
        for bad in [-1.0, 5.5, f64::NAN] {
            let mut profs = roster.professionals().to_vec();
            profs[1].rating = bad;
            let err = Roster::new(profs).unwrap_err();
            assert!(
                matches!(err, RosterError::InvalidRating { ref id, .. } if id == "2"),
                "rating {bad} accepted: {err:?}"
            );
        }
    }

    #[test]
    fn test_review_rating_off_scale_rejected() {
        let (_, roster) = load_builtin().unwrap();
        for bad in [0, 6] {
            let mut profs = roster.professionals().to_vec();
            profs[0].reviews[1].rating = bad;
            let err = Roster::new(profs).unwrap_err();
            assert!(matches!(
                err,
                RosterError::InvalidReviewRating { ref review_id, rating, .. }
                    if review_id == "r1-2" && rating == bad
            ));
        }
    }

    #[test]
    fn test_seed_with_negative_rating_fails_to_parse() {
        let seed = BUILTIN_SEED.replacen("\"rating\": 3.0", "\"rating\": -1.0", 1);
        let err = parse_seed(&seed, Path::new("custom.json")).unwrap_err();
        assert!(matches!(err, RosterError::InvalidRating { ref id, .. } if id == "2"));
    }

    #[test]
    fn test_malformed_seed_reports_path() {
        let err = parse_seed("{ not json", Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_set_insurances_dedups_and_keeps_order() {
        let (_, mut roster) = load_builtin().unwrap();
        let updated = roster
            .set_insurances(
                "1",
                vec![
                    "PAMI".to_string(),
                    "OSDE".to_string(),
                    "PAMI".to_string(),
                ],
            )
            .unwrap();
        assert_eq!(updated.insurances, vec!["PAMI", "OSDE"]);
        assert_eq!(roster.get("1").unwrap().insurances, vec!["PAMI", "OSDE"]);
    }

    #[test]
    fn test_unknown_professional_is_not_found() {
        let (_, mut roster) = load_builtin().unwrap();
        let err = roster.set_insurances("does-not-exist", Vec::new()).unwrap_err();
        assert!(matches!(err, RosterError::NotFound { ref id } if id == "does-not-exist"));
    }

    #[test]
    fn test_select_ids_uses_roster_order() {
        let (_, roster) = load_builtin().unwrap();
        let selected: Vec<&str> = roster
            .select_ids(["3", "1", "missing"])
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(selected, vec!["1", "3"]);
    }
}
