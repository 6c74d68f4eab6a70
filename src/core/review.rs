// Cercanos - core/review.rs
//
// Review submission: validation of a draft and its application to a
// professional record. Pure logic; the caller supplies the clock.

use crate::core::model::{Professional, Review, User};
use crate::util::constants::{MAX_REVIEW_RATING, NEW_REVIEW_DATE_MARKER};
use chrono::{DateTime, Utc};
use std::fmt;

/// What the user typed into the review form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Selected stars; 0 means none selected.
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    /// Check the draft on its own, before any user or roster lookup.
    pub fn validate(&self) -> Result<(), ReviewRejection> {
        if self.rating == 0 {
            return Err(ReviewRejection::MissingRating);
        }
        if self.rating > MAX_REVIEW_RATING {
            return Err(ReviewRejection::RatingOutOfRange {
                rating: self.rating,
            });
        }
        if self.comment.trim().is_empty() {
            return Err(ReviewRejection::EmptyComment);
        }
        Ok(())
    }
}

/// Why a submission was ignored. The professional record is never touched
/// when a submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewRejection {
    /// Nobody is logged in.
    NotLoggedIn,
    /// No star rating was selected.
    MissingRating,
    /// More stars than the scale allows.
    RatingOutOfRange { rating: u8 },
    /// Comment is empty or whitespace only.
    EmptyComment,
    /// The target professional does not exist.
    UnknownProfessional { id: String },
}

impl fmt::Display for ReviewRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoggedIn => f.write_str("you must be logged in to leave a review"),
            Self::MissingRating => f.write_str("select a rating between 1 and 5 stars"),
            Self::RatingOutOfRange { rating } => {
                write!(f, "rating {rating} is out of range (1-{MAX_REVIEW_RATING})")
            }
            Self::EmptyComment => f.write_str("the comment cannot be empty"),
            Self::UnknownProfessional { id } => write!(f, "no professional with ID '{id}'"),
        }
    }
}

/// Outcome of a review submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    /// The review was prepended and the aggregates recomputed.
    Applied {
        review_id: String,
        new_rating: f64,
        review_count: u32,
    },
    /// The submission was ignored.
    Rejected(ReviewRejection),
}

impl ReviewOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReviewOutcome::Applied { .. })
    }
}

/// Identifier for a review created at `submitted_at`.
pub fn review_id(professional_id: &str, submitted_at: DateTime<Utc>) -> String {
    format!("r{professional_id}-{}", submitted_at.timestamp_millis())
}

/// Build the review record for a validated draft.
///
/// The comment is stored as typed; trimming is only used for validation.
pub fn build_review(
    professional_id: &str,
    author: &User,
    draft: &ReviewDraft,
    submitted_at: DateTime<Utc>,
) -> Review {
    Review {
        id: review_id(professional_id, submitted_at),
        author: author.name.clone(),
        avatar_url: author.avatar_url.clone(),
        rating: draft.rating,
        comment: draft.comment.clone(),
        date: NEW_REVIEW_DATE_MARKER.to_string(),
    }
}

/// Prepend `review` and recompute the aggregates.
///
/// `review_count` is incremented (not re-derived from the list) and `rating`
/// becomes the plain mean of every review rating, the new one included.
pub fn apply_review(prof: &mut Professional, review: Review) {
    prof.reviews.insert(0, review);
    prof.review_count += 1;
    prof.rating = average_rating(&prof.reviews).unwrap_or(prof.rating);
}

/// Arithmetic mean of the review ratings, or `None` for an empty list.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / reviews.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::GeoPoint;
    use chrono::TimeZone;

    fn user() -> User {
        User {
            name: "Sofía Fernández".to_string(),
            email: "sofia@example.com".to_string(),
            phone: "555-0101".to_string(),
            avatar_url: "https://example.com/sofia.png".to_string(),
            insurance: "OSDE".to_string(),
            favorite_professionals: Vec::new(),
        }
    }

    fn seeded_review(id: &str, rating: u8) -> Review {
        Review {
            id: id.to_string(),
            author: "Paciente".to_string(),
            avatar_url: String::new(),
            rating,
            comment: "ok".to_string(),
            date: "2024-03-01".to_string(),
        }
    }

    fn prof_with_reviews(ratings: &[u8]) -> Professional {
        let reviews: Vec<Review> = ratings
            .iter()
            .enumerate()
            .map(|(i, r)| seeded_review(&format!("s{i}"), *r))
            .collect();
        Professional {
            id: "5".to_string(),
            name: "Dr. Test".to_string(),
            photo_url: String::new(),
            specialty: "Clínica Médica".to_string(),
            rating: average_rating(&reviews).unwrap_or(0.0),
            review_count: reviews.len() as u32,
            address: String::new(),
            phone: String::new(),
            insurances: Vec::new(),
            bio: String::new(),
            location: GeoPoint::new(0.0, 0.0),
            reviews,
        }
    }

    fn at_millis(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    #[test]
    fn test_validate_rejects_zero_rating_and_blank_comment() {
        assert_eq!(
            ReviewDraft::new(0, "Muy bueno").validate(),
            Err(ReviewRejection::MissingRating)
        );
        assert_eq!(
            ReviewDraft::new(4, "   \n\t").validate(),
            Err(ReviewRejection::EmptyComment)
        );
        assert_eq!(
            ReviewDraft::new(6, "demasiado").validate(),
            Err(ReviewRejection::RatingOutOfRange { rating: 6 })
        );
        assert!(ReviewDraft::new(1, "x").validate().is_ok());
    }

    #[test]
    fn test_apply_review_recomputes_mean() {
        let mut prof = prof_with_reviews(&[4, 4]);
        assert_eq!(prof.review_count, 2);
        assert_eq!(prof.rating, 4.0);

        let review = build_review(&prof.id, &user(), &ReviewDraft::new(5, "Excelente"), at_millis(1_700_000_000_000));
        apply_review(&mut prof, review);

        assert_eq!(prof.review_count, 3);
        assert!((prof.rating - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(prof.rating_label(), "4.3");
    }

    #[test]
    fn test_new_review_is_prepended_with_marker_date() {
        let mut prof = prof_with_reviews(&[3]);
        let review = build_review(&prof.id, &user(), &ReviewDraft::new(2, " regular "), at_millis(42));
        apply_review(&mut prof, review);

        let newest = &prof.reviews[0];
        assert_eq!(newest.id, "r5-42");
        assert_eq!(newest.author, "Sofía Fernández");
        assert_eq!(newest.avatar_url, "https://example.com/sofia.png");
        assert_eq!(newest.date, NEW_REVIEW_DATE_MARKER);
        assert_eq!(newest.comment, " regular ");
        assert_eq!(prof.reviews[1].id, "s0");
    }

    #[test]
    fn test_first_review_replaces_seeded_rating() {
        let mut prof = prof_with_reviews(&[]);
        prof.rating = 4.8;
        prof.review_count = 0;
        let review = build_review(&prof.id, &user(), &ReviewDraft::new(3, "bien"), at_millis(1));
        apply_review(&mut prof, review);
        assert_eq!(prof.rating, 3.0);
        assert_eq!(prof.review_count, 1);
    }

    #[test]
    fn test_average_rating_empty_is_none() {
        assert_eq!(average_rating(&[]), None);
    }
}
