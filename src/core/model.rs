// Cercanos - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// presentation concerns. Field names serialise in camelCase so persisted
// values (e.g. the `currentUser` storage entry) keep their established shape.

use serde::{Deserialize, Serialize};

// =============================================================================
// Professional
// =============================================================================

/// A healthcare professional listed in the directory.
///
/// `rating` and `review_count` are seeded values. Once a review is added they
/// are kept consistent with `reviews` (see `core::review::apply_review`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    /// Unique identifier within the roster.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub photo_url: String,

    pub specialty: String,

    /// Average star rating, 0.0 to 5.0.
    pub rating: f64,

    pub review_count: u32,

    pub address: String,

    pub phone: String,

    /// Accepted insurance plans, in display order.
    #[serde(default)]
    pub insurances: Vec<String>,

    #[serde(default)]
    pub bio: String,

    pub location: GeoPoint,

    /// Reviews, most recent first.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Professional {
    /// Rating formatted for display with one decimal place.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }

    /// Whether this professional accepts any of the given plans.
    pub fn accepts_any<'a, I>(&self, plans: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        plans.into_iter().any(|plan| self.insurances.contains(plan))
    }
}

// =============================================================================
// Geographic coordinate
// =============================================================================

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// =============================================================================
// Review
// =============================================================================

/// A patient review attached to a professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// `r<professional-id>-<unix-millis>` for reviews created at runtime.
    pub id: String,

    pub author: String,

    #[serde(default)]
    pub avatar_url: String,

    /// Star rating, 1 to 5.
    pub rating: u8,

    pub comment: String,

    /// Display date. Either a seeded date string or the "ahora mismo" marker.
    pub date: String,
}

// =============================================================================
// User
// =============================================================================

/// The logged-in patient.
///
/// `favorite_professionals` is carried for fidelity with the stored record
/// only; the favourites store is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar_url: String,
    /// Insurance plan the user is affiliated with.
    pub insurance: String,
    #[serde(default)]
    pub favorite_professionals: Vec<String>,
}

// =============================================================================
// View mode
// =============================================================================

/// How the filtered roster is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    #[default]
    Map,
}

impl ViewMode {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "Lista",
            ViewMode::Map => "Mapa",
        }
    }

    /// Parse a config/CLI value ("list" or "map"), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "list" => Some(ViewMode::List),
            "map" => Some(ViewMode::Map),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
