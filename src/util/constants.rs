// Cercanos - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Cercanos";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Cercanos";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Local storage
// =============================================================================

/// Storage key holding the JSON array of favourite professional IDs.
pub const FAVORITES_STORAGE_KEY: &str = "favoriteProfessionals";

/// Storage key holding the JSON-encoded logged-in user.
pub const CURRENT_USER_STORAGE_KEY: &str = "currentUser";

/// File name of the persisted local storage map (in the platform data dir).
pub const LOCAL_STORAGE_FILE_NAME: &str = "local_storage.json";

// =============================================================================
// Ratings and reviews
// =============================================================================

/// Highest star rating a review can carry.
pub const MAX_REVIEW_RATING: u8 = 5;

/// Minimum-rating thresholds offered by the rating facet, highest first.
pub const RATING_THRESHOLDS: [u8; 4] = [4, 3, 2, 1];

/// Display date given to reviews submitted during this session.
pub const NEW_REVIEW_DATE_MARKER: &str = "ahora mismo";

/// Default artificial delay before a submitted review is applied (ms).
pub const DEFAULT_REVIEW_SUBMIT_DELAY_MS: u64 = 500;

/// Maximum user-configurable review submission delay (ms).
pub const MAX_REVIEW_SUBMIT_DELAY_MS: u64 = 10_000;

// =============================================================================
// Professional panel
// =============================================================================

/// Professional edited by the insurance panel when none is configured.
pub const DEFAULT_PANEL_PROFESSIONAL_ID: &str = "1";

/// Separator used when flattening insurance lists into one text cell.
pub const INSURANCE_LIST_SEPARATOR: &str = "; ";

// =============================================================================
// Map view
// =============================================================================

/// Map centre used when there is nothing to fit (Buenos Aires).
pub const DEFAULT_MAP_CENTER: (f64, f64) = (-34.603722, -58.381592);

/// Zoom level used with the default map centre.
pub const DEFAULT_MAP_ZOOM: u8 = 13;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Kept at warn so command output stays readable.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
