// Cercanos - app/account.rs
//
// Simulated account handling. There is no backend: login always resolves to
// the catalog's demo user, which is persisted under the `currentUser` key
// until logout.

use crate::app::storage::{get_json, set_json, LocalStorage};
use crate::core::model::User;
use crate::core::roster::Catalog;
use crate::util::constants::CURRENT_USER_STORAGE_KEY;
use crate::util::error::StorageError;

/// Restore the logged-in user from a previous session, if any.
///
/// An undecodable stored user is logged and ignored (treated as logged out).
pub fn restore_user<S: LocalStorage + ?Sized>(storage: &S) -> Option<User> {
    match get_json::<User, S>(storage, CURRENT_USER_STORAGE_KEY) {
        Ok(user) => {
            if user.is_some() {
                tracing::debug!("Restored logged-in user");
            }
            user
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable stored user");
            None
        }
    }
}

/// Log in. Credentials are not checked; the demo identity is always used.
pub fn login<S: LocalStorage + ?Sized>(
    catalog: &Catalog,
    storage: &mut S,
) -> Result<User, StorageError> {
    let user = catalog.mock_user.clone();
    set_json(storage, CURRENT_USER_STORAGE_KEY, &user)?;
    tracing::info!("User logged in");
    Ok(user)
}

/// Log out, forgetting the stored user.
pub fn logout<S: LocalStorage + ?Sized>(storage: &mut S) -> Result<(), StorageError> {
    storage.remove_item(CURRENT_USER_STORAGE_KEY)?;
    tracing::info!("User logged out");
    Ok(())
}
