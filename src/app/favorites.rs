// Cercanos - app/favorites.rs
//
// The favourites store: the bookmarked professional IDs, loaded once from
// local storage and rewritten in full after every toggle. IDs keep the order
// they were added in, so a stored array round-trips unchanged, and undoing a
// removal puts the ID back in its old slot.

use crate::app::storage::{get_json, set_json, LocalStorage};
use crate::util::constants::FAVORITES_STORAGE_KEY;
use crate::util::error::StorageError;

/// Bookmarked professional IDs, without duplicates, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    ids: Vec<String>,

    /// Slot and ID of the most recent removal, cleared by any other toggle.
    last_removed: Option<(usize, String)>,
}

impl Favorites {
    /// Load the stored favourites. An absent key means no favourites; an
    /// undecodable value is logged and also treated as empty.
    pub fn load<S: LocalStorage + ?Sized>(storage: &S) -> Self {
        match get_json::<Vec<String>, S>(storage, FAVORITES_STORAGE_KEY) {
            Ok(Some(stored)) => {
                let mut ids: Vec<String> = Vec::with_capacity(stored.len());
                for id in stored {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                tracing::debug!(count = ids.len(), "Favourites loaded");
                Self {
                    ids,
                    last_removed: None,
                }
            }
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable favourites");
                Self::default()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove `id` if present, otherwise add it, then persist.
    ///
    /// A new ID is appended, except that re-adding the ID removed by the
    /// previous toggle restores it to the slot it was removed from.
    /// Returns whether `id` is a favourite afterwards. If persisting fails
    /// the in-memory list is left as it was before the call.
    pub fn toggle<S: LocalStorage + ?Sized>(
        &mut self,
        id: &str,
        storage: &mut S,
    ) -> Result<bool, StorageError> {
        let previous = self.clone();
        let undo_slot = match self.last_removed.take() {
            Some((pos, last)) if last == id => Some(pos),
            _ => None,
        };

        let now_favorite = match self.ids.iter().position(|fav| fav == id) {
            Some(pos) => {
                self.ids.remove(pos);
                self.last_removed = Some((pos, id.to_string()));
                false
            }
            None => {
                let slot = undo_slot.map_or(self.ids.len(), |pos| pos.min(self.ids.len()));
                self.ids.insert(slot, id.to_string());
                true
            }
        };

        if let Err(e) = self.persist(storage) {
            *self = previous;
            return Err(e);
        }

        tracing::debug!(professional = id, favorite = now_favorite, "Favourite toggled");
        Ok(now_favorite)
    }

    fn persist<S: LocalStorage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        set_json(storage, FAVORITES_STORAGE_KEY, &self.ids)
    }
}
