// Cercanos - app/mod.rs
//
// Application layer: state ownership, favourites, account, local storage.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod account;
pub mod favorites;
pub mod state;
pub mod storage;
