// Cercanos - core/mod.rs
//
// Core business logic layer.
// Dependencies: serde, chrono, csv. No filesystem access except roster seed
// loading.
// Must NOT depend on: app, platform.

pub mod export;
pub mod filter;
pub mod geo;
pub mod model;
pub mod review;
pub mod roster;
