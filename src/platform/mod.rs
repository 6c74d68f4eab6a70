// Cercanos - platform/mod.rs
//
// Platform abstraction layer: directory resolution and config.toml.
// Dependencies: standard library, directories crate.
// Must NOT depend on: app. Uses core::model only for typed config values.

pub mod config;
