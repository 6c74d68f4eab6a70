// Cercanos - lib.rs
//
// Library entry point, exposing all non-CLI modules for integration testing
// and programmatic use.
//
// Command parsing and terminal rendering live in the binary (`main.rs`,
// `cli.rs`) and are not part of the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
