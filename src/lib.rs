//! particlefield - interactive 2D particle field backgrounds
//!
//! The simulation lives in `particlefield-core` and the browser binding in
//! `particlefield-web`. This crate holds the command-line side: loading config
//! files, running the engine headless, and building a demo page.

pub mod headless;
pub mod io;
pub mod site;

pub use particlefield_core as core;
