//! particlefield-core - simulation and rendering logic for an interactive 2D particle field
//!
//! This crate has no browser dependencies. Drawing goes through the
//! [`surface::DrawContext`] trait, so the same engine runs against an HTML
//! canvas (see `particlefield-web`) or the in-memory [`recording::Recorder`]
//! used by the headless simulator and the tests.

pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod interactivity;
pub mod links;
pub mod merge;
pub mod particle;
pub mod recording;
pub mod surface;

pub use canvas::Canvas;
pub use config::Config;
pub use engine::{Engine, FrameReport};
pub use error::{ConfigError, ConfigResult, MountError};
pub use interactivity::Intent;
pub use surface::DrawContext;
