//! Palette Pilot
//!
//! Orchestrates an external palette engine: parses pasted colors, builds
//! generation requests from UI parameters, debounces and sequences them, and
//! keeps a perceptual analysis in step with the current palette.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
