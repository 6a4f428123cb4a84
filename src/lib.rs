//! smilex library crate.
//!
//! This crate owns the X11/GLX platform pieces and the fixed textured-quad
//! scene driven by the `smilex` binary.

pub mod context;
pub mod core;
pub mod input;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod window;

pub mod logging;
