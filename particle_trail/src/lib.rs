// THEORY:
// This file is the main entry point for the `particle_trail` library crate.
// It exposes the per-frame tracking pipeline (`TrackerContext`, `run`) and the
// collaborator traits a front end implements to feed frames in and show the
// annotated result. The image-processing stages live in `core_modules` and
// operate on plain `image` buffers, so nothing here depends on a camera API.

pub mod core_modules;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use error::{Result, TrackerError};
