//! Shared wire types for the fluid simulator.
//!
//! Kept free of any GPU dependency (no `wgpu`) so a host can depend on this
//! crate alone to build `InputEvent`/`LandmarkFrame` streams and a
//! `SimConfig`, without pulling in the renderer.

mod color;
mod config;
mod error;
mod input;
mod landmark;

pub use color::Color;
pub use config::{SimConfig, SIM_DT_MAX};
pub use error::SimError;
pub use input::{InputEvent, KeyCode, PointerId};
pub use landmark::{HandLandmarks, LandmarkFrame, LANDMARK_COUNT};
