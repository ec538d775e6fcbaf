//! GPU resource layer: capability probing, render-target textures, and the
//! shared fullscreen-triangle draw every kernel uses (spec §4.1).

pub mod caps;
pub mod fullscreen;
pub mod target;

pub use caps::GpuCaps;
pub use fullscreen::{draw_fullscreen, draw_fullscreen_clear};
pub use target::{FboTarget, PingPongTarget};
